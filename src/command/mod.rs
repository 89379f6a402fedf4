//! # Command Framework
//!
//! Turns a raw chat line such as `/set ene 9999 Bob` into an authorized,
//! type-checked call into business logic.
//!
//! ## Components
//!
//! - [`schema`] - explicit argument layouts built once at startup
//! - [`binder`] - tokenizes the line and binds typed values per schema field
//! - [`registry`] - command descriptors keyed by case-insensitive command key
//! - [`gate`] - privilege comparison run before any parsing
//! - [`dispatch`] - the resolve → authorize → bind → execute pipeline
//! - [`catalog`] - startup registration plus persisted enable/config settings
//! - [`handler`] - the handler trait, execution context and outbox
//! - [`confirm`] - per-actor "type it twice" confirmation state
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   raw text + actor
//! │  Dispatcher  │ ───────────────────────────────┐
//! └──────────────┘                                │
//!        │ resolve            ┌──────────────┐    │
//!        ├──────────────────▶ │   Registry   │    │
//!        │ authorize          ├──────────────┤    │
//!        ├──────────────────▶ │     Gate     │    │
//!        │ bind               ├──────────────┤    │
//!        ├──────────────────▶ │    Binder    │    │
//!        │ execute            ├──────────────┤    │
//!        └──────────────────▶ │   Handler    │ ◀──┘ outbox feedback
//!                             └──────────────┘
//! ```
//!
//! The registry is populated once through [`catalog::PluginCatalog`] and then
//! shared read-only, so concurrent dispatches need no locking.

pub mod actor;
pub mod binder;
pub mod catalog;
pub mod confirm;
pub mod dispatch;
pub mod errors;
pub mod gate;
pub mod handler;
pub mod privilege;
pub mod registry;
pub mod schema;

pub use actor::Actor;
pub use binder::{bind, BoundArguments};
pub use catalog::{PluginCatalog, PluginConfiguration, PluginSettings};
pub use dispatch::{Dispatcher, Outcome};
pub use errors::{ParseError, RegistryError, SchemaError};
pub use handler::{CommandContext, CommandHandler, Outbox, OutgoingMessage, Recipient, Services};
pub use privilege::Privilege;
pub use registry::{CommandDescriptor, CommandRegistry};
pub use schema::{ArgKind, ArgValue, Schema};
