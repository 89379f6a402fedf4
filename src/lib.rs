//! # chatcommand - Chat Command Framework for Game Servers
//!
//! chatcommand turns chat lines such as `/addstr 50` or `/move Bob lorencia 130 125`
//! into typed, privilege-checked handler invocations. Commands are registered
//! once at startup and the resulting registry is read-only while serving.
//!
//! ## Features
//!
//! - **Declarative Commands**: each command declares its key, stable identity,
//!   minimum privilege, argument schema and handler.
//! - **Typed Arguments**: integers, booleans, strings, choice sets, map
//!   coordinates and a trailing free-text field, bound positionally.
//! - **Authorization Gate**: handlers never run for actors below the declared
//!   privilege.
//! - **Per-Command Settings**: enable flags and option blocks persisted by
//!   command identity in a TOML file.
//! - **Localized Feedback**: every refusal is reported in the caller's locale.
//! - **Failure Isolation**: a failing or panicking handler produces a generic
//!   error reply and a log entry; the server keeps running.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chatcommand::command::{Actor, Dispatcher, Outbox, PluginCatalog, PluginSettings, Privilege, Services};
//! use chatcommand::locale::MessageCatalog;
//! use chatcommand::world::{Character, InMemoryWorld};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut catalog = PluginCatalog::new();
//!     catalog.extend(chatcommand::handlers::builtin()?);
//!     let registry = catalog.build(&PluginSettings::default())?;
//!
//!     let world = Arc::new(InMemoryWorld::new());
//!     let character = world.insert(Character::new("acct", "Bob")).await;
//!     let (outbox, mut rx) = Outbox::channel();
//!     let services = Services::new(world, Arc::new(MessageCatalog::builtin()), outbox);
//!     let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(services));
//!
//!     let actor = Actor::new("Bob", Privilege::Normal, "en", character);
//!     dispatcher.dispatch(&actor, "/help").await;
//!     while let Ok(msg) = rx.try_recv() {
//!         println!("{}", msg.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`command`] - registry, binder, gate, dispatcher and plugin catalog
//! - [`handlers`] - built-in commands
//! - [`world`] - world-state collaborator used by handlers
//! - [`locale`] - localized message templates
//! - [`config`] - configuration management and validation
//! - [`metrics`] - dispatch outcome counters
//! - [`logutil`] - helpers for logging untrusted chat text

pub mod command;
pub mod config;
pub mod handlers;
pub mod locale;
pub mod logutil;
pub mod metrics;
pub mod world;
