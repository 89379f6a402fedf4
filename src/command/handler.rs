//! Handler seam, execution context and outbound message plumbing.
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::warn;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::actor::Actor;
use super::binder::BoundArguments;
use super::catalog::PluginConfiguration;
use super::registry::{prefixed_key, CommandDescriptor, CommandRegistry};
use crate::locale::MessageCatalog;
use crate::world::{Character, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    Actor(Uuid),
    Broadcast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub recipient: Recipient,
    pub text: String,
}

/// Sending half of the outbound message channel.
///
/// The connection layer owns the receiver and delivers messages to sessions.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<OutgoingMessage>,
}

impl Outbox {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutgoingMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, recipient: Recipient, text: String) {
        if self.tx.send(OutgoingMessage { recipient, text }).is_err() {
            warn!("outgoing channel closed; dropping message");
        }
    }

    pub fn send_to(&self, actor: Uuid, text: String) {
        self.send(Recipient::Actor(actor), text)
    }

    pub fn broadcast(&self, text: String) {
        self.send(Recipient::Broadcast, text)
    }
}

/// Collaborators shared by every dispatch.
pub struct Services {
    pub world: Arc<dyn World>,
    pub messages: Arc<MessageCatalog>,
    pub outbox: Outbox,
}

impl Services {
    pub fn new(world: Arc<dyn World>, messages: Arc<MessageCatalog>, outbox: Outbox) -> Self {
        Self { world, messages, outbox }
    }

    /// Render `key` in `locale` and deliver it to `actor`.
    pub fn tell(&self, actor: Uuid, locale: &str, key: &str, params: &[(&str, &str)]) {
        let text = self.messages.render(locale, key, params);
        self.outbox.send_to(actor, text);
    }
}

/// Business logic behind one command.
///
/// A single handler instance serves every concurrent caller, so any state it
/// keeps across invocations must be keyed and synchronized (see
/// [super::confirm::ConfirmationGate]). Returning `Err` is reserved for
/// unexpected failures; expected refusals are reported to the actor and
/// return `Ok(())`.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: CommandContext) -> Result<()>;
}

/// Everything a handler receives for one invocation.
pub struct CommandContext {
    pub actor: Actor,
    pub key: String,
    pub args: BoundArguments,
    /// Command prefix players type, used when echoing keys back to them.
    pub prefix: char,
    pub configuration: Option<PluginConfiguration>,
    pub registry: Arc<CommandRegistry>,
    pub services: Arc<Services>,
}

impl CommandContext {
    pub fn world(&self) -> &dyn World {
        self.services.world.as_ref()
    }

    /// Send a localized message to the invoking actor.
    pub fn reply(&self, key: &str, params: &[(&str, &str)]) {
        self.services.tell(self.actor.id, &self.actor.locale, key, params);
    }

    /// Send a localized message to another character, if they are online.
    pub fn notify(&self, target: &Character, key: &str, params: &[(&str, &str)]) {
        if let Some(presence) = &target.presence {
            self.services.tell(presence.actor, &presence.locale, key, params);
        }
    }

    /// This command's key as the caller typed it.
    pub fn typed_key(&self) -> String {
        prefixed_key(&self.key, self.prefix)
    }

    /// Usage line of `descriptor` with the configured prefix.
    pub fn usage(&self, descriptor: &CommandDescriptor) -> String {
        descriptor.usage_with_prefix(self.prefix)
    }

    pub fn broadcast(&self, text: String) {
        self.services.outbox.broadcast(text);
    }

    /// Typed view of this command's configuration; `T::default()` when none is set.
    pub fn config<T: DeserializeOwned + Default>(&self) -> Result<T> {
        match &self.configuration {
            Some(cfg) => cfg.get::<T>(),
            None => Ok(T::default()),
        }
    }

    /// Load the invoking actor's own character.
    pub async fn own_character(&self) -> Result<Character> {
        self.world()
            .character(self.actor.character)
            .await
            .ok_or_else(|| anyhow!("character {} of actor {} not found", self.actor.character, self.actor.name))
    }

    /// Look up another character by name, replying `character.not_found` when absent.
    pub async fn target_character(&self, name: &str) -> Option<Character> {
        let found = self.world().find_character(name).await;
        if found.is_none() {
            self.reply("character.not_found", &[("character", name)]);
        }
        found
    }
}
