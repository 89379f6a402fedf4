//! Test utilities & fixtures.
//! Builds a dispatcher over an in-memory world and captures every outgoing message.
#![allow(dead_code)] // Each test binary uses a different subset.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use chatcommand::command::{
    Actor, BoundArguments, CommandContext, CommandHandler, CommandRegistry, Dispatcher, Outbox, OutgoingMessage,
    PluginCatalog, PluginSettings, Privilege, Recipient, Services,
};
use chatcommand::handlers;
use chatcommand::locale::MessageCatalog;
use chatcommand::world::{Character, InMemoryWorld, Presence, World};

pub struct Harness {
    pub world: Arc<InMemoryWorld>,
    pub dispatcher: Dispatcher,
    outgoing: UnboundedReceiver<OutgoingMessage>,
}

impl Harness {
    /// Built-in commands with default settings.
    pub fn builtin() -> Self {
        Self::builtin_with(&PluginSettings::default())
    }

    pub fn builtin_with(settings: &PluginSettings) -> Self {
        let mut catalog = PluginCatalog::new();
        catalog.extend(handlers::builtin().unwrap());
        Self::with_registry(catalog.build(settings).unwrap())
    }

    pub fn with_registry(registry: CommandRegistry) -> Self {
        let world = Arc::new(InMemoryWorld::new());
        let (outbox, outgoing) = Outbox::channel();
        let services = Services::new(world.clone(), Arc::new(MessageCatalog::builtin()), outbox);
        let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(services));
        Self { world, dispatcher, outgoing }
    }

    /// Rebuild the dispatcher so players type `prefix` instead of `/`.
    pub fn with_prefix(mut self, prefix: char) -> Self {
        let registry = self.dispatcher.registry().clone();
        let services = self.dispatcher.services().clone();
        self.dispatcher = Dispatcher::new(registry, services).with_prefix(prefix);
        self
    }

    /// Swap the message catalog, keeping the world and the outgoing channel.
    pub fn with_messages(mut self, messages: MessageCatalog) -> Self {
        let registry = self.dispatcher.registry().clone();
        let current = self.dispatcher.services().clone();
        let services = Services::new(current.world.clone(), Arc::new(messages), current.outbox.clone());
        self.dispatcher = Dispatcher::new(registry, Arc::new(services));
        self
    }

    /// Insert a character and return an online actor controlling it.
    pub async fn player(&self, name: &str, privilege: Privilege) -> Actor {
        self.player_with(name, privilege, |_| {}).await
    }

    pub async fn player_with(&self, name: &str, privilege: Privilege, setup: impl FnOnce(&mut Character)) -> Actor {
        let mut character = Character::new(&format!("{}-account", name.to_lowercase()), name);
        let actor = Actor::new(name, privilege, "en", character.id);
        character.presence = Some(Presence {
            actor: actor.id,
            locale: "en".to_string(),
        });
        setup(&mut character);
        self.world.insert(character).await;
        actor
    }

    pub async fn character(&self, name: &str) -> Character {
        self.world.find_character(name).await.expect("character exists")
    }

    /// All messages sent since the last drain.
    pub fn drain(&mut self) -> Vec<OutgoingMessage> {
        let mut out = Vec::new();
        while let Ok(message) = self.outgoing.try_recv() {
            out.push(message);
        }
        out
    }

    /// Texts addressed to `actor` since the last drain.
    pub fn replies_to(&mut self, actor: &Actor) -> Vec<String> {
        self.drain()
            .into_iter()
            .filter(|m| m.recipient == Recipient::Actor(actor.id))
            .map(|m| m.text)
            .collect()
    }
}

/// Handler that records what it was invoked with and then succeeds.
#[derive(Default)]
pub struct Recording {
    pub calls: Mutex<Vec<(Uuid, BoundArguments)>>,
}

impl Recording {
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<BoundArguments> {
        self.calls.lock().unwrap().last().map(|(_, args)| args.clone())
    }
}

#[async_trait]
impl CommandHandler for Recording {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        self.calls.lock().unwrap().push((ctx.actor.id, ctx.args));
        Ok(())
    }
}

/// Handler whose business logic fails in the way given.
pub enum Broken {
    Errors,
    Panics,
}

#[async_trait]
impl CommandHandler for Broken {
    async fn execute(&self, _ctx: CommandContext) -> Result<()> {
        match self {
            Broken::Errors => anyhow::bail!("database unavailable"),
            Broken::Panics => panic!("handler bug"),
        }
    }
}

/// Wrap a concrete handler so tests can keep a typed handle to it.
pub fn shared<H: CommandHandler + 'static>(handler: H) -> (Arc<H>, Arc<dyn CommandHandler>) {
    let typed = Arc::new(handler);
    let erased: Arc<dyn CommandHandler> = typed.clone();
    (typed, erased)
}
