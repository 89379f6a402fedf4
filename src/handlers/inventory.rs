//! `/clearinv`: empty the caller's inventory after a repeat confirmation.
//!
//! Destructive, so it ships disabled and must be switched on in the plugin
//! settings. The first call arms a per-actor confirmation; a second call inside
//! `confirmation_seconds` performs the wipe.
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::CLEAR_INVENTORY_ID;
use crate::command::confirm::{Confirmation, ConfirmationGate};
use crate::command::{CommandContext, CommandDescriptor, CommandHandler, PluginConfiguration};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearInventoryConfig {
    pub confirmation_seconds: u64,
}

impl Default for ClearInventoryConfig {
    fn default() -> Self {
        Self { confirmation_seconds: 30 }
    }
}

#[derive(Default)]
pub struct ClearInventoryCommand {
    confirmations: ConfirmationGate,
}

pub fn descriptor() -> Result<CommandDescriptor> {
    let defaults = PluginConfiguration::from_serializable(&ClearInventoryConfig::default())?;
    Ok(
        CommandDescriptor::new("/clearinv", CLEAR_INVENTORY_ID, Arc::new(ClearInventoryCommand::default()))
            .help("Destroy every item in your inventory")
            .with_configuration(defaults)
            .disabled_by_default(),
    )
}

#[async_trait]
impl CommandHandler for ClearInventoryCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let cfg: ClearInventoryConfig = ctx.config()?;
        let window = Duration::from_secs(cfg.confirmation_seconds);

        if self.confirmations.check(ctx.actor.id, window) == Confirmation::Armed {
            let seconds = cfg.confirmation_seconds.to_string();
            let command = ctx.typed_key();
            ctx.reply("inventory.confirm", &[("command", &command), ("seconds", &seconds)]);
            return Ok(());
        }

        let mut character = ctx.own_character().await?;
        if character.inventory.is_empty() {
            ctx.reply("inventory.empty", &[]);
            return Ok(());
        }
        let removed = std::mem::take(&mut character.inventory).len();
        ctx.world().save_character(&character).await?;

        let count = removed.to_string();
        ctx.reply("inventory.cleared", &[("count", &count)]);
        Ok(())
    }
}
