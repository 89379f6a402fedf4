//! `/post <message>`: server-wide announcement from a player.
//!
//! The announcement is one [crate::command::Recipient::Broadcast] payload, so
//! it is rendered once in the server's default locale rather than per
//! recipient. Refusals go to the sender in the sender's own locale.
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::POST_ID;
use crate::command::{CommandContext, CommandDescriptor, CommandHandler, PluginConfiguration, Schema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// Minimum character level required to post.
    pub min_level: u32,
}

pub struct PostCommand;

pub fn descriptor() -> Result<CommandDescriptor> {
    let schema = Schema::builder().text("message", true).build()?;
    let defaults = PluginConfiguration::from_serializable(&PostConfig::default())?;
    Ok(CommandDescriptor::new("/post", POST_ID, Arc::new(PostCommand))
        .schema(schema)
        .help("Send a message to every player")
        .with_configuration(defaults))
}

#[async_trait]
impl CommandHandler for PostCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let cfg: PostConfig = ctx.config()?;
        let message = ctx.args.text("message")?;
        let sender = ctx.own_character().await?;

        if sender.is_chat_banned(Utc::now()) {
            ctx.reply("post.chat_banned", &[]);
            return Ok(());
        }
        if sender.level < cfg.min_level {
            let level = cfg.min_level.to_string();
            ctx.reply("post.level", &[("level", &level)]);
            return Ok(());
        }

        let messages = &ctx.services.messages;
        let text = messages.render(
            messages.default_locale(),
            "post.format",
            &[("sender", &sender.name), ("message", message)],
        );
        ctx.broadcast(text);
        Ok(())
    }
}
