//! Game master moderation commands: account bans and timed chat bans.
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;

use super::{BAN_ACCOUNT_ID, CHAT_BAN_ID, CHAT_UNBAN_ID, UNBAN_ACCOUNT_ID};
use crate::command::{ArgKind, ArgValue, CommandContext, CommandDescriptor, CommandHandler, Privilege, Schema};

/// Minutes applied when `/chatban` is given no duration.
pub const DEFAULT_CHAT_BAN_MINUTES: u32 = 60;

/// `/banacc` and `/unbanacc`, depending on `banned`.
pub struct AccountBanCommand {
    banned: bool,
}

pub struct ChatBanCommand;

pub struct ChatUnbanCommand;

pub fn descriptors() -> Result<Vec<CommandDescriptor>> {
    let target = || Schema::builder().required("character", ArgKind::Str).build();

    let chat_ban = Schema::builder()
        .required("character", ArgKind::Str)
        .optional("minutes", ArgKind::Unsigned)
        .with_default(ArgValue::Unsigned(DEFAULT_CHAT_BAN_MINUTES))
        .build()?;

    Ok(vec![
        CommandDescriptor::new("/banacc", BAN_ACCOUNT_ID, Arc::new(AccountBanCommand { banned: true }))
            .privilege(Privilege::GameMaster)
            .schema(target()?)
            .help("Ban the account owning a character"),
        CommandDescriptor::new("/unbanacc", UNBAN_ACCOUNT_ID, Arc::new(AccountBanCommand { banned: false }))
            .privilege(Privilege::GameMaster)
            .schema(target()?)
            .help("Lift an account ban"),
        CommandDescriptor::new("/chatban", CHAT_BAN_ID, Arc::new(ChatBanCommand))
            .privilege(Privilege::GameMaster)
            .schema(chat_ban)
            .help("Mute a character for a number of minutes"),
        CommandDescriptor::new("/chatunban", CHAT_UNBAN_ID, Arc::new(ChatUnbanCommand))
            .privilege(Privilege::GameMaster)
            .schema(target()?)
            .help("Lift a chat ban"),
    ])
}

#[async_trait]
impl CommandHandler for AccountBanCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let name = ctx.args.text("character")?;
        let Some(target) = ctx.target_character(name).await else {
            return Ok(());
        };

        let params = [("character", target.name.as_str())];
        let currently = ctx.world().is_account_banned(&target.account).await;
        if currently == self.banned {
            let key = if self.banned { "ban.already" } else { "unban.not_banned" };
            ctx.reply(key, &params);
            return Ok(());
        }

        ctx.world().set_account_banned(&target.account, self.banned).await?;
        ctx.reply(if self.banned { "ban.done" } else { "unban.done" }, &params);
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for ChatBanCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let name = ctx.args.text("character")?;
        let minutes = ctx.args.unsigned("minutes")?;
        let Some(mut target) = ctx.target_character(name).await else {
            return Ok(());
        };

        target.chat_banned_until = Some(Utc::now() + Duration::minutes(i64::from(minutes)));
        ctx.world().save_character(&target).await?;

        let minutes = minutes.to_string();
        ctx.reply("chatban.done", &[("character", &target.name), ("minutes", &minutes)]);
        ctx.notify(&target, "chatban.notice", &[("minutes", &minutes)]);
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for ChatUnbanCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let name = ctx.args.text("character")?;
        let Some(mut target) = ctx.target_character(name).await else {
            return Ok(());
        };

        if !target.is_chat_banned(Utc::now()) {
            ctx.reply("chatunban.not_banned", &[("character", &target.name)]);
            return Ok(());
        }
        target.chat_banned_until = None;
        ctx.world().save_character(&target).await?;

        ctx.reply("chatunban.done", &[("character", &target.name)]);
        ctx.notify(&target, "chatunban.notice", &[]);
        Ok(())
    }
}
