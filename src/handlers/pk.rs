//! `/pk <level> <count> <character>`: overwrite a character's player-kill state.
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::PK_ID;
use crate::command::{ArgKind, CommandContext, CommandDescriptor, CommandHandler, Privilege, Schema};

pub struct PkCommand;

pub fn descriptor() -> Result<CommandDescriptor> {
    let schema = Schema::builder()
        .required("level", ArgKind::Integer)
        .required("count", ArgKind::Integer)
        .required("character", ArgKind::Str)
        .build()?;
    Ok(CommandDescriptor::new("/pk", PK_ID, Arc::new(PkCommand))
        .privilege(Privilege::GameMaster)
        .schema(schema)
        .help("Set a character's PK level and count"))
}

#[async_trait]
impl CommandHandler for PkCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let level = ctx.args.integer("level")?;
        let count = ctx.args.integer("count")?;
        let name = ctx.args.text("character")?;

        let Some(mut target) = ctx.target_character(name).await else {
            return Ok(());
        };
        target.pk_level = level;
        target.pk_count = count;
        ctx.world().save_character(&target).await?;

        let (level, count) = (level.to_string(), count.to_string());
        ctx.reply(
            "pk.done",
            &[("character", &target.name), ("level", &level), ("count", &count)],
        );
        Ok(())
    }
}
