//! `/move <character> <map> <x> <y>`: relocate a character.
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::MOVE_ID;
use crate::command::{ArgKind, CommandContext, CommandDescriptor, CommandHandler, Privilege, Schema};

pub struct MoveCommand;

pub fn descriptor() -> Result<CommandDescriptor> {
    let schema = Schema::builder()
        .required("character", ArgKind::Str)
        .required("map", ArgKind::Str)
        .required("position", ArgKind::Coordinate)
        .build()?;
    Ok(CommandDescriptor::new("/move", MOVE_ID, Arc::new(MoveCommand))
        .privilege(Privilege::GameMaster)
        .schema(schema)
        .help("Move a character to a map position"))
}

#[async_trait]
impl CommandHandler for MoveCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let name = ctx.args.text("character")?;
        let map = ctx.args.text("map")?.to_ascii_lowercase();
        let (x, y) = ctx.args.coordinate("position")?;

        let Some(mut target) = ctx.target_character(name).await else {
            return Ok(());
        };
        target.map = map;
        target.x = x;
        target.y = y;
        ctx.world().save_character(&target).await?;

        let (x, y) = (x.to_string(), y.to_string());
        ctx.reply(
            "move.done",
            &[("character", &target.name), ("map", &target.map), ("x", &x), ("y", &y)],
        );
        ctx.notify(&target, "move.notice", &[("map", &target.map), ("x", &x), ("y", &y)]);
        Ok(())
    }
}
