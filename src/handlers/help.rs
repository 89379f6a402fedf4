//! `/help [filter]`: list the commands the caller may use.
//!
//! The optional filter narrows the listing by substring, which is the one
//! place substring matching on keys is allowed.
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::HELP_ID;
use crate::command::{CommandContext, CommandDescriptor, CommandHandler, Privilege, Schema};

pub struct HelpCommand;

pub fn descriptor() -> Result<CommandDescriptor> {
    let schema = Schema::builder().text("filter", false).build()?;
    Ok(CommandDescriptor::new("/help", HELP_ID, Arc::new(HelpCommand))
        .privilege(Privilege::Normal)
        .schema(schema)
        .help("List available commands, optionally filtered"))
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let filter = ctx.args.text("filter")?;
        let privilege = ctx.actor.privilege;
        let entries = if filter.is_empty() {
            ctx.registry.list_for(privilege)
        } else {
            ctx.registry.search(filter, privilege)
        };

        if entries.is_empty() {
            ctx.reply("help.none", &[("filter", filter)]);
            return Ok(());
        }

        ctx.reply("help.header", &[]);
        for d in entries {
            let usage = ctx.usage(d);
            ctx.reply("help.entry", &[("usage", &usage), ("help", d.help_text())]);
        }
        Ok(())
    }
}
