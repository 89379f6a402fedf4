//! Stat point commands.
//!
//! `/addstr`, `/addagi`, `/addvit`, `/addene` and `/addcmd` move the caller's
//! free level-up points into one stat. `/set` lets a game master overwrite a
//! stat on any character.
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ADD_AGI_ID, ADD_CMD_ID, ADD_ENE_ID, ADD_STR_ID, ADD_VIT_ID, SET_STAT_ID};
use crate::command::{
    ArgKind, CommandContext, CommandDescriptor, CommandHandler, PluginConfiguration, Privilege, Schema,
};
use crate::world::Stat;

/// Configuration shared by the `/add*` commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddStatConfig {
    /// Highest value a stat may reach through `/add*`.
    pub max_stat: u32,
}

impl Default for AddStatConfig {
    fn default() -> Self {
        Self { max_stat: 32_767 }
    }
}

pub struct AddStatCommand {
    stat: Stat,
}

pub struct SetStatCommand;

pub fn descriptors() -> Result<Vec<CommandDescriptor>> {
    let defaults = PluginConfiguration::from_serializable(&AddStatConfig::default())?;
    let add = [
        (Stat::Strength, ADD_STR_ID),
        (Stat::Agility, ADD_AGI_ID),
        (Stat::Vitality, ADD_VIT_ID),
        (Stat::Energy, ADD_ENE_ID),
        (Stat::Command, ADD_CMD_ID),
    ];

    let mut out = Vec::with_capacity(add.len() + 1);
    for (stat, id) in add {
        let schema = Schema::builder().required("amount", ArgKind::Unsigned).build()?;
        let key = format!("/add{}", stat.key());
        out.push(
            CommandDescriptor::new(&key, id, Arc::new(AddStatCommand { stat }))
                .schema(schema)
                .help("Spend free points on a stat")
                .with_configuration(defaults.clone()),
        );
    }

    let schema = Schema::builder()
        .choice("stat", &Stat::KEYS)
        .required("amount", ArgKind::Unsigned)
        .required("character", ArgKind::Str)
        .build()?;
    out.push(
        CommandDescriptor::new("/set", SET_STAT_ID, Arc::new(SetStatCommand))
            .privilege(Privilege::GameMaster)
            .schema(schema)
            .help("Set a character's stat"),
    );
    Ok(out)
}

#[async_trait]
impl CommandHandler for AddStatCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let cfg: AddStatConfig = ctx.config()?;
        let amount = ctx.args.unsigned("amount")?;
        if amount == 0 {
            ctx.reply("stats.zero", &[]);
            return Ok(());
        }

        let mut character = ctx.own_character().await?;
        if character.free_points < amount {
            let available = character.free_points.to_string();
            ctx.reply("stats.not_enough_points", &[("available", &available)]);
            return Ok(());
        }

        let updated = character.stats.get(self.stat).saturating_add(amount);
        if updated > cfg.max_stat {
            let max = cfg.max_stat.to_string();
            ctx.reply("stats.limit", &[("stat", self.stat.key()), ("max", &max)]);
            return Ok(());
        }

        character.free_points -= amount;
        character.stats.set(self.stat, updated);
        ctx.world().save_character(&character).await?;

        let amount = amount.to_string();
        let remaining = character.free_points.to_string();
        ctx.reply(
            "stats.added",
            &[("amount", &amount), ("stat", self.stat.key()), ("remaining", &remaining)],
        );
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for SetStatCommand {
    async fn execute(&self, ctx: CommandContext) -> Result<()> {
        let key = ctx.args.text("stat")?;
        let stat = Stat::from_key(key).ok_or_else(|| anyhow!("schema allowed unknown stat {}", key))?;
        let amount = ctx.args.unsigned("amount")?;
        let name = ctx.args.text("character")?;

        let Some(mut target) = ctx.target_character(name).await else {
            return Ok(());
        };
        target.stats.set(stat, amount);
        ctx.world().save_character(&target).await?;

        let amount = amount.to_string();
        ctx.reply(
            "set.done",
            &[("character", &target.name), ("stat", stat.key()), ("amount", &amount)],
        );
        ctx.notify(&target, "set.notice", &[("stat", stat.key()), ("amount", &amount)]);
        Ok(())
    }
}
