//! World-state collaborator consumed by command handlers.
//!
//! The framework itself never touches world state; handlers reach it through
//! the [World] trait. Reads return owned snapshots and writes go through an
//! explicit [World::save_character], so every handler operation has a clear
//! load / mutate / save shape.
//!
//! [InMemoryWorld] backs the console binary and the tests.
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("unknown character {0}")]
    UnknownCharacter(Uuid),
}

/// Character attribute that level-up points can be spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Agility,
    Vitality,
    Energy,
    Command,
}

impl Stat {
    pub const KEYS: [&'static str; 5] = ["str", "agi", "vit", "ene", "cmd"];

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "str" => Some(Stat::Strength),
            "agi" => Some(Stat::Agility),
            "vit" => Some(Stat::Vitality),
            "ene" => Some(Stat::Energy),
            "cmd" => Some(Stat::Command),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Stat::Strength => "str",
            Stat::Agility => "agi",
            Stat::Vitality => "vit",
            Stat::Energy => "ene",
            Stat::Command => "cmd",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u32,
    pub agility: u32,
    pub vitality: u32,
    pub energy: u32,
    pub command: u32,
}

impl Stats {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Agility => self.agility,
            Stat::Vitality => self.vitality,
            Stat::Energy => self.energy,
            Stat::Command => self.command,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Strength => self.strength = value,
            Stat::Agility => self.agility = value,
            Stat::Vitality => self.vitality = value,
            Stat::Energy => self.energy = value,
            Stat::Command => self.command = value,
        }
    }
}

/// Where a character is connected, if online.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub actor: Uuid,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: Uuid,
    pub account: String,
    pub name: String,
    pub level: u32,
    pub free_points: u32,
    pub stats: Stats,
    pub pk_level: i32,
    pub pk_count: i32,
    pub map: String,
    pub x: u16,
    pub y: u16,
    pub inventory: Vec<String>,
    pub chat_banned_until: Option<DateTime<Utc>>,
    pub presence: Option<Presence>,
}

impl Character {
    pub fn new(account: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            account: account.to_string(),
            name: name.to_string(),
            level: 1,
            free_points: 0,
            stats: Stats::default(),
            pk_level: 0,
            pk_count: 0,
            map: "lorencia".to_string(),
            x: 130,
            y: 125,
            inventory: Vec::new(),
            chat_banned_until: None,
            presence: None,
        }
    }

    pub fn is_chat_banned(&self, now: DateTime<Utc>) -> bool {
        self.chat_banned_until.map(|until| until > now).unwrap_or(false)
    }
}

#[async_trait]
pub trait World: Send + Sync {
    async fn character(&self, id: Uuid) -> Option<Character>;

    /// Case-insensitive lookup by character name.
    async fn find_character(&self, name: &str) -> Option<Character>;

    async fn save_character(&self, character: &Character) -> Result<()>;

    async fn is_account_banned(&self, account: &str) -> bool;

    async fn set_account_banned(&self, account: &str, banned: bool) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryWorld {
    characters: RwLock<HashMap<Uuid, Character>>,
    banned_accounts: RwLock<HashSet<String>>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, character: Character) -> Uuid {
        let id = character.id;
        self.characters.write().await.insert(id, character);
        id
    }
}

#[async_trait]
impl World for InMemoryWorld {
    async fn character(&self, id: Uuid) -> Option<Character> {
        self.characters.read().await.get(&id).cloned()
    }

    async fn find_character(&self, name: &str) -> Option<Character> {
        self.characters
            .read()
            .await
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    async fn save_character(&self, character: &Character) -> Result<()> {
        let mut characters = self.characters.write().await;
        match characters.get_mut(&character.id) {
            Some(slot) => {
                *slot = character.clone();
                Ok(())
            }
            None => Err(WorldError::UnknownCharacter(character.id).into()),
        }
    }

    async fn is_account_banned(&self, account: &str) -> bool {
        self.banned_accounts.read().await.contains(&account.to_ascii_lowercase())
    }

    async fn set_account_banned(&self, account: &str, banned: bool) -> Result<()> {
        let mut accounts = self.banned_accounts.write().await;
        let account = account.to_ascii_lowercase();
        if banned {
            accounts.insert(account);
        } else {
            accounts.remove(&account);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_is_case_insensitive_and_save_requires_existing() {
        let world = InMemoryWorld::new();
        let id = world.insert(Character::new("acct", "Bob")).await;
        let mut bob = world.find_character("BOB").await.unwrap();
        assert_eq!(bob.id, id);

        bob.level = 50;
        world.save_character(&bob).await.unwrap();
        assert_eq!(world.character(id).await.unwrap().level, 50);

        let stranger = Character::new("other", "Eve");
        assert!(world.save_character(&stranger).await.is_err());
    }

    #[tokio::test]
    async fn account_bans_toggle() {
        let world = InMemoryWorld::new();
        world.set_account_banned("Acct", true).await.unwrap();
        assert!(world.is_account_banned("acct").await);
        world.set_account_banned("acct", false).await.unwrap();
        assert!(!world.is_account_banned("ACCT").await);
    }

    #[test]
    fn stat_keys_map_both_ways() {
        for key in Stat::KEYS {
            assert_eq!(Stat::from_key(key).unwrap().key(), key);
        }
        assert!(Stat::from_key("luck").is_none());
    }
}
