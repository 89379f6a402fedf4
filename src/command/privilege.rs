//! Privilege levels used to gate commands.
//!
//! Levels keep the numeric ranks used by account records (1, 5, 10) so that
//! persisted values map directly. Higher levels imply a superset of lower
//! capabilities; comparison is by rank.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric rank of a regular player.
pub const LEVEL_NORMAL: u8 = 1;
/// Numeric rank of a game master.
pub const LEVEL_GAME_MASTER: u8 = 5;
/// Numeric rank of a server administrator.
pub const LEVEL_ADMINISTRATOR: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    Normal,
    GameMaster,
    Administrator,
}

impl Privilege {
    pub fn level(self) -> u8 {
        match self {
            Privilege::Normal => LEVEL_NORMAL,
            Privilege::GameMaster => LEVEL_GAME_MASTER,
            Privilege::Administrator => LEVEL_ADMINISTRATOR,
        }
    }

    /// Map a stored numeric level onto a privilege.
    ///
    /// Levels ≥10 are treated as administrators, ≥5 as game masters, anything
    /// else as a normal player.
    pub fn from_level(level: u8) -> Self {
        match level {
            l if l >= LEVEL_ADMINISTRATOR => Privilege::Administrator,
            l if l >= LEVEL_GAME_MASTER => Privilege::GameMaster,
            _ => Privilege::Normal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Privilege::Normal => "Normal",
            Privilege::GameMaster => "GameMaster",
            Privilege::Administrator => "Administrator",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Privilege {
    type Err = String;

    /// Accepts role names (`normal`, `gm`, `gamemaster`, `admin`, ...) or a numeric level.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "normal" | "player" | "user" => Ok(Privilege::Normal),
            "gm" | "gamemaster" | "game_master" => Ok(Privilege::GameMaster),
            "admin" | "administrator" => Ok(Privilege::Administrator),
            other => other
                .parse::<u8>()
                .map(Privilege::from_level)
                .map_err(|_| format!("unknown privilege '{}'", s)),
        }
    }
}
