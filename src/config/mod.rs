//! # Configuration Management Module
//!
//! Server-level settings for the command host, kept in a single TOML file.
//! Per-command enable flags and option blocks live in the separate plugin
//! settings file referenced by `[plugins].settings_path` (see
//! [PluginSettings](crate::command::PluginSettings)).
//!
//! ## Configuration Structure
//!
//! - [`ServerConfig`] - server name, command prefix and default locale
//! - [`LoggingConfig`] - log level and optional log file
//! - [`PluginsConfig`] - location of the plugin settings file
//! - [`MessagesConfig`] - optional extra locale templates
//! - [`WorldConfig`] - characters seeded into the in-memory world
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatcommand::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     config.validate()?;
//!     println!("Prefix: {}", config.server.command_prefix);
//!
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! name = "chatcommand"
//! command_prefix = "/"
//! default_locale = "en"
//!
//! [logging]
//! level = "info"
//! file = "chatcommand.log"
//!
//! [plugins]
//! settings_path = "plugins.toml"
//!
//! [[world.characters]]
//! account = "admin"
//! name = "Admin"
//! level = 400
//! free_points = 1000
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::locale::DEFAULT_LOCALE;

/// Prefix characters a deployment may choose from.
pub const ALLOWED_PREFIXES: [char; 6] = ['^', '!', '+', '$', '/', '>'];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    /// Single character that marks a chat line as a command.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

fn default_command_prefix() -> String {
    "/".to_string()
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    pub settings_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesConfig {
    /// TOML file of `[locale] key = "template"` tables merged over the built-ins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSeed {
    pub account: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub free_points: u32,
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub characters: Vec<CharacterSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub plugins: PluginsConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub world: WorldConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.command_prefix()?;
        if self.server.default_locale.trim().is_empty() {
            return Err(anyhow!("server.default_locale must not be empty"));
        }
        if self.plugins.settings_path.trim().is_empty() {
            return Err(anyhow!("plugins.settings_path must not be empty"));
        }
        Ok(())
    }

    /// The configured prefix as a char, rejecting anything outside [ALLOWED_PREFIXES].
    pub fn command_prefix(&self) -> Result<char> {
        let raw = self.server.command_prefix.trim();
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if ALLOWED_PREFIXES.contains(&c) => Ok(c),
            _ => Err(anyhow!(
                "server.command_prefix '{}' must be one of {:?}",
                raw,
                ALLOWED_PREFIXES
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                name: "chatcommand".to_string(),
                command_prefix: default_command_prefix(),
                default_locale: default_locale(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("chatcommand.log".to_string()),
            },
            plugins: PluginsConfig {
                settings_path: "plugins.toml".to_string(),
            },
            messages: MessagesConfig::default(),
            world: WorldConfig {
                characters: vec![
                    CharacterSeed {
                        account: "admin".to_string(),
                        name: "Admin".to_string(),
                        level: 400,
                        free_points: 1000,
                    },
                    CharacterSeed {
                        account: "player".to_string(),
                        name: "Player".to_string(),
                        level: 10,
                        free_points: 50,
                    },
                ],
            },
        }
    }
}
