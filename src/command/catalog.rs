//! Startup assembly of commands and their persisted settings.
//!
//! Every command is registered explicitly (see [crate::handlers::builtin]) into a
//! [PluginCatalog]. Operators override per-command state in a TOML settings
//! file keyed by the descriptor's identity:
//!
//! ```toml
//! [plugins.2f6c1a40-7b1e-4c0a-9d52-0a4e11c00301]
//! key = "/clearinv"            # informational only
//! enabled = true
//!
//! [plugins.2f6c1a40-7b1e-4c0a-9d52-0a4e11c00301.config]
//! confirmation_seconds = 15
//! ```
//!
//! [PluginCatalog::build] applies the settings and produces the frozen
//! [CommandRegistry]. The catalog never interprets `config` contents; handlers
//! deserialize them into their own types at execution time.
use anyhow::anyhow;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

use super::errors::RegistryError;
use super::registry::{CommandDescriptor, CommandRegistry};

/// Handler-defined configuration object, stored untyped.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfiguration(serde_json::Value);

impl PluginConfiguration {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn get<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        serde_json::from_value(self.0.clone()).map_err(|e| anyhow!("invalid plugin configuration: {}", e))
    }

    /// Overlay `other` onto `self`: object keys in `other` replace ours, any
    /// other shape replaces the whole value.
    fn merged(&self, other: serde_json::Value) -> Self {
        match (self.0.clone(), other) {
            (serde_json::Value::Object(mut base), serde_json::Value::Object(overlay)) => {
                base.extend(overlay);
                Self(serde_json::Value::Object(base))
            }
            (_, replacement) => Self(replacement),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read plugin settings {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plugin settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize plugin settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("plugin settings entry '{0}' is not a valid identity")]
    InvalidIdentity(String),

    #[error("configuration for {key} cannot be converted: {source}")]
    InvalidConfig {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("default configuration for {key} cannot be written as TOML: {source}")]
    ConfigToToml {
        key: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Persisted state for one command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<toml::Value>,
}

/// Contents of the plugin settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginSetting>,
}

impl PluginSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub async fn load(path: &str) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).await.map_err(|source| SettingsError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path`, treating a missing file as empty settings.
    pub async fn load_or_default(path: &str) -> Result<Self, SettingsError> {
        match fs::metadata(path).await {
            Ok(_) => Self::load(path).await,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No plugin settings at {}; using command defaults", path);
                Ok(Self::default())
            }
            Err(source) => Err(SettingsError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }

    pub async fn save(&self, path: &str) -> Result<(), SettingsError> {
        let content = self.to_toml_string()?;
        fs::write(path, content).await.map_err(|source| SettingsError::Io {
            path: path.to_string(),
            source,
        })
    }

    pub fn set(&mut self, identity: Uuid, setting: PluginSetting) {
        self.plugins.insert(identity.to_string(), setting);
    }
}

/// Commands collected at startup, before settings are applied.
#[derive(Debug, Default)]
pub struct PluginCatalog {
    descriptors: Vec<CommandDescriptor>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: CommandDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn extend<I: IntoIterator<Item = CommandDescriptor>>(&mut self, descriptors: I) -> &mut Self {
        self.descriptors.extend(descriptors);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Settings reflecting each command's built-in defaults, for `init`.
    pub fn default_settings(&self) -> Result<PluginSettings, SettingsError> {
        let mut settings = PluginSettings::default();
        for d in &self.descriptors {
            let config = match d.configuration() {
                Some(cfg) => Some(toml::Value::try_from(cfg.value()).map_err(|source| {
                    SettingsError::ConfigToToml {
                        key: d.key().to_string(),
                        source,
                    }
                })?),
                None => None,
            };
            settings.set(
                d.identity(),
                PluginSetting {
                    key: Some(d.key().to_string()),
                    enabled: Some(d.is_enabled()),
                    config,
                },
            );
        }
        Ok(settings)
    }

    /// Apply `settings` and register everything. A duplicate key aborts the build.
    pub fn build(self, settings: &PluginSettings) -> Result<CommandRegistry, SettingsError> {
        let mut overrides: BTreeMap<Uuid, &PluginSetting> = BTreeMap::new();
        for (raw_id, setting) in &settings.plugins {
            let id = Uuid::parse_str(raw_id).map_err(|_| SettingsError::InvalidIdentity(raw_id.clone()))?;
            overrides.insert(id, setting);
        }

        let mut registry = CommandRegistry::new();
        for mut descriptor in self.descriptors {
            if let Some(setting) = overrides.remove(&descriptor.identity()) {
                apply_setting(&mut descriptor, setting)?;
            }
            debug!(
                "registering {} (enabled={}, min={})",
                descriptor.key(),
                descriptor.is_enabled(),
                descriptor.minimum_privilege()
            );
            registry.register(descriptor)?;
        }

        for (id, setting) in overrides {
            warn!(
                "plugin settings refer to unknown command {} ({}); ignoring",
                id,
                setting.key.as_deref().unwrap_or("no key")
            );
        }

        info!(
            "command registry ready: {} commands, {} enabled",
            registry.len(),
            registry.iter().filter(|d| d.is_enabled()).count()
        );
        Ok(registry)
    }
}

fn apply_setting(descriptor: &mut CommandDescriptor, setting: &PluginSetting) -> Result<(), SettingsError> {
    if let Some(enabled) = setting.enabled {
        descriptor.set_enabled(enabled);
    }
    if let Some(raw) = &setting.config {
        let overlay = serde_json::to_value(raw).map_err(|source| SettingsError::InvalidConfig {
            key: descriptor.key().to_string(),
            source,
        })?;
        let merged = match descriptor.configuration() {
            Some(defaults) => defaults.merged(overlay),
            None => PluginConfiguration::new(overlay),
        };
        descriptor.set_configuration(Some(merged));
    }
    Ok(())
}
