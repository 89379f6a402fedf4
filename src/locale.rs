//! Localized caller-facing text.
//!
//! Messages are looked up by key and locale and rendered by substituting
//! `{name}` placeholders. Lookup falls back from the exact locale (`de-AT`) to
//! its language (`de`), then to the catalog's default locale, then to the
//! bundled English, and finally to the key itself.
//!
//! Extra locales are loaded from TOML, one table per locale:
//!
//! ```toml
//! [de]
//! "command.not_found" = "Unbekannter Befehl {command}."
//! ```
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use tokio::fs;

pub const DEFAULT_LOCALE: &str = "en";

const BUILTIN_EN: &[(&str, &str)] = &[
    ("command.not_found", "Unknown command {command}."),
    ("command.unauthorized", "You are not allowed to use {command}."),
    ("command.failed", "{command} failed. Please try again later."),
    ("command.usage", "Usage: {usage}"),
    ("argument.missing", "Missing argument: {field}."),
    ("argument.invalid", "'{value}' is not valid for {field}."),
    ("argument.not_allowed", "{field} must be one of: {allowed}."),
    ("argument.unexpected", "Unexpected argument '{value}'."),
    ("help.header", "Commands available to you:"),
    ("help.entry", "{usage} - {help}"),
    ("help.none", "No commands match '{filter}'."),
    ("character.not_found", "Character {character} not found."),
    ("stats.added", "Added {amount} points to {stat}. Free points left: {remaining}."),
    ("stats.not_enough_points", "Not enough free points ({available} available)."),
    ("stats.limit", "{stat} cannot exceed {max}."),
    ("stats.zero", "Amount must be greater than zero."),
    ("set.done", "{character}'s {stat} set to {amount}."),
    ("set.notice", "A game master set your {stat} to {amount}."),
    ("pk.done", "{character}'s PK level set to {level}, count {count}."),
    ("inventory.confirm", "Type {command} again within {seconds} seconds to clear your inventory."),
    ("inventory.cleared", "Inventory cleared ({count} items removed)."),
    ("inventory.empty", "Your inventory is already empty."),
    ("ban.done", "Account of {character} has been banned."),
    ("ban.already", "Account of {character} is already banned."),
    ("unban.done", "Account of {character} has been unbanned."),
    ("unban.not_banned", "Account of {character} is not banned."),
    ("chatban.done", "{character} may not chat for {minutes} minutes."),
    ("chatban.notice", "You have been banned from chat for {minutes} minutes."),
    ("chatunban.done", "{character} may chat again."),
    ("chatunban.notice", "Your chat ban has been lifted."),
    ("chatunban.not_banned", "{character} is not banned from chat."),
    ("move.done", "{character} moved to {map} ({x}, {y})."),
    ("move.notice", "You have been moved to {map} ({x}, {y})."),
    ("post.format", "[POST] {sender}: {message}"),
    ("post.level", "You need level {level} to post."),
    ("post.chat_banned", "You are banned from chat."),
];

/// Keyed, per-locale message templates.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    default_locale: String,
    tables: HashMap<String, HashMap<String, String>>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MessageCatalog {
    /// Catalog containing only the bundled English text.
    pub fn builtin() -> Self {
        let en = BUILTIN_EN
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut tables = HashMap::new();
        tables.insert(DEFAULT_LOCALE.to_string(), en);
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            tables,
        }
    }

    pub fn with_default_locale(mut self, locale: &str) -> Self {
        self.default_locale = normalize(locale);
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn insert(&mut self, locale: &str, key: &str, template: &str) {
        self.tables
            .entry(normalize(locale))
            .or_default()
            .insert(key.to_string(), template.to_string());
    }

    /// Merge locale tables from a TOML document; later entries win.
    pub fn merge_toml(&mut self, content: &str) -> Result<()> {
        let parsed: HashMap<String, HashMap<String, String>> =
            toml::from_str(content).map_err(|e| anyhow!("Failed to parse message catalog: {}", e))?;
        for (locale, entries) in parsed {
            for (key, template) in entries {
                self.insert(&locale, &key, &template);
            }
        }
        Ok(())
    }

    pub async fn load_file(&mut self, path: &str) -> Result<()> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read message catalog {}: {}", path, e))?;
        self.merge_toml(&content)
    }

    fn template(&self, locale: &str, key: &str) -> Option<&str> {
        let locale = normalize(locale);
        let language = locale.split('-').next().unwrap_or(&locale).to_string();
        let candidates = [locale.as_str(), language.as_str(), self.default_locale.as_str(), DEFAULT_LOCALE];
        let found = candidates
            .iter()
            .find_map(|l| self.tables.get(*l).and_then(|t| t.get(key)));
        found.map(String::as_str)
    }

    /// Render `key` for `locale`, replacing `{name}` with the matching param.
    pub fn render(&self, locale: &str, key: &str, params: &[(&str, &str)]) -> String {
        let Some(template) = self.template(locale, key) else {
            return key.to_string();
        };
        let mut out = template.to_string();
        for (name, value) in params {
            out = out.replace(&format!("{{{}}}", name), value);
        }
        out
    }
}

fn normalize(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}
