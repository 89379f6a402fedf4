//! Command descriptors and the key → descriptor registry.
//!
//! Keys are matched exactly and case-insensitively. [CommandRegistry::resolve]
//! is the only lookup used for execution; [CommandRegistry::search] matches
//! substrings and exists for help listings only, where `/ban` turning up
//! `/banacc` is what a player wants to see.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::binder::split_command;
use super::catalog::PluginConfiguration;
use super::errors::RegistryError;
use super::gate;
use super::handler::CommandHandler;
use super::privilege::Privilege;
use super::schema::Schema;

pub(crate) fn prefixed_key(key: &str, prefix: char) -> String {
    match key.strip_prefix('/') {
        Some(name) => format!("{}{}", prefix, name),
        None => key.to_string(),
    }
}

/// Registered metadata for one command.
pub struct CommandDescriptor {
    key: String,
    identity: Uuid,
    minimum_privilege: Privilege,
    schema: Schema,
    handler: Arc<dyn CommandHandler>,
    enabled: bool,
    help_text: String,
    configuration: Option<PluginConfiguration>,
}

impl CommandDescriptor {
    /// Start a descriptor with `Normal` privilege, no arguments, enabled.
    pub fn new(key: &str, identity: Uuid, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            key: key.to_string(),
            identity,
            minimum_privilege: Privilege::Normal,
            schema: Schema::empty(),
            handler,
            enabled: true,
            help_text: String::new(),
            configuration: None,
        }
    }

    pub fn privilege(mut self, minimum: Privilege) -> Self {
        self.minimum_privilege = minimum;
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help_text = text.to_string();
        self
    }

    /// Destructive or debug-only commands stay unresolvable until enabled by settings.
    pub fn disabled_by_default(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_configuration(mut self, configuration: PluginConfiguration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn identity(&self) -> Uuid {
        self.identity
    }

    pub fn minimum_privilege(&self) -> Privilege {
        self.minimum_privilege
    }

    pub fn arguments(&self) -> &Schema {
        &self.schema
    }

    pub fn handler(&self) -> &Arc<dyn CommandHandler> {
        &self.handler
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn configuration(&self) -> Option<&PluginConfiguration> {
        self.configuration.as_ref()
    }

    pub fn usage(&self) -> String {
        self.schema.usage(&self.key)
    }

    /// Key as typed with `prefix` in place of the registered leading `/`.
    pub fn display_key(&self, prefix: char) -> String {
        prefixed_key(&self.key, prefix)
    }

    /// [Self::usage] rendered with the prefix players actually type.
    pub fn usage_with_prefix(&self, prefix: char) -> String {
        self.schema.usage(&self.display_key(prefix))
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_configuration(&mut self, configuration: Option<PluginConfiguration>) {
        self.configuration = configuration;
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("key", &self.key)
            .field("identity", &self.identity)
            .field("minimum_privilege", &self.minimum_privilege)
            .field("enabled", &self.enabled)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// A key must be one token: a non-alphanumeric prefix followed by a name.
fn validate_key(key: &str) -> Result<(), RegistryError> {
    let mut chars = key.chars();
    let valid = match chars.next() {
        Some(prefix) => {
            prefix.is_ascii_punctuation()
                && key.len() > prefix.len_utf8()
                && !key.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidKey(key.to_string()))
    }
}

/// Startup-populated command table. Shared read-only (`Arc`) once built.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    descriptors: Vec<CommandDescriptor>,
    by_key: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor. Fails on a case-insensitive key clash or a reused
    /// identity, leaving the existing registration untouched.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        validate_key(&descriptor.key)?;
        let folded = descriptor.key.to_lowercase();
        if self.by_key.contains_key(&folded) {
            return Err(RegistryError::DuplicateKey(descriptor.key.clone()));
        }
        if let Some(existing) = self.get_by_identity(descriptor.identity) {
            return Err(RegistryError::DuplicateIdentity {
                identity: descriptor.identity,
                first: existing.key.clone(),
                second: descriptor.key.clone(),
            });
        }
        self.by_key.insert(folded, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptor for the first token of `raw`, if registered and enabled.
    pub fn resolve(&self, raw: &str) -> Option<&CommandDescriptor> {
        let (token, _) = split_command(raw);
        self.get(token).filter(|d| d.enabled)
    }

    /// Exact lookup that ignores the enabled flag.
    pub fn get(&self, key: &str) -> Option<&CommandDescriptor> {
        self.by_key
            .get(&key.to_lowercase())
            .map(|&idx| &self.descriptors[idx])
    }

    pub fn get_by_identity(&self, identity: Uuid) -> Option<&CommandDescriptor> {
        self.descriptors.iter().find(|d| d.identity == identity)
    }

    /// Enabled commands usable at `privilege`, in registration order.
    pub fn list_for(&self, privilege: Privilege) -> Vec<&CommandDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.enabled && gate::permits(privilege, d))
            .collect()
    }

    /// Help-only discovery: enabled commands usable at `privilege` whose key
    /// contains `fragment` (case-insensitive).
    pub fn search(&self, fragment: &str, privilege: Privilege) -> Vec<&CommandDescriptor> {
        let needle = fragment.trim().to_lowercase();
        self.list_for(privilege)
            .into_iter()
            .filter(|d| d.key.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn set_enabled(&mut self, key: &str, enabled: bool) -> Result<(), RegistryError> {
        self.get_mut(key)?.set_enabled(enabled);
        Ok(())
    }

    pub fn set_configuration(
        &mut self,
        key: &str,
        configuration: Option<PluginConfiguration>,
    ) -> Result<(), RegistryError> {
        self.get_mut(key)?.set_configuration(configuration);
        Ok(())
    }

    fn get_mut(&mut self, key: &str) -> Result<&mut CommandDescriptor, RegistryError> {
        match self.by_key.get(&key.to_lowercase()) {
            Some(&idx) => Ok(&mut self.descriptors[idx]),
            None => Err(RegistryError::UnknownCommand(key.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
