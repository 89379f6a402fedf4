//! The identity invoking a command.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::privilege::Privilege;

/// A connected player as seen by the command framework.
///
/// The framework only reads an actor. `character` is the handle handlers use to
/// resolve world state through [crate::world::World].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub privilege: Privilege,
    pub locale: String,
    pub character: Uuid,
}

impl Actor {
    pub fn new(name: impl Into<String>, privilege: Privilege, locale: impl Into<String>, character: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            privilege,
            locale: locale.into(),
            character,
        }
    }
}
