//! Privilege check performed before any argument parsing.
use thiserror::Error;

use super::actor::Actor;
use super::privilege::Privilege;
use super::registry::CommandDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("requires {required}, caller is {actual}")]
pub struct Unauthorized {
    pub required: Privilege,
    pub actual: Privilege,
}

/// True when `privilege` meets the descriptor's minimum.
pub fn permits(privilege: Privilege, descriptor: &CommandDescriptor) -> bool {
    privilege >= descriptor.minimum_privilege()
}

pub fn check(actor: &Actor, descriptor: &CommandDescriptor) -> Result<(), Unauthorized> {
    if permits(actor.privilege, descriptor) {
        Ok(())
    } else {
        Err(Unauthorized {
            required: descriptor.minimum_privilege(),
            actual: actor.privilege,
        })
    }
}
