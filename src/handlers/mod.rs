//! Built-in commands.
//!
//! Each command is declared explicitly: key, identity, privilege, schema and
//! handler. [builtin] is the static registration list fed to the
//! [PluginCatalog](crate::command::PluginCatalog) at startup. Identities are
//! fixed so persisted enable/config settings survive restarts and renames.
use anyhow::Result;
use uuid::Uuid;

use crate::command::CommandDescriptor;

pub mod help;
pub mod inventory;
pub mod moderation;
pub mod pk;
pub mod post;
pub mod stats;
pub mod teleport;

pub const HELP_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0001);
pub const ADD_STR_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0101);
pub const ADD_AGI_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0102);
pub const ADD_VIT_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0103);
pub const ADD_ENE_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0104);
pub const ADD_CMD_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0105);
pub const SET_STAT_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0110);
pub const PK_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0201);
pub const CLEAR_INVENTORY_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0301);
pub const BAN_ACCOUNT_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0401);
pub const UNBAN_ACCOUNT_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0402);
pub const CHAT_BAN_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0403);
pub const CHAT_UNBAN_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0404);
pub const MOVE_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0501);
pub const POST_ID: Uuid = Uuid::from_u128(0x2f6c_1a40_7b1e_4c0a_9d52_0a4e_11c0_0601);

/// Every built-in command, in help-listing order.
pub fn builtin() -> Result<Vec<CommandDescriptor>> {
    let mut all = vec![help::descriptor()?];
    all.extend(stats::descriptors()?);
    all.push(pk::descriptor()?);
    all.push(inventory::descriptor()?);
    all.extend(moderation::descriptors()?);
    all.push(teleport::descriptor()?);
    all.push(post::descriptor()?);
    Ok(all)
}
