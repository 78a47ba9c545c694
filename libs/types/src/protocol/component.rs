//! # Component Group Ordinals
//!
//! Each transaction component group is identified by its position in
//! [`ComponentGroupEnum`]. The ordinal is used for component-leaf ordering
//! when a Merkle tree is computed over the groups, so the numbering below is
//! fixed: renumbering or reordering breaks every tree computed before.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::common::errors::ComponentOrderError;
use crate::common::transactions::ComponentGroup;

/// Transaction component groups, in ordinal order
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive,
)]
pub enum ComponentGroupEnum {
    Inputs = 0,
    Outputs = 1,
    Commands = 2,
    Attachments = 3,
    Notary = 4,
    TimeWindow = 5,
    Signers = 6,
    References = 7,
}

impl ComponentGroupEnum {
    /// Every group in ordinal order
    pub const ALL: [ComponentGroupEnum; 8] = [
        ComponentGroupEnum::Inputs,
        ComponentGroupEnum::Outputs,
        ComponentGroupEnum::Commands,
        ComponentGroupEnum::Attachments,
        ComponentGroupEnum::Notary,
        ComponentGroupEnum::TimeWindow,
        ComponentGroupEnum::Signers,
        ComponentGroupEnum::References,
    ];

    pub fn ordinal(self) -> u8 {
        self.into()
    }

    /// Map a wire group index onto the enum, rejecting anything out of range
    pub fn from_index(index: i32) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .and_then(|ordinal| Self::try_from(ordinal).ok())
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentGroupEnum::Inputs => "INPUTS",
            ComponentGroupEnum::Outputs => "OUTPUTS",
            ComponentGroupEnum::Commands => "COMMANDS",
            ComponentGroupEnum::Attachments => "ATTACHMENTS",
            ComponentGroupEnum::Notary => "NOTARY",
            ComponentGroupEnum::TimeWindow => "TIMEWINDOW",
            ComponentGroupEnum::Signers => "SIGNERS",
            ComponentGroupEnum::References => "REFERENCES",
        }
    }
}

impl std::fmt::Display for ComponentGroupEnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.ordinal())
    }
}

/// Check that every group sits at the position its ordinal names
///
/// Groups may be a prefix of the full enumeration, but group `i` must carry
/// index `i`. Downstream integrity computation is positional, so a stream
/// that disagrees with the enumeration is rejected rather than re-sorted.
pub fn validate_component_order(groups: &[ComponentGroup]) -> Result<(), ComponentOrderError> {
    for (position, group) in groups.iter().enumerate() {
        let kind = ComponentGroupEnum::from_index(group.group_index).ok_or(
            ComponentOrderError::UnknownGroup {
                position,
                group_index: group.group_index,
            },
        )?;

        if usize::from(kind.ordinal()) != position {
            return Err(ComponentOrderError::OutOfOrder {
                position,
                group_index: group.group_index,
                found: kind,
            });
        }
    }
    Ok(())
}
