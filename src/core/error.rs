//! Error taxonomy for rule invocations.
//!
//! Every variant of [`GameError`] is raised by a pre-check that runs before any
//! mutation, so a rejected operation leaves the player aggregate untouched.
//! Broken invariants are not represented here; they are debug assertions.

use crate::character::Job;
use crate::combat::Side;
use crate::items::{EquipmentSlot, ItemId};
use thiserror::Error;

/// How the caller is expected to treat an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Invalid request for the current state. Report it and keep going.
    Validation,

    /// Misconfiguration or an engine used out of sequence.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no reward container at index {index} (queue holds {len})")]
    InvalidContainerIndex { index: usize, len: usize },

    #[error("insufficient gold: need {required}, have {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("insufficient materials: need {required}, supplied {supplied} eligible")]
    InsufficientMaterials { required: usize, supplied: usize },

    #[error("equipment is already at {stars} stars")]
    MaxStarsReached { stars: u8 },

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("nothing equipped in {0:?} slot")]
    EmptySlot(EquipmentSlot),

    #[error("no consumable available")]
    NoConsumableAvailable,

    #[error("combat session is not active")]
    SessionInactive,

    #[error("{0} is not ready to act")]
    NotReady(Side),

    #[error("out of turn: {expected} acts first")]
    OutOfTurn { expected: Side },

    #[error("inventory is full ({capacity} entries)")]
    InventoryFull { capacity: usize },

    #[error("no job advancement is pending")]
    AdvancementNotPending,

    #[error("no advancement book for {target}")]
    NoAdvancementItem { target: Job },

    #[error("already at the final job")]
    MaxJobReached,

    #[error("insufficient stamina: need {required}, have {available}")]
    InsufficientStamina { required: u32, available: u32 },

    #[error("player has no health left")]
    PlayerIncapacitated,

    #[error("an encounter is already in progress")]
    EncounterInProgress,

    #[error("no encounter in progress")]
    NoEncounter,

    #[error("no opponent for stage {0}")]
    UnknownOpponent(u32),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidConfig(_) | Self::EncounterInProgress | Self::NoEncounter => {
                ErrorSeverity::Internal
            }
            _ => ErrorSeverity::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classification() {
        assert_eq!(
            GameError::NoConsumableAvailable.severity(),
            ErrorSeverity::Validation
        );
        assert_eq!(
            GameError::InvalidConfig("x".into()).severity(),
            ErrorSeverity::Internal
        );
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }

    #[test]
    fn test_error_messages_include_context() {
        let err = GameError::InsufficientFunds {
            required: 300,
            available: 12,
        };
        assert_eq!(err.to_string(), "insufficient gold: need 300, have 12");

        let err = GameError::InvalidContainerIndex { index: 4, len: 2 };
        assert!(err.to_string().contains("index 4"));
    }
}
