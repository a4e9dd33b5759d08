//! Error types for the `citysim-world` crate.

use citysim_types::BotId;

/// Errors raised when looking up static world data.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorldError {
    /// No location has this name.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// No founding persona is defined for this slot.
    #[error("no persona for slot {0}")]
    UnknownPersona(BotId),
}
