//! Type-safe identifiers.
//!
//! Bots are addressed by a stable slot name (`bot_1` .. `bot_N`) that
//! survives succession: a replacement bot takes over the slot of the bot it
//! replaces. Every other entity that needs an identity gets a UUID v7
//! newtype generated by [`define_id!`].

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a rule in the rule registry.
    RuleId
}

define_id! {
    /// Unique identifier for a post in the moments feed.
    MomentId
}

define_id! {
    /// Unique identifier for a permanent world modification.
    ModificationId
}

define_id! {
    /// Unique identifier for a legend.
    LegendId
}

/// Identity slot of a bot (`bot_1`, `bot_2`, ...).
///
/// The slot is reused by the replacement spawned at succession, so a
/// `BotId` names a seat in the world rather than a single life.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct BotId(pub String);

impl BotId {
    /// Wrap an arbitrary slot name.
    pub fn new(slot: impl Into<String>) -> Self {
        Self(slot.into())
    }

    /// Build the canonical slot name for the `n`th persona.
    pub fn slot(n: u32) -> Self {
        Self(format!("bot_{n}"))
    }

    /// Borrow the slot name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for BotId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BotId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for BotId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for BotId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
