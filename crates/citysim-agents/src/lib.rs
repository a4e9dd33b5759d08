//! Per-bot logic for the citysim world engine.
//!
//! This crate holds everything that operates on a single bot without
//! touching shared world state: vitals, desires, work, reputation and
//! bonds. It sits between `citysim-types` (the data model) and
//! `citysim-core` (which owns the store and orchestrates ticks).
//!
//! # Modules
//!
//! - [`agent`] -- Founding and replacement bot construction
//! - [`config`] -- Tunable decay rates ([`DecayConfig`])
//! - [`desires`] -- Profile-weighted desire growth with soft caps
//! - [`error`] -- Error types for per-bot requests ([`AgentError`])
//! - [`reputation`] -- Score, deed log and tags
//! - [`social`] -- Bond warmth, mirroring and inheritance
//! - [`tasks`] -- Job tasks and their state machine
//! - [`vitals`] -- Per-tick aging, hunger, energy, mood and sleep

pub mod agent;
pub mod config;
pub mod desires;
pub mod error;
pub mod reputation;
pub mod social;
pub mod tasks;
pub mod vitals;

// Re-export primary types at crate root for convenience.
pub use agent::{Newcomer, STARTING_ENERGY, STARTING_HP, STARTING_SATIETY, found_bot, spawn_bot};
pub use config::DecayConfig;
pub use desires::{DesireContext, grow_desires, situational_multiplier};
pub use error::AgentError;
pub use reputation::{apply_deed, keep_last, latest_deed};
pub use social::{
    HEARD_OF_LABEL, STRONG_BOND, adjust_bond, closest_bond, heard_of, mirrored_warmth,
    strong_bonds,
};
pub use tasks::{TaskProgress, progress_task, start_task};
pub use vitals::{
    GAUGE_MAX, Surroundings, VitalTickResult, apply_birthday, apply_sleep_tick, apply_vital_tick,
    gauge_add, gauge_apply, is_night, money_apply, should_fall_asleep,
};
