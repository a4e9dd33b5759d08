//! World state, rule engine, action pipeline and tick cycle for the citysim
//! world engine.
//!
//! This crate owns the single store every other part of the system reads
//! and writes, and the two ways it changes: the scheduler's tick and the
//! action pipeline behind the boundary API.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and derived virtual hour, day and timestamp.
//! - [`config`] -- Configuration loading from `citysim-config.yaml` into
//!   strongly-typed structs.
//! - [`state`] -- The [`WorldState`] store and its bookkeeping helpers.
//! - [`memory`] -- Location public memory and the vibe it produces.
//! - [`rules`] -- Condition evaluator, effect applier, per-tick scheduling
//!   and decay, and the synthesis gate with deduplication.
//! - [`oracle`] -- The [`Oracle`] judgment seam and a deterministic
//!   [`FakeOracle`].
//! - [`actions`] -- The action resolution pipeline.
//! - [`lifecycle`] -- Death, inheritance, legends and succession.
//! - [`events`] -- Weather, city events, fate, legends and moments.
//! - [`persistence`] -- JSON snapshots.
//! - [`tick`] -- The tick cycle.
//! - [`world`] -- The shared [`World`] handle.
//!
//! [`WorldState`]: state::WorldState
//! [`Oracle`]: oracle::Oracle
//! [`FakeOracle`]: oracle::FakeOracle
//! [`World`]: world::World

pub mod actions;
pub mod clock;
pub mod config;
pub mod events;
pub mod lifecycle;
pub mod memory;
pub mod oracle;
pub mod persistence;
pub mod rules;
pub mod state;
pub mod tick;
pub mod world;

pub use config::SimulationConfig;
pub use oracle::{FakeOracle, Oracle, OracleError};
pub use state::WorldState;
pub use tick::{TickError, TickSummary, run_tick};
pub use world::{RequestError, World};
