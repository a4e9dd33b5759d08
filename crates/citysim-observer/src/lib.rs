//! Boundary API for the citysim world engine.
//!
//! An Axum server that lets agent loops observe the city and act in it:
//!
//! - **REST endpoints** for the world snapshot, bot detail, the message
//!   board, moments, rules, location history, reputation, graveyard,
//!   legends and evolution
//! - **Action and sync endpoints** that feed the action pipeline
//! - **Admin endpoints** for messages and on-demand snapshots
//! - **`WebSocket`** (`/ws/ticks`) streaming one summary per tick
//!
//! Every handler goes through the shared [`World`](citysim_core::World)
//! handle, so reads and writes serialize with the tick loop.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use error::ObserverError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::spawn_observer;
pub use state::AppState;
