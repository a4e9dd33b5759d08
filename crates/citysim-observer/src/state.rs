//! Shared application state for the boundary API.

use std::sync::Arc;

use tokio::sync::broadcast;

use citysim_core::{TickSummary, World};

/// Capacity of the tick summary channel.
///
/// A subscriber that falls further behind receives
/// [`broadcast::error::RecvError::Lagged`] and skips ahead.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state injected into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The running world.
    pub world: Arc<World>,
    /// Tick summaries for `WebSocket` subscribers.
    pub tx: broadcast::Sender<TickSummary>,
}

impl AppState {
    /// Wrap a world handle.
    pub fn new(world: Arc<World>) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { world, tx }
    }

    /// Subscribe to tick summaries.
    pub fn subscribe(&self) -> broadcast::Receiver<TickSummary> {
        self.tx.subscribe()
    }

    /// Publish a tick summary. Returns how many subscribers got it.
    pub fn broadcast(&self, summary: &TickSummary) -> usize {
        // Err only means nobody is listening.
        self.tx.send(summary.clone()).unwrap_or(0)
    }
}
