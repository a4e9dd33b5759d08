//! Launch the boundary API next to the tick loop.

use std::sync::Arc;

use tokio::task::JoinHandle;

use citysim_core::config::ServerConfig;

use crate::server::{ServerError, bind_addr, start_server};
use crate::state::AppState;

/// Spawn the server on a background task.
///
/// An unparseable address is returned here rather than from the task.
pub fn spawn_observer(config: ServerConfig, state: Arc<AppState>) -> Result<JoinHandle<()>, ServerError> {
    let addr = bind_addr(&config)?;
    let handle = tokio::spawn(async move {
        if let Err(e) = start_server(&config, state).await {
            tracing::error!(error = %e, "boundary API exited with error");
        }
    });
    tracing::info!(%addr, "boundary API spawned on background task");
    Ok(handle)
}
