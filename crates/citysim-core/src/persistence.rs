//! Snapshot persistence.
//!
//! The whole world is one JSON document. Histories are bounded on save so
//! the file does not grow without limit. Writes go to `<path>.tmp` first
//! and are renamed into place, so a crash mid-write never leaves a
//! truncated snapshot behind.
//!
//! Callers copy the state under the world lock and call [`save`] after
//! releasing it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use citysim_agents::keep_last;

use crate::state::WorldState;

/// Snapshot document version.
pub const SNAPSHOT_FORMAT: u32 = 1;

/// World events kept in a snapshot.
const EVENTS_SAVED: usize = 50;

/// Messages kept in a snapshot.
const MESSAGES_SAVED: usize = 100;

/// Moments kept in a snapshot.
const MOMENTS_SAVED: usize = 100;

/// Action log entries kept per bot.
const ACTION_LOG_SAVED: usize = 20;

/// Errors that can occur while saving or loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the file failed.
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The document could not be encoded or decoded.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document was written by an incompatible version.
    #[error("unsupported snapshot format {found} (expected {SNAPSHOT_FORMAT})")]
    UnsupportedFormat {
        /// Format found in the file.
        found: u32,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// On-disk document.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    format: u32,
    world: WorldState,
}

/// A copy of `state` with histories cut to their saved length.
pub fn bounded(state: &WorldState) -> WorldState {
    let mut copy = state.clone();
    keep_last(&mut copy.events, EVENTS_SAVED);
    keep_last(&mut copy.message_board, MESSAGES_SAVED);
    keep_last(&mut copy.moments, MOMENTS_SAVED);
    for bot in copy.bots.values_mut() {
        keep_last(&mut bot.action_log, ACTION_LOG_SAVED);
    }
    copy
}

/// Encode a world as a snapshot document.
pub fn encode(state: &WorldState) -> Result<Vec<u8>, PersistenceError> {
    let snapshot = Snapshot {
        format: SNAPSHOT_FORMAT,
        world: bounded(state),
    };
    Ok(serde_json::to_vec_pretty(&snapshot)?)
}

/// Decode a snapshot document.
pub fn decode(bytes: &[u8]) -> Result<WorldState, PersistenceError> {
    let snapshot: Snapshot = serde_json::from_slice(bytes)?;
    if snapshot.format != SNAPSHOT_FORMAT {
        return Err(PersistenceError::UnsupportedFormat {
            found: snapshot.format,
        });
    }
    Ok(snapshot.world)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write a snapshot of `state` to `path`.
pub async fn save(path: &Path, state: &WorldState) -> Result<(), PersistenceError> {
    let bytes = encode(state)?;
    let tmp = tmp_path(path);
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(dir).await.map_err(io_error(dir))?;
    }
    tokio::fs::write(&tmp, &bytes).await.map_err(io_error(&tmp))?;
    tokio::fs::rename(&tmp, path).await.map_err(io_error(path))?;
    info!(
        path = %path.display(),
        tick = state.tick(),
        bytes = bytes.len(),
        "snapshot saved"
    );
    Ok(())
}

/// Read the snapshot at `path`. A missing file is `Ok(None)`.
pub async fn load(path: &Path) -> Result<Option<WorldState>, PersistenceError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no snapshot found");
            return Ok(None);
        }
        Err(e) => return Err(io_error(path)(e)),
    };
    let state = decode(&bytes)?;
    info!(
        path = %path.display(),
        tick = state.tick(),
        bots = state.bots.len(),
        rules = state.rules.len(),
        "snapshot restored"
    );
    Ok(Some(state))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use citysim_types::{BotId, MessagePriority};

    use super::*;
    use crate::config::SimulationConfig;
    use crate::tick::run_tick;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("citysim-{}-{name}.json", std::process::id()))
    }

    fn lived_in_world() -> WorldState {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = WorldState::new(&config, &mut rng);
        for _ in 0..30 {
            run_tick(&mut state, &config, &mut rng).unwrap();
        }
        for i in 0..120 {
            state.send_message("system", Some(BotId::slot(1)), format!("note {i}"), MessagePriority::Low);
        }
        state
    }

    #[test]
    fn histories_are_bounded() {
        let state = lived_in_world();
        let saved = bounded(&state);
        assert_eq!(saved.message_board.len(), MESSAGES_SAVED);
        assert!(saved.events.len() <= EVENTS_SAVED);
        assert_eq!(saved.message_board.last(), state.message_board.last());
    }

    #[test]
    fn snapshot_round_trip_is_byte_identical() {
        let state = lived_in_world();
        let first = encode(&state).unwrap();
        let restored = decode(&first).unwrap();
        let second = encode(&restored).unwrap();
        assert_eq!(first, second);
        assert_eq!(restored, bounded(&state));
    }

    #[test]
    fn wrong_format_is_rejected() {
        let state = lived_in_world();
        let mut doc: serde_json::Value = serde_json::from_slice(&encode(&state).unwrap()).unwrap();
        doc.as_object_mut()
            .unwrap()
            .insert(String::from("format"), serde_json::json!(99));
        let err = decode(&serde_json::to_vec(&doc).unwrap()).unwrap_err();
        assert!(matches!(err, PersistenceError::UnsupportedFormat { found: 99 }));
    }

    #[tokio::test]
    async fn save_then_load_through_the_filesystem() {
        let path = scratch("save-load");
        let state = lived_in_world();
        save(&path, &state).await.unwrap();
        assert!(!tmp_path(&path).exists());
        let loaded = load(&path).await.unwrap().unwrap();
        assert_eq!(loaded, bounded(&state));
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_snapshot_is_none() {
        let path = scratch("never-written");
        assert!(load(&path).await.unwrap().is_none());
    }
}
