//! Endpoint handlers for the boundary API.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/world` | Public snapshot of the whole world |
//! | `GET` | `/bot/{id}/detail` | Full bot record |
//! | `POST` | `/bot/{id}/action` | Resolve one action |
//! | `POST` | `/bot/{id}/sync_state` | Store a bot's inner state |
//! | `GET` | `/messages/{id}` | Message board as the bot sees it |
//! | `POST` | `/admin/send_message` | Post to the message board |
//! | `GET` | `/moments` | Latest moments |
//! | `POST` | `/moments/{index}/like` | Like a moment |
//! | `POST` | `/moments/{index}/comment` | Comment on a moment |
//! | `GET` | `/rules` | Active rules and counts |
//! | `GET` | `/rules/{location}` | Rules in force at a location |
//! | `GET` | `/location/{name}/history` | Public memory and creations |
//! | `GET` | `/reputation` | Reputation standings |
//! | `GET` | `/graveyard` | Graves |
//! | `GET` | `/legends` | Legends |
//! | `GET` | `/evolution` | How far the city has drifted |
//! | `POST` | `/admin/save_snapshot` | Persist now |

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use tracing::info;

use citysim_core::state::WorldView;
use citysim_types::{
    ActionOutcome, ActionRequest, Bot, BotId, CommentRequest, Grave, Legend, LikeRequest,
    MessagesView, Modification, Moment, PublicMemory, RecentEvent, ReputationEntry, Rule,
    SendMessageRequest, SyncStateRequest,
};
use citysim_world::resolve_location;

use crate::error::ObserverError;
use crate::state::AppState;

/// Moments returned by `GET /moments`.
const MOMENTS_SHOWN: usize = 50;

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct Ack {
    /// Always `true`.
    pub ok: bool,
}

const ACK: Ack = Ack { ok: true };

/// A moment with the index used to like or comment on it.
#[derive(Debug, Serialize)]
pub struct MomentEntry {
    /// Position in the feed.
    pub index: usize,
    /// The moment.
    #[serde(flatten)]
    pub moment: Moment,
}

/// Like or comment count after a reaction.
#[derive(Debug, Serialize)]
pub struct ReactionCount {
    /// Likes or comments on the moment.
    pub count: usize,
}

/// Body of `GET /rules` and `GET /rules/{location}`.
#[derive(Debug, Serialize)]
pub struct RulesView {
    /// Rules ever registered.
    pub total: usize,
    /// Rules currently in force.
    pub active: usize,
    /// The rules in force, oldest first.
    pub rules: Vec<Rule>,
}

/// Body of `GET /location/{name}/history`.
#[derive(Debug, Serialize)]
pub struct LocationHistory {
    /// Canonical location name.
    pub name: String,
    /// Current description, including appended changes.
    pub desc: String,
    /// Mood derived from the public memory.
    pub vibe: String,
    /// Public memory, oldest first.
    pub public_memory: Vec<PublicMemory>,
    /// Recent happenings.
    pub recent_events: Vec<RecentEvent>,
    /// Permanent creations here.
    pub modifications: Vec<Modification>,
}

/// Body of `GET /evolution`.
#[derive(Debug, Serialize)]
pub struct EvolutionView {
    /// Highest generation so far.
    pub generation_count: u32,
    /// Permanent creations.
    pub modifications: Vec<Modification>,
    /// Legends.
    pub legends: Vec<Legend>,
    /// Number of graves.
    pub graveyard_size: usize,
    /// Vibe per location.
    pub vibes: BTreeMap<String, String>,
}

/// Body of `POST /admin/save_snapshot`.
#[derive(Debug, Serialize)]
pub struct SavedSnapshot {
    /// Always `true`.
    pub ok: bool,
    /// Where the snapshot was written.
    pub path: String,
}

/// `GET /world`
pub async fn get_world(State(app): State<Arc<AppState>>) -> Json<WorldView> {
    Json(app.world.lock().await.state.view())
}

/// `GET /bot/{id}/detail`
pub async fn get_bot_detail(
    State(app): State<Arc<AppState>>,
    Path(id): Path<BotId>,
) -> Result<Json<Bot>, ObserverError> {
    let shared = app.world.lock().await;
    shared
        .state
        .bots
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ObserverError::NotFound(format!("bot {id}")))
}

/// `POST /bot/{id}/action`
///
/// Always answers 200; problems are reported in the feedback.
pub async fn post_action(
    State(app): State<Arc<AppState>>,
    Path(id): Path<BotId>,
    Json(request): Json<ActionRequest>,
) -> Json<ActionOutcome> {
    Json(app.world.submit_action(&id, request).await)
}

/// `POST /bot/{id}/sync_state`
pub async fn post_sync_state(
    State(app): State<Arc<AppState>>,
    Path(id): Path<BotId>,
    Json(sync): Json<SyncStateRequest>,
) -> Result<Json<Ack>, ObserverError> {
    app.world.sync_state(&id, sync).await?;
    Ok(Json(ACK))
}

/// `GET /messages/{id}`
pub async fn get_messages(
    State(app): State<Arc<AppState>>,
    Path(id): Path<BotId>,
) -> Result<Json<MessagesView>, ObserverError> {
    Ok(Json(app.world.messages_for(&id).await?))
}

/// `POST /admin/send_message`
pub async fn post_send_message(
    State(app): State<Arc<AppState>>,
    Json(message): Json<SendMessageRequest>,
) -> Result<Json<Ack>, ObserverError> {
    app.world.send_message(message).await?;
    Ok(Json(ACK))
}

/// `GET /moments`
pub async fn get_moments(State(app): State<Arc<AppState>>) -> Json<Vec<MomentEntry>> {
    let shared = app.world.lock().await;
    let moments = &shared.state.moments;
    let start = moments.len().saturating_sub(MOMENTS_SHOWN);
    Json(
        moments
            .iter()
            .enumerate()
            .skip(start)
            .map(|(index, moment)| MomentEntry {
                index,
                moment: moment.clone(),
            })
            .collect(),
    )
}

/// `POST /moments/{index}/like`
pub async fn post_like(
    State(app): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(like): Json<LikeRequest>,
) -> Result<Json<ReactionCount>, ObserverError> {
    let count = app.world.like_moment(index, &like.bot_id).await?;
    Ok(Json(ReactionCount { count }))
}

/// `POST /moments/{index}/comment`
pub async fn post_comment(
    State(app): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(comment): Json<CommentRequest>,
) -> Result<Json<ReactionCount>, ObserverError> {
    let count = app
        .world
        .comment_moment(index, &comment.bot_id, comment.content)
        .await?;
    Ok(Json(ReactionCount { count }))
}

/// `GET /rules`
pub async fn get_rules(State(app): State<Arc<AppState>>) -> Json<RulesView> {
    let shared = app.world.lock().await;
    let rules = &shared.state.rules;
    let active: Vec<Rule> = rules.iter().filter(|r| r.active).cloned().collect();
    Json(RulesView {
        total: rules.len(),
        active: active.len(),
        rules: active,
    })
}

/// `GET /rules/{location}`
///
/// Rules scoped to the location plus global rules.
pub async fn get_location_rules(
    State(app): State<Arc<AppState>>,
    Path(location): Path<String>,
) -> Result<Json<RulesView>, ObserverError> {
    let name = known_location(&location)?;
    let shared = app.world.lock().await;
    let rules = &shared.state.rules;
    let in_force: Vec<Rule> = rules
        .iter()
        .filter(|r| r.active && r.location.as_deref().is_none_or(|l| l == name))
        .cloned()
        .collect();
    Ok(Json(RulesView {
        total: rules.len(),
        active: in_force.len(),
        rules: in_force,
    }))
}

/// `GET /location/{name}/history`
pub async fn get_location_history(
    State(app): State<Arc<AppState>>,
    Path(location): Path<String>,
) -> Result<Json<LocationHistory>, ObserverError> {
    let name = known_location(&location)?;
    let shared = app.world.lock().await;
    let state = &shared.state;
    let loc = state
        .locations
        .get(name)
        .ok_or_else(|| ObserverError::NotFound(format!("location {name}")))?;
    Ok(Json(LocationHistory {
        name: loc.name.clone(),
        desc: loc.desc.clone(),
        vibe: loc.vibe.clone(),
        public_memory: loc.public_memory.clone(),
        recent_events: loc.recent_events.clone(),
        modifications: state
            .modifications
            .iter()
            .filter(|m| m.location == name)
            .cloned()
            .collect(),
    }))
}

/// `GET /reputation`
pub async fn get_reputation(State(app): State<Arc<AppState>>) -> Json<Vec<ReputationEntry>> {
    Json(app.world.lock().await.state.reputation_standings())
}

/// `GET /graveyard`
pub async fn get_graveyard(State(app): State<Arc<AppState>>) -> Json<Vec<Grave>> {
    Json(app.world.lock().await.state.graveyard.clone())
}

/// `GET /legends`
pub async fn get_legends(State(app): State<Arc<AppState>>) -> Json<Vec<Legend>> {
    Json(app.world.lock().await.state.legends.clone())
}

/// `GET /evolution`
pub async fn get_evolution(State(app): State<Arc<AppState>>) -> Json<EvolutionView> {
    let shared = app.world.lock().await;
    let state = &shared.state;
    Json(EvolutionView {
        generation_count: state.generation_count,
        modifications: state.modifications.clone(),
        legends: state.legends.clone(),
        graveyard_size: state.graveyard.len(),
        vibes: state
            .locations
            .values()
            .map(|l| (l.name.clone(), l.vibe.clone()))
            .collect(),
    })
}

/// `POST /admin/save_snapshot`
pub async fn post_save_snapshot(
    State(app): State<Arc<AppState>>,
) -> Result<Json<SavedSnapshot>, ObserverError> {
    let path = app.world.config().world.snapshot_path.clone();
    app.world.save_snapshot(&path).await?;
    info!(path = %path.display(), "snapshot saved on request");
    Ok(Json(SavedSnapshot {
        ok: true,
        path: path.display().to_string(),
    }))
}

fn known_location(name: &str) -> Result<&'static str, ObserverError> {
    resolve_location(name).map_err(|e| ObserverError::NotFound(e.to_string()))
}
