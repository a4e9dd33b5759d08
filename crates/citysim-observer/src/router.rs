//! Router construction for the boundary API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete router.
///
/// CORS allows any origin so dashboards and agent loops on other hosts
/// can call in.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/world", get(handlers::get_world))
        .route("/bot/{id}/detail", get(handlers::get_bot_detail))
        .route("/bot/{id}/action", post(handlers::post_action))
        .route("/bot/{id}/sync_state", post(handlers::post_sync_state))
        .route("/messages/{id}", get(handlers::get_messages))
        .route("/moments", get(handlers::get_moments))
        .route("/moments/{index}/like", post(handlers::post_like))
        .route("/moments/{index}/comment", post(handlers::post_comment))
        .route("/rules", get(handlers::get_rules))
        .route("/rules/{location}", get(handlers::get_location_rules))
        .route("/location/{name}/history", get(handlers::get_location_history))
        .route("/reputation", get(handlers::get_reputation))
        .route("/graveyard", get(handlers::get_graveyard))
        .route("/legends", get(handlers::get_legends))
        .route("/evolution", get(handlers::get_evolution))
        .route("/admin/send_message", post(handlers::post_send_message))
        .route("/admin/save_snapshot", post(handlers::post_save_snapshot))
        .route("/ws/ticks", get(ws::ws_ticks))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
