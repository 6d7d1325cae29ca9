//! Axum router construction for the Tribune server.
//!
//! Assembles the REST and `WebSocket` routes into a single [`Router`]
//! with CORS middleware enabled for cross-origin renderer development.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /api/arenas` -- lobby listing snapshot
/// - `POST /api/arenas/{channel}/enter` -- join a venue
/// - `POST /api/arenas/{channel}/move/{seat}` -- move seats
/// - `POST /api/arenas/{channel}/emote/{kind}` -- send an emote
/// - `GET /ws/lobby` -- lobby listing stream
/// - `GET /ws/arena/{channel}` -- arena stream
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/arenas", get(handlers::list_arenas))
        .route("/api/arenas/{channel}/enter", post(handlers::enter_arena))
        .route(
            "/api/arenas/{channel}/move/{seat}",
            post(handlers::move_seat),
        )
        .route(
            "/api/arenas/{channel}/emote/{kind}",
            post(handlers::send_emote),
        )
        // WebSocket streams
        .route("/ws/lobby", get(ws::ws_lobby))
        .route("/ws/arena/{channel}", get(ws::ws_arena))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
