//! REST endpoint handlers for the Tribune server.
//!
//! The move and emote endpoints are deliberately forgiving: any
//! validation failure is logged and answered with an empty success, so
//! a stale client poking at a seat that has since been taken never sees
//! an error page. Entering an arena answers failure with a redirect to
//! the lobby, mirroring how the browser flow recovers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/arenas` | Lobby listing snapshot |
//! | `POST` | `/api/arenas/{channel}/enter` | Join a venue (exclusive) |
//! | `POST` | `/api/arenas/{channel}/move/{seat}` | Move to a seat |
//! | `POST` | `/api/arenas/{channel}/emote/{kind}` | Send an emote |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::warn;
use tribune_types::{ChannelId, EmoteKind, ListingView, SeatId};

use crate::extract::Visitor;
use crate::state::AppState;

/// Serve a minimal HTML status page with the venue roster.
///
/// The arena pages themselves are rendered by the browser client; this
/// page only exists so an operator hitting the root sees signs of life.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let listing = state.service.listing().await;
    let rows: String = listing
        .rows
        .iter()
        .map(|row| {
            format!(
                "<li>{} ({}/{})</li>",
                row.name, row.occupants, row.capacity
            )
        })
        .collect();

    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>Tribune</title></head>\
         <body><h1>Tribune</h1><ul>{rows}</ul>\
         <p>Streams: <code>/ws/lobby</code>, <code>/ws/arena/{{channel}}</code></p>\
         </body></html>"
    ))
}

/// `GET /api/arenas` -- the same listing the lobby stream pushes.
pub async fn list_arenas(State(state): State<Arc<AppState>>) -> Json<ListingView> {
    Json(state.service.listing().await)
}

/// `POST /api/arenas/{channel}/enter` -- seat the visitor, leaving any
/// other venue first.
///
/// Success is `204 No Content`; the client then opens the arena stream.
/// Failure (unknown channel, no vacant seat) redirects to the lobby.
pub async fn enter_arena(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
    Visitor(user): Visitor,
) -> Response {
    let channel = ChannelId::from(channel);
    match state.service.enter_arena(&user, &channel).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            warn!(user = %user, channel = %channel, error = %err, "enter failed; redirecting");
            Redirect::to("/").into_response()
        }
    }
}

/// `POST /api/arenas/{channel}/move/{seat}` -- move to a specific seat.
///
/// Every validation failure (unknown channel, malformed seat id,
/// occupied target, unseated mover) is a logged no-op.
pub async fn move_seat(
    State(state): State<Arc<AppState>>,
    Path((channel, seat)): Path<(String, String)>,
    Visitor(user): Visitor,
) -> StatusCode {
    let channel = ChannelId::from(channel);
    let Ok(seat) = seat.parse::<SeatId>() else {
        warn!(user = %user, channel = %channel, seat = %seat, "move ignored: malformed seat id");
        return StatusCode::NO_CONTENT;
    };

    if let Err(err) = state.service.move_seat(&user, &channel, seat).await {
        warn!(user = %user, channel = %channel, seat = %seat, error = %err, "move ignored");
    }
    StatusCode::NO_CONTENT
}

/// `POST /api/arenas/{channel}/emote/{kind}` -- send an emote.
///
/// The emote asset range is enforced here; the core would accept any
/// kind, but nothing outside the configured asset set is worth
/// broadcasting. All failures are logged no-ops.
pub async fn send_emote(
    State(state): State<Arc<AppState>>,
    Path((channel, kind)): Path<(String, String)>,
    Visitor(user): Visitor,
) -> StatusCode {
    let channel = ChannelId::from(channel);
    let parsed = kind.parse::<u8>().ok().filter(|k| *k < state.emote_kinds);
    let Some(kind) = parsed.map(EmoteKind::new) else {
        warn!(user = %user, channel = %channel, kind = %kind, "emote ignored: kind outside asset set");
        return StatusCode::NO_CONTENT;
    };

    if let Err(err) = state.service.send_emote(&user, &channel, kind).await {
        warn!(user = %user, channel = %channel, kind = %kind, error = %err, "emote ignored");
    }
    StatusCode::NO_CONTENT
}
