//! `WebSocket` delivery loops for the lobby and arena streams.
//!
//! Each connected client gets one task that blocks on its own mailbox
//! [`Subscription`] and forwards every update outward as a JSON text
//! frame. Full arena frames are rendered here, per recipient, at
//! forwarding time -- the own-seat flag and the embed origin differ per
//! viewer. Listing and emote frames arrive pre-rendered and are
//! forwarded verbatim.
//!
//! Cleanup rides on the [`Subscription`]: whichever way the loop exits
//! (client close frame, transport error, task cancellation), dropping
//! the subscription unregisters the mailbox and, for arena streams
//! still holding their registration, vacates the seat and re-broadcasts
//! the arena and the lobby.
//!
//! [`Subscription`]: tribune_core::Subscription

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use serde::Serialize;
use tracing::{debug, warn};
use tribune_core::{ArenaError, Update};
use tribune_types::{ChannelId, UserId};

use crate::error::ApiError;
use crate::extract::Visitor;
use crate::state::AppState;

/// One outbound frame: an update kind plus its view document.
#[derive(Debug, Serialize)]
struct Frame<'a, T> {
    /// Which granularity this is: `listing`, `arena`, or `emotes`.
    #[serde(rename = "type")]
    kind: &'static str,
    /// The structural view document.
    data: &'a T,
}

/// Serialize a frame and send it as one text message.
///
/// Returns `false` when the client is gone and the loop should end.
async fn send_frame<T: Serialize>(
    socket: &mut WebSocket,
    kind: &'static str,
    data: &T,
) -> bool {
    let json = match serde_json::to_string(&Frame { kind, data }) {
        Ok(json) => json,
        Err(err) => {
            warn!(kind, error = %err, "failed to serialize frame");
            return true;
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        debug!(kind, "client disconnected (send failed)");
        return false;
    }
    true
}

/// Upgrade `GET /ws/lobby` and stream listing re-renders.
pub async fn ws_lobby(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Visitor(user): Visitor,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_lobby(socket, state, user))
}

/// Lobby lifecycle: subscribe, forward every listing, clean up on exit.
async fn handle_lobby(mut socket: WebSocket, state: Arc<AppState>, user: UserId) {
    let mut subscription = Arc::clone(&state.service).open_lobby_stream(&user).await;

    loop {
        tokio::select! {
            update = subscription.recv() => {
                match update {
                    Some(Update::Listing(listing)) => {
                        if !send_frame(&mut socket, "listing", listing.as_ref()).await {
                            break;
                        }
                    }
                    Some(other) => {
                        debug!(user = %user, ?other, "unexpected update on lobby scope");
                    }
                    // Mailbox replaced by a newer lobby stream.
                    None => break,
                }
            }
            msg = socket.recv() => {
                if !handle_client_message(&mut socket, msg).await {
                    break;
                }
            }
        }
    }

    subscription.release().await;
}

/// Upgrade `GET /ws/arena/{channel}` and stream arena re-renders.
///
/// The channel is validated before the upgrade so a typo answers with a
/// plain 404 instead of a doomed socket.
pub async fn ws_arena(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
    Visitor(user): Visitor,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let channel = ChannelId::from(channel);
    if !state.service.registry().contains(&channel) {
        warn!(user = %user, channel = %channel, "arena stream rejected: unknown channel");
        return Err(ApiError::UnknownChannel(channel.0));
    }

    let origin = crate::extract::embed_origin(&headers);
    Ok(ws.on_upgrade(move |socket| handle_arena(socket, state, user, channel, origin)))
}

/// Arena lifecycle: re-join if needed, subscribe, forward updates.
async fn handle_arena(
    mut socket: WebSocket,
    state: Arc<AppState>,
    user: UserId,
    channel: ChannelId,
    origin: String,
) {
    // A visitor opening the stream without a seat (refresh, dropped
    // transport) is re-seated here; a full arena ends the socket.
    let mut subscription = match Arc::clone(&state.service)
        .open_arena_stream(&user, &channel)
        .await
    {
        Ok(subscription) => subscription,
        Err(err @ ArenaError::ArenaFull { .. }) => {
            let close = Message::Close(Some(axum::extract::ws::CloseFrame {
                code: axum::extract::ws::close_code::POLICY,
                reason: "arena full".into(),
            }));
            let _ = socket.send(close).await;
            warn!(user = %user, channel = %channel, error = %err, "arena stream refused");
            return;
        }
        Err(err) => {
            warn!(user = %user, channel = %channel, error = %err, "arena stream failed");
            return;
        }
    };

    loop {
        tokio::select! {
            update = subscription.recv() => {
                match update {
                    Some(Update::Arena) => {
                        // Rendered per recipient at delivery time.
                        match state.service.render_arena(&channel, &user, &origin).await {
                            Ok(view) => {
                                if !send_frame(&mut socket, "arena", &view).await {
                                    break;
                                }
                            }
                            Err(err) => {
                                warn!(channel = %channel, error = %err, "arena render failed");
                            }
                        }
                    }
                    Some(Update::Emotes(overlay)) => {
                        if !send_frame(&mut socket, "emotes", overlay.as_ref()).await {
                            break;
                        }
                    }
                    Some(other) => {
                        debug!(user = %user, ?other, "unexpected update on arena scope");
                    }
                    // Mailbox replaced by a newer stream for this visitor.
                    None => break,
                }
            }
            msg = socket.recv() => {
                if !handle_client_message(&mut socket, msg).await {
                    break;
                }
            }
        }
    }

    subscription.release().await;
}

/// React to inbound traffic on a push-only socket.
///
/// Returns `false` when the client closed or the transport failed.
async fn handle_client_message(
    socket: &mut WebSocket,
    msg: Option<Result<Message, axum::Error>>,
) -> bool {
    match msg {
        Some(Ok(Message::Close(_))) | None => {
            debug!("client disconnected");
            false
        }
        Some(Ok(Message::Ping(data))) => {
            if socket.send(Message::Pong(data)).await.is_err() {
                debug!("client disconnected (pong failed)");
                return false;
            }
            true
        }
        Some(Err(err)) => {
            debug!(error = %err, "transport error");
            false
        }
        _ => {
            // These streams are push-only; inbound text is ignored.
            true
        }
    }
}
