//! Integration tests for the Tribune REST endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt`
//! without starting a TCP server. Stream semantics (mailbox delivery,
//! disconnect cleanup) are covered at the core level in
//! `tribune-core`; these tests validate routing, identity handling,
//! and the boundary's silent no-op contract.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use tribune_server::config::AppConfig;
use tribune_server::router::build_router;
use tribune_server::state::AppState;
use tribune_types::{ChannelId, UserId};

fn make_state() -> Arc<AppState> {
    AppState::from_config(&AppConfig::default()).unwrap()
}

fn post(uri: &str, visitor: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(visitor) = visitor {
        builder = builder.header("x-visitor-id", visitor);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn listing_reports_the_configured_venues() {
    let state = make_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/arenas").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row["occupants"], 0);
        assert_eq!(row["capacity"], 80);
    }
}

#[tokio::test]
async fn requests_without_identity_are_rejected() {
    let state = make_state();
    let router = build_router(state);

    let response = router
        .oneshot(post("/api/arenas/otplol_/enter", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn identity_may_arrive_as_a_query_parameter() {
    let state = make_state();
    let router = build_router(Arc::clone(&state));

    let response = router
        .oneshot(post("/api/arenas/otplol_/enter?visitor=Query%20Visitor", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let seated = state
        .service
        .registry()
        .seated_in(&UserId::from("Query Visitor"))
        .await;
    assert_eq!(seated, Some(ChannelId::from("otplol_")));
}

#[tokio::test]
async fn entering_an_unknown_channel_redirects_to_the_lobby() {
    let state = make_state();
    let router = build_router(state);

    let response = router
        .oneshot(post("/api/arenas/nosuchchannel/enter", Some("a")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/"
    );
}

#[tokio::test]
async fn entering_a_venue_updates_the_listing() {
    let state = make_state();
    let router = build_router(Arc::clone(&state));

    let response = router
        .clone()
        .oneshot(post("/api/arenas/otplol_/enter", Some("a")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(Request::get("/api/arenas").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response).await;
    let occupied: Vec<(&str, u64)> = body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            (
                row["channel"].as_str().unwrap(),
                row["occupants"].as_u64().unwrap(),
            )
        })
        .collect();
    assert!(occupied.contains(&("otplol_", 1)));
    assert!(occupied.contains(&("claudeplayspokemon", 0)));
}

#[tokio::test]
async fn moving_to_a_vacant_seat_succeeds_silently() {
    let state = make_state();
    let router = build_router(Arc::clone(&state));

    let user = UserId::from("mover");
    let channel = ChannelId::from("otplol_");
    let current = state.service.enter_arena(&user, &channel).await.unwrap();

    // Pick any seat other than the one the join assigned.
    let target = state
        .service
        .registry()
        .with_arena(&channel, |arena| {
            arena.shape().seat_ids().find(|seat| *seat != current).unwrap()
        })
        .await
        .unwrap();

    let response = router
        .oneshot(post(
            &format!("/api/arenas/otplol_/move/{target}"),
            Some("mover"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let seat = state
        .service
        .registry()
        .with_arena(&channel, |arena| arena.seat_of(&user))
        .await
        .unwrap();
    assert_eq!(seat, Some(target));
}

#[tokio::test]
async fn invalid_moves_are_silent_no_ops() {
    let state = make_state();
    let router = build_router(Arc::clone(&state));

    // Malformed seat id.
    let response = router
        .clone()
        .oneshot(post("/api/arenas/otplol_/move/balcony_9_9", Some("a")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Unknown channel.
    let response = router
        .clone()
        .oneshot(post("/api/arenas/nosuchchannel/move/left_0_0", Some("a")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Unseated mover.
    let response = router
        .oneshot(post("/api/arenas/otplol_/move/left_0_0", Some("a")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        state
            .service
            .registry()
            .seated_in(&UserId::from("a"))
            .await,
        None
    );
}

#[tokio::test]
async fn emote_kinds_outside_the_asset_set_are_ignored() {
    let state = make_state();
    let router = build_router(Arc::clone(&state));

    let user = UserId::from("emoter");
    let channel = ChannelId::from("otplol_");
    state.service.enter_arena(&user, &channel).await.unwrap();

    // Kind 8 is one past the stock asset set of 0..8.
    let response = router
        .clone()
        .oneshot(post("/api/arenas/otplol_/emote/8", Some("emoter")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Non-numeric kind.
    let response = router
        .clone()
        .oneshot(post("/api/arenas/otplol_/emote/wave", Some("emoter")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A valid kind still works.
    let response = router
        .oneshot(post("/api/arenas/otplol_/emote/7", Some("emoter")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn emotes_from_unseated_visitors_are_ignored() {
    let state = make_state();
    let router = build_router(state);

    let response = router
        .oneshot(post("/api/arenas/otplol_/emote/0", Some("ghost")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
