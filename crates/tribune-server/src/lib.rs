//! HTTP + `WebSocket` boundary for the Tribune venue server.
//!
//! Everything in this crate is an adapter: requests are mapped onto
//! `tribune-core` operations, and the structural view documents the core
//! emits are serialized to JSON for the browser renderer. No markup for
//! the arena itself is produced here.
//!
//! # Modules
//!
//! - [`config`] -- Typed YAML configuration (`tribune.yaml`).
//! - [`error`] -- [`ApiError`] with its HTTP response mapping.
//! - [`extract`] -- The [`Visitor`] identity extractor and embed-origin
//!   helper.
//! - [`handlers`] -- REST endpoint handlers (listing, enter, move,
//!   emote).
//! - [`router`] -- Axum router assembly with CORS and request tracing.
//! - [`server`] -- TCP bind and serve lifecycle.
//! - [`state`] -- Shared [`AppState`] wiring the core service to Axum.
//! - [`ws`] -- `WebSocket` delivery loops for the lobby and arena
//!   streams.
//!
//! [`ApiError`]: error::ApiError
//! [`Visitor`]: extract::Visitor
//! [`AppState`]: state::AppState

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;
