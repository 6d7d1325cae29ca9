//! Shared type definitions for the Tribune venue server.
//!
//! This crate is the single source of truth for all types that cross crate
//! boundaries in the Tribune workspace. View documents defined here flow
//! downstream to `TypeScript` via `ts-rs` for the browser renderer.
//!
//! # Modules
//!
//! - [`ids`] -- Opaque identifier newtypes (visitors, channels, emote kinds)
//! - [`seat`] -- Seat-grid addressing: sides, seat ids, grid shapes
//! - [`view`] -- Structural view documents emitted to the external renderer

pub mod ids;
pub mod seat;
pub mod view;

// Re-export all public types at crate root for convenience.
pub use ids::{ChannelId, EmoteKind, UserId};
pub use seat::{GridShape, SeatId, SeatParseError, Side};
pub use view::{
    ArenaView, EmoteOverlayView, EmoteView, ListingRow, ListingView, SeatOccupancy, SeatView,
    VideoEmbed,
};
