//! Structural view documents pushed to connected visitors.
//!
//! The core never produces markup. Each render pass emits one of these
//! typed trees; serialization to HTML (or anything else) is entirely the
//! browser renderer's responsibility. The types are exported to
//! `TypeScript` so the renderer and the server share one contract.
//!
//! Two granularities exist per arena:
//!
//! - [`ArenaView`] -- the full seat grid. Rendered per recipient at
//!   delivery time because the own-seat flag and the video-embed origin
//!   are recipient-specific.
//! - [`EmoteOverlayView`] -- the emote overlay alone. Anchored to seat
//!   ids rather than to viewers, so one render is shared verbatim by
//!   every recipient in the arena.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{ChannelId, EmoteKind};
use crate::seat::SeatId;

/// Occupancy marker for one seat in a rendered grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum SeatOccupancy {
    /// Nobody sits here; the renderer makes it clickable for moves.
    Vacant,
    /// Another visitor sits here.
    Occupied,
    /// The requesting visitor's own seat.
    Own,
}

/// One seat in a rendered arena grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SeatView {
    /// Seat address; doubles as the overlay anchor name.
    pub id: SeatId,
    /// Who (structurally) occupies the seat.
    pub occupancy: SeatOccupancy,
}

/// Reference to the external video player for an arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VideoEmbed {
    /// The live-video channel to embed.
    pub channel: ChannelId,
    /// Embed origin (hostname) the player is parameterized with; supplied
    /// by the transport layer from the request it is answering.
    pub origin: String,
}

/// One emote in the overlay, anchored to the sender's seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EmoteView {
    /// Seat the emote is anchored to.
    pub seat: SeatId,
    /// Which emote asset to show.
    pub kind: EmoteKind,
    /// Display scale; 1.0 unless recent repetition inflated it.
    pub scale: f32,
}

/// The emote overlay for an arena, shared verbatim by all recipients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EmoteOverlayView {
    /// Arena the overlay belongs to.
    pub channel: ChannelId,
    /// Retained emotes in arrival order.
    pub emotes: Vec<EmoteView>,
}

/// Full per-recipient projection of an arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ArenaView {
    /// Arena channel id.
    pub channel: ChannelId,
    /// Arena display name.
    pub name: String,
    /// Number of tiers per side.
    pub tiers: u32,
    /// Number of seats per tier.
    pub seats_per_tier: u32,
    /// Every seat in canonical order with its occupancy marker.
    pub seats: Vec<SeatView>,
    /// Current emote overlay.
    pub overlay: EmoteOverlayView,
    /// Video player reference for this recipient.
    pub video: VideoEmbed,
}

/// One arena row in the lobby listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ListingRow {
    /// Arena channel id (join target).
    pub channel: ChannelId,
    /// Arena display name.
    pub name: String,
    /// Seats currently occupied.
    pub occupants: u32,
    /// Maximum seats.
    pub capacity: u32,
}

/// The lobby listing: every arena with its occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ListingView {
    /// One row per arena, in registry order.
    pub rows: Vec<ListingRow>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use crate::seat::Side;

    use super::*;

    #[test]
    fn arena_view_serializes_structurally() {
        let view = ArenaView {
            channel: ChannelId::from("otplol_"),
            name: String::from("OTP"),
            tiers: 1,
            seats_per_tier: 1,
            seats: vec![SeatView {
                id: SeatId::new(Side::Left, 0, 0),
                occupancy: SeatOccupancy::Own,
            }],
            overlay: EmoteOverlayView {
                channel: ChannelId::from("otplol_"),
                emotes: vec![EmoteView {
                    seat: SeatId::new(Side::Left, 0, 0),
                    kind: EmoteKind::new(3),
                    scale: 1.2,
                }],
            },
            video: VideoEmbed {
                channel: ChannelId::from("otplol_"),
                origin: String::from("localhost"),
            },
        };

        let json: serde_json::Value = serde_json::to_value(&view).unwrap();
        assert_eq!(json["channel"], "otplol_");
        assert_eq!(json["seats"][0]["occupancy"], "Own");
        assert_eq!(json["overlay"]["emotes"][0]["kind"], 3);
        // No markup anywhere in the document.
        assert!(json.to_string().find('<').is_none());
    }
}
