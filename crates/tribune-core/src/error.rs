//! Error types for the `tribune-core` crate.
//!
//! Every failure here is local and non-fatal: the operation that produced
//! it left all state exactly as it was and triggered no broadcast. Errors
//! are surfaced as values through the standard [`Result`] type and never
//! cross the public boundary as panics.

use tribune_types::{ChannelId, SeatId, UserId};

/// Errors that can occur during arena and registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    /// The referenced channel is not part of the registry.
    #[error("unknown channel: {0}")]
    ChannelUnknown(ChannelId),

    /// Two arenas were configured with the same channel id.
    #[error("duplicate channel: {0}")]
    ChannelDuplicate(ChannelId),

    /// No vacant seat was left at join time.
    #[error("arena {channel} is full ({capacity} seats)")]
    ArenaFull {
        /// The full arena.
        channel: ChannelId,
        /// Its maximum capacity.
        capacity: u32,
    },

    /// A move targeted a seat that does not exist or is occupied, or the
    /// mover holds no seat to move from.
    #[error("seat {seat} in arena {channel} is not available")]
    SeatInvalid {
        /// The arena the move addressed.
        channel: ChannelId,
        /// The rejected target seat.
        seat: SeatId,
    },

    /// An emote was sent by a visitor without a seat in that arena.
    #[error("visitor {user} holds no seat in arena {channel}")]
    NotSeated {
        /// The arena the emote addressed.
        channel: ChannelId,
        /// The unseated visitor.
        user: UserId,
    },
}
