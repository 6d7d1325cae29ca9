//! Seat-grid addressing for arenas.
//!
//! An arena's seating is a fixed grid: two [`Side`]s flanking the stream,
//! each holding `tiers` rows of `seats_per_tier` seats. A [`SeatId`] names
//! one slot in that grid and has a canonical `side_tier_index` text form
//! (e.g. `left_3_2`) used in request paths and as the overlay anchor name.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which side of the stream a seat block sits on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum Side {
    /// The seat block to the left of the stream.
    Left,
    /// The seat block to the right of the stream.
    Right,
}

impl Side {
    /// Canonical lowercase name used in the text form of a [`SeatId`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a single seat in an arena grid.
///
/// Ordering is derived, so seats sort deterministically: left side first,
/// then by tier, then by index within the tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct SeatId {
    /// Side of the stream.
    pub side: Side,
    /// Tier (row) on that side, counted from the front.
    pub tier: u32,
    /// Position within the tier.
    pub index: u32,
}

impl SeatId {
    /// Build a seat address from its components.
    pub const fn new(side: Side, tier: u32, index: u32) -> Self {
        Self { side, tier, index }
    }
}

impl core::fmt::Display for SeatId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}_{}_{}", self.side, self.tier, self.index)
    }
}

/// Error parsing the `side_tier_index` text form of a seat address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed seat id: {input}")]
pub struct SeatParseError {
    /// The text that failed to parse.
    pub input: String,
}

impl core::str::FromStr for SeatId {
    type Err = SeatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SeatParseError { input: s.to_owned() };
        let mut parts = s.split('_');
        let side = match parts.next() {
            Some("left") => Side::Left,
            Some("right") => Side::Right,
            _ => return Err(malformed()),
        };
        let tier = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(malformed)?;
        let index = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(Self { side, tier, index })
    }
}

/// Dimensions of an arena's seat grid.
///
/// Capacity is always `tiers * seats_per_tier * 2` because every arena has
/// a left and a right seat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of tiers (rows) per side.
    pub tiers: u32,
    /// Number of seats in each tier.
    pub seats_per_tier: u32,
}

impl GridShape {
    /// Build a grid shape.
    pub const fn new(tiers: u32, seats_per_tier: u32) -> Self {
        Self { tiers, seats_per_tier }
    }

    /// Maximum number of occupants the grid can hold (both sides).
    pub const fn capacity(self) -> u32 {
        self.tiers.saturating_mul(self.seats_per_tier).saturating_mul(2)
    }

    /// Iterate every seat address in the grid in canonical order.
    pub fn seat_ids(self) -> impl Iterator<Item = SeatId> {
        [Side::Left, Side::Right].into_iter().flat_map(move |side| {
            (0..self.tiers).flat_map(move |tier| {
                (0..self.seats_per_tier).map(move |index| SeatId { side, tier, index })
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn seat_id_canonical_text_form() {
        let seat = SeatId::new(Side::Left, 3, 2);
        assert_eq!(seat.to_string(), "left_3_2");
        assert_eq!("left_3_2".parse::<SeatId>().unwrap(), seat);
    }

    #[test]
    fn seat_id_rejects_malformed_input() {
        assert!("middle_0_0".parse::<SeatId>().is_err());
        assert!("left_0".parse::<SeatId>().is_err());
        assert!("left_0_0_0".parse::<SeatId>().is_err());
        assert!("left_x_0".parse::<SeatId>().is_err());
        assert!("".parse::<SeatId>().is_err());
    }

    #[test]
    fn grid_capacity_counts_both_sides() {
        assert_eq!(GridShape::new(8, 5).capacity(), 80);
        assert_eq!(GridShape::new(1, 1).capacity(), 2);
    }

    #[test]
    fn seat_ids_cover_the_grid_without_duplicates() {
        let shape = GridShape::new(8, 5);
        let seats: Vec<SeatId> = shape.seat_ids().collect();
        assert_eq!(seats.len(), 80);
        let mut sorted = seats.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 80, "seat ids must be unique");
        // Canonical order: already sorted.
        assert_eq!(seats, sorted);
    }
}
