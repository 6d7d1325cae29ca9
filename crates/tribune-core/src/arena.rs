//! One virtual venue: the seat grid, its occupants, and the emote log.
//!
//! An [`Arena`] is bound to exactly one external live-video channel for
//! its whole lifetime. Occupancy is tracked in two maps that are exact
//! mutual inverses at all times: `seats` (every grid seat, present from
//! construction with an explicit vacant sentinel) and `user_seats` (the
//! inverse index). All mutations update both maps together; no partial
//! state is ever observable.
//!
//! Render methods are pure projections -- they take an explicit `now`
//! and the requesting visitor, and never mutate the arena.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use tribune_types::{
    ArenaView, ChannelId, EmoteKind, EmoteOverlayView, EmoteView, GridShape, SeatId,
    SeatOccupancy, SeatView, UserId, VideoEmbed,
};

use crate::emote::{self, EmoteEntry};
use crate::error::ArenaError;

/// A venue bound to one live-video channel, with a fixed seat grid.
#[derive(Debug, Clone)]
pub struct Arena {
    /// Channel id; unique registry key, immutable.
    channel: ChannelId,
    /// Display name shown in the lobby listing.
    name: String,
    /// Grid dimensions.
    shape: GridShape,
    /// Every seat in the grid, vacant seats held as explicit `None`.
    seats: BTreeMap<SeatId, Option<UserId>>,
    /// Inverse index: visitor -> their seat.
    user_seats: BTreeMap<UserId, SeatId>,
    /// Append-only emote log, pruned by age.
    emotes: Vec<EmoteEntry>,
}

impl Arena {
    /// Create an arena with every seat vacant.
    pub fn new(channel: ChannelId, name: impl Into<String>, shape: GridShape) -> Self {
        let seats = shape.seat_ids().map(|seat| (seat, None)).collect();
        Self {
            channel,
            name: name.into(),
            shape,
            seats,
            user_seats: BTreeMap::new(),
            emotes: Vec::new(),
        }
    }

    /// The bound channel id.
    pub const fn channel(&self) -> &ChannelId {
        &self.channel
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid dimensions.
    pub const fn shape(&self) -> GridShape {
        self.shape
    }

    /// Maximum number of occupants.
    pub const fn capacity(&self) -> u32 {
        self.shape.capacity()
    }

    /// Number of seats currently occupied.
    pub fn occupant_count(&self) -> u32 {
        u32::try_from(self.user_seats.len()).unwrap_or(u32::MAX)
    }

    /// Whether the visitor holds a seat here.
    pub fn contains_user(&self, user: &UserId) -> bool {
        self.user_seats.contains_key(user)
    }

    /// The visitor's seat, if they hold one.
    pub fn seat_of(&self, user: &UserId) -> Option<SeatId> {
        self.user_seats.get(user).copied()
    }

    /// Seat the visitor on a uniformly random vacant seat.
    ///
    /// A visitor already seated here is first removed, then re-seated at
    /// random. Both maps are updated in the same call; on failure nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ArenaFull`] when no vacant seat exists.
    pub fn join<R: Rng + ?Sized>(
        &mut self,
        user: &UserId,
        rng: &mut R,
    ) -> Result<SeatId, ArenaError> {
        if self.contains_user(user) {
            self.leave(user);
        }

        let vacant: Vec<SeatId> = self
            .seats
            .iter()
            .filter_map(|(seat, occupant)| occupant.is_none().then_some(*seat))
            .collect();

        let Some(seat) = vacant.choose(rng).copied() else {
            return Err(ArenaError::ArenaFull {
                channel: self.channel.clone(),
                capacity: self.capacity(),
            });
        };

        self.seats.insert(seat, Some(user.clone()));
        self.user_seats.insert(user.clone(), seat);
        Ok(seat)
    }

    /// Vacate the visitor's seat. Returns whether they were seated.
    pub fn leave(&mut self, user: &UserId) -> bool {
        let Some(seat) = self.user_seats.remove(user) else {
            return false;
        };
        self.seats.insert(seat, None);
        true
    }

    /// Move the visitor to a specific vacant seat.
    ///
    /// Vacating the current seat and occupying the target is one atomic
    /// step; no intermediate state is observable.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::SeatInvalid`] when the target seat does not
    /// exist in the grid, is occupied, or the visitor holds no seat here
    /// to move from.
    pub fn move_to(&mut self, user: &UserId, seat: SeatId) -> Result<(), ArenaError> {
        let invalid = || ArenaError::SeatInvalid {
            channel: self.channel.clone(),
            seat,
        };

        match self.seats.get(&seat) {
            Some(None) => {}
            Some(Some(_)) | None => return Err(invalid()),
        }
        let Some(current) = self.user_seats.get(user).copied() else {
            return Err(invalid());
        };

        self.seats.insert(current, None);
        self.seats.insert(seat, Some(user.clone()));
        self.user_seats.insert(user.clone(), seat);
        Ok(())
    }

    /// Append a timestamped emote from a seated visitor.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NotSeated`] when the visitor holds no seat
    /// here; the log is unchanged.
    pub fn add_emote(
        &mut self,
        user: &UserId,
        kind: EmoteKind,
        now: DateTime<Utc>,
    ) -> Result<(), ArenaError> {
        if !self.contains_user(user) {
            return Err(ArenaError::NotSeated {
                channel: self.channel.clone(),
                user: user.clone(),
            });
        }
        self.emotes.push(EmoteEntry {
            user: user.clone(),
            kind,
            sent_at: now,
        });
        Ok(())
    }

    /// Drop emote entries older than the retention threshold.
    pub fn prune_emotes(&mut self, now: DateTime<Utc>) {
        emote::retain_recent(&mut self.emotes, now);
    }

    /// The shared emote overlay projection.
    ///
    /// Contains every retained entry whose sender currently holds a seat
    /// (the seat is the overlay anchor), scaled by recent repetition.
    /// Seat-relative, so one render serves every recipient.
    pub fn overlay(&self, now: DateTime<Utc>) -> EmoteOverlayView {
        let scales = emote::combo_scales(&self.emotes, now);
        let emotes = self
            .emotes
            .iter()
            .filter(|entry| emote::is_retained(entry, now))
            .filter_map(|entry| {
                let seat = self.seat_of(&entry.user)?;
                let scale = scales
                    .get(&(entry.user.clone(), entry.kind))
                    .copied()
                    .unwrap_or(1.0);
                Some(EmoteView {
                    seat,
                    kind: entry.kind,
                    scale,
                })
            })
            .collect();

        EmoteOverlayView {
            channel: self.channel.clone(),
            emotes,
        }
    }

    /// Full projection of the arena for one recipient.
    ///
    /// Pure: seat grid in canonical order, the recipient's own seat
    /// flagged distinctly, the current overlay, and a video embed
    /// parameterized with the caller-supplied origin. A recipient without
    /// a seat simply gets no `Own` marker.
    pub fn render(&self, for_user: &UserId, origin: &str, now: DateTime<Utc>) -> ArenaView {
        let seats = self
            .seats
            .iter()
            .map(|(seat, occupant)| {
                let occupancy = match occupant {
                    None => SeatOccupancy::Vacant,
                    Some(user) if user == for_user => SeatOccupancy::Own,
                    Some(_) => SeatOccupancy::Occupied,
                };
                SeatView {
                    id: *seat,
                    occupancy,
                }
            })
            .collect();

        ArenaView {
            channel: self.channel.clone(),
            name: self.name.clone(),
            tiers: self.shape.tiers,
            seats_per_tier: self.shape.seats_per_tier,
            seats,
            overlay: self.overlay(now),
            video: VideoEmbed {
                channel: self.channel.clone(),
                origin: origin.to_owned(),
            },
        }
    }
}
