//! The fixed arena set with per-arena locking and seat exclusivity.
//!
//! Membership is built once at startup and never changes, so the map
//! itself needs no lock: each [`Arena`] sits behind its own
//! [`RwLock`], and operations take at most one lock at a time, always
//! walking arenas in key order. A state mutation and the broadcast
//! decision it implies both happen inside the closure passed to
//! [`ArenaRegistry::with_arena_mut`], i.e. inside one critical section,
//! so a stale view can never be scheduled for re-broadcast.
//!
//! The registry also enforces the one rule that spans arenas: a visitor
//! holds a seat in at most one arena at any observable instant.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tribune_types::{ChannelId, ListingRow, ListingView, UserId};

use crate::arena::Arena;
use crate::error::ArenaError;

/// The process-wide set of arenas, keyed by channel id.
#[derive(Debug)]
pub struct ArenaRegistry {
    arenas: BTreeMap<ChannelId, RwLock<Arena>>,
}

impl ArenaRegistry {
    /// Build the registry from its full, final membership.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ChannelDuplicate`] when two arenas share a
    /// channel id.
    pub fn new(arenas: impl IntoIterator<Item = Arena>) -> Result<Self, ArenaError> {
        let mut map = BTreeMap::new();
        for arena in arenas {
            let channel = arena.channel().clone();
            if map.contains_key(&channel) {
                return Err(ArenaError::ChannelDuplicate(channel));
            }
            map.insert(channel, RwLock::new(arena));
        }
        Ok(Self { arenas: map })
    }

    /// Whether a channel is part of the registry.
    pub fn contains(&self, channel: &ChannelId) -> bool {
        self.arenas.contains_key(channel)
    }

    /// Iterate the registered channel ids in key order.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelId> {
        self.arenas.keys()
    }

    /// Run a closure under an arena's read lock.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ChannelUnknown`] when the channel is not
    /// registered.
    pub async fn with_arena<T>(
        &self,
        channel: &ChannelId,
        f: impl FnOnce(&Arena) -> T,
    ) -> Result<T, ArenaError> {
        let lock = self
            .arenas
            .get(channel)
            .ok_or_else(|| ArenaError::ChannelUnknown(channel.clone()))?;
        let arena = lock.read().await;
        Ok(f(&arena))
    }

    /// Run a closure under an arena's write lock.
    ///
    /// The closure is the critical section: perform the mutation and
    /// derive everything the broadcast needs before returning.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ChannelUnknown`] when the channel is not
    /// registered.
    pub async fn with_arena_mut<T>(
        &self,
        channel: &ChannelId,
        f: impl FnOnce(&mut Arena) -> T,
    ) -> Result<T, ArenaError> {
        let lock = self
            .arenas
            .get(channel)
            .ok_or_else(|| ArenaError::ChannelUnknown(channel.clone()))?;
        let mut arena = lock.write().await;
        Ok(f(&mut arena))
    }

    /// Remove the visitor from every arena except the named one.
    ///
    /// Returns the channels they actually departed, in key order, so the
    /// caller can re-broadcast each. Locks are taken one arena at a time.
    pub async fn leave_others(&self, user: &UserId, except: &ChannelId) -> Vec<ChannelId> {
        let mut departed = Vec::new();
        for (channel, lock) in &self.arenas {
            if channel == except {
                continue;
            }
            let mut arena = lock.write().await;
            if arena.leave(user) {
                departed.push(channel.clone());
            }
        }
        departed
    }

    /// Where the visitor currently sits, if anywhere.
    pub async fn seated_in(&self, user: &UserId) -> Option<ChannelId> {
        for (channel, lock) in &self.arenas {
            if lock.read().await.contains_user(user) {
                return Some(channel.clone());
            }
        }
        None
    }

    /// Snapshot the lobby listing: every arena with its occupancy.
    pub async fn listing(&self) -> ListingView {
        let mut rows = Vec::with_capacity(self.arenas.len());
        for lock in self.arenas.values() {
            let arena = lock.read().await;
            rows.push(ListingRow {
                channel: arena.channel().clone(),
                name: arena.name().to_owned(),
                occupants: arena.occupant_count(),
                capacity: arena.capacity(),
            });
        }
        ListingView { rows }
    }
}
