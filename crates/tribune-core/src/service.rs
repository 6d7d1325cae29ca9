//! The venue service: state mutation fused with broadcast decisions.
//!
//! [`VenueService`] owns the [`ArenaRegistry`] and the [`ConnectionHub`]
//! and is the single entry point for every visitor action. Each
//! operation mutates under the owning arena's lock, derives what must be
//! re-broadcast inside that same critical section, and only then
//! enqueues into subscriber mailboxes (fire-and-forget, after the lock
//! is released). Failures mutate nothing and publish nothing.
//!
//! Open streams are represented by [`Subscription`]s: registering the
//! mailbox is the acquire step, and the paired release (unregister,
//! then seat leave and re-broadcast if this stream still owned the
//! registration) runs exactly once on every exit path -- explicitly via
//! [`Subscription::release`], or from `Drop` when the transport task is
//! cancelled abruptly.

use std::sync::Arc;

use chrono::Utc;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use tribune_types::{ArenaView, ChannelId, EmoteKind, ListingView, SeatId, UserId};

use crate::error::ArenaError;
use crate::hub::{ConnectionHub, Mailbox, MailboxId, Scope, Update};
use crate::registry::ArenaRegistry;

/// The concurrent state-and-broadcast engine behind every endpoint.
pub struct VenueService {
    registry: ArenaRegistry,
    hub: ConnectionHub,
}

impl VenueService {
    /// Wrap a fully built registry.
    pub fn new(registry: ArenaRegistry) -> Arc<Self> {
        Arc::new(Self {
            registry,
            hub: ConnectionHub::new(),
        })
    }

    /// The arena registry (read-side helpers).
    pub const fn registry(&self) -> &ArenaRegistry {
        &self.registry
    }

    /// Snapshot the current lobby listing.
    pub async fn listing(&self) -> ListingView {
        self.registry.listing().await
    }

    /// Seat a visitor in an arena, enforcing cross-arena exclusivity.
    ///
    /// Any seat held in another arena is vacated first; those arenas and
    /// the lobby are re-broadcast even when the target join then fails,
    /// because their occupancy did change.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ChannelUnknown`] when the channel is not registered
    /// (nothing changes), or [`ArenaError::ArenaFull`] when no vacant
    /// seat is left (the departures stand).
    pub async fn enter_arena(
        &self,
        user: &UserId,
        channel: &ChannelId,
    ) -> Result<SeatId, ArenaError> {
        if !self.registry.contains(channel) {
            warn!(user = %user, channel = %channel, "enter rejected: unknown channel");
            return Err(ArenaError::ChannelUnknown(channel.clone()));
        }

        let departed = self.registry.leave_others(user, channel).await;
        let joined = self
            .registry
            .with_arena_mut(channel, |arena| arena.join(user, &mut rand::rng()))
            .await?;

        for left in &departed {
            info!(user = %user, channel = %left, "visitor left arena");
            self.broadcast_arena(left).await;
        }

        match joined {
            Ok(seat) => {
                info!(user = %user, channel = %channel, seat = %seat, "visitor joined arena");
                self.broadcast_arena(channel).await;
                self.broadcast_listing().await;
                Ok(seat)
            }
            Err(err) => {
                warn!(user = %user, channel = %channel, error = %err, "join failed");
                if !departed.is_empty() {
                    self.broadcast_listing().await;
                }
                Err(err)
            }
        }
    }

    /// Move a visitor to a specific seat in an arena.
    ///
    /// Occupancy counts are unchanged by a move, so only that arena is
    /// re-broadcast; the lobby is not.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ChannelUnknown`] or [`ArenaError::SeatInvalid`];
    /// state is untouched and nothing is published.
    pub async fn move_seat(
        &self,
        user: &UserId,
        channel: &ChannelId,
        seat: SeatId,
    ) -> Result<(), ArenaError> {
        self.registry
            .with_arena_mut(channel, |arena| arena.move_to(user, seat))
            .await??;

        info!(user = %user, channel = %channel, seat = %seat, "visitor moved seat");
        self.broadcast_arena(channel).await;
        Ok(())
    }

    /// Record an emote from a seated visitor and push the new overlay.
    ///
    /// The log is pruned and the shared overlay rendered inside the
    /// arena's critical section; every subscriber then receives that one
    /// render verbatim.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ChannelUnknown`] or [`ArenaError::NotSeated`];
    /// state is untouched and nothing is published.
    pub async fn send_emote(
        &self,
        user: &UserId,
        channel: &ChannelId,
        kind: EmoteKind,
    ) -> Result<(), ArenaError> {
        let now = Utc::now();
        let overlay = self
            .registry
            .with_arena_mut(channel, |arena| {
                arena.add_emote(user, kind, now)?;
                arena.prune_emotes(now);
                Ok::<_, ArenaError>(arena.overlay(now))
            })
            .await??;

        debug!(user = %user, channel = %channel, kind = %kind, "emote sent");
        let scope = Scope::Arena(channel.clone());
        let delivered = self
            .hub
            .publish(&scope, &Update::Emotes(Arc::new(overlay)))
            .await;
        debug!(scope = %scope, delivered, "emote overlay broadcast");
        Ok(())
    }

    /// Render the arena for one recipient, at delivery time.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ChannelUnknown`] when the channel is not registered.
    pub async fn render_arena(
        &self,
        channel: &ChannelId,
        user: &UserId,
        origin: &str,
    ) -> Result<ArenaView, ArenaError> {
        self.registry
            .with_arena(channel, |arena| arena.render(user, origin, Utc::now()))
            .await
    }

    /// Open a lobby listing stream for a visitor.
    ///
    /// The mailbox is seeded with the current listing so the subscriber
    /// renders immediately, before any occupancy change.
    pub async fn open_lobby_stream(self: Arc<Self>, user: &UserId) -> Subscription {
        let listing = self.registry.listing().await;
        let mailbox = self
            .hub
            .register(Scope::Lobby, user, Update::Listing(Arc::new(listing)))
            .await;
        info!(user = %user, "lobby stream opened");
        Subscription::new(self, Scope::Lobby, user.clone(), mailbox)
    }

    /// Open an arena stream for a visitor.
    ///
    /// A visitor arriving without a seat (a reconnect after refresh or
    /// a dropped transport) is re-joined first, with the full broadcast
    /// semantics of a join. The mailbox is seeded with a full re-render
    /// marker.
    ///
    /// # Errors
    ///
    /// [`ArenaError::ChannelUnknown`] when the channel is not
    /// registered, or [`ArenaError::ArenaFull`] when a re-join finds no
    /// vacant seat.
    pub async fn open_arena_stream(
        self: Arc<Self>,
        user: &UserId,
        channel: &ChannelId,
    ) -> Result<Subscription, ArenaError> {
        let seated = self
            .registry
            .with_arena(channel, |arena| arena.contains_user(user))
            .await?;

        if !seated {
            let rejoined = self
                .registry
                .with_arena_mut(channel, |arena| arena.join(user, &mut rand::rng()))
                .await?;
            match rejoined {
                Ok(seat) => {
                    info!(user = %user, channel = %channel, seat = %seat, "visitor re-joined arena");
                    self.broadcast_arena(channel).await;
                    self.broadcast_listing().await;
                }
                Err(err) => {
                    warn!(user = %user, channel = %channel, error = %err, "re-join failed");
                    return Err(err);
                }
            }
        }

        let scope = Scope::Arena(channel.clone());
        let mailbox = self.hub.register(scope.clone(), user, Update::Arena).await;
        info!(user = %user, channel = %channel, "arena stream opened");
        Ok(Subscription::new(self, scope, user.clone(), mailbox))
    }

    /// Push a full re-render marker to an arena's subscribers.
    async fn broadcast_arena(&self, channel: &ChannelId) {
        let scope = Scope::Arena(channel.clone());
        let delivered = self.hub.publish(&scope, &Update::Arena).await;
        debug!(scope = %scope, delivered, "arena broadcast");
    }

    /// Render the lobby listing once and push it to lobby subscribers.
    async fn broadcast_listing(&self) {
        let listing = self.registry.listing().await;
        let delivered = self
            .hub
            .publish(&Scope::Lobby, &Update::Listing(Arc::new(listing)))
            .await;
        debug!(delivered, "lobby listing broadcast");
    }

    /// Tear down a finished stream.
    ///
    /// Unregisters the mailbox (token-gated) and, for an arena stream
    /// that was still the live registration, vacates the visitor's seat
    /// and re-broadcasts the arena and the lobby. Safe to call any
    /// number of times; only the first effective call observes state.
    async fn finish_stream(&self, scope: Scope, user: UserId, token: MailboxId) {
        let owned = self.hub.unregister(&scope, &user, token).await;
        if !owned {
            // A newer stream replaced this registration and owns the
            // seat lifecycle now.
            debug!(scope = %scope, user = %user, "stream finished after replacement");
            return;
        }
        info!(scope = %scope, user = %user, "stream closed");

        let Scope::Arena(channel) = scope else {
            return;
        };
        let left = self
            .registry
            .with_arena_mut(&channel, |arena| arena.leave(&user))
            .await
            .unwrap_or(false);
        if left {
            info!(user = %user, channel = %channel, "visitor left arena on disconnect");
            self.broadcast_arena(&channel).await;
            self.broadcast_listing().await;
        }
    }
}

/// A live stream subscription: mailbox plus guaranteed cleanup.
///
/// Receive updates with [`Subscription::recv`]; the stream ends
/// (`None`) when a newer registration replaces this one. Dropping the
/// subscription -- on any exit path, including task cancellation --
/// runs the release exactly once.
pub struct Subscription {
    mailbox: Mailbox,
    cleanup: Option<StreamCleanup>,
}

impl Subscription {
    fn new(service: Arc<VenueService>, scope: Scope, user: UserId, mailbox: Mailbox) -> Self {
        let token = mailbox.id();
        Self {
            mailbox,
            cleanup: Some(StreamCleanup {
                service,
                scope,
                user,
                token,
            }),
        }
    }

    /// Wait for the next update; `None` once the registration is gone.
    pub async fn recv(&mut self) -> Option<Update> {
        self.mailbox.recv().await
    }

    /// Release the subscription now, awaiting the cleanup.
    pub async fn release(mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup.run().await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(cleanup) = self.cleanup.take() else {
            return;
        };
        // Cleanup is async; hand it to the runtime. When no runtime is
        // left (process teardown) the in-memory state dies with it.
        if let Ok(handle) = Handle::try_current() {
            handle.spawn(cleanup.run());
        }
    }
}

struct StreamCleanup {
    service: Arc<VenueService>,
    scope: Scope,
    user: UserId,
    token: MailboxId,
}

impl StreamCleanup {
    async fn run(self) {
        self.service
            .finish_stream(self.scope, self.user, self.token)
            .await;
    }
}
