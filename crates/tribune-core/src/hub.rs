//! Per-(scope, visitor) mailbox registry for push delivery.
//!
//! Every open client stream owns exactly one [`Mailbox`]: an unbounded
//! single-consumer queue of [`Update`]s for one broadcast [`Scope`].
//! Publishing enqueues without ever waiting on a consumer, so a stalled
//! stream can delay only itself.
//!
//! Registration is keyed by (scope, visitor): registering again replaces
//! the previous mailbox, whose sender is dropped and whose consumer then
//! sees end-of-stream. Each registration carries a unique [`MailboxId`]
//! token, and [`ConnectionHub::unregister`] removes an entry only when
//! the token still matches the live registration. That gate is what
//! keeps a replaced stream's cleanup from tearing down the registration
//! (and seat) its successor now owns.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use tribune_types::{ChannelId, EmoteOverlayView, ListingView, UserId};

/// A broadcast domain: the lobby, or one arena's channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scope {
    /// The lobby listing stream.
    Lobby,
    /// One arena's stream, keyed by channel id.
    Arena(ChannelId),
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Lobby => f.write_str("lobby"),
            Self::Arena(channel) => write!(f, "arena:{channel}"),
        }
    }
}

/// One message in a mailbox.
///
/// Full arena re-renders are deliberately payload-free: the view is
/// recipient-specific (own-seat flag, embed origin), so each delivery
/// loop renders it fresh at forwarding time. Listing and overlay
/// payloads are recipient-independent, rendered once and shared.
#[derive(Debug, Clone)]
pub enum Update {
    /// The lobby listing changed; the shared re-render is attached.
    Listing(Arc<ListingView>),
    /// The arena's seat grid changed; render per recipient on delivery.
    Arena,
    /// The arena's emote overlay changed; the shared re-render is
    /// attached.
    Emotes(Arc<EmoteOverlayView>),
}

/// Token identifying one mailbox registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailboxId(uuid::Uuid);

impl MailboxId {
    fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

/// The consumer half of a registration.
#[derive(Debug)]
pub struct Mailbox {
    id: MailboxId,
    updates: mpsc::UnboundedReceiver<Update>,
}

impl Mailbox {
    /// The registration token, needed to unregister safely.
    pub const fn id(&self) -> MailboxId {
        self.id
    }

    /// Wait for the next update.
    ///
    /// Returns [`None`] once the registration is gone -- either this
    /// mailbox was replaced by a newer one for the same (scope, visitor)
    /// or it was unregistered.
    pub async fn recv(&mut self) -> Option<Update> {
        self.updates.recv().await
    }
}

struct Entry {
    id: MailboxId,
    tx: mpsc::UnboundedSender<Update>,
}

/// Registry of live mailboxes, keyed by (scope, visitor).
#[derive(Default)]
pub struct ConnectionHub {
    entries: RwLock<BTreeMap<(Scope, UserId), Entry>>,
}

impl ConnectionHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a mailbox for (scope, visitor), seeded with a first update.
    ///
    /// Any previous mailbox under the same key is replaced; its consumer
    /// observes end-of-stream on the next receive.
    pub async fn register(&self, scope: Scope, user: &UserId, first: Update) -> Mailbox {
        let (tx, updates) = mpsc::unbounded_channel();
        let id = MailboxId::new();
        // The receiver is in hand; this first send cannot fail.
        let _ = tx.send(first);

        let replaced = {
            let mut entries = self.entries.write().await;
            entries
                .insert((scope.clone(), user.clone()), Entry { id, tx })
                .is_some()
        };
        debug!(scope = %scope, user = %user, replaced, "mailbox registered");

        Mailbox { id, updates }
    }

    /// Remove the registration if `token` still owns it.
    ///
    /// Idempotent and safe on absent entries. Returns whether the entry
    /// was removed, i.e. whether the caller was still the live
    /// registration.
    pub async fn unregister(&self, scope: &Scope, user: &UserId, token: MailboxId) -> bool {
        let mut entries = self.entries.write().await;
        let key = (scope.clone(), user.clone());
        match entries.get(&key) {
            Some(entry) if entry.id == token => {
                entries.remove(&key);
                debug!(scope = %scope, user = %user, "mailbox unregistered");
                true
            }
            _ => false,
        }
    }

    /// Enqueue an update into every mailbox under `scope`.
    ///
    /// Never waits on a consumer. Returns the number of mailboxes the
    /// update was enqueued into.
    pub async fn publish(&self, scope: &Scope, update: &Update) -> usize {
        let entries = self.entries.read().await;
        let mut delivered = 0_usize;
        for ((entry_scope, _), entry) in entries.iter() {
            if entry_scope == scope && entry.tx.send(update.clone()).is_ok() {
                delivered = delivered.saturating_add(1);
            }
        }
        delivered
    }

    /// Number of live registrations under a scope.
    pub async fn subscriber_count(&self, scope: &Scope) -> usize {
        let entries = self.entries.read().await;
        entries.keys().filter(|(s, _)| s == scope).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserId {
        UserId::from(name)
    }

    fn listing_update() -> Update {
        Update::Listing(Arc::new(ListingView { rows: Vec::new() }))
    }

    #[tokio::test]
    async fn publish_reaches_every_mailbox_in_scope() {
        let hub = ConnectionHub::new();
        let mut a = hub.register(Scope::Lobby, &user("a"), listing_update()).await;
        let mut b = hub.register(Scope::Lobby, &user("b"), listing_update()).await;
        let mut other = hub
            .register(
                Scope::Arena(ChannelId::from("x")),
                &user("c"),
                Update::Arena,
            )
            .await;

        // Drain the seeds.
        a.recv().await.unwrap();
        b.recv().await.unwrap();
        other.recv().await.unwrap();

        let delivered = hub.publish(&Scope::Lobby, &listing_update()).await;
        assert_eq!(delivered, 2);
        assert!(matches!(a.recv().await, Some(Update::Listing(_))));
        assert!(matches!(b.recv().await, Some(Update::Listing(_))));
    }

    #[tokio::test]
    async fn registering_again_replaces_and_closes_the_old_mailbox() {
        let hub = ConnectionHub::new();
        let mut old = hub.register(Scope::Lobby, &user("a"), listing_update()).await;
        old.recv().await.unwrap();

        let mut new = hub.register(Scope::Lobby, &user("a"), listing_update()).await;

        assert!(old.recv().await.is_none(), "replaced mailbox must close");
        assert_eq!(hub.subscriber_count(&Scope::Lobby).await, 1);
        assert!(new.recv().await.is_some());
    }

    #[tokio::test]
    async fn unregister_is_idempotent_and_token_gated() {
        let hub = ConnectionHub::new();
        let old = hub.register(Scope::Lobby, &user("a"), listing_update()).await;
        let new = hub.register(Scope::Lobby, &user("a"), listing_update()).await;

        // The replaced stream's token no longer owns the entry.
        assert!(!hub.unregister(&Scope::Lobby, &user("a"), old.id()).await);
        assert_eq!(hub.subscriber_count(&Scope::Lobby).await, 1);

        assert!(hub.unregister(&Scope::Lobby, &user("a"), new.id()).await);
        // Second call: already gone, still fine.
        assert!(!hub.unregister(&Scope::Lobby, &user("a"), new.id()).await);
        assert_eq!(hub.subscriber_count(&Scope::Lobby).await, 0);
    }

    #[tokio::test]
    async fn publish_never_blocks_on_a_slow_consumer() {
        let hub = ConnectionHub::new();
        let mut lazy = hub.register(Scope::Lobby, &user("lazy"), listing_update()).await;

        // Nobody is draining; a burst of publishes must still complete.
        for _ in 0..1000 {
            hub.publish(&Scope::Lobby, &listing_update()).await;
        }

        // Everything is queued, in order, including the seed.
        for _ in 0..1001 {
            assert!(lazy.recv().await.is_some());
        }
    }
}
