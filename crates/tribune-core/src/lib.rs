//! Arena state, emote scaling, and the broadcast engine for Tribune.
//!
//! This crate is the concurrent core of the venue server: it owns every
//! seat assignment, the per-arena emote logs, and the per-connection
//! mailboxes that carry re-render notifications out to the transport
//! layer. Everything observable by a visitor flows through here; the
//! surrounding HTTP/WebSocket plumbing in `tribune-server` is a thin
//! adapter over this crate's operations.
//!
//! # Modules
//!
//! - [`arena`] -- One venue: the seat grid, its occupants, and the emote
//!   log, with pure render projections.
//! - [`emote`] -- Time-windowed emote retention and combo scaling.
//! - [`error`] -- [`ArenaError`], the failure taxonomy for every state
//!   mutation. All failures are local and leave state untouched.
//! - [`hub`] -- [`ConnectionHub`], the per-(scope, visitor) mailbox
//!   registry used for push delivery.
//! - [`registry`] -- [`ArenaRegistry`], the fixed arena set with
//!   per-arena locking and cross-arena seat exclusivity.
//! - [`service`] -- [`VenueService`], which fuses state mutation with
//!   broadcast decisions and hands out stream [`Subscription`]s.
//!
//! [`ArenaError`]: error::ArenaError
//! [`ConnectionHub`]: hub::ConnectionHub
//! [`ArenaRegistry`]: registry::ArenaRegistry
//! [`VenueService`]: service::VenueService
//! [`Subscription`]: service::Subscription

pub mod arena;
pub mod emote;
pub mod error;
pub mod hub;
pub mod registry;
pub mod service;

// Re-export primary types at crate root.
pub use arena::Arena;
pub use emote::{COMBO_WINDOW_SECS, EMOTE_RETENTION_SECS, EmoteEntry};
pub use error::ArenaError;
pub use hub::{ConnectionHub, Mailbox, MailboxId, Scope, Update};
pub use registry::ArenaRegistry;
pub use service::{Subscription, VenueService};
