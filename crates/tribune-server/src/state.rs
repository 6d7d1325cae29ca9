//! Shared application state for the Tribune server.
//!
//! [`AppState`] wires the core [`VenueService`] to the Axum handlers,
//! alongside the boundary-only settings (the emote asset range). It is
//! built once at startup from an [`AppConfig`] and passed to components
//! explicitly; nothing in the process is a global.

use std::sync::Arc;

use tribune_core::{Arena, ArenaError, ArenaRegistry, VenueService};
use tribune_types::{ChannelId, GridShape};

use crate::config::AppConfig;

/// Process-wide state shared by every handler.
pub struct AppState {
    /// The concurrent state-and-broadcast engine.
    pub service: Arc<VenueService>,
    /// Number of emote assets; kinds outside `0..emote_kinds` are
    /// rejected at this boundary.
    pub emote_kinds: u8,
}

impl AppState {
    /// Build the registry and service from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ChannelDuplicate`] when two configured
    /// arenas share a channel id.
    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>, ArenaError> {
        let arenas = config.arenas.iter().map(|arena| {
            Arena::new(
                ChannelId::from(arena.channel.as_str()),
                arena.name.as_str(),
                GridShape::new(arena.tiers, arena.seats_per_tier),
            )
        });
        let registry = ArenaRegistry::new(arenas)?;

        Ok(Arc::new(Self {
            service: VenueService::new(registry),
            emote_kinds: config.emotes.kinds,
        }))
    }
}
