//! Opaque identifier newtypes used across the Tribune workspace.
//!
//! Visitor and channel identifiers originate outside the core: the session
//! layer mints visitor ids, and channel ids are the names of external
//! live-video channels. The core never parses or generates either -- the
//! newtypes exist so the compiler prevents accidental mixing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_str_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an externally supplied identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

define_str_id! {
    /// Opaque per-session visitor identifier.
    ///
    /// Minted by the session layer before a request ever reaches the core.
    /// The core treats it as an opaque key and never inspects its contents.
    UserId
}

define_str_id! {
    /// External live-video channel name; the unique, immutable arena key.
    ChannelId
}

/// Index into the emote asset set.
///
/// The boundary validates that the index falls inside the configured asset
/// range; the core treats any value as an opaque kind and must not fail on
/// one that slips through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct EmoteKind(pub u8);

impl EmoteKind {
    /// Wrap an emote asset index.
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Return the raw asset index.
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for EmoteKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_round_trips_through_display() {
        let id = UserId::new("Maude Lebowski");
        assert_eq!(id.to_string(), "Maude Lebowski");
        assert_eq!(id.as_str(), "Maude Lebowski");
    }

    #[test]
    fn channel_ids_compare_by_content() {
        assert_eq!(ChannelId::from("otplol_"), ChannelId::new("otplol_"));
        assert_ne!(ChannelId::from("otplol_"), ChannelId::from("other"));
    }

    #[test]
    fn emote_kind_is_opaque() {
        // Out-of-range values are representable; rejection is the
        // boundary's job, not the type's.
        let kind = EmoteKind::new(200);
        assert_eq!(kind.index(), 200);
    }
}
