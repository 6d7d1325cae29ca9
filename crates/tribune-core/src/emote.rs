//! Time-windowed emote retention and combo scaling.
//!
//! Emotes are ephemeral: an entry lives in an arena's log for
//! [`EMOTE_RETENTION_SECS`] seconds and is then dropped. Repetition within
//! the trailing [`COMBO_WINDOW_SECS`]-second window inflates the display
//! scale of that (sender, kind) pair: each duplicate adds
//! [`COMBO_SCALE_STEP`], capped at [`COMBO_SCALE_MAX`].
//!
//! Everything here is a pure function of a log slice and an explicit
//! `now`; nothing reads the clock. The scale map is recomputed on every
//! render pass and never stored as a source of truth.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use tribune_types::{EmoteKind, UserId};

/// Seconds an emote entry stays in the log before pruning.
pub const EMOTE_RETENTION_SECS: i64 = 10;

/// Trailing window, in seconds, over which repetition is counted.
pub const COMBO_WINDOW_SECS: i64 = 2;

/// Scale added per duplicate inside the combo window.
pub const COMBO_SCALE_STEP: f32 = 0.1;

/// Upper bound on the computed scale.
pub const COMBO_SCALE_MAX: f32 = 5.0;

/// One entry in an arena's emote log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoteEntry {
    /// The seated visitor who sent it.
    pub user: UserId,
    /// Which emote asset was sent.
    pub kind: EmoteKind,
    /// When it was sent.
    pub sent_at: DateTime<Utc>,
}

/// Drop every entry older than the retention threshold.
pub fn retain_recent(entries: &mut Vec<EmoteEntry>, now: DateTime<Utc>) {
    let cutoff = now - Duration::seconds(EMOTE_RETENTION_SECS);
    entries.retain(|entry| entry.sent_at >= cutoff);
}

/// Whether an entry is still within the retention threshold.
pub fn is_retained(entry: &EmoteEntry, now: DateTime<Utc>) -> bool {
    entry.sent_at >= now - Duration::seconds(EMOTE_RETENTION_SECS)
}

/// Display scale for a repetition count inside the combo window.
fn scale_for(count: u32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let duplicates = count.saturating_sub(1) as f32;
    COMBO_SCALE_STEP.mul_add(duplicates, 1.0).min(COMBO_SCALE_MAX)
}

/// Compute the scale map over the trailing combo window.
///
/// Groups entries whose timestamp falls within [`COMBO_WINDOW_SECS`] of
/// `now` by (sender, kind). Pairs with no in-window entry get no map
/// entry; callers treat a missing key as scale 1.0.
pub fn combo_scales(
    entries: &[EmoteEntry],
    now: DateTime<Utc>,
) -> BTreeMap<(UserId, EmoteKind), f32> {
    let window_start = now - Duration::seconds(COMBO_WINDOW_SECS);

    let mut counts: BTreeMap<(UserId, EmoteKind), u32> = BTreeMap::new();
    for entry in entries {
        if entry.sent_at >= window_start {
            let key = (entry.user.clone(), entry.kind);
            let slot = counts.entry(key).or_insert(0);
            *slot = slot.saturating_add(1);
        }
    }

    counts
        .into_iter()
        .map(|(key, count)| (key, scale_for(count)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn entry(user: &str, kind: u8, at: DateTime<Utc>) -> EmoteEntry {
        EmoteEntry {
            user: UserId::from(user),
            kind: EmoteKind::new(kind),
            sent_at: at,
        }
    }

    fn scale_of(
        scales: &BTreeMap<(UserId, EmoteKind), f32>,
        user: &str,
        kind: u8,
    ) -> Option<f32> {
        scales.get(&(UserId::from(user), EmoteKind::new(kind))).copied()
    }

    #[test]
    fn five_duplicates_in_window_scale_to_1_4() {
        let now = Utc::now();
        let entries: Vec<EmoteEntry> =
            (0..5).map(|_| entry("u", 2, now - Duration::milliseconds(500))).collect();

        let scales = combo_scales(&entries, now);
        let scale = scale_of(&scales, "u", 2).unwrap();
        assert!((scale - 1.4).abs() < 1e-6, "got {scale}");
    }

    #[test]
    fn sixth_duplicate_raises_scale_to_1_5() {
        let now = Utc::now();
        let entries: Vec<EmoteEntry> =
            (0..6).map(|_| entry("u", 2, now - Duration::milliseconds(500))).collect();

        let scales = combo_scales(&entries, now);
        let scale = scale_of(&scales, "u", 2).unwrap();
        assert!((scale - 1.5).abs() < 1e-6, "got {scale}");
    }

    #[test]
    fn window_trails_from_now_not_from_first_occurrence() {
        let now = Utc::now();
        // One duplicate 3 s old, one fresh: only the fresh one counts.
        let entries = vec![
            entry("u", 2, now - Duration::seconds(3)),
            entry("u", 2, now),
        ];

        let scales = combo_scales(&entries, now);
        assert_eq!(scale_of(&scales, "u", 2), Some(1.0));
    }

    #[test]
    fn pairs_outside_window_get_no_entry() {
        let now = Utc::now();
        let entries = vec![entry("u", 2, now - Duration::seconds(3))];

        let scales = combo_scales(&entries, now);
        assert!(scales.is_empty());
    }

    #[test]
    fn groups_are_keyed_by_sender_and_kind() {
        let now = Utc::now();
        let entries = vec![
            entry("a", 1, now),
            entry("a", 1, now),
            entry("a", 2, now),
            entry("b", 1, now),
        ];

        let scales = combo_scales(&entries, now);
        assert!((scale_of(&scales, "a", 1).unwrap() - 1.1).abs() < 1e-6);
        assert_eq!(scale_of(&scales, "a", 2), Some(1.0));
        assert_eq!(scale_of(&scales, "b", 1), Some(1.0));
    }

    #[test]
    fn scale_caps_at_maximum() {
        let now = Utc::now();
        let entries: Vec<EmoteEntry> = (0..100).map(|_| entry("u", 0, now)).collect();

        let scales = combo_scales(&entries, now);
        assert_eq!(scale_of(&scales, "u", 0), Some(COMBO_SCALE_MAX));
    }

    #[test]
    fn retention_drops_entries_older_than_ten_seconds() {
        let now = Utc::now();
        let mut entries = vec![
            entry("u", 0, now - Duration::seconds(11)),
            entry("u", 1, now - Duration::seconds(9)),
        ];

        retain_recent(&mut entries, now);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.first().unwrap().kind, EmoteKind::new(1));
    }
}
