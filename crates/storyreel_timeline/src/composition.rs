// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline composition: flattening a footage list into one contiguous,
//! seekable stream.
//!
//! [`compose`] is a pure function of the footage list. Recomposition after
//! an edit recomputes the whole timeline from a consistent snapshot, so it
//! can run on a background task without locking the list; callers guard
//! against stale results with a generation counter (engine layer).

use crate::footage::{Footage, FootageId};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;

/// One footage's contiguous span within the composed timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Footage this segment plays
    pub footage_id: FootageId,
    /// Start on the global timeline (inclusive)
    pub global_start: Duration,
    /// End on the global timeline (exclusive)
    pub global_end: Duration,
    /// Range within the source media that this segment plays
    pub source_range: Range<Duration>,
}

/// The flattened representation of a scene's footages, ready for playback.
///
/// Segments are contiguous and non-overlapping by construction, ordered by
/// `global_start`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedTimeline {
    /// Sum of all segment durations
    pub total_duration: Duration,
    /// Segments in timeline order
    pub segments: Vec<Segment>,
}

impl ComposedTimeline {
    /// Whether any media is present.
    ///
    /// An empty timeline is a state ("no media"), not an error.
    pub fn has_media(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Map a global time to `(footage, local source time)`.
    ///
    /// Binary search over the segments; `None` for times at or past the
    /// end (and for an empty timeline).
    pub fn global_to_source(&self, time: Duration) -> Option<(FootageId, Duration)> {
        let segment = self.segment_at(time)?;
        let local = segment.source_range.start + (time - segment.global_start);
        Some((segment.footage_id, local))
    }

    /// Segment containing a global time
    pub fn segment_at(&self, time: Duration) -> Option<&Segment> {
        if time >= self.total_duration {
            return None;
        }
        // Segments are contiguous, so the last segment starting at or
        // before `time` contains it.
        let idx = self
            .segments
            .partition_point(|s| s.global_start <= time)
            .checked_sub(1)?;
        Some(&self.segments[idx])
    }

    /// Clamp a playhead into `[0, total_duration)`.
    ///
    /// Used when an edit shortens the timeline underneath the playhead; a
    /// playhead past the new end lands just inside it. An empty timeline
    /// clamps to zero.
    pub fn clamp_playhead(&self, time: Duration) -> Duration {
        if time < self.total_duration {
            time
        } else {
            self.total_duration.saturating_sub(Duration::from_nanos(1))
        }
    }
}

/// Compose a footage list into one continuous timeline.
///
/// Prefix-sum over the visible durations in list order; each segment plays
/// `[left_mark, left_mark + duration)` of its source. Pure and idempotent:
/// unchanged input yields an identical timeline.
pub fn compose(footages: &[Footage]) -> ComposedTimeline {
    compose_partial(footages, || true).expect("composition without cancellation cannot be abandoned")
}

/// [`compose`], abandonable between segments.
///
/// `keep_going` is consulted once per segment; returning `false` abandons
/// the build and yields `None`. Background recomposition uses this to drop
/// in-flight work the moment a newer edit supersedes it.
pub fn compose_partial(
    footages: &[Footage],
    mut keep_going: impl FnMut() -> bool,
) -> Option<ComposedTimeline> {
    let mut segments = Vec::with_capacity(footages.len());
    let mut cursor = Duration::ZERO;

    for footage in footages {
        if !keep_going() {
            return None;
        }
        let global_start = cursor;
        let global_end = cursor + footage.duration;
        segments.push(Segment {
            footage_id: footage.id,
            global_start,
            global_end,
            source_range: footage.left_mark..footage.right_mark(),
        });
        cursor = global_end;
    }

    Some(ComposedTimeline {
        total_duration: cursor,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footage::MediaAssetRef;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn clip(name: &str, len: u64) -> Footage {
        Footage::video(MediaAssetRef::video(name, secs(len)), secs(len))
    }

    #[test]
    fn test_compose_round_trip() {
        let footages = vec![clip("f1", 2), clip("f2", 3)];
        let timeline = compose(&footages);

        assert_eq!(timeline.total_duration, secs(5));
        assert_eq!(timeline.segments[0].global_start, secs(0));
        assert_eq!(timeline.segments[0].global_end, secs(2));
        assert_eq!(timeline.segments[1].global_start, secs(2));
        assert_eq!(timeline.segments[1].global_end, secs(5));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let footages = vec![clip("f1", 2), clip("f2", 3)];
        assert_eq!(compose(&footages), compose(&footages));
    }

    #[test]
    fn test_empty_list_is_no_media() {
        let timeline = compose(&[]);
        assert_eq!(timeline.total_duration, Duration::ZERO);
        assert!(!timeline.has_media());
        assert_eq!(timeline.global_to_source(Duration::ZERO), None);
    }

    #[test]
    fn test_trim_shifts_source_range() {
        let mut first = clip("f1", 10);
        first.trim(secs(2), secs(4)).unwrap();
        let timeline = compose(&[first.clone(), clip("f2", 3)]);

        assert_eq!(timeline.total_duration, secs(7));
        assert_eq!(timeline.segments[0].source_range, secs(2)..secs(6));
        assert_eq!(timeline.segments[1].global_start, secs(4));
    }

    #[test]
    fn test_global_to_source_mapping() {
        let mut first = clip("f1", 10);
        first.trim(secs(2), secs(4)).unwrap();
        let second = clip("f2", 3);
        let timeline = compose(&[first.clone(), second.clone()]);

        // Inside the first, trimmed clip: local = left_mark + offset
        assert_eq!(
            timeline.global_to_source(secs(1)),
            Some((first.id, secs(3)))
        );
        // Segment boundary belongs to the following clip
        assert_eq!(
            timeline.global_to_source(secs(4)),
            Some((second.id, secs(0)))
        );
        // At or past the end maps to nothing
        assert_eq!(timeline.global_to_source(secs(7)), None);
    }

    #[test]
    fn test_compose_partial_abandons() {
        let footages = vec![clip("f1", 2), clip("f2", 3), clip("f3", 4)];
        let mut fuel = 2;
        let abandoned = compose_partial(&footages, || {
            fuel -= 1;
            fuel >= 0
        });
        assert_eq!(abandoned, None);
    }

    #[test]
    fn test_clamp_playhead() {
        let timeline = compose(&[clip("f1", 4)]);
        assert_eq!(timeline.clamp_playhead(Duration::from_millis(1500)), Duration::from_millis(1500));
        assert!(timeline.clamp_playhead(secs(9)) < secs(4));

        let empty = compose(&[]);
        assert_eq!(empty.clamp_playhead(secs(9)), Duration::ZERO);
    }
}
