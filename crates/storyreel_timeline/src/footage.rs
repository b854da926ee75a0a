// SPDX-License-Identifier: MIT OR Apache-2.0
//! Footage: one trimmed media clip on a scene's timeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Shortest duration a clip may be trimmed to
pub const MIN_FOOTAGE_DURATION: Duration = Duration::from_millis(100);

/// Unique identifier for a footage entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FootageId(pub Uuid);

impl FootageId {
    /// Create a new random footage ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FootageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque handle to a media asset plus its intrinsic duration.
///
/// Resolution to decodable bytes is the asset source collaborator's job;
/// the engine only carries the handle around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAssetRef {
    /// Collaborator-interpreted locator (library identifier, path, ...)
    pub handle: String,
    /// Intrinsic duration; `None` for still images
    pub intrinsic_duration: Option<Duration>,
}

impl MediaAssetRef {
    /// Reference a video asset with a known intrinsic duration
    pub fn video(handle: impl Into<String>, intrinsic_duration: Duration) -> Self {
        Self {
            handle: handle.into(),
            intrinsic_duration: Some(intrinsic_duration),
        }
    }

    /// Reference a still image asset
    pub fn image(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            intrinsic_duration: None,
        }
    }
}

/// Kind of media behind a footage entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FootageKind {
    /// Still image shown for a chosen duration
    Image,
    /// Video clip trimmed out of its source
    Video,
}

/// One trimmed clip contributing a contiguous segment to the composed
/// timeline.
///
/// Ordering in the owning list defines timeline order; the engine never
/// reorders footage itself. Invariants: `left_mark + duration <=
/// max_duration` for video; images have `left_mark == 0` and no upper
/// bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footage {
    /// Unique footage ID
    pub id: FootageId,
    /// Media kind
    pub kind: FootageKind,
    /// Asset behind this clip
    pub source: MediaAssetRef,
    /// Trim-in point within the source
    pub left_mark: Duration,
    /// Visible duration on the timeline
    pub duration: Duration,
    /// Upper bound for `left_mark + duration` (source length for video,
    /// effectively unbounded for images)
    pub max_duration: Duration,
}

impl Footage {
    /// Create video footage spanning its whole source
    pub fn video(source: MediaAssetRef, source_duration: Duration) -> Self {
        Self {
            id: FootageId::new(),
            kind: FootageKind::Video,
            source,
            left_mark: Duration::ZERO,
            duration: source_duration,
            max_duration: source_duration,
        }
    }

    /// Create image footage shown for `duration`
    pub fn image(source: MediaAssetRef, duration: Duration) -> Self {
        Self {
            id: FootageId::new(),
            kind: FootageKind::Image,
            source,
            left_mark: Duration::ZERO,
            duration,
            max_duration: Duration::MAX,
        }
    }

    /// Re-trim this clip.
    ///
    /// Validation happens here, at the edit boundary, never inside
    /// composition: trims below [`MIN_FOOTAGE_DURATION`] and trims past the
    /// source bounds are rejected and leave the clip untouched.
    pub fn trim(&mut self, left_mark: Duration, duration: Duration) -> Result<(), CompositionError> {
        if duration < MIN_FOOTAGE_DURATION {
            return Err(CompositionError::TrimTooShort {
                requested: duration,
                minimum: MIN_FOOTAGE_DURATION,
            });
        }
        match self.kind {
            FootageKind::Video => {
                let end = left_mark
                    .checked_add(duration)
                    .ok_or(CompositionError::TrimOutOfBounds {
                        left_mark,
                        duration,
                        max_duration: self.max_duration,
                    })?;
                if end > self.max_duration {
                    return Err(CompositionError::TrimOutOfBounds {
                        left_mark,
                        duration,
                        max_duration: self.max_duration,
                    });
                }
            }
            FootageKind::Image => {
                // Images have no scrub region; only the shown duration moves
                if !left_mark.is_zero() {
                    return Err(CompositionError::TrimOutOfBounds {
                        left_mark,
                        duration,
                        max_duration: self.max_duration,
                    });
                }
            }
        }
        self.left_mark = left_mark;
        self.duration = duration;
        Ok(())
    }

    /// Trim-out point within the source
    pub fn right_mark(&self) -> Duration {
        self.left_mark + self.duration
    }
}

/// Error raised by footage edits and media-requiring operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    /// An operation that needs media ran against an empty footage list
    #[error("Scene has no media")]
    NoMedia,

    /// Requested trim is below the minimum clip duration
    #[error("Trim of {requested:?} is below the minimum clip duration {minimum:?}")]
    TrimTooShort {
        /// Requested visible duration
        requested: Duration,
        /// Enforced lower bound
        minimum: Duration,
    },

    /// Requested trim exceeds the source bounds
    #[error("Trim {left_mark:?}+{duration:?} exceeds the source bound {max_duration:?}")]
    TrimOutOfBounds {
        /// Requested trim-in point
        left_mark: Duration,
        /// Requested visible duration
        duration: Duration,
        /// Source upper bound
        max_duration: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(secs: u64) -> Footage {
        Footage::video(
            MediaAssetRef::video("asset://clip", Duration::from_secs(secs)),
            Duration::from_secs(secs),
        )
    }

    #[test]
    fn test_trim_within_bounds() {
        let mut footage = clip(10);
        footage
            .trim(Duration::from_secs(2), Duration::from_secs(5))
            .unwrap();
        assert_eq!(footage.left_mark, Duration::from_secs(2));
        assert_eq!(footage.right_mark(), Duration::from_secs(7));
    }

    #[test]
    fn test_trim_below_minimum_rejected() {
        let mut footage = clip(10);
        let err = footage
            .trim(Duration::ZERO, Duration::from_millis(50))
            .unwrap_err();
        assert!(matches!(err, CompositionError::TrimTooShort { .. }));
        // The clip is untouched
        assert_eq!(footage.duration, Duration::from_secs(10));
    }

    #[test]
    fn test_trim_past_source_rejected() {
        let mut footage = clip(10);
        let err = footage
            .trim(Duration::from_secs(8), Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, CompositionError::TrimOutOfBounds { .. }));
        assert_eq!(footage.left_mark, Duration::ZERO);
    }

    #[test]
    fn test_image_duration_is_unbounded() {
        let mut footage = Footage::image(MediaAssetRef::image("asset://still"), Duration::from_secs(3));
        footage
            .trim(Duration::ZERO, Duration::from_secs(3600))
            .unwrap();
        assert_eq!(footage.duration, Duration::from_secs(3600));
    }

    #[test]
    fn test_serialization() {
        let mut footage = clip(10);
        footage
            .trim(Duration::from_secs(2), Duration::from_secs(5))
            .unwrap();

        let ron_str =
            ron::ser::to_string_pretty(&footage, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: Footage = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, footage);
    }

    #[test]
    fn test_image_left_mark_rejected() {
        let mut footage = Footage::image(MediaAssetRef::image("asset://still"), Duration::from_secs(3));
        let err = footage
            .trim(Duration::from_secs(1), Duration::from_secs(3))
            .unwrap_err();
        assert!(matches!(err, CompositionError::TrimOutOfBounds { .. }));
    }
}
