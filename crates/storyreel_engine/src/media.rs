// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contracts with the excluded render and asset collaborators.
//!
//! The engine never decodes or draws. It hands a [`ComposedTimeline`] to a
//! [`RenderSink`] and treats the sink as the source of the playback clock;
//! it asks an [`AssetSource`] for media durations when clips are imported.

use std::time::Duration;
use storyreel_timeline::{ComposedTimeline, MediaAssetRef};

/// What the asset source learned about a media asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedMedia {
    /// Intrinsic duration; `None` for still images
    pub duration: Option<Duration>,
}

/// Resolves a [`MediaAssetRef`] to playable media metadata.
///
/// Used by footage import to learn the trim bound (`max_duration`); byte
/// access stays entirely on the collaborator's side.
pub trait AssetSource {
    /// Probe an asset for its metadata
    fn probe(&self, asset: &MediaAssetRef) -> Result<ProbedMedia, AssetError>;
}

/// Render/decode collaborator contract.
///
/// Given a composed timeline the collaborator produces a playable handle
/// internally; the engine only ever tells it to reload or seek.
pub trait RenderSink {
    /// Replace the playable composition, positioned at `at`
    fn reload(&mut self, timeline: &ComposedTimeline, at: Duration);

    /// Seek the current composition to `at`
    fn seek(&mut self, at: Duration);
}

/// Error from the asset source collaborator
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Asset exists but has no playable duration
    #[error("Asset has no playable duration: {0}")]
    NoDuration(String),
}

/// Asset source that trusts the reference's own metadata.
///
/// Stands in when no platform media library is attached (tests, headless
/// authoring).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAssetSource;

impl AssetSource for NullAssetSource {
    fn probe(&self, asset: &MediaAssetRef) -> Result<ProbedMedia, AssetError> {
        Ok(ProbedMedia {
            duration: asset.intrinsic_duration,
        })
    }
}
