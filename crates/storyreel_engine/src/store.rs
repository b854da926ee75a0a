// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persistence collaborator contract.
//!
//! The engine never blocks on save completion: saves take an owned bundle
//! and return nothing, so an implementation is free to queue the write and
//! report failures through its own logging. Last-write-wins; the engine's
//! single-writer discipline keeps writes ordered.

use crate::bundle::{GameBundle, GameId, SceneBundle};
use parking_lot::RwLock;
use std::collections::HashMap;
use storyreel_graph::SceneId;

/// Persistence collaborator for game and scene bundles
pub trait BundleStore: Send + Sync {
    /// Load a work's graph bundle
    fn load_game(&self, id: GameId) -> Result<GameBundle, StoreError>;

    /// Persist a work's graph bundle; fire-and-forget
    fn save_game(&self, bundle: GameBundle);

    /// Load one scene's media bundle
    fn load_scene(&self, scene: SceneId, game: GameId) -> Result<SceneBundle, StoreError>;

    /// Persist one scene's media bundle; fire-and-forget
    fn save_scene(&self, bundle: SceneBundle);

    /// Remove one scene's media bundle, as part of scene deletion
    fn delete_scene(&self, scene: SceneId, game: GameId);
}

/// Error loading a bundle
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// No bundle stored under this key
    #[error("Bundle not found: {0}")]
    NotFound(String),

    /// Stored bytes did not parse as a bundle
    #[error("Bundle is corrupt: {0}")]
    Corrupt(String),
}

/// In-memory store keeping bundles in their RON wire form.
///
/// Serializing through the real format keeps the reference implementation
/// honest about what survives persistence; used by tests and headless
/// sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: RwLock<HashMap<GameId, String>>,
    scenes: RwLock<HashMap<(GameId, SceneId), String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scene bundles currently stored
    pub fn scene_count(&self) -> usize {
        self.scenes.read().len()
    }
}

impl BundleStore for MemoryStore {
    fn load_game(&self, id: GameId) -> Result<GameBundle, StoreError> {
        let games = self.games.read();
        let text = games
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(format!("game {:?}", id.0)))?;
        GameBundle::from_ron(text).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    fn save_game(&self, bundle: GameBundle) {
        match bundle.to_ron() {
            Ok(text) => {
                self.games.write().insert(bundle.id, text);
            }
            Err(e) => tracing::warn!("Failed to serialize game bundle: {e}"),
        }
    }

    fn load_scene(&self, scene: SceneId, game: GameId) -> Result<SceneBundle, StoreError> {
        let scenes = self.scenes.read();
        let text = scenes
            .get(&(game, scene))
            .ok_or_else(|| StoreError::NotFound(format!("scene {:?}", scene.0)))?;
        SceneBundle::from_ron(text).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    fn save_scene(&self, bundle: SceneBundle) {
        match bundle.to_ron() {
            Ok(text) => {
                self.scenes
                    .write()
                    .insert((bundle.game_id, bundle.scene_id), text);
            }
            Err(e) => tracing::warn!("Failed to serialize scene bundle: {e}"),
        }
    }

    fn delete_scene(&self, scene: SceneId, game: GameId) {
        self.scenes.write().remove(&(game, scene));
    }
}
