// SPDX-License-Identifier: MIT OR Apache-2.0
//! Authoring facade: graph edits paired with change notification and
//! fire-and-forget persistence.
//!
//! Editing surfaces call through here so every mutation lands in one place
//! that (a) keeps the graph invariants via [`StoryGraph`], (b) publishes a
//! typed [`ChangeEvent`] for other surfaces, and (c) hands the touched
//! bundles to the store without waiting on the write.

use crate::bundle::{GameBundle, SceneBundle};
use crate::events::{ChangeEvent, ChangeSender};
use crate::store::{BundleStore, StoreError};
use std::sync::Arc;
use storyreel_graph::{Condition, GraphError, SceneIndex, StoryGraph};

/// Authoring session over one work
pub struct Editor {
    game: GameBundle,
    store: Arc<dyn BundleStore>,
    events: ChangeSender,
}

impl Editor {
    /// Open an editor over a loaded game bundle
    pub fn new(game: GameBundle, store: Arc<dyn BundleStore>, events: ChangeSender) -> Self {
        Self {
            game,
            store,
            events,
        }
    }

    /// The work being edited
    pub fn game(&self) -> &GameBundle {
        &self.game
    }

    /// The authored graph
    pub fn graph(&self) -> &StoryGraph {
        &self.game.graph
    }

    /// Add a scene at a canvas position, creating and persisting its empty
    /// scene bundle
    pub fn add_scene(&mut self, position: [f32; 2]) -> SceneIndex {
        let index = self.game.graph.add_scene(position);
        if let Some(scene) = self.game.graph.find_scene(index) {
            self.store
                .save_scene(SceneBundle::new(scene.id, self.game.id));
        }
        self.events.emit(ChangeEvent::SceneAdded(index));
        self.save_game();
        index
    }

    /// Delete a scene; incident transitions go with it, and the scene's
    /// bundle is removed from the store
    pub fn delete_scene(&mut self, index: SceneIndex) -> Result<(), GraphError> {
        let scene = self.game.graph.delete_scene(index)?;
        self.store.delete_scene(scene.id, self.game.id);
        self.events.emit(ChangeEvent::SceneRemoved {
            index,
            id: scene.id,
        });
        self.save_game();
        Ok(())
    }

    /// Set or clear a scene's title
    pub fn rename_scene(
        &mut self,
        index: SceneIndex,
        title: Option<String>,
    ) -> Result<(), GraphError> {
        self.game.graph.set_scene_title(index, title)?;
        if let Some(scene) = self.game.graph.find_scene(index) {
            self.events.emit(ChangeEvent::SceneTitleChanged(scene.id));
        }
        self.save_game();
        Ok(())
    }

    /// Connect two scenes with a guarded transition
    pub fn connect(
        &mut self,
        from: SceneIndex,
        to: SceneIndex,
        conditions: Vec<Condition>,
    ) -> Result<(), GraphError> {
        self.game.graph.add_transition(from, to, conditions)?;
        self.events.emit(ChangeEvent::TransitionAdded { from, to });
        self.save_game();
        Ok(())
    }

    /// Remove the transition between two scenes
    pub fn disconnect(&mut self, from: SceneIndex, to: SceneIndex) -> Result<(), GraphError> {
        self.game.graph.delete_transition(from, to)?;
        self.events.emit(ChangeEvent::TransitionRemoved { from, to });
        self.save_game();
        Ok(())
    }

    /// Scenes not yet reachable from `from`, offered as connect targets
    pub fn connectable_targets(&self, from: SceneIndex) -> Vec<SceneIndex> {
        let connected = self.game.graph.connected_targets(from);
        self.game
            .graph
            .scenes()
            .map(|s| s.index)
            .filter(|&index| index != from && !connected.contains(&index))
            .collect()
    }

    /// Load a scene's bundle from the store
    pub fn open_scene(&self, index: SceneIndex) -> Result<SceneBundle, StoreError> {
        let scene = self
            .game
            .graph
            .find_scene(index)
            .ok_or_else(|| StoreError::NotFound(format!("scene index {index}")))?;
        self.store.load_scene(scene.id, self.game.id)
    }

    /// Persist a scene bundle after media/node edits; fire-and-forget
    pub fn commit_scene(&self, bundle: &SceneBundle) {
        self.events
            .emit(ChangeEvent::CompositionInvalidated(bundle.scene_id));
        self.store.save_scene(bundle.clone());
    }

    fn save_game(&self) {
        self.store.save_game(self.game.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::change_channel;
    use crate::store::MemoryStore;

    fn editor() -> (Editor, crate::events::ChangeReceiver, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let (tx, rx) = change_channel();
        let editor = Editor::new(GameBundle::new("Test"), store.clone(), tx);
        (editor, rx, store)
    }

    #[test]
    fn test_add_scene_persists_graph_and_bundle() {
        let (mut editor, mut events, store) = editor();
        let index = editor.add_scene([0.0, 0.0]);

        assert_eq!(store.scene_count(), 1);
        assert!(editor.open_scene(index).is_ok());
        let loaded = store.load_game(editor.game().id).unwrap();
        assert_eq!(loaded.graph.scene_count(), 1);
        assert!(events.drain().contains(&ChangeEvent::SceneAdded(index)));
    }

    #[test]
    fn test_delete_scene_cascades_to_store() {
        let (mut editor, mut events, store) = editor();
        let a = editor.add_scene([0.0, 0.0]);
        let b = editor.add_scene([100.0, 0.0]);
        editor.connect(a, b, vec![]).unwrap();
        events.drain();

        editor.delete_scene(b).unwrap();

        assert_eq!(store.scene_count(), 1);
        assert_eq!(editor.graph().transition_count(), 0);
        assert!(editor.open_scene(b).is_err());
        let drained = events.drain();
        assert!(drained
            .iter()
            .any(|e| matches!(e, ChangeEvent::SceneRemoved { index, .. } if *index == b)));
    }

    #[test]
    fn test_connect_rejects_duplicates() {
        let (mut editor, _events, _store) = editor();
        let a = editor.add_scene([0.0, 0.0]);
        let b = editor.add_scene([100.0, 0.0]);

        editor.connect(a, b, vec![]).unwrap();
        assert_eq!(
            editor.connect(a, b, vec![]).unwrap_err(),
            GraphError::DuplicateTransition { from: a, to: b }
        );
    }

    #[test]
    fn test_connectable_targets_filters_connected() {
        let (mut editor, _events, _store) = editor();
        let a = editor.add_scene([0.0, 0.0]);
        let b = editor.add_scene([100.0, 0.0]);
        let c = editor.add_scene([200.0, 0.0]);

        editor.connect(a, b, vec![]).unwrap();
        assert_eq!(editor.connectable_targets(a), vec![c]);
    }

    #[test]
    fn test_rename_emits_title_change() {
        let (mut editor, mut events, _store) = editor();
        let a = editor.add_scene([0.0, 0.0]);
        events.drain();

        editor.rename_scene(a, Some("Opening".into())).unwrap();
        let id = editor.graph().find_scene(a).unwrap().id;
        assert!(events.drain().contains(&ChangeEvent::SceneTitleChanged(id)));
    }

    #[test]
    fn test_commit_scene_round_trips_media() {
        let (mut editor, _events, _store) = editor();
        let a = editor.add_scene([0.0, 0.0]);

        let mut scene = editor.open_scene(a).unwrap();
        scene
            .import_image(
                storyreel_timeline::MediaAssetRef::image("asset://still"),
                std::time::Duration::from_secs(3),
            )
            .unwrap();
        editor.commit_scene(&scene);

        let reloaded = editor.open_scene(a).unwrap();
        assert_eq!(reloaded.footages.len(), 1);
    }
}
