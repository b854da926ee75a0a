// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback synchronizer.
//!
//! Ties the moving playback clock to the three things that depend on it:
//! the set of currently active interactive nodes, the sensor state that
//! node interactions and clock edges write into, and graph resolution on
//! scene end. Resolution is O(outgoing transitions x conditions) and runs
//! synchronously on the ended edge; nothing here blocks clock advancement.

use crate::bundle::{GameBundle, SceneBundle};
use crate::events::{ChangeEvent, ChangeSender};
use crate::media::RenderSink;
use std::time::Duration;
use storyreel_graph::{RuntimeState, Sensor, SensorKey, Value};
use storyreel_timeline::{
    ActiveNodeSet, ComposedTimeline, CompositionError, FootageId, NodeId, Transport,
    TransportEvent,
};
use uuid::Uuid;

/// What to do when a scene ends with no satisfied transition.
///
/// The source leaves this to the embedding app, so it is configuration
/// here rather than a fixed behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndPolicy {
    /// Stay on the ended frame until the host intervenes
    #[default]
    Halt,
    /// Restart the scene from zero
    Loop,
}

/// Playback configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerConfig {
    /// Behavior on scene end without a satisfied transition
    pub end_policy: EndPolicy,
}

/// Identity of the scene currently loaded for playback, kept for sensor
/// scope cleanup when leaving it
struct LoadedScene {
    scene_uuid: Uuid,
    node_uuids: Vec<Uuid>,
}

/// The playback synchronizer.
///
/// Owns the transport, the runtime sensor state and the active-node set;
/// borrows the bundles per call so editing surfaces and the host keep
/// ownership of the persisted state.
pub struct Player {
    transport: Transport,
    runtime: RuntimeState,
    active: ActiveNodeSet,
    composition: ComposedTimeline,
    loaded: Option<LoadedScene>,
    events: ChangeSender,
    config: PlayerConfig,
}

impl Player {
    /// Create a player publishing to the given change queue
    pub fn new(events: ChangeSender, config: PlayerConfig) -> Self {
        Self {
            transport: Transport::new(),
            runtime: RuntimeState::new(),
            active: ActiveNodeSet::new(),
            composition: ComposedTimeline::default(),
            loaded: None,
            events,
            config,
        }
    }

    /// Load a scene for playback.
    ///
    /// Composes the scene's timeline, restores its playhead (clamped into
    /// the composed duration), clears sensor state scoped to the previous
    /// scene and hands the new composition to the render collaborator.
    pub fn enter_scene(&mut self, scene: &SceneBundle, sink: &mut dyn RenderSink) {
        if let Some(previous) = self.loaded.take() {
            self.runtime
                .clear_scene_scope(previous.scene_uuid, &previous.node_uuids);
        }
        // A leftover end signal must not fire the next scene's guards
        self.runtime.remove(&Sensor::game(SensorKey::TimeControl));

        self.composition = scene.compose();
        let at = self.composition.clamp_playhead(scene.current_time);
        self.transport = Transport::new();
        self.transport.seek(at);
        self.active.update(&scene.nodes, at);
        self.loaded = Some(LoadedScene {
            scene_uuid: scene.scene_id.0,
            node_uuids: scene.node_uuids(),
        });
        sink.reload(&self.composition, at);
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        self.transport.play();
    }

    /// Pause, keeping the position
    pub fn pause(&mut self) {
        self.transport.pause();
    }

    /// Stop and rewind to zero
    pub fn stop(&mut self, sink: &mut dyn RenderSink) {
        self.transport.stop();
        sink.seek(Duration::ZERO);
    }

    /// Seek to a position, clamped into the composed duration
    pub fn seek(&mut self, to: Duration, scene: &mut SceneBundle, sink: &mut dyn RenderSink) {
        let at = self.composition.clamp_playhead(to);
        self.transport.seek(at);
        scene.current_time = at;
        self.active.update(&scene.nodes, at);
        sink.seek(at);
    }

    /// Advance the clock by `delta` and synchronize everything hanging off
    /// it.
    ///
    /// On the ended edge: writes `TimeControl = "end"` into the game scope,
    /// resolves the graph, and either requests a scene change (publishing
    /// [`ChangeEvent::SceneChangeRequested`]; the host loads the target
    /// bundle and calls [`Player::enter_scene`]) or applies the configured
    /// end policy.
    pub fn tick(
        &mut self,
        delta: Duration,
        game: &mut GameBundle,
        scene: &mut SceneBundle,
        sink: &mut dyn RenderSink,
    ) {
        let ended = self
            .transport
            .advance(delta, self.composition.total_duration);

        if ended == Some(TransportEvent::Ended) {
            self.on_scene_ended(game, sink);
        }

        scene.current_time = self.transport.time;
        self.active.update(&scene.nodes, self.transport.time);
    }

    fn on_scene_ended(&mut self, game: &mut GameBundle, sink: &mut dyn RenderSink) {
        let Some(current) = game.graph.selected_scene() else {
            debug_assert!(false, "playback ended with no selected scene");
            return;
        };

        self.runtime
            .set(Sensor::game(SensorKey::TimeControl), "end");
        self.events.emit(ChangeEvent::PlaybackEnded(current));

        match game.graph.resolve_transition(current, &self.runtime) {
            Some(next) => {
                // resolve_transition only yields existing scenes
                if game.graph.select_scene(next).is_ok() {
                    self.events.emit(ChangeEvent::SceneChangeRequested {
                        from: current,
                        to: next,
                    });
                }
            }
            None => match self.config.end_policy {
                EndPolicy::Loop => {
                    self.transport.play();
                    sink.seek(Duration::ZERO);
                }
                EndPolicy::Halt => {}
            },
        }
    }

    /// Report a user interaction with a node.
    ///
    /// Applies the node's rule, writing its value into the node-scoped
    /// sensor, but only while the node is actually active. Returns whether
    /// anything was written.
    pub fn record_interaction(&mut self, scene: &SceneBundle, node_id: NodeId) -> bool {
        if !self.active.contains(node_id) {
            return false;
        }
        let Some(node) = scene.node(node_id) else {
            return false;
        };
        let Some(rule) = &node.rule else {
            return false;
        };
        self.runtime.set(
            Sensor::node(node.id.0, rule.key.clone()),
            rule.value.clone(),
        );
        true
    }

    /// Write an arbitrary sensor value (host-driven signals)
    pub fn set_sensor(&mut self, sensor: Sensor, value: impl Into<Value>) {
        self.runtime.set(sensor, value);
    }

    /// Re-trim a clip of the currently loaded scene.
    ///
    /// The composed timeline is recomputed, the playhead is remapped into
    /// the new duration, and the render collaborator reloads, so the
    /// current time is neither dropped nor left pointing past the end.
    pub fn trim_footage(
        &mut self,
        scene: &mut SceneBundle,
        id: FootageId,
        left_mark: Duration,
        duration: Duration,
        sink: &mut dyn RenderSink,
    ) -> Result<(), CompositionError> {
        scene.trim_footage(id, left_mark, duration)?;

        self.composition = scene.compose();
        let at = self.composition.clamp_playhead(self.transport.time);
        self.transport.seek(at);
        scene.current_time = at;
        self.active.update(&scene.nodes, at);
        self.events
            .emit(ChangeEvent::CompositionInvalidated(scene.scene_id));
        sink.reload(&self.composition, at);
        Ok(())
    }

    /// The current composed timeline
    pub fn composition(&self) -> &ComposedTimeline {
        &self.composition
    }

    /// The playback transport
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Runtime sensor state
    pub fn runtime(&self) -> &RuntimeState {
        &self.runtime
    }

    /// Node IDs active at the current playhead
    pub fn active_nodes(&self) -> &[NodeId] {
        self.active.ids()
    }
}
