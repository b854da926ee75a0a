// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed change notifications between editing surfaces and playback.
//!
//! Replaces implicit shared-state signaling with an explicit queue: every
//! mutation of interest is published as a [`ChangeEvent`], consumed once by
//! whoever drains the receiver, then gone.

use storyreel_graph::{SceneId, SceneIndex};
use tokio::sync::mpsc;

/// A change another surface may need to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A scene was added to the graph
    SceneAdded(SceneIndex),
    /// A scene and its incident transitions were removed
    SceneRemoved {
        /// Stable index of the removed scene
        index: SceneIndex,
        /// UUID keying the removed scene's bundle
        id: SceneId,
    },
    /// A scene's title changed
    SceneTitleChanged(SceneId),
    /// A transition was added
    TransitionAdded {
        /// Source scene index
        from: SceneIndex,
        /// Target scene index
        to: SceneIndex,
    },
    /// A transition was removed
    TransitionRemoved {
        /// Source scene index
        from: SceneIndex,
        /// Target scene index
        to: SceneIndex,
    },
    /// A scene's footage list changed; derived artifacts are stale
    CompositionInvalidated(SceneId),
    /// Playback finished the current scene's timeline
    PlaybackEnded(SceneIndex),
    /// A satisfied transition moved the selection; the host should load the
    /// target scene's bundle and re-enter playback
    SceneChangeRequested {
        /// Scene playback ended on
        from: SceneIndex,
        /// Scene to load next
        to: SceneIndex,
    },
}

/// Sending half of the change queue
#[derive(Debug, Clone)]
pub struct ChangeSender {
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl ChangeSender {
    /// Publish an event. A missing consumer is not an error; the queue is
    /// advisory.
    pub fn emit(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }
}

/// Receiving half of the change queue
#[derive(Debug)]
pub struct ChangeReceiver {
    rx: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl ChangeReceiver {
    /// Take every pending event, clearing the queue
    pub fn drain(&mut self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Create a connected change queue
pub fn change_channel() -> (ChangeSender, ChangeReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChangeSender { tx }, ChangeReceiver { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_consumed_once() {
        let (tx, mut rx) = change_channel();
        tx.emit(ChangeEvent::SceneAdded(SceneIndex(1)));
        tx.emit(ChangeEvent::SceneTitleChanged(SceneId::new()));

        assert_eq!(rx.drain().len(), 2);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_emit_without_consumer_is_fine() {
        let (tx, rx) = change_channel();
        drop(rx);
        tx.emit(ChangeEvent::SceneAdded(SceneIndex(1)));
    }
}
