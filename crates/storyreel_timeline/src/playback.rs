// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback clock state machine.
//!
//! The clock itself is advanced externally (the render/decode collaborator
//! reports decoded-frame time); [`Transport`] only keeps the state machine
//! and the current position honest.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Stopped at zero
    #[default]
    Stopped,
    /// Playing forward
    Playing,
    /// Paused at the current position
    Paused,
    /// Reached the end of the composed timeline
    Ended,
}

/// Edge event reported by [`Transport::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// The playhead reached the end of the timeline this tick
    Ended,
}

/// Playback transport: position plus the
/// `Stopped -> Playing -> Paused -> ... -> Ended -> Stopped` state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transport {
    /// Current playhead position
    pub time: Duration,
    /// Current state
    pub state: PlaybackState,
}

impl Transport {
    /// Create a stopped transport at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or resume playback. From `Ended` this restarts at zero.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Ended {
            self.time = Duration::ZERO;
        }
        self.state = PlaybackState::Playing;
    }

    /// Pause playback, keeping the position
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop and reset to zero
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = Duration::ZERO;
    }

    /// Seek to a position. Does not change the state.
    pub fn seek(&mut self, time: Duration) {
        self.time = time;
    }

    /// Advance the clock by `delta` against a timeline of `total` length.
    ///
    /// Reaching the end clamps the position, moves to `Ended` and reports
    /// [`TransportEvent::Ended`] exactly once per run-through. A zero-length
    /// timeline never ends (no media, nothing to play).
    pub fn advance(&mut self, delta: Duration, total: Duration) -> Option<TransportEvent> {
        if self.state != PlaybackState::Playing || total.is_zero() {
            return None;
        }
        self.time = self.time.saturating_add(delta);
        if self.time >= total {
            self.time = total;
            self.state = PlaybackState::Ended;
            return Some(TransportEvent::Ended);
        }
        None
    }

    /// Whether the transport is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_state_machine() {
        let mut transport = Transport::new();
        assert_eq!(transport.state, PlaybackState::Stopped);

        transport.play();
        assert_eq!(transport.state, PlaybackState::Playing);

        transport.pause();
        assert_eq!(transport.state, PlaybackState::Paused);

        transport.play();
        assert_eq!(transport.state, PlaybackState::Playing);

        transport.advance(secs(10), secs(5));
        assert_eq!(transport.state, PlaybackState::Ended);

        transport.stop();
        assert_eq!(transport.state, PlaybackState::Stopped);
        assert_eq!(transport.time, Duration::ZERO);
    }

    #[test]
    fn test_ended_fires_once() {
        let mut transport = Transport::new();
        transport.play();

        assert_eq!(transport.advance(secs(3), secs(5)), None);
        assert_eq!(
            transport.advance(secs(3), secs(5)),
            Some(TransportEvent::Ended)
        );
        assert_eq!(transport.time, secs(5));
        // Ended: no further ticks, no second event
        assert_eq!(transport.advance(secs(3), secs(5)), None);
    }

    #[test]
    fn test_play_from_ended_restarts_at_zero() {
        let mut transport = Transport::new();
        transport.play();
        transport.advance(secs(9), secs(5));
        assert_eq!(transport.state, PlaybackState::Ended);

        transport.play();
        assert_eq!(transport.time, Duration::ZERO);
        assert!(transport.is_playing());
    }

    #[test]
    fn test_pause_only_from_playing() {
        let mut transport = Transport::new();
        transport.pause();
        assert_eq!(transport.state, PlaybackState::Stopped);
    }

    #[test]
    fn test_empty_timeline_never_ends() {
        let mut transport = Transport::new();
        transport.play();
        assert_eq!(transport.advance(secs(1), Duration::ZERO), None);
        assert!(transport.is_playing());
    }
}
