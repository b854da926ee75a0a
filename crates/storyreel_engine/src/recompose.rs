// SPDX-License-Identifier: MIT OR Apache-2.0
//! Background timeline recomposition with stale-write protection.
//!
//! Composition is a pure function of the footage list, so it can run off
//! the foreground thread from a snapshot. Rapid successive edits can leave
//! multiple recompositions in flight and completing out of order; every
//! request therefore carries the generation it was captured at, and a
//! result is applied only while its generation is still the newest. The
//! previously applied composition stays authoritative until then.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use storyreel_timeline::{compose_partial, ComposedTimeline, Footage};
use tokio::sync::mpsc;

/// Snapshot of the footage list at one edit generation
struct RecomposeRequest {
    generation: u64,
    footages: Vec<Footage>,
}

/// A finished composition, tagged with the generation it was built from
struct RecomposeOutcome {
    generation: u64,
    timeline: ComposedTimeline,
}

/// Background recomposition service.
///
/// [`Recomposer::invalidate`] captures the current footage list and bumps
/// the generation; [`Recomposer::poll`] drains finished work and applies
/// the newest still-valid result. Requests superseded before or during
/// their build are abandoned on the worker.
pub struct Recomposer {
    latest: Arc<AtomicU64>,
    request_tx: mpsc::UnboundedSender<RecomposeRequest>,
    result_rx: mpsc::UnboundedReceiver<RecomposeOutcome>,
    current: ComposedTimeline,
    applied_generation: u64,
}

impl Recomposer {
    /// Create the service and spawn its worker thread
    pub fn new() -> Self {
        let latest = Arc::new(AtomicU64::new(0));
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        let worker_latest = Arc::clone(&latest);
        std::thread::spawn(move || {
            recompose_worker(request_rx, result_tx, worker_latest);
        });

        Self {
            latest,
            request_tx,
            result_rx,
            current: ComposedTimeline::default(),
            applied_generation: 0,
        }
    }

    /// Record an edit: bump the generation and queue a recomposition from a
    /// snapshot of the footage list. Returns the new generation.
    pub fn invalidate(&mut self, footages: &[Footage]) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.request_tx.send(RecomposeRequest {
            generation,
            footages: footages.to_vec(),
        });
        generation
    }

    /// Drain finished recompositions, applying the newest valid one.
    ///
    /// Returns the freshly applied composition, or `None` when nothing new
    /// was applied this poll.
    pub fn poll(&mut self) -> Option<&ComposedTimeline> {
        let mut applied = false;
        while let Ok(outcome) = self.result_rx.try_recv() {
            applied |= self.apply(outcome);
        }
        applied.then_some(&self.current)
    }

    /// The last applied composition; authoritative until a newer
    /// generation-checked result replaces it
    pub fn current(&self) -> &ComposedTimeline {
        &self.current
    }

    /// Newest edit generation handed out
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    fn apply(&mut self, outcome: RecomposeOutcome) -> bool {
        let latest = self.latest.load(Ordering::SeqCst);
        if outcome.generation != latest || outcome.generation <= self.applied_generation {
            tracing::debug!(
                generation = outcome.generation,
                latest,
                "Discarding stale recomposition result"
            );
            return false;
        }
        self.current = outcome.timeline;
        self.applied_generation = outcome.generation;
        true
    }

    #[cfg(test)]
    fn inject_outcome(&mut self, generation: u64, timeline: ComposedTimeline) -> bool {
        self.apply(RecomposeOutcome {
            generation,
            timeline,
        })
    }
}

impl Default for Recomposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker loop: build compositions from snapshots, skipping and abandoning
/// superseded requests
fn recompose_worker(
    mut request_rx: mpsc::UnboundedReceiver<RecomposeRequest>,
    result_tx: mpsc::UnboundedSender<RecomposeOutcome>,
    latest: Arc<AtomicU64>,
) {
    while let Some(request) = request_rx.blocking_recv() {
        let generation = request.generation;
        if latest.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Skipping superseded recomposition request");
            continue;
        }
        // Re-checked between segments so in-flight work dies with its edit
        let built = compose_partial(&request.footages, || {
            latest.load(Ordering::SeqCst) == generation
        });
        let Some(timeline) = built else {
            tracing::debug!(generation, "Abandoned recomposition mid-build");
            continue;
        };
        if result_tx
            .send(RecomposeOutcome {
                generation,
                timeline,
            })
            .is_err()
        {
            break; // Channel closed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use storyreel_timeline::{compose, MediaAssetRef};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("storyreel_engine=debug")
            .try_init();
    }

    fn clip(name: &str, secs: u64) -> Footage {
        Footage::video(
            MediaAssetRef::video(name, Duration::from_secs(secs)),
            Duration::from_secs(secs),
        )
    }

    #[test]
    fn test_stale_result_cannot_overwrite_newer_edit() {
        init_tracing();
        let mut recomposer = Recomposer::new();
        let first = vec![clip("a", 2)];
        let second = vec![clip("a", 2), clip("b", 3)];

        // R1 captured at generation 1, then an edit bumps to generation 2
        recomposer.invalidate(&first);
        recomposer.invalidate(&second);

        // R1 completing late must be discarded...
        assert!(!recomposer.inject_outcome(1, compose(&first)));
        assert_eq!(recomposer.current(), &ComposedTimeline::default());

        // ...and R2 still lands
        assert!(recomposer.inject_outcome(2, compose(&second)));
        assert_eq!(recomposer.current().total_duration, Duration::from_secs(5));
    }

    #[test]
    fn test_previous_composition_stays_authoritative() {
        init_tracing();
        let mut recomposer = Recomposer::new();
        let first = vec![clip("a", 2)];
        recomposer.invalidate(&first);
        recomposer.inject_outcome(1, compose(&first));
        assert_eq!(recomposer.current().total_duration, Duration::from_secs(2));

        // A new invalidation alone does not disturb the applied composition
        recomposer.invalidate(&[clip("a", 2), clip("b", 3)]);
        assert_eq!(recomposer.current().total_duration, Duration::from_secs(2));
    }

    #[test]
    fn test_background_worker_round_trip() {
        init_tracing();
        let mut recomposer = Recomposer::new();
        let footages = vec![clip("a", 2), clip("b", 3)];
        recomposer.invalidate(&footages);

        // The worker races the assertions; poll with a bounded wait
        let mut applied = false;
        for _ in 0..200 {
            if recomposer.poll().is_some() {
                applied = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(applied, "worker never delivered a composition");
        assert_eq!(recomposer.current(), &compose(&footages));
        assert_eq!(recomposer.generation(), 1);
    }
}
