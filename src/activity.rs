// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-flight operation tracking for a debounced busy indicator.
//!
//! `ActivityTracker` counts outstanding store operations application wide.
//! The indicator only starts once operations have been outstanding for the
//! latency threshold, so fast operations never make it flicker, and it
//! completes as soon as every tracked operation has finished.
//!
//! ```text
//! Idle --begin--> PendingStart --threshold elapsed--> Active
//!   ^                  |                                 |
//!   +---- all done ----+------------- all done ----------+
//! ```

use crate::config::Config;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// UI hook driven by the tracker.
pub trait BusyIndicator: Send + Sync {
    fn start(&self);
    fn complete(&self);
}

/// Indicator that only logs transitions.
#[derive(Debug, Default)]
pub struct LogIndicator;

impl BusyIndicator for LogIndicator {
    fn start(&self) {
        debug!("store busy");
    }

    fn complete(&self) {
        debug!("store idle");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PendingStart,
    Active,
}

struct TrackerState {
    requests: u64,
    completed: u64,
    phase: Phase,
    timer: Option<JoinHandle<()>>,
    /// Bumped on every reset so a stale timer cannot start the indicator.
    generation: u64,
}

struct Inner {
    threshold: Duration,
    indicator: Arc<dyn BusyIndicator>,
    state: Mutex<TrackerState>,
}

#[derive(Clone)]
pub struct ActivityTracker {
    inner: Arc<Inner>,
}

impl ActivityTracker {
    pub fn new(threshold: Duration, indicator: Arc<dyn BusyIndicator>) -> Self {
        Self {
            inner: Arc::new(Inner {
                threshold,
                indicator,
                state: Mutex::new(TrackerState {
                    requests: 0,
                    completed: 0,
                    phase: Phase::Idle,
                    timer: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Tracker using the configured latency threshold.
    pub fn from_config(config: &Config, indicator: Arc<dyn BusyIndicator>) -> Self {
        Self::new(config.busy_threshold(), indicator)
    }

    /// Record the start of an operation. It completes when the guard drops.
    ///
    /// The start delay runs on the current Tokio runtime; outside of one the
    /// operation is still counted but the indicator never starts.
    pub fn begin(&self) -> ActivityGuard {
        let mut state = self.lock();
        state.requests += 1;

        if state.phase == Phase::Idle {
            state.phase = Phase::PendingStart;
            let generation = state.generation;
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let tracker = self.clone();
                    let threshold = self.inner.threshold;
                    state.timer = Some(handle.spawn(async move {
                        tokio::time::sleep(threshold).await;
                        tracker.fire(generation);
                    }));
                }
                Err(_) => debug!("no runtime, busy indicator disabled for this batch"),
            }
        }

        ActivityGuard {
            tracker: self.clone(),
        }
    }

    pub fn in_flight(&self) -> u64 {
        let state = self.lock();
        state.requests - state.completed
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    fn fire(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation != generation || state.phase != Phase::PendingStart {
            return;
        }
        state.timer = None;
        if state.requests == state.completed {
            return;
        }
        state.phase = Phase::Active;
        drop(state);
        self.inner.indicator.start();
    }

    fn finish(&self) {
        let mut state = self.lock();
        state.completed += 1;
        if state.completed < state.requests {
            return;
        }

        let was_active = state.phase == Phase::Active;
        state.requests = 0;
        state.completed = 0;
        state.phase = Phase::Idle;
        state.generation = state.generation.wrapping_add(1);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        drop(state);

        if was_active {
            self.inner.indicator.complete();
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Marks one tracked operation as in flight until dropped.
pub struct ActivityGuard {
    tracker: ActivityTracker,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        starts: AtomicUsize,
        completes: AtomicUsize,
    }

    impl BusyIndicator for Counting {
        fn start(&self) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn complete(&self) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn tracker() -> (ActivityTracker, Arc<Counting>) {
        let indicator = Arc::new(Counting::default());
        let tracker = ActivityTracker::new(Duration::from_millis(100), indicator.clone());
        (tracker, indicator)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_operation_never_starts_indicator() {
        let (tracker, indicator) = tracker();

        let guard = tracker.begin();
        assert_eq!(tracker.phase(), Phase::PendingStart);
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(guard);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(indicator.starts.load(Ordering::SeqCst), 0);
        assert_eq!(indicator.completes.load(Ordering::SeqCst), 0);
        assert_eq!(tracker.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_operation_starts_then_completes() {
        let (tracker, indicator) = tracker();

        let guard = tracker.begin();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(tracker.phase(), Phase::Active);
        assert_eq!(indicator.starts.load(Ordering::SeqCst), 1);

        drop(guard);
        assert_eq!(tracker.phase(), Phase::Idle);
        assert_eq!(tracker.in_flight(), 0);
        assert_eq!(indicator.completes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_operations_share_one_cycle() {
        let (tracker, indicator) = tracker();

        let first = tracker.begin();
        let second = tracker.begin();
        assert_eq!(tracker.in_flight(), 2);

        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(first);
        assert_eq!(tracker.phase(), Phase::Active);
        assert_eq!(indicator.completes.load(Ordering::SeqCst), 0);

        let third = tracker.begin();
        drop(second);
        drop(third);

        assert_eq!(indicator.starts.load(Ordering::SeqCst), 1);
        assert_eq!(indicator.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_batch_rearms_timer() {
        let (tracker, indicator) = tracker();

        drop(tracker.begin());
        let guard = tracker.begin();
        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(guard);

        assert_eq!(indicator.starts.load(Ordering::SeqCst), 1);
        assert_eq!(indicator.completes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_threshold_from_config() {
        let indicator = Arc::new(Counting::default());
        let config = Config {
            busy_threshold_ms: 500,
            ..Config::default()
        };
        let tracker = ActivityTracker::from_config(&config, indicator.clone());

        let guard = tracker.begin();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(tracker.phase(), Phase::PendingStart);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(tracker.phase(), Phase::Active);
        drop(guard);
        assert_eq!(indicator.completes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_counts_without_runtime() {
        let (tracker, indicator) = tracker();
        let guard = tracker.begin();
        assert_eq!(tracker.in_flight(), 1);
        drop(guard);
        assert_eq!(tracker.in_flight(), 0);
        assert_eq!(tracker.phase(), Phase::Idle);
        assert_eq!(indicator.starts.load(Ordering::SeqCst), 0);
    }
}
