//! Keystroke handling for destination autocomplete: a trailing-edge
//! debouncer and a sequencer that only lets the newest response through.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Each call to [`Debouncer::settle`] supersedes the pending one. A value
/// comes back only if no newer call arrived during the quiet period.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    generation: AtomicU64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.quiet).await;
        (self.generation.load(Ordering::SeqCst) == mine).then_some(value)
    }
}

/// Tags outgoing requests and drops any response that is not for the most
/// recently issued one.
#[derive(Debug, Default)]
pub struct QuerySequencer {
    latest: AtomicU64,
    shown: Mutex<u64>,
}

impl QuerySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether the response to request `seq` may be displayed.
    pub fn accept(&self, seq: u64) -> bool {
        let mut shown = self.shown.lock();
        if seq != self.latest.load(Ordering::SeqCst) || seq <= *shown {
            return false;
        }
        *shown = seq;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_settle_once() {
        let debouncer = Arc::new(Debouncer::default());
        let mut handles = Vec::new();
        for query in ["a", "ag", "agr", "agra"] {
            let debouncer = debouncer.clone();
            handles.push(tokio::spawn(async move { debouncer.settle(query).await }));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let mut settled = Vec::new();
        for handle in handles {
            if let Some(q) = handle.await.unwrap() {
                settled.push(q);
            }
        }
        assert_eq!(settled, vec!["agra"]);
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_longer_than_quiet_period_each_settle() {
        let debouncer = Debouncer::default();
        assert_eq!(debouncer.settle("ag").await, Some("ag"));
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(debouncer.settle("agra").await, Some("agra"));
    }

    #[test]
    fn stale_responses_are_discarded() {
        let seq = QuerySequencer::new();
        let first = seq.issue();
        let second = seq.issue();

        // the newer response arrives first, then the stale one
        assert!(seq.accept(second));
        assert!(!seq.accept(first));
        assert!(!seq.accept(second));
    }

    #[test]
    fn response_superseded_before_arrival_is_discarded() {
        let seq = QuerySequencer::new();
        let first = seq.issue();
        let _second = seq.issue();
        assert!(!seq.accept(first));
    }
}
