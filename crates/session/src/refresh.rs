//! Single-flight guard for session refresh.
//!
//! Many in-flight requests can hit a 401 at the same moment when the
//! session token expires. All of them must share one refresh call: the
//! first caller becomes the leader and performs the refresh, later
//! arrivals await the same outcome. The in-flight slot is cleared when
//! the refresh settles, including when the leader is cancelled.

use std::future::Future;
use std::sync::Mutex;

use tokio::sync::watch;

/// Terminal outcome of one refresh attempt, shared with all waiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Succeeded,
    Failed,
}

type Slot = Mutex<Option<watch::Receiver<Option<RefreshOutcome>>>>;

#[derive(Debug, Default)]
pub struct SingleFlight {
    in_flight: Slot,
}

enum Entry {
    Leader(watch::Sender<Option<RefreshOutcome>>),
    Follower(watch::Receiver<Option<RefreshOutcome>>),
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `refresh` unless one is already in flight, in which case await
    /// the in-flight outcome instead. The closure is only invoked for
    /// the leader.
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let entry = {
            let mut slot = self.in_flight.lock().unwrap();
            match slot.as_ref() {
                Some(rx) => Entry::Follower(rx.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    *slot = Some(rx);
                    Entry::Leader(tx)
                }
            }
        };

        match entry {
            Entry::Follower(mut rx) => match rx.wait_for(|v| v.is_some()).await {
                Ok(outcome) => (*outcome).unwrap_or(RefreshOutcome::Failed),
                // Leader dropped before settling; treat as a failed refresh.
                Err(_) => RefreshOutcome::Failed,
            },
            Entry::Leader(tx) => {
                let _clear = ClearOnSettle {
                    slot: &self.in_flight,
                };
                let outcome = refresh().await;
                let _ = tx.send(Some(outcome));
                outcome
            }
        }
    }
}

/// Empties the in-flight slot when the leader settles or is cancelled.
struct ClearOnSettle<'a> {
    slot: &'a Slot,
}

impl Drop for ClearOnSettle<'_> {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let guard = Arc::new(SingleFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let guard = Arc::clone(&guard);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                guard
                    .run(|| async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        RefreshOutcome::Succeeded
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), RefreshOutcome::Succeeded);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sequential_runs_refresh_again() {
        let guard = SingleFlight::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let outcome = guard
                .run(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    RefreshOutcome::Succeeded
                })
                .await;
            assert_eq!(outcome, RefreshOutcome::Succeeded);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_is_shared_with_followers() {
        let guard = Arc::new(SingleFlight::new());

        let leader = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move {
                guard
                    .run(|| async {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        RefreshOutcome::Failed
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let follower = guard
            .run(|| async {
                panic!("follower must not run its own refresh");
            })
            .await;

        assert_eq!(follower, RefreshOutcome::Failed);
        assert_eq!(leader.await.unwrap(), RefreshOutcome::Failed);
    }

    #[tokio::test]
    async fn cancelled_leader_does_not_wedge_the_slot() {
        let guard = Arc::new(SingleFlight::new());

        let leader = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move {
                guard
                    .run(|| async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        RefreshOutcome::Succeeded
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        leader.abort();
        let _ = leader.await;

        // The slot was cleared on cancellation; a new leader can run.
        let outcome = guard.run(|| async { RefreshOutcome::Succeeded }).await;
        assert_eq!(outcome, RefreshOutcome::Succeeded);
    }
}
