//! Cache-aside fetch-or-wait for a single target.
//!
//! Order within one call: cache check, then (on miss) exactly one trigger,
//! then fixed-interval polling until the entry is fresh or the budget is spent.
//! The coordinator never writes the cache.

use linky_core::{
    CacheKey, CacheStore, ContentSource, Endpoints, FetchOutcome, ProducerTrigger, Result, Target,
    WaitPolicy,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct Coordinator {
    store: Arc<dyn CacheStore>,
    trigger: Arc<dyn ProducerTrigger>,
    endpoints: Endpoints,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn CacheStore>,
        trigger: Arc<dyn ProducerTrigger>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            store,
            trigger,
            endpoints,
        }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    fn fresh_content(&self, key: &CacheKey, min_lines: usize) -> Result<Option<String>> {
        if !self.store.has_fresh(key, min_lines)? {
            return Ok(None);
        }
        // Re-check after reading: the entry may have been swept in between.
        Ok(self
            .store
            .read(key)?
            .filter(|c| linky_core::is_fresh(c, min_lines)))
    }

    /// Resolve `target` to content, triggering the producer at most once.
    ///
    /// Timeouts and cancellation are returned as outcomes; only unexpected
    /// store failures or an unusable endpoint surface as `Err`.
    pub async fn fetch_or_wait(
        &self,
        target: &Target,
        policy: &WaitPolicy,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome> {
        let key = target.key();
        if let Some(content) = self.fresh_content(&key, policy.min_lines)? {
            tracing::debug!(key = %key.file_name(), "cache hit");
            return Ok(FetchOutcome::Ready {
                content,
                source: ContentSource::Cache,
                waited_ms: 0,
            });
        }

        let url = target.url(&self.endpoints)?;
        tracing::info!(key = %key.file_name(), %url, "cache miss; triggering producer");
        self.trigger.trigger(&url).await;

        let interval = policy.poll_interval();
        let budget = policy.max_wait();
        let mut waited = Duration::ZERO;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(key = %key.file_name(), "wait cancelled");
                    return Ok(FetchOutcome::Cancelled {
                        path: self.store.locate(&key),
                        waited_ms: waited.as_millis() as u64,
                    });
                }
                _ = tokio::time::sleep(interval) => {}
            }
            waited += interval;

            if let Some(content) = self.fresh_content(&key, policy.min_lines)? {
                tracing::info!(
                    key = %key.file_name(),
                    waited_ms = waited.as_millis() as u64,
                    "entry arrived"
                );
                return Ok(FetchOutcome::Ready {
                    content,
                    source: ContentSource::Producer,
                    waited_ms: waited.as_millis() as u64,
                });
            }
            if waited >= budget {
                tracing::warn!(
                    key = %key.file_name(),
                    budget_ms = policy.max_wait_ms,
                    "entry not ready before deadline"
                );
                return Ok(FetchOutcome::NotReady {
                    path: self.store.locate(&key),
                    budget_ms: policy.max_wait_ms,
                });
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use tokio::time::Instant;

    fn setup() -> (Arc<ScheduledStore>, Arc<RecordingTrigger>, Coordinator) {
        let store = Arc::new(ScheduledStore::default());
        let trigger = Arc::new(RecordingTrigger::default());
        let c = Coordinator::new(store.clone(), trigger.clone(), Endpoints::default());
        (store, trigger, c)
    }

    #[tokio::test(start_paused = true)]
    async fn cache_hit_short_circuits_without_trigger() {
        let (store, trigger, c) = setup();
        let t = Target::profile("alice").unwrap();
        store.put_now(&t.key(), &lines(20));

        let t0 = Instant::now();
        let o = c
            .fetch_or_wait(&t, &policy(10, 2_000, 30_000), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(t0.elapsed(), Duration::ZERO);
        assert!(trigger.calls().is_empty());
        assert_eq!(
            o,
            FetchOutcome::Ready {
                content: lines(20),
                source: ContentSource::Cache,
                waited_ms: 0
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entry_below_threshold_counts_as_miss() {
        let (store, trigger, c) = setup();
        let t = Target::profile("alice").unwrap();
        store.put_now(&t.key(), &lines(3));

        let o = c
            .fetch_or_wait(&t, &policy(10, 2_000, 4_000), &CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(o, FetchOutcome::NotReady { .. }));
        assert_eq!(trigger.calls(), vec!["https://www.linkedin.com/in/alice/"]);
    }

    #[tokio::test(start_paused = true)]
    async fn triggers_once_then_returns_content_when_it_arrives() {
        let (store, trigger, c) = setup();
        let t = Target::search("rust dev", 2).unwrap();
        let t0 = Instant::now();
        store.put_at(&t.key(), t0 + Duration::from_secs(5), &lines(4));

        let o = c
            .fetch_or_wait(&t, &policy(3, 2_000, 60_000), &CancellationToken::new())
            .await
            .unwrap();
        let elapsed = t0.elapsed();
        assert!(elapsed >= Duration::from_secs(5) && elapsed <= Duration::from_secs(7));
        assert_eq!(trigger.calls().len(), 1);
        assert!(trigger.calls()[0].ends_with("?keywords=rust+dev&page=2"));
        match o {
            FetchOutcome::Ready {
                content,
                source,
                waited_ms,
            } => {
                assert_eq!(content, lines(4));
                assert_eq!(source, ContentSource::Producer);
                assert_eq!(waited_ms, 6_000);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_expiry_is_an_outcome_not_an_error() {
        let (_store, trigger, c) = setup();
        let t = Target::profile("ghost").unwrap();
        let t0 = Instant::now();

        let o = c
            .fetch_or_wait(&t, &policy(10, 2_000, 30_000), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(t0.elapsed(), Duration::from_secs(30));
        assert_eq!(trigger.calls().len(), 1);
        assert_eq!(
            o,
            FetchOutcome::NotReady {
                path: "ghost.profile.txt".to_string(),
                budget_ms: 30_000
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_polling() {
        let (_store, _trigger, c) = setup();
        let t = Target::profile("ghost").unwrap();
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            child.cancel();
        });

        let t0 = Instant::now();
        let o = c
            .fetch_or_wait(&t, &policy(10, 2_000, 30_000), &token)
            .await
            .unwrap();
        assert_eq!(t0.elapsed(), Duration::from_secs(5));
        assert_eq!(
            o,
            FetchOutcome::Cancelled {
                path: "ghost.profile.txt".to_string(),
                waited_ms: 4_000
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn store_failure_propagates() {
        let (store, trigger, c) = setup();
        let t = Target::profile("locked").unwrap();
        store.break_key(&t.key());

        let r = c
            .fetch_or_wait(&t, &policy(1, 2_000, 10_000), &CancellationToken::new())
            .await;
        assert!(r.is_err());
        assert!(trigger.calls().is_empty());
    }
}
