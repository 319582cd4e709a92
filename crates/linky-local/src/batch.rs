//! Concurrent fan-out/fan-in over many coordinators.
//!
//! Every distinct identifier gets its own task; the batch returns once all of
//! them finished. Errors and panics are recorded per identifier.

use crate::coordinator::Coordinator;
use futures_util::future::join_all;
use linky_core::{FetchOutcome, Result, Target, WaitPolicy};
use std::collections::{BTreeMap, BTreeSet};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct Orchestrator {
    coordinator: Coordinator,
}

impl Orchestrator {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    /// Run one coordinator per distinct identifier and map each back to its outcome.
    ///
    /// Duplicate identifiers collapse to the first occurrence. Identifiers that
    /// `to_target` rejects are reported as `Failed` without being launched.
    pub async fn run_batch<F>(
        &self,
        identifiers: &[String],
        policy: &WaitPolicy,
        cancel: &CancellationToken,
        to_target: F,
    ) -> BTreeMap<String, FetchOutcome>
    where
        F: Fn(&str) -> Result<Target>,
    {
        let mut out = BTreeMap::new();
        let mut seen = BTreeSet::new();
        let mut launched = Vec::new();

        for id in identifiers {
            if !seen.insert(id.as_str()) {
                continue;
            }
            let target = match to_target(id) {
                Ok(t) => t,
                Err(e) => {
                    out.insert(
                        id.clone(),
                        FetchOutcome::Failed {
                            message: e.to_string(),
                        },
                    );
                    continue;
                }
            };
            let coordinator = self.coordinator.clone();
            let policy = *policy;
            let token = cancel.child_token();
            let task = tokio::spawn(async move {
                coordinator.fetch_or_wait(&target, &policy, &token).await
            });
            launched.push((id.clone(), task));
        }

        tracing::info!(
            targets = launched.len(),
            rejected = out.len(),
            "batch launched"
        );

        let (ids, tasks): (Vec<String>, Vec<_>) = launched.into_iter().unzip();
        for (id, joined) in ids.into_iter().zip(join_all(tasks).await) {
            let outcome = match joined {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => FetchOutcome::Failed {
                    message: e.to_string(),
                },
                Err(e) => FetchOutcome::Failed {
                    message: format!("coordinator task failed: {e}"),
                },
            };
            if let FetchOutcome::Failed { message } = &outcome {
                tracing::warn!(id = %id, %message, "batch member failed");
            }
            out.insert(id, outcome);
        }
        out
    }
}
