use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod key;

pub use key::{CacheKey, EntryKind, Target};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Count the non-empty lines of `text` after trimming surrounding whitespace.
pub fn content_lines(text: &str) -> usize {
    text.trim()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count()
}

/// Freshness predicate shared by every cache store.
pub fn is_fresh(text: &str, min_lines: usize) -> bool {
    content_lines(text) >= min_lines
}

/// How long one coordinator call may wait, and what counts as "ready".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Minimum non-empty line count for an entry to qualify as fresh.
    pub min_lines: usize,
    /// Fixed sleep between cache re-checks.
    pub poll_interval_ms: u64,
    /// Total wait budget after the producer was triggered.
    pub max_wait_ms: u64,
}

impl WaitPolicy {
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

    pub fn profile() -> Self {
        Self {
            min_lines: 10,
            poll_interval_ms: Self::DEFAULT_POLL_INTERVAL_MS,
            max_wait_ms: 30_000,
        }
    }

    pub fn search() -> Self {
        Self {
            min_lines: 3,
            poll_interval_ms: Self::DEFAULT_POLL_INTERVAL_MS,
            max_wait_ms: 60_000,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        // A zero interval would spin; one millisecond is the floor.
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// Entry was already fresh; the producer was not triggered.
    Cache,
    /// Entry arrived while polling after a trigger.
    Producer,
}

/// Result of resolving one target. Every variant is an expected outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Ready {
        content: String,
        source: ContentSource,
        waited_ms: u64,
    },
    NotReady {
        path: String,
        budget_ms: u64,
    },
    Cancelled {
        path: String,
        waited_ms: u64,
    },
    /// Only produced by batch runs, for a target whose coordinator errored.
    Failed {
        message: String,
    },
}

impl FetchOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Ready { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Plain-text rendering: the content itself, or a diagnostic line.
    pub fn to_text(&self) -> String {
        match self {
            Self::Ready { content, .. } => content.clone(),
            Self::NotReady { path, budget_ms } => format!(
                "Timeout: {path} not ready after {} seconds",
                Duration::from_millis(*budget_ms).as_secs_f64()
            ),
            Self::Cancelled { path, waited_ms } => {
                format!("Cancelled: stopped waiting for {path} after {waited_ms} ms")
            }
            Self::Failed { message } => format!("Error: {message}"),
        }
    }
}

/// Fixed base addresses the producer is pointed at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Endpoints {
    pub profile_base: String,
    pub search_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            profile_base: "https://www.linkedin.com/in/".to_string(),
            search_base: "https://www.linkedin.com/search/results/people/".to_string(),
        }
    }
}

/// Read side of the entry cache. Writers live out of process.
///
/// Implementations must tolerate entries disappearing concurrently: a delete
/// racing a read shows up as a miss, never as an error.
pub trait CacheStore: Send + Sync {
    /// Raw content for `key`, or `None` when absent.
    fn read(&self, key: &CacheKey) -> Result<Option<String>>;

    /// Best-effort sweep of every entry. Returns how many were removed.
    fn clear_all(&self) -> Result<usize>;

    /// Stems of entries whose file name ends with `suffix` (suffix stripped).
    /// No ordering or de-duplication guarantee.
    fn list_keys_with_suffix(&self, suffix: &str) -> Result<Vec<String>>;

    /// Human-readable location of `key`, used in timeout diagnostics.
    fn locate(&self, key: &CacheKey) -> String {
        key.file_name()
    }

    fn has_fresh(&self, key: &CacheKey, min_lines: usize) -> Result<bool> {
        Ok(self
            .read(key)?
            .is_some_and(|content| is_fresh(&content, min_lines)))
    }
}

/// Asks an uncontrolled external agent to (eventually) populate the cache.
///
/// There is no completion or error channel. Calling it again for a target that
/// is already being produced must be harmless.
#[async_trait::async_trait]
pub trait ProducerTrigger: Send + Sync {
    async fn trigger(&self, target_url: &str);
}
