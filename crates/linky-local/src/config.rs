//! Process-wide settings, resolved once at startup.

use linky_core::{Endpoints, Error, Result, Target, WaitPolicy};
use serde::Serialize;
use std::path::PathBuf;

pub const ENV_CACHE_DIR: &str = "LINKY_CACHE_DIR";
pub const ENV_POLL_INTERVAL_MS: &str = "LINKY_POLL_INTERVAL_MS";
pub const ENV_PROFILE_MIN_LINES: &str = "LINKY_PROFILE_MIN_LINES";
pub const ENV_PROFILE_WAIT_MS: &str = "LINKY_PROFILE_WAIT_MS";
pub const ENV_SEARCH_MIN_LINES: &str = "LINKY_SEARCH_MIN_LINES";
pub const ENV_SEARCH_WAIT_MS: &str = "LINKY_SEARCH_WAIT_MS";
pub const ENV_PROFILE_BASE_URL: &str = "LINKY_PROFILE_BASE_URL";
pub const ENV_SEARCH_BASE_URL: &str = "LINKY_SEARCH_BASE_URL";
pub const ENV_BROWSER_CMD: &str = "LINKY_BROWSER_CMD";

#[derive(Debug, Clone, Serialize)]
pub struct LinkyConfig {
    pub cache_dir: PathBuf,
    pub endpoints: Endpoints,
    pub profile: WaitPolicy,
    pub search: WaitPolicy,
    /// Overrides the platform browser opener when set. Quotes group words;
    /// the URL is appended as the last argument.
    pub browser_cmd: Option<String>,
}

impl Default for LinkyConfig {
    fn default() -> Self {
        Self {
            cache_dir: Self::default_cache_dir(),
            endpoints: Endpoints::default(),
            profile: WaitPolicy::profile(),
            search: WaitPolicy::search(),
            browser_cmd: None,
        }
    }
}

impl LinkyConfig {
    pub fn default_cache_dir() -> PathBuf {
        // Persistent per-user location so entries survive restarts.
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("linky")
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let get = |k: &str| {
            get(k)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let num = |k: &str, default: u64, lo: u64, hi: u64| {
            get(k)
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(default)
                .clamp(lo, hi)
        };

        let defaults = Self::default();
        let poll_interval_ms = num(
            ENV_POLL_INTERVAL_MS,
            WaitPolicy::DEFAULT_POLL_INTERVAL_MS,
            10,
            60_000,
        );
        let profile = WaitPolicy {
            min_lines: num(
                ENV_PROFILE_MIN_LINES,
                defaults.profile.min_lines as u64,
                1,
                10_000,
            ) as usize,
            poll_interval_ms,
            max_wait_ms: num(ENV_PROFILE_WAIT_MS, defaults.profile.max_wait_ms, 0, 3_600_000),
        };
        let search = WaitPolicy {
            min_lines: num(
                ENV_SEARCH_MIN_LINES,
                defaults.search.min_lines as u64,
                1,
                10_000,
            ) as usize,
            poll_interval_ms,
            max_wait_ms: num(ENV_SEARCH_WAIT_MS, defaults.search.max_wait_ms, 0, 3_600_000),
        };

        Self {
            cache_dir: get(ENV_CACHE_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            endpoints: Endpoints {
                profile_base: get(ENV_PROFILE_BASE_URL)
                    .unwrap_or(defaults.endpoints.profile_base),
                search_base: get(ENV_SEARCH_BASE_URL).unwrap_or(defaults.endpoints.search_base),
            },
            profile,
            search,
            browser_cmd: get(ENV_BROWSER_CMD),
        }
    }

    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = dir;
        self
    }

    /// Reject base addresses that cannot produce a target URL.
    pub fn validate(&self) -> Result<()> {
        let probes = [Target::profile("probe")?, Target::search("probe", 2)?];
        for t in &probes {
            t.url(&self.endpoints).map_err(|e| {
                Error::NotConfigured(format!("{} base address: {e}", t.kind().as_str()))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| m.get(k).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let c = LinkyConfig::from_lookup(|_| None);
        assert_eq!(c.profile, WaitPolicy::profile());
        assert_eq!(c.search, WaitPolicy::search());
        assert_eq!(c.endpoints, Endpoints::default());
        assert!(c.cache_dir.ends_with("linky"));
        assert_eq!(c.browser_cmd, None);
    }

    #[test]
    fn overrides_apply_per_operation() {
        let c = LinkyConfig::from_lookup(lookup(&[
            (ENV_CACHE_DIR, "/tmp/linky-test"),
            (ENV_POLL_INTERVAL_MS, "100"),
            (ENV_PROFILE_MIN_LINES, "12"),
            (ENV_PROFILE_WAIT_MS, "5000"),
            (ENV_SEARCH_MIN_LINES, "2"),
            (ENV_SEARCH_WAIT_MS, "9000"),
            (ENV_BROWSER_CMD, " sh ./opener.sh "),
        ]));
        assert_eq!(c.cache_dir, PathBuf::from("/tmp/linky-test"));
        assert_eq!(
            c.profile,
            WaitPolicy {
                min_lines: 12,
                poll_interval_ms: 100,
                max_wait_ms: 5000
            }
        );
        assert_eq!(c.search.min_lines, 2);
        assert_eq!(c.search.max_wait_ms, 9000);
        assert_eq!(c.search.poll_interval_ms, 100);
        assert_eq!(c.browser_cmd.as_deref(), Some("sh ./opener.sh"));
    }

    #[test]
    fn garbage_and_extreme_values_are_tamed() {
        let c = LinkyConfig::from_lookup(lookup(&[
            (ENV_POLL_INTERVAL_MS, "0"),
            (ENV_PROFILE_MIN_LINES, "lots"),
            (ENV_SEARCH_WAIT_MS, "99999999999"),
            (ENV_CACHE_DIR, "   "),
        ]));
        assert_eq!(c.profile.poll_interval_ms, 10);
        assert_eq!(c.profile.min_lines, WaitPolicy::profile().min_lines);
        assert_eq!(c.search.max_wait_ms, 3_600_000);
        assert_eq!(c.cache_dir, LinkyConfig::default_cache_dir());
    }

    #[test]
    fn unusable_base_address_is_not_configured() {
        assert!(LinkyConfig::default().validate().is_ok());
        let c = LinkyConfig::from_lookup(lookup(&[(ENV_SEARCH_BASE_URL, "not a url")]));
        match c.validate() {
            Err(Error::NotConfigured(m)) => assert!(m.starts_with("search")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
