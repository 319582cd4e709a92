use linky_core::{CacheKey, CacheStore, EntryKind, Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub mod batch;
pub mod browser;
pub mod cache_search;
pub mod config;
pub mod coordinator;
pub mod shellout;

pub use batch::Orchestrator;
pub use browser::BrowserTrigger;
pub use config::LinkyConfig;
pub use coordinator::Coordinator;

/// Flat directory of `<stem><kind suffix>` text files.
///
/// Written by the out-of-process producer; this type only reads and sweeps.
#[derive(Debug, Clone)]
pub struct FsCache {
    root: PathBuf,
}

impl FsCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Create the cache directory so the producer has somewhere to write.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| Error::Cache(e.to_string()))
    }

    fn entry_names(&self) -> Result<Vec<String>> {
        let listing = match fs::read_dir(&self.root) {
            Ok(l) => l,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Cache(e.to_string())),
        };
        let mut out = Vec::new();
        // Entries vanishing mid-scan are skipped, not reported. Symlinks are
        // followed, matching how reads resolve them.
        for entry in listing.flatten() {
            if !fs::metadata(entry.path()).is_ok_and(|m| m.is_file()) {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                out.push(name);
            }
        }
        Ok(out)
    }
}

impl CacheStore for FsCache {
    fn read(&self, key: &CacheKey) -> Result<Option<String>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Cache(format!("{}: {e}", key.file_name()))),
        }
    }

    fn clear_all(&self) -> Result<usize> {
        let mut deleted = 0;
        for name in self.entry_names()? {
            if CacheKey::from_file_name(&name).is_none() {
                continue;
            }
            match fs::remove_file(self.root.join(&name)) {
                Ok(()) => deleted += 1,
                Err(e) => tracing::debug!(file = %name, error = %e, "cache entry not deleted"),
            }
        }
        tracing::info!(deleted, dir = %self.root.display(), "cache cleared");
        Ok(deleted)
    }

    fn list_keys_with_suffix(&self, suffix: &str) -> Result<Vec<String>> {
        Ok(self
            .entry_names()?
            .into_iter()
            .filter_map(|name| name.strip_suffix(suffix).map(str::to_string))
            .filter(|stem| !stem.is_empty())
            .collect())
    }

    fn locate(&self, key: &CacheKey) -> String {
        self.path_for(key).display().to_string()
    }
}

/// Number of entries of each kind currently on disk.
pub fn entry_counts(store: &dyn CacheStore) -> Result<(usize, usize)> {
    let profiles = store
        .list_keys_with_suffix(EntryKind::Profile.suffix())?
        .len();
    let searches = store.list_keys_with_suffix(EntryKind::Search.suffix())?.len();
    Ok((profiles, searches))
}
