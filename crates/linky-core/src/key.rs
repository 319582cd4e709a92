//! Bidirectional codec between caller-facing targets and cache file names.
//!
//! Layout:
//! - profile: `<handle>.profile.txt` (handle used verbatim)
//! - search: `<percent-encoded query>.p<page>.search.txt` (page always present)
//!
//! The two suffixes are disjoint, so listing by suffix never mixes kinds.

use crate::{Endpoints, Error, Result};
use serde::{Deserialize, Serialize};

/// Longest entry file name accepted, in bytes (the common filesystem limit).
pub const MAX_FILE_NAME_BYTES: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Profile,
    Search,
}

impl EntryKind {
    pub const ALL: [EntryKind; 2] = [EntryKind::Profile, EntryKind::Search];

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Profile => ".profile.txt",
            Self::Search => ".search.txt",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Search => "search",
        }
    }
}

/// Opaque cache identifier: entry kind plus an encoded stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: EntryKind,
    stem: String,
}

impl CacheKey {
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.stem, self.kind.suffix())
    }

    pub fn from_stem(kind: EntryKind, stem: &str) -> Option<Self> {
        if stem.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            stem: stem.to_string(),
        })
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        EntryKind::ALL.into_iter().find_map(|kind| {
            name.strip_suffix(kind.suffix())
                .and_then(|stem| Self::from_stem(kind, stem))
        })
    }

    /// Recover the target this key was derived from.
    pub fn decode(&self) -> Option<Target> {
        match self.kind {
            EntryKind::Profile => Target::profile(&self.stem).ok(),
            EntryKind::Search => {
                let (encoded, page) = self.stem.rsplit_once(".p")?;
                let page: u32 = page.parse().ok().filter(|p| *p >= 1)?;
                let query = urlencoding::decode(encoded).ok()?;
                if query.trim().is_empty() {
                    return None;
                }
                Some(Target::Search {
                    query: query.into_owned(),
                    page,
                })
            }
        }
    }
}

/// One named unit of cacheable content, as the caller identifies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    Profile { handle: String },
    Search { query: String, page: u32 },
}

impl Target {
    pub fn profile(handle: &str) -> Result<Self> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(Error::InvalidTarget("handle must be non-empty".to_string()));
        }
        if handle == "."
            || handle == ".."
            || handle
                .chars()
                .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_whitespace())
        {
            return Err(Error::InvalidTarget(format!(
                "handle {handle:?} contains path or whitespace characters"
            )));
        }
        Self::Profile {
            handle: handle.to_string(),
        }
        .fits_file_name()
    }

    /// Page 0 is treated as page 1.
    pub fn search(query: &str, page: u32) -> Result<Self> {
        if query.trim().is_empty() {
            return Err(Error::InvalidTarget("query must be non-empty".to_string()));
        }
        Self::Search {
            query: query.to_string(),
            page: page.max(1),
        }
        .fits_file_name()
    }

    fn fits_file_name(self) -> Result<Self> {
        let len = self.key().file_name().len();
        if len > MAX_FILE_NAME_BYTES {
            return Err(Error::InvalidTarget(format!(
                "{} entry name would be {len} bytes (limit {MAX_FILE_NAME_BYTES})",
                self.kind().as_str()
            )));
        }
        Ok(self)
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Profile { .. } => EntryKind::Profile,
            Self::Search { .. } => EntryKind::Search,
        }
    }

    pub fn key(&self) -> CacheKey {
        let stem = match self {
            Self::Profile { handle } => handle.clone(),
            Self::Search { query, page } => format!("{}.p{page}", urlencoding::encode(query)),
        };
        CacheKey {
            kind: self.kind(),
            stem,
        }
    }

    /// Address the producer should open to populate this target.
    pub fn url(&self, endpoints: &Endpoints) -> Result<String> {
        match self {
            Self::Profile { handle } => {
                let base = parse_base(&endpoints.profile_base)?;
                let url = base
                    .join(&format!("{handle}/"))
                    .map_err(|e| Error::InvalidUrl(e.to_string()))?;
                Ok(url.to_string())
            }
            Self::Search { query, page } => {
                let mut url = url::Url::parse(&endpoints.search_base)
                    .map_err(|e| Error::InvalidUrl(e.to_string()))?;
                {
                    let mut q = url.query_pairs_mut();
                    q.append_pair("keywords", query);
                    if *page > 1 {
                        q.append_pair("page", &page.to_string());
                    }
                }
                Ok(url.to_string())
            }
        }
    }
}

fn parse_base(base: &str) -> Result<url::Url> {
    // `join` replaces the last path segment unless the base ends in '/'.
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    url::Url::parse(&base).map_err(|e| Error::InvalidUrl(e.to_string()))
}
