//! Read-only discovery of previously cached people searches.
//!
//! - **offline**: only lists the cache store
//! - **lenient**: entries whose key does not decode are skipped
//! - **unordered**: whatever order the store enumerates in, no de-duplication

use linky_core::{CacheKey, CacheStore, EntryKind, Result, Target};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryPage {
    pub page: usize,
    pub page_size: usize,
    /// Decodable search entries across all pages.
    pub total: usize,
    pub queries: Vec<String>,
}

/// Every decodable cached search query (one per cached page).
pub fn cached_queries(store: &dyn CacheStore) -> Result<Vec<String>> {
    let stems = store.list_keys_with_suffix(EntryKind::Search.suffix())?;
    let mut out = Vec::with_capacity(stems.len());
    for stem in stems {
        match CacheKey::from_stem(EntryKind::Search, &stem).and_then(|k| k.decode()) {
            Some(Target::Search { query, .. }) => out.push(query),
            _ => tracing::debug!(%stem, "skipping undecodable search entry"),
        }
    }
    Ok(out)
}

/// 1-based page `page` of size `page_size`. Page 0 is treated as page 1; an
/// out-of-range page is empty.
pub fn list_queries_page(
    store: &dyn CacheStore,
    page: usize,
    page_size: usize,
) -> Result<QueryPage> {
    let page = page.max(1);
    let all = cached_queries(store)?;
    let total = all.len();
    let start = (page - 1).saturating_mul(page_size);
    let queries = all.into_iter().skip(start).take(page_size).collect();
    Ok(QueryPage {
        page,
        page_size,
        total,
        queries,
    })
}

pub fn list_queries(store: &dyn CacheStore, page: usize, page_size: usize) -> Result<Vec<String>> {
    Ok(list_queries_page(store, page, page_size)?.queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FsCache;
    use std::collections::BTreeSet;
    use std::fs;

    fn seeded(n: usize) -> (tempfile::TempDir, FsCache) {
        let tmp = tempfile::tempdir().unwrap();
        for i in 0..n {
            let key = Target::search(&format!("query {i}"), 1).unwrap().key();
            fs::write(tmp.path().join(key.file_name()), "a\nb\nc\n").unwrap();
        }
        let cache = FsCache::new(tmp.path().to_path_buf());
        (tmp, cache)
    }

    #[test]
    fn pagination_bounds() {
        let (_tmp, cache) = seeded(25);
        assert_eq!(list_queries(&cache, 1, 10).unwrap().len(), 10);
        assert_eq!(list_queries(&cache, 3, 10).unwrap().len(), 5);
        assert!(list_queries(&cache, 10, 10).unwrap().is_empty());

        let p = list_queries_page(&cache, 0, 10).unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.total, 25);
    }

    #[test]
    fn pages_partition_the_listing() {
        let (_tmp, cache) = seeded(25);
        let mut seen = BTreeSet::new();
        for page in 1..=3 {
            for q in list_queries(&cache, page, 10).unwrap() {
                assert!(seen.insert(q));
            }
        }
        assert_eq!(seen.len(), 25);
    }

    #[test]
    fn reserved_characters_survive_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let q = "head of growth @ acme/emea? 50% & up";
        let key = Target::search(q, 4).unwrap().key();
        fs::write(tmp.path().join(key.file_name()), "x\ny\nz").unwrap();
        let cache = FsCache::new(tmp.path().to_path_buf());
        assert_eq!(list_queries(&cache, 1, 10).unwrap(), vec![q.to_string()]);
    }

    #[test]
    fn profiles_and_undecodable_entries_are_excluded() {
        let (tmp, cache) = seeded(2);
        fs::write(tmp.path().join("alice.profile.txt"), "x").unwrap();
        fs::write(tmp.path().join("%FF%FE.p1.search.txt"), "x").unwrap();
        fs::write(tmp.path().join("no-page.search.txt"), "x").unwrap();

        let mut qs = list_queries(&cache, 1, 100).unwrap();
        qs.sort();
        assert_eq!(qs, vec!["query 0", "query 1"]);
    }

    #[test]
    fn zero_page_size_is_empty() {
        let (_tmp, cache) = seeded(3);
        assert!(list_queries(&cache, 1, 0).unwrap().is_empty());
    }

    #[test]
    fn missing_cache_dir_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FsCache::new(tmp.path().join("absent"));
        let p = list_queries_page(&cache, 1, 10).unwrap();
        assert_eq!(p.total, 0);
        assert!(p.queries.is_empty());
    }
}
