//! Wiring shared by the CLI subcommands and the MCP tool surface.

use linky_core::{CacheStore, FetchOutcome, ProducerTrigger, Result, Target};
use linky_local::cache_search::{self, QueryPage};
use linky_local::{BrowserTrigger, Coordinator, FsCache, LinkyConfig, Orchestrator};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub(crate) struct Linky {
    config: Arc<LinkyConfig>,
    store: Arc<FsCache>,
    browser: Option<BrowserTrigger>,
    coordinator: Coordinator,
    orchestrator: Orchestrator,
}

impl Linky {
    /// Production wiring: filesystem cache plus the browser opener.
    pub(crate) fn new(config: LinkyConfig) -> Result<Self> {
        let browser = BrowserTrigger::new(config.browser_cmd.as_deref());
        let mut linky = Self::with_trigger(config, Arc::new(browser.clone()))?;
        linky.browser = Some(browser);
        Ok(linky)
    }

    pub(crate) fn with_trigger(
        config: LinkyConfig,
        trigger: Arc<dyn ProducerTrigger>,
    ) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(FsCache::new(config.cache_dir.clone()));
        store.ensure_dir()?;
        let coordinator = Coordinator::new(store.clone(), trigger, config.endpoints.clone());
        Ok(Self {
            config: Arc::new(config),
            store,
            browser: None,
            orchestrator: Orchestrator::new(coordinator.clone()),
            coordinator,
        })
    }

    pub(crate) fn config(&self) -> &LinkyConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &FsCache {
        &self.store
    }

    /// The opener in use, when wired for production.
    pub(crate) fn browser(&self) -> Option<&BrowserTrigger> {
        self.browser.as_ref()
    }

    pub(crate) async fn profile(&self, handle: &str) -> Result<FetchOutcome> {
        let target = Target::profile(handle)?;
        self.coordinator
            .fetch_or_wait(&target, &self.config.profile, &CancellationToken::new())
            .await
    }

    pub(crate) async fn search(&self, query: &str, page: u32) -> Result<FetchOutcome> {
        let target = Target::search(query, page)?;
        self.coordinator
            .fetch_or_wait(&target, &self.config.search, &CancellationToken::new())
            .await
    }

    pub(crate) async fn profiles(&self, handles: &[String]) -> BTreeMap<String, FetchOutcome> {
        self.orchestrator
            .run_batch(
                handles,
                &self.config.profile,
                &CancellationToken::new(),
                Target::profile,
            )
            .await
    }

    pub(crate) async fn searches(
        &self,
        queries: &[String],
        page: u32,
    ) -> BTreeMap<String, FetchOutcome> {
        self.orchestrator
            .run_batch(
                queries,
                &self.config.search,
                &CancellationToken::new(),
                |q| Target::search(q, page),
            )
            .await
    }

    pub(crate) fn list_searches(&self, page: usize, page_size: usize) -> Result<QueryPage> {
        cache_search::list_queries_page(self.store.as_ref(), page, page_size)
    }

    pub(crate) fn clear(&self) -> Result<usize> {
        self.store.clear_all()
    }

    /// `(profiles, searches)` currently on disk.
    pub(crate) fn entry_counts(&self) -> Result<(usize, usize)> {
        linky_local::entry_counts(self.store.as_ref())
    }
}
