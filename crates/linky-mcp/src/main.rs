use anyhow::Result;
use clap::{Parser, Subcommand};
use linky_local::LinkyConfig;
use std::path::PathBuf;

mod service;
use service::Linky;

#[derive(Parser, Debug)]
#[command(name = "linky")]
#[command(
    about = "Fetch-or-wait coordinator for browser-scraped profiles and people searches (MCP stdio server)",
    long_about = None
)]
struct Cli {
    /// Cache directory shared with the browser extension.
    #[arg(long, global = true, env = "LINKY_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as an MCP stdio server (for Claude Desktop / Cursor / MCP clients).
    #[cfg(feature = "stdio")]
    McpStdio,
    /// Fetch one profile: cache hit, or open it in the browser and wait.
    Profile(ProfileCmd),
    /// Fetch one page of a people search: cache hit, or open it and wait.
    Search(SearchCmd),
    /// List cached people-search queries (paginated).
    ListSearches(ListSearchesCmd),
    /// Delete every cache entry.
    ClearCache(ClearCacheCmd),
    /// Diagnose configuration/launch issues (json).
    Doctor(DoctorCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct ProfileCmd {
    /// Profile handle (the slug after /in/).
    handle: String,
    /// Output format: text|json
    #[arg(long = "output", alias = "format", default_value = "text")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct SearchCmd {
    query: String,
    /// Result page (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Output format: text|json
    #[arg(long = "output", alias = "format", default_value = "text")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct ListSearchesCmd {
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, default_value_t = 20)]
    page_size: usize,
    /// Output format: text|json
    #[arg(long = "output", alias = "format", default_value = "text")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct ClearCacheCmd {
    /// Output format: text|json
    #[arg(long = "output", alias = "format", default_value = "text")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct DoctorCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
    /// Attempt a local stdio MCP handshake (list_tools) to prove a client can start the server.
    ///
    /// Spawns a child `linky mcp-stdio` process and calls `list_tools`. Nothing is opened
    /// in the browser.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    check_stdio: bool,
    /// Timeout for the stdio handshake (ms).
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

#[cfg(feature = "stdio")]
mod mcp {
    use super::*;
    use linky_core::FetchOutcome;
    use rmcp::{
        handler::server::router::tool::ToolRouter as RmcpToolRouter,
        handler::server::wrapper::Parameters,
        model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
        tool, tool_handler, tool_router,
        transport::stdio,
        ErrorData as McpError, ServiceExt,
    };
    use schemars::JsonSchema;
    use serde::Deserialize;
    use std::collections::BTreeSet;

    const SCHEMA_VERSION: u64 = 1;
    const DEFAULT_PAGE_SIZE: usize = 20;
    const MAX_PAGE_SIZE: usize = 1000;

    #[path = "envelope.rs"]
    mod envelope;
    use envelope::*;

    fn tool_result(payload: serde_json::Value) -> CallToolResult {
        // Structured content for machine consumers, plus a text copy for clients
        // that only read `content[0].text`.
        let mut r = CallToolResult::structured(payload.clone());
        r.content = vec![Content::text(payload.to_string())];
        r
    }

    /// Outcome as JSON, with a readable `message` for anything but `ready`.
    fn outcome_json(outcome: &FetchOutcome) -> serde_json::Value {
        let mut v = serde_json::to_value(outcome)
            .unwrap_or_else(|_| serde_json::json!({ "status": "failed" }));
        if !outcome.is_ready() && v.get("message").is_none() {
            v["message"] = serde_json::json!(outcome.to_text());
        }
        v
    }

    #[derive(Debug, Deserialize, JsonSchema, Default)]
    struct GetProfileArgs {
        /// Profile handle, e.g. "jane-doe-123" for linkedin.com/in/jane-doe-123.
        #[serde(default)]
        handle: String,
    }

    #[derive(Debug, Deserialize, JsonSchema, Default)]
    struct GetProfilesArgs {
        /// Profile handles; duplicates collapse to one fetch.
        #[serde(default)]
        handles: Vec<String>,
    }

    #[derive(Debug, Deserialize, JsonSchema, Default)]
    struct SearchPeopleArgs {
        #[serde(default)]
        query: String,
        /// 1-based result page (default 1).
        #[serde(default)]
        page: Option<u32>,
    }

    #[derive(Debug, Deserialize, JsonSchema, Default)]
    struct SearchPeopleBatchArgs {
        #[serde(default)]
        queries: Vec<String>,
        /// Page fetched for every query (default 1).
        #[serde(default)]
        page: Option<u32>,
    }

    #[derive(Debug, Deserialize, JsonSchema, Default)]
    struct ListCachedSearchesArgs {
        /// 1-based page (default 1).
        #[serde(default)]
        page: Option<usize>,
        /// Entries per page (default 20).
        #[serde(default)]
        page_size: Option<usize>,
    }

    #[derive(Clone)]
    pub(crate) struct LinkyMcp {
        tool_router: RmcpToolRouter<Self>,
        linky: Linky,
    }

    #[tool_router]
    impl LinkyMcp {
        pub(crate) fn new(config: LinkyConfig) -> Result<Self, McpError> {
            let linky =
                Linky::new(config).map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(Self::from_linky(linky))
        }

        pub(crate) fn from_linky(linky: Linky) -> Self {
            Self {
                tool_router: Self::tool_router(),
                linky,
            }
        }

        fn opener_missing(&self) -> bool {
            self.linky.browser().is_some_and(|b| !b.available())
        }

        fn warnings_for<'a>(
            &self,
            outcomes: impl IntoIterator<Item = &'a FetchOutcome>,
        ) -> Vec<&'static str> {
            let mut codes = BTreeSet::new();
            for o in outcomes {
                match o {
                    FetchOutcome::Ready { .. } => {}
                    FetchOutcome::NotReady { .. } => {
                        codes.insert("entry_not_ready");
                        if self.opener_missing() {
                            codes.insert("browser_opener_unavailable");
                        }
                    }
                    FetchOutcome::Cancelled { .. } => {
                        codes.insert("wait_cancelled");
                    }
                    FetchOutcome::Failed { .. } => {
                        codes.insert("some_targets_failed");
                    }
                }
            }
            codes.into_iter().collect()
        }

        fn finish(
            &self,
            mut payload: serde_json::Value,
            kind: &str,
            t0: std::time::Instant,
        ) -> CallToolResult {
            let elapsed_ms = t0.elapsed().as_millis();
            add_envelope_fields(&mut payload, kind, elapsed_ms);
            tracing::debug!(tool = kind, elapsed_ms = elapsed_ms as u64, "tool finished");
            tool_result(payload)
        }

        fn single_payload(
            &self,
            result: linky_core::Result<FetchOutcome>,
            request: serde_json::Value,
        ) -> serde_json::Value {
            match result {
                Ok(outcome) => {
                    let warnings = self.warnings_for([&outcome]);
                    let mut payload = outcome_json(&outcome);
                    payload["ok"] = serde_json::json!(true);
                    payload["ready"] = serde_json::json!(outcome.is_ready());
                    payload["request"] = request;
                    payload["warnings"] = serde_json::json!(warnings);
                    payload["warning_hints"] = warning_hints_from(&warnings);
                    payload
                }
                Err(e) => serde_json::json!({
                    "ok": false,
                    "request": request,
                    "error": error_from(&e),
                }),
            }
        }

        fn batch_payload(
            &self,
            results: &std::collections::BTreeMap<String, FetchOutcome>,
            request: serde_json::Value,
        ) -> serde_json::Value {
            let warnings = self.warnings_for(results.values());
            let members: serde_json::Map<String, serde_json::Value> = results
                .iter()
                .map(|(id, o)| (id.clone(), outcome_json(o)))
                .collect();
            serde_json::json!({
                "ok": true,
                "request": request,
                "count": results.len(),
                "ready": results.values().filter(|o| o.is_ready()).count(),
                "results": members,
                "warnings": warnings,
                "warning_hints": warning_hints_from(&warnings),
            })
        }

        #[tool(description = "Liveness check; replies Pong!")]
        async fn ping(&self) -> Result<CallToolResult, McpError> {
            Ok(CallToolResult::success(vec![Content::text("Pong!")]))
        }

        #[tool(
            description = "Get a profile's scraped text: served from cache, or opened in the browser and awaited (bounded wait)"
        )]
        async fn get_profile(
            &self,
            params: Parameters<Option<GetProfileArgs>>,
        ) -> Result<CallToolResult, McpError> {
            let t0 = std::time::Instant::now();
            let args = params.0.unwrap_or_default();
            let request = serde_json::json!({ "handle": args.handle });
            let result = self.linky.profile(&args.handle).await;
            Ok(self.finish(self.single_payload(result, request), "get_profile", t0))
        }

        #[tool(
            description = "Get several profiles concurrently; returns one outcome per distinct handle"
        )]
        async fn get_profiles(
            &self,
            params: Parameters<Option<GetProfilesArgs>>,
        ) -> Result<CallToolResult, McpError> {
            let t0 = std::time::Instant::now();
            let args = params.0.unwrap_or_default();
            let results = self.linky.profiles(&args.handles).await;
            let request = serde_json::json!({ "handles": args.handles });
            Ok(self.finish(self.batch_payload(&results, request), "get_profiles", t0))
        }

        #[tool(
            description = "Get one page of people-search results: served from cache, or opened in the browser and awaited (bounded wait)"
        )]
        async fn search_people(
            &self,
            params: Parameters<Option<SearchPeopleArgs>>,
        ) -> Result<CallToolResult, McpError> {
            let t0 = std::time::Instant::now();
            let args = params.0.unwrap_or_default();
            let page = args.page.unwrap_or(1).max(1);
            let request = serde_json::json!({ "query": args.query, "page": page });
            let result = self.linky.search(&args.query, page).await;
            Ok(self.finish(self.single_payload(result, request), "search_people", t0))
        }

        #[tool(
            description = "Run several people searches concurrently (same page for each); one outcome per distinct query"
        )]
        async fn search_people_batch(
            &self,
            params: Parameters<Option<SearchPeopleBatchArgs>>,
        ) -> Result<CallToolResult, McpError> {
            let t0 = std::time::Instant::now();
            let args = params.0.unwrap_or_default();
            let page = args.page.unwrap_or(1).max(1);
            let results = self.linky.searches(&args.queries, page).await;
            let request = serde_json::json!({ "queries": args.queries, "page": page });
            Ok(self.finish(
                self.batch_payload(&results, request),
                "search_people_batch",
                t0,
            ))
        }

        #[tool(description = "List previously cached people-search queries (paginated, offline)")]
        async fn list_cached_searches(
            &self,
            params: Parameters<Option<ListCachedSearchesArgs>>,
        ) -> Result<CallToolResult, McpError> {
            let t0 = std::time::Instant::now();
            let args = params.0.unwrap_or_default();
            let page = args.page.unwrap_or(1).max(1);
            let page_size = args.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
            let request = serde_json::json!({ "page": page, "page_size": page_size });
            let payload = match self.linky.list_searches(page, page_size) {
                Ok(p) => serde_json::json!({
                    "ok": true,
                    "request": request,
                    "page": p.page,
                    "page_size": p.page_size,
                    "total": p.total,
                    "queries": p.queries,
                }),
                Err(e) => serde_json::json!({
                    "ok": false,
                    "request": request,
                    "error": error_from(&e),
                }),
            };
            Ok(self.finish(payload, "list_cached_searches", t0))
        }

        #[tool(description = "Delete every cached profile and search entry (explicit side effect)")]
        async fn clear_cache(&self) -> Result<CallToolResult, McpError> {
            let t0 = std::time::Instant::now();
            let payload = match self.linky.clear() {
                Ok(deleted) => serde_json::json!({ "ok": true, "deleted": deleted }),
                Err(e) => serde_json::json!({ "ok": false, "error": error_from(&e) }),
            };
            Ok(self.finish(payload, "clear_cache", t0))
        }

        #[tool(description = "Report linky configuration: cache dir, wait policies, opener")]
        async fn linky_meta(&self) -> Result<CallToolResult, McpError> {
            let t0 = std::time::Instant::now();
            let config = self.linky.config();
            let mut payload = serde_json::json!({
                "ok": true,
                "name": "linky",
                "version": env!("CARGO_PKG_VERSION"),
                "cache_dir": self.linky.store().root().to_string_lossy(),
                "endpoints": config.endpoints,
                "policies": {
                    "profile": config.profile,
                    "search": config.search,
                },
                "browser": self.linky.browser().map(|b| serde_json::json!({
                    "command": b.command_line(),
                    "available": b.available(),
                })),
                "tools": self
                    .tool_router
                    .list_all()
                    .iter()
                    .map(|t| t.name.to_string())
                    .collect::<Vec<_>>(),
            });
            match self.linky.entry_counts() {
                Ok((profiles, searches)) => {
                    payload["entries"] =
                        serde_json::json!({ "profiles": profiles, "searches": searches });
                }
                Err(e) => {
                    payload["entries"] = serde_json::Value::Null;
                    payload["error"] = error_from(&e);
                }
            }
            Ok(self.finish(payload, "linky_meta", t0))
        }
    }

    #[tool_handler]
    impl rmcp::ServerHandler for LinkyMcp {
        fn get_info(&self) -> ServerInfo {
            ServerInfo {
                instructions: Some(
                    "Profile and people-search text scraped by a browser extension. Cache hits return immediately; misses open the page in the browser and wait a bounded time. Outputs are JSON and schema-versioned."
                        .to_string(),
                ),
                capabilities: ServerCapabilities::builder().enable_tools().build(),
                ..Default::default()
            }
        }
    }

    pub(crate) async fn serve_stdio(config: LinkyConfig) -> Result<(), McpError> {
        let svc = LinkyMcp::new(config)?;
        tracing::info!(cache_dir = %svc.linky.store().root().display(), "serving mcp over stdio");
        let running = svc
            .serve(stdio())
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        // Keep the stdio server alive until the client closes.
        running
            .waiting()
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(())
    }

}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // stdout carries the MCP protocol; logs go to stderr only.
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("linky=info,linky_local=info,rmcp=warn")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .compact(),
        )
        .try_init();
}

/// Load `KEY=VALUE` lines from `LINKY_ENV_FILE`, never overriding set variables.
fn load_env_file() {
    let Ok(p) = std::env::var("LINKY_ENV_FILE") else {
        return;
    };
    let p = p.trim();
    if p.is_empty() {
        return;
    }
    let Ok(txt) = std::fs::read_to_string(p) else {
        return;
    };
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        if std::env::var_os(k).is_none() {
            std::env::set_var(k, v.trim());
        }
    }
}

fn is_json(output: &str) -> bool {
    output.eq_ignore_ascii_case("json")
}

fn print_outcome(outcome: &linky_core::FetchOutcome, output: &str) -> Result<()> {
    if is_json(output) {
        println!("{}", serde_json::to_string(outcome)?);
    } else {
        println!("{}", outcome.to_text());
    }
    Ok(())
}

async fn doctor(config: &LinkyConfig, args: DoctorCmd) -> Result<()> {
    let t0 = std::time::Instant::now();
    let mut checks: Vec<serde_json::Value> = Vec::new();

    // Check: cache dir is creatable + writable.
    let cache_dir = &config.cache_dir;
    let cache_ok = (|| -> anyhow::Result<()> {
        std::fs::create_dir_all(cache_dir)?;
        let probe = cache_dir.join(format!("linky-doctor-{}.probe", std::process::id()));
        std::fs::write(&probe, b"ok")?;
        let _ = std::fs::remove_file(&probe);
        Ok(())
    })()
    .is_ok();
    checks.push(serde_json::json!({
        "name": "cache_dir_writable",
        "ok": cache_ok,
        "message": if cache_ok { "cache dir is writable" } else { "cache dir is not writable" },
        "hint": if cache_ok { "" } else { "Set LINKY_CACHE_DIR (or --cache-dir) to a writable directory the extension also writes to." },
    }));

    let browser = linky_local::BrowserTrigger::new(config.browser_cmd.as_deref());
    let opener_ok = browser.available();
    checks.push(serde_json::json!({
        "name": "browser_opener",
        "ok": opener_ok,
        "command": browser.command_line(),
        "message": if opener_ok { "browser opener found" } else { "browser opener not found on PATH" },
        "hint": if opener_ok { "" } else { "Set LINKY_BROWSER_CMD to a command that opens a URL." },
    }));

    let endpoints_err = config.validate().err().map(|e| e.to_string());
    checks.push(serde_json::json!({
        "name": "endpoints_valid",
        "ok": endpoints_err.is_none(),
        "message": endpoints_err.clone().unwrap_or_else(|| "base addresses parse".to_string()),
        "hint": if endpoints_err.is_none() { "" } else { "Check LINKY_PROFILE_BASE_URL / LINKY_SEARCH_BASE_URL." },
    }));

    // Check: stdio MCP handshake (optional).
    let mut stdio_ok: Option<bool> = None;
    let mut stdio_tool_count: Option<usize> = None;
    let mut stdio_error: Option<serde_json::Value> = None;
    let mut stdio_elapsed_ms: Option<u128> = None;

    #[cfg(feature = "stdio")]
    if args.check_stdio {
        use rmcp::service::ServiceExt;
        use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
        use tokio::process::Command;

        let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("linky"));
        let child = TokioChildProcess::new(Command::new(exe).configure(|cmd| {
            cmd.args(["mcp-stdio"]);
            cmd.env("LINKY_CACHE_DIR", cache_dir);
            // Keep stderr quiet for this probe unless explicitly enabled.
            cmd.env("RUST_LOG", "error");
        }))?;

        let service = ().serve(child).await?;
        let check_t0 = std::time::Instant::now();
        let res = tokio::time::timeout(
            std::time::Duration::from_millis(args.timeout_ms),
            service.list_tools(Default::default()),
        )
        .await;
        stdio_elapsed_ms = Some(check_t0.elapsed().as_millis());

        match res {
            Ok(Ok(tools)) => {
                stdio_ok = Some(true);
                stdio_tool_count = Some(tools.tools.len());
            }
            Ok(Err(e)) => {
                stdio_ok = Some(false);
                stdio_error = Some(serde_json::json!({
                    "code": "handshake_failed",
                    "message": e.to_string(),
                    "hint": "The child closed the stdio transport early. Check that nothing prints to stdout in mcp-stdio mode and that the client runs `linky mcp-stdio`."
                }));
            }
            Err(_elapsed) => {
                stdio_ok = Some(false);
                stdio_error = Some(serde_json::json!({
                    "code": "timeout",
                    "message": format!("stdio handshake timed out after {}ms", args.timeout_ms),
                    "hint": "The child did not answer list_tools in time. Verify LINKY_CACHE_DIR is writable."
                }));
            }
        }

        let _ = service.cancel().await;
    }

    #[cfg(not(feature = "stdio"))]
    if args.check_stdio {
        stdio_ok = Some(false);
    }

    checks.push(serde_json::json!({
        "name": "mcp_stdio_handshake",
        "ok": if args.check_stdio { stdio_ok.unwrap_or(false) } else { true },
        "skipped": !args.check_stdio,
        "message": if !args.check_stdio {
            "stdio MCP handshake skipped"
        } else if stdio_ok.unwrap_or(false) {
            "stdio MCP handshake succeeded"
        } else {
            "stdio MCP handshake failed"
        },
        "hint": if !args.check_stdio || stdio_ok.unwrap_or(false) {
            ""
        } else if cfg!(feature = "stdio") {
            "Check that the MCP client points at the right `linky` binary with args [\"mcp-stdio\"]."
        } else {
            "`mcp-stdio` requires building with feature `stdio`."
        },
        "tool_count": stdio_tool_count,
        "elapsed_ms": stdio_elapsed_ms,
        "error": stdio_error,
    }));

    let ok = checks.iter().all(|c| c["ok"].as_bool().unwrap_or(false));
    let payload = serde_json::json!({
        "schema_version": 1,
        "kind": "doctor",
        "ok": ok,
        "name": "linky",
        "version": env!("CARGO_PKG_VERSION"),
        "platform": {
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        },
        "features": {
            "stdio": cfg!(feature = "stdio"),
        },
        "elapsed_ms": t0.elapsed().as_millis(),
        "configured": {
            "cache_dir": cache_dir.to_string_lossy(),
            "endpoints": config.endpoints,
            "profile": config.profile,
            "search": config.search,
            "browser_cmd": browser.command_line(),
        },
        "checks": checks,
    });
    match args.output.to_ascii_lowercase().as_str() {
        "text" => {
            println!("linky {} (ok={})", env!("CARGO_PKG_VERSION"), ok);
            println!("cache_dir: {}", cache_dir.display());
            println!("browser: {}", browser.command_line());
            println!("checks:");
            if let Some(arr) = payload["checks"].as_array() {
                for c in arr {
                    let name = c["name"].as_str().unwrap_or("?");
                    if c["skipped"].as_bool().unwrap_or(false) {
                        println!("- {}: skipped", name);
                    } else {
                        let ok = c["ok"].as_bool().unwrap_or(false);
                        println!("- {}: {}", name, if ok { "ok" } else { "fail" });
                    }
                }
            }
        }
        _ => println!("{payload}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_file();
    init_tracing();

    let cli = Cli::parse();
    let mut config = LinkyConfig::from_env();
    if let Some(dir) = cli.cache_dir {
        config = config.with_cache_dir(dir);
    }

    match cli.command {
        #[cfg(feature = "stdio")]
        Commands::McpStdio => {
            mcp::serve_stdio(config)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        }
        Commands::Profile(args) => {
            let linky = Linky::new(config)?;
            let outcome = linky.profile(&args.handle).await?;
            print_outcome(&outcome, &args.output)?;
        }
        Commands::Search(args) => {
            let linky = Linky::new(config)?;
            let outcome = linky.search(&args.query, args.page).await?;
            print_outcome(&outcome, &args.output)?;
        }
        Commands::ListSearches(args) => {
            let linky = Linky::new(config)?;
            let page = linky.list_searches(args.page, args.page_size)?;
            if is_json(&args.output) {
                println!("{}", serde_json::to_string(&page)?);
            } else {
                for q in &page.queries {
                    println!("{q}");
                }
            }
        }
        Commands::ClearCache(args) => {
            let linky = Linky::new(config)?;
            let deleted = linky.clear()?;
            if is_json(&args.output) {
                println!("{}", serde_json::json!({ "ok": true, "deleted": deleted }));
            } else {
                println!("deleted {deleted} cache entries");
            }
        }
        Commands::Doctor(args) => doctor(&config, args).await?,
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "linky",
                "version": env!("CARGO_PKG_VERSION"),
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("linky {}", env!("CARGO_PKG_VERSION")),
                _ => println!("{}", v),
            }
        }
    }
    Ok(())
}
