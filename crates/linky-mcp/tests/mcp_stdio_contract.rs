#![cfg(unix)]

use rmcp::model::{CallToolRequestParam, CallToolResult};
use std::collections::BTreeSet;

fn payload_from_result(r: &CallToolResult) -> serde_json::Value {
    if let Some(v) = r.structured_content.clone() {
        return v;
    }
    let s = r
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .unwrap_or_default();
    serde_json::from_str(&s).unwrap_or_else(|_| serde_json::json!({}))
}

fn call(name: &'static str, args: serde_json::Value) -> CallToolRequestParam {
    CallToolRequestParam {
        name: name.into(),
        arguments: args.as_object().cloned(),
    }
}

/// Stand-in for the browser extension: writes the profile a second after the
/// page is "opened", except for `ghost`, which never arrives.
const FAKE_OPENER: &str = r#"#!/bin/sh
h=$(basename "$1")
[ "$h" = "ghost" ] && exit 0
sleep 1
i=0
while [ $i -lt 12 ]; do echo "line $i"; i=$((i+1)); done > "$LINKY_CACHE_DIR/$h.partial"
mv "$LINKY_CACHE_DIR/$h.partial" "$LINKY_CACHE_DIR/$h.profile.txt"
"#;

#[test]
fn linky_stdio_fetch_or_wait_end_to_end() {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    rt.block_on(async {
        use rmcp::{
            service::ServiceExt,
            transport::{ConfigureCommandExt, TokioChildProcess},
        };

        let tmp = tempfile::tempdir()?;
        let cache_dir = tmp.path().join("cache");
        let opener = tmp.path().join("opener.sh");
        std::fs::write(&opener, FAKE_OPENER)?;
        std::fs::create_dir_all(&cache_dir)?;
        std::fs::write(cache_dir.join("rust%20dev.p1.search.txt"), "a\nb\nc\n")?;

        let bin = assert_cmd::cargo::cargo_bin!("linky");
        let service = ()
            .serve(TokioChildProcess::new(
                tokio::process::Command::new(bin).configure(|cmd| {
                    cmd.args(["mcp-stdio"]);
                    cmd.env("LINKY_CACHE_DIR", &cache_dir);
                    cmd.env("LINKY_BROWSER_CMD", format!("sh {}", opener.display()));
                    cmd.env("LINKY_POLL_INTERVAL_MS", "100");
                    cmd.env("LINKY_PROFILE_WAIT_MS", "3000");
                    cmd.env("LINKY_PROFILE_MIN_LINES", "10");
                    cmd.env_remove("LINKY_ENV_FILE");
                }),
            )?)
            .await?;

        let tools = service.list_tools(Default::default()).await?;
        let names: BTreeSet<String> = tools
            .tools
            .iter()
            .map(|t| t.name.clone().into_owned())
            .collect();
        for must_have in [
            "ping",
            "get_profile",
            "get_profiles",
            "search_people",
            "search_people_batch",
            "list_cached_searches",
            "clear_cache",
            "linky_meta",
        ] {
            assert!(names.contains(must_have), "missing tool {must_have}");
        }

        let pong = service
            .call_tool(call("ping", serde_json::json!({})))
            .await?;
        let text = pong
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone());
        assert_eq!(text.as_deref(), Some("Pong!"));

        // Three targets in parallel: two arrive after ~1s, one never does.
        let t0 = std::time::Instant::now();
        let v = payload_from_result(
            &service
                .call_tool(call(
                    "get_profiles",
                    serde_json::json!({ "handles": ["alice", "bob", "ghost"] }),
                ))
                .await?,
        );
        let elapsed = t0.elapsed();
        assert!(elapsed < std::time::Duration::from_secs(6), "{elapsed:?}");
        assert_eq!(v["ok"].as_bool(), Some(true));
        assert_eq!(v["count"].as_u64(), Some(3));
        for h in ["alice", "bob"] {
            assert_eq!(v["results"][h]["status"].as_str(), Some("ready"), "{h}");
            assert_eq!(v["results"][h]["source"].as_str(), Some("producer"));
            assert!(v["results"][h]["content"]
                .as_str()
                .unwrap_or("")
                .contains("line 11"));
        }
        assert_eq!(v["results"]["ghost"]["status"].as_str(), Some("not_ready"));
        assert_eq!(v["results"]["ghost"]["budget_ms"].as_u64(), Some(3000));

        // Second call is a cache hit.
        let v = payload_from_result(
            &service
                .call_tool(call("get_profile", serde_json::json!({ "handle": "alice" })))
                .await?,
        );
        assert_eq!(v["source"].as_str(), Some("cache"));
        assert_eq!(v["waited_ms"].as_u64(), Some(0));

        let v = payload_from_result(
            &service
                .call_tool(call("list_cached_searches", serde_json::json!({})))
                .await?,
        );
        assert_eq!(v["queries"], serde_json::json!(["rust dev"]));

        let v = payload_from_result(
            &service
                .call_tool(call("get_profile", serde_json::json!({ "handle": "a/b" })))
                .await?,
        );
        assert_eq!(v["ok"].as_bool(), Some(false));
        assert_eq!(v["error"]["code"].as_str(), Some("invalid_params"));

        let v = payload_from_result(
            &service
                .call_tool(call("clear_cache", serde_json::json!({})))
                .await?,
        );
        assert_eq!(v["deleted"].as_u64(), Some(3));
        let v = payload_from_result(
            &service
                .call_tool(call("clear_cache", serde_json::json!({})))
                .await?,
        );
        assert_eq!(v["deleted"].as_u64(), Some(0));

        service.cancel().await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
    .expect("mcp stdio contract");
}
