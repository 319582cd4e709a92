//! Process shellouts for the browser opener.
//!
//! Goals:
//! - **Fire-and-forget**: spawn and return; the child is reaped in the background.
//! - **Quiet**: the child never inherits stdio (stdout may be an MCP transport).
//! - **No secrets**: callers get short codes, not env dumps.

use std::path::{Path, PathBuf};
use std::process::Stdio;

pub fn which(bin: &str) -> Option<PathBuf> {
    // Explicit paths are taken as-is.
    if bin.contains(std::path::MAIN_SEPARATOR) {
        let p = Path::new(bin);
        return p.is_file().then(|| p.to_path_buf());
    }
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        let cand = dir.join(bin);
        if cand.is_file() {
            return Some(cand);
        }
        if cfg!(windows) {
            let cand = dir.join(format!("{bin}.exe"));
            if cand.is_file() {
                return Some(cand);
            }
        }
    }
    None
}

pub fn has(bin: &str) -> bool {
    which(bin).is_some()
}

/// Spawn `program args...` detached from our stdio and return immediately.
///
/// Must be called from within a tokio runtime (the reaper is a task).
pub fn spawn_detached(program: &str, args: &[String]) -> Result<(), &'static str> {
    let mut child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                "shellout_tool_not_found"
            } else {
                "shellout_spawn_failed"
            }
        })?;

    let program = program.to_string();
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if !status.success() => {
                tracing::debug!(%program, %status, "opener exited non-zero");
            }
            Err(e) => tracing::debug!(%program, error = %e, "opener wait failed"),
            Ok(_) => {}
        }
    });
    Ok(())
}
