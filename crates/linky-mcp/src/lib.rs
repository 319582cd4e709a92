//! `linky` crate (library surface).
//!
//! The primary entrypoint is the `linky` binary (CLI + MCP stdio). This library
//! target re-exports the core types and local implementations for embedding.

pub use linky_core as core;
pub use linky_local as local;
