//! Condenses performance bench — measures how well the Condenses compression
//! service shrinks sampled corpus passages, in tokens.
//!
//! Each benchmark run draws ten random multi-passage contexts from a static
//! corpus, sends each to the remote compression API, and records token counts
//! before and after. The most recent batch is served as JSON over HTTP.
//!
//! # Modules
//!
//! - [`dataset`] — Static JSONL corpus with random access by index
//! - [`tokenizer`] — Pluggable token counting backends
//! - [`client`] — Outbound client for the Condenses compression API
//! - [`runner`] — Benchmark orchestration and the shared result slot
//! - [`api`] — HTTP API handlers
//! - [`types`] — Core types and constants shared across the codebase

pub mod api;
pub mod client;
pub mod dataset;
pub mod runner;
pub mod tokenizer;
pub mod types;

/// Environment variable holding the Condenses API key.
pub const API_KEY_ENV: &str = "CONDENSE_API_KEY";

/// Default base URL of the compression service.
pub const DEFAULT_BASE_URL: &str = "https://ncs-client.condenses.ai";
