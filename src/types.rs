use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::runner::Runner;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of measurements produced by one full benchmark run.
pub const BATCH_SIZE: usize = 10;

/// Minimum number of corpus entries concatenated into one sample.
pub const MIN_SAMPLE: usize = 5;

/// Maximum number of corpus entries concatenated into one sample.
pub const MAX_SAMPLE: usize = 10;

/// Per-call budget for one outbound compression request, in seconds.
pub const COMPRESS_TIMEOUT_SECS: u64 = 128;

/// Sentinel recorded as the compressed token count when a sample fails.
pub const FAILED_SENTINEL: i64 = -1;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Token counts for a single sampled context, before and after compression.
///
/// `compressed == -1` marks a sample whose compression request failed
/// (non-200 status, transport error, or timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub uncompressed: i64,
    pub compressed: i64,
}

impl Measurement {
    pub fn failed(&self) -> bool {
        self.compressed == FAILED_SENTINEL
    }
}

// ---------------------------------------------------------------------------
// Server state (Axum application context)
// ---------------------------------------------------------------------------

/// Axum application state: the shared benchmark runner plus process start time.
#[derive(Clone)]
pub struct AppContext {
    pub runner: Arc<Runner>,
    pub start_time: Instant,
}
