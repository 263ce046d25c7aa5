//! Benchmark orchestration: sample, compress, measure, publish.
//!
//! One run draws ten random contexts from the corpus, pushes each through the
//! compression service, and counts tokens on both sides. The finished batch
//! replaces the shared result slot in a single swap, so readers observe
//! either the fully-previous or the fully-new batch, never a partial one.
//! Overlapping runs are serialized behind a run guard; a second caller waits
//! for the in-flight run instead of racing it for the slot.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;
use tracing::{info, warn};

use crate::client::Compressor;
use crate::dataset::Dataset;
use crate::tokenizer::Tokenizer;
use crate::types::{Measurement, BATCH_SIZE, FAILED_SENTINEL, MAX_SAMPLE, MIN_SAMPLE};

/// Owns the shared batch slot and everything needed to refill it.
pub struct Runner {
    dataset: Arc<Dataset>,
    tokenizer: Arc<dyn Tokenizer>,
    client: Arc<dyn Compressor>,
    rng: Mutex<StdRng>,
    run_guard: tokio::sync::Mutex<()>,
    batch: RwLock<Option<Vec<Measurement>>>,
}

impl Runner {
    /// `seed` pins the sampling sequence; `None` seeds from OS entropy.
    pub fn new(
        dataset: Arc<Dataset>,
        tokenizer: Arc<dyn Tokenizer>,
        client: Arc<dyn Compressor>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            dataset,
            tokenizer,
            client,
            rng: Mutex::new(rng),
            run_guard: tokio::sync::Mutex::new(()),
            batch: RwLock::new(None),
        }
    }

    /// Draw 5–10 distinct corpus entries and join them with single spaces,
    /// in draw order.
    fn draw_context(&self) -> String {
        let mut rng = self.rng.lock().unwrap();
        let num_sample = rng.random_range(MIN_SAMPLE..=MAX_SAMPLE);
        let indices = rand::seq::index::sample(&mut *rng, self.dataset.len(), num_sample);
        drop(rng);

        let texts: Vec<&str> = indices.iter().map(|i| self.dataset.get(i)).collect();
        texts.join(" ")
    }

    /// Execute one full benchmark run and publish the resulting batch.
    ///
    /// Per-sample compression failures are recorded as the `-1` sentinel and
    /// never abort the run. Network calls are sequential, so total latency is
    /// the sum of up to [`BATCH_SIZE`] round-trips.
    pub async fn run(&self) -> Vec<Measurement> {
        let _guard = self.run_guard.lock().await;
        let start = Instant::now();

        let mut results = Vec::with_capacity(BATCH_SIZE);
        for sample in 0..BATCH_SIZE {
            let context = self.draw_context();
            let uncompressed = self.tokenizer.count_tokens(&context) as i64;

            let compressed = match self.client.compress(&context).await {
                Ok(text) => self.tokenizer.count_tokens(&text) as i64,
                Err(e) => {
                    warn!(sample, error = %e, "Compression sample failed");
                    FAILED_SENTINEL
                }
            };

            results.push(Measurement { uncompressed, compressed });
        }

        let failed = results.iter().filter(|m| m.failed()).count();
        info!(
            samples = BATCH_SIZE,
            failed,
            time_ms = start.elapsed().as_millis() as u64,
            "Benchmark run complete"
        );

        *self.batch.write().unwrap() = Some(results.clone());
        results
    }

    /// Most recently published batch, if any run has completed.
    pub fn latest(&self) -> Option<Vec<Measurement>> {
        self.batch.read().unwrap().clone()
    }

    pub fn dataset_len(&self) -> usize {
        self.dataset.len()
    }
}
