//! Service binary — thin CLI shell over the [`condenses_bench`] library crate.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use condenses_bench::api::router;
use condenses_bench::client::CondensesClient;
use condenses_bench::dataset::Dataset;
use condenses_bench::runner::Runner;
use condenses_bench::types::AppContext;
use condenses_bench::{tokenizer, API_KEY_ENV, DEFAULT_BASE_URL};

// ---------------------------------------------------------------------------
// CLI definition (clap derive)
// ---------------------------------------------------------------------------

/// Benchmark harness for the Condenses text-compression service.
#[derive(Parser)]
#[command(name = "condenses-bench", version, about, long_about = None)]
struct Cli {
    /// Path to the JSONL corpus snapshot (one {"text": ...} record per line)
    #[arg(long)]
    dataset: PathBuf,

    /// Base URL of the compression service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Token counter: tiktoken (default) or bytes-estimate
    #[arg(long, default_value = "tiktoken")]
    tokenizer: String,

    /// Seed for the sampling RNG (OS entropy if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Port to listen on (overrides the PORT env var; auto-scan if neither is set)
    #[arg(long)]
    port: Option<u16>,

    /// Bind to 0.0.0.0 instead of 127.0.0.1 (localhost)
    #[arg(long)]
    bind_all: bool,
}

// ---------------------------------------------------------------------------
// Graceful shutdown signal
// ---------------------------------------------------------------------------

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received SIGINT, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl+C");
        info!("Received Ctrl+C, shutting down...");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("condenses_bench=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Tokenizer
    let tok = tokenizer::create_tokenizer(&cli.tokenizer);
    info!(tokenizer = tok.name(), "Initialized tokenizer");

    // Corpus — load failure is fatal, the service has nothing to measure
    let dataset = match Dataset::load(&cli.dataset) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            error!(path = %cli.dataset.display(), error = %e, "Could not load corpus");
            std::process::exit(1);
        }
    };

    // Compression client — a missing API key is tolerated: every call will be
    // rejected by the service and each sample records the failure sentinel,
    // which is still a valid (all-failed) batch.
    let api_key = std::env::var(API_KEY_ENV).unwrap_or_else(|_| {
        warn!("{API_KEY_ENV} is not set — all compression calls will fail");
        String::new()
    });
    let client = match CondensesClient::new(cli.base_url.clone(), &api_key) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!(base_url = cli.base_url.as_str(), error = %e, "Could not build HTTP client");
            std::process::exit(1);
        }
    };

    let runner = Arc::new(Runner::new(dataset, tok, client, cli.seed));

    // Startup benchmark run — does not block readiness; outcome is logged
    {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move {
            let batch = runner.run().await;
            let failed = batch.iter().filter(|m| m.failed()).count();
            info!(samples = batch.len(), failed, "Startup benchmark run finished");
        });
    }

    let ctx = AppContext { runner, start_time: Instant::now() };
    let app = router(ctx);

    // Bind address: 127.0.0.1 by default, --bind-all for 0.0.0.0
    let bind_addr = if cli.bind_all { "0.0.0.0" } else { "127.0.0.1" };

    let explicit_port: Option<u16> =
        cli.port.or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()));

    let listener = if let Some(port) = explicit_port {
        tokio::net::TcpListener::bind(format!("{bind_addr}:{port}")).await.unwrap_or_else(|e| {
            error!(port = port, error = %e, "Could not bind to port");
            eprintln!("  Port {port} was requested explicitly. Choose a different port.");
            std::process::exit(1);
        })
    } else {
        // Auto-scan: try 8000..=8009
        const BASE: u16 = 8000;
        const RANGE: u16 = 10;
        let mut found = None;
        for port in BASE..BASE + RANGE {
            match tokio::net::TcpListener::bind(format!("{bind_addr}:{port}")).await {
                Ok(l) => {
                    found = Some(l);
                    break;
                }
                Err(_) => continue,
            }
        }
        found.unwrap_or_else(|| {
            error!(range_start = BASE, range_end = BASE + RANGE - 1, "No free port found");
            eprintln!("  Try: PORT=<port> condenses-bench");
            std::process::exit(1);
        })
    };

    let port = listener.local_addr().map(|a| a.port()).unwrap_or(0);
    info!(port = port, "http://localhost:{port}/api/condenses-performance");

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
