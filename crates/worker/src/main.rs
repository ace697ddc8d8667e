//! `vantage-worker` -- batch validation host.
//!
//! Loads the engine configuration and a job manifest, validates every job,
//! prints one JSON verdict record per line on stdout and logs a summary.
//!
//! # Environment variables
//!
//! | Variable                   | Required | Default | Description                      |
//! |----------------------------|----------|---------|----------------------------------|
//! | `VANTAGE_ENGINE_CONFIG`    | yes      | --      | Engine configuration JSON file   |
//! | `VANTAGE_MANIFEST`         | yes      | --      | Batch manifest JSON file         |
//! | `VANTAGE_MAX_CONCURRENCY`  | no       | `4`     | Image jobs validated at once     |
//! | `VANTAGE_JOB_TIMEOUT_SECS` | no       | `30`    | Deadline per image job           |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vantage_worker::config::WorkerConfig;
use vantage_worker::manifest::Manifest;
use vantage_worker::runner::{self, RunOptions};
use vantage_worker::{report, WorkerError};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vantage_worker=info,vantage_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Batch validation failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), WorkerError> {
    let config = WorkerConfig::from_env()?;
    let engine = config.load_engine()?;
    let manifest = Manifest::load(&config.manifest_path)?;

    if manifest.is_empty() {
        tracing::warn!(manifest = %config.manifest_path.display(), "Manifest contains no jobs");
    }

    tracing::info!(
        images = manifest.images.len(),
        analytics = manifest.analytics.len(),
        max_concurrency = config.max_concurrency,
        job_timeout_secs = config.job_timeout.as_secs(),
        "Batch validation starting"
    );

    let outcome = runner::run_manifest(&engine, manifest, RunOptions::from(&config)).await;

    let stdout = std::io::stdout();
    report::write_json_lines(&mut stdout.lock(), &outcome)?;
    report::log_summary(&outcome);

    Ok(())
}
