//! Concurrent batch execution.
//!
//! Image jobs are CPU-bound once their bytes are read, so each one is moved
//! onto the blocking pool with `spawn_blocking`. A semaphore caps how many
//! run at once and every job gets its own deadline. The permit travels into
//! the blocking closure, so a job abandoned at its deadline keeps its slot
//! until the extraction really ends. Whatever goes wrong with
//! a single job (unreadable file, deadline, task failure) turns into a
//! Rejected verdict for that job; the batch itself keeps going.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use vantage_core::{
    ContentCategory, ContentSource, PremiumAnalyticsValidation, ValidationEngine, ValidationMetrics,
};

use crate::config::{WorkerConfig, DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENCY};
use crate::manifest::{AnalyticsJob, ImageJob, Manifest};

/// Concurrency and deadline settings for one run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub max_concurrency: usize,
    pub job_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            job_timeout: Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS),
        }
    }
}

impl From<&WorkerConfig> for RunOptions {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency,
            job_timeout: config.job_timeout,
        }
    }
}

/// Verdicts for one manifest, each list in manifest order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub images: Vec<(PathBuf, ValidationMetrics)>,
    pub analytics: Vec<PremiumAnalyticsValidation>,
}

/// Run every job in the manifest.
pub async fn run_manifest(
    engine: &ValidationEngine,
    manifest: Manifest,
    options: RunOptions,
) -> BatchOutcome {
    let paths: Vec<PathBuf> = manifest.images.iter().map(|j| j.path.clone()).collect();
    let image_verdicts = run_image_jobs(engine, manifest.images, options).await;
    let analytics = run_analytics_jobs(engine, &manifest.analytics);

    BatchOutcome {
        images: paths.into_iter().zip(image_verdicts).collect(),
        analytics,
    }
}

/// Validate image jobs concurrently. Returns one verdict per job, in input
/// order.
pub async fn run_image_jobs(
    engine: &ValidationEngine,
    jobs: Vec<ImageJob>,
    options: RunOptions,
) -> Vec<ValidationMetrics> {
    let semaphore = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
    let identities: Vec<(ContentCategory, String)> = jobs
        .iter()
        .map(|j| (j.category, j.generation_model_id.clone()))
        .collect();

    let mut set = JoinSet::new();
    for (index, job) in jobs.into_iter().enumerate() {
        let engine = engine.clone();
        let semaphore = Arc::clone(&semaphore);
        let timeout = options.job_timeout;
        set.spawn(async move {
            let Ok(permit) = semaphore.acquire_owned().await else {
                let verdict = engine.rejected_verdict(
                    job.category,
                    &job.generation_model_id,
                    "Validation was cancelled before it started",
                );
                return (index, verdict);
            };
            (index, validate_image_job(&engine, job, permit, timeout).await)
        });
    }

    let mut slots: Vec<Option<ValidationMetrics>> = vec![None; identities.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, verdict)) => slots[index] = Some(verdict),
            Err(e) => tracing::error!(error = %e, "Image validation task failed"),
        }
    }

    slots
        .into_iter()
        .zip(identities)
        .map(|(slot, (category, model_id))| {
            slot.unwrap_or_else(|| {
                engine.rejected_verdict(category, &model_id, "Validation task aborted before producing a verdict")
            })
        })
        .collect()
}

/// Read one image and validate it on the blocking pool, within `timeout`.
async fn validate_image_job(
    engine: &ValidationEngine,
    job: ImageJob,
    permit: OwnedSemaphorePermit,
    timeout: Duration,
) -> ValidationMetrics {
    let ImageJob {
        path,
        category,
        generation_model_id,
        metadata,
    } = job;

    let work = async {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Could not read {}: {e}", path.display()))?;

        let engine = engine.clone();
        let model_id = generation_model_id.clone();
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            engine.validate_photorealistic_content(
                &ContentSource::ImageBytes(bytes),
                category,
                &model_id,
                &metadata,
            )
        })
        .await
        .map_err(|e| format!("Validation task failed: {e}"))
    };

    match tokio::time::timeout(timeout, work).await {
        Ok(Ok(verdict)) => {
            tracing::info!(
                path = %path.display(),
                result = %verdict.validation_result,
                overall = verdict.photorealism_score.overall,
                "Image validated"
            );
            verdict
        }
        Ok(Err(reason)) => {
            tracing::warn!(path = %path.display(), %reason, "Image job failed");
            engine.rejected_verdict(category, &generation_model_id, reason)
        }
        Err(_) => {
            tracing::warn!(path = %path.display(), timeout_ms = timeout.as_millis() as u64, "Image job timed out");
            engine.rejected_verdict(
                category,
                &generation_model_id,
                format!("Validation did not finish within {timeout:?}"),
            )
        }
    }
}

/// Validate analytics jobs. Text-only and cheap, so they run inline.
pub fn run_analytics_jobs(
    engine: &ValidationEngine,
    jobs: &[AnalyticsJob],
) -> Vec<PremiumAnalyticsValidation> {
    jobs.iter()
        .map(|job| {
            engine.validate_premium_analytics(&job.payload, job.chart_type, &job.user_context)
        })
        .collect()
}
