use std::path::{Path, PathBuf};
use std::time::Duration;

use vantage_core::ValidationEngine;

use crate::error::WorkerError;

/// Default number of image jobs validated at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
/// Default per-job deadline in seconds.
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 30;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Path to the engine configuration JSON document.
    pub engine_config_path: PathBuf,
    /// Path to the batch manifest JSON document.
    pub manifest_path: PathBuf,
    /// Image jobs validated concurrently (default: `4`).
    pub max_concurrency: usize,
    /// Deadline for reading and validating one image (default: `30s`).
    pub job_timeout: Duration,
}

impl WorkerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `VANTAGE_ENGINE_CONFIG`    | yes      | --      |
    /// | `VANTAGE_MANIFEST`         | yes      | --      |
    /// | `VANTAGE_MAX_CONCURRENCY`  | no       | `4`     |
    /// | `VANTAGE_JOB_TIMEOUT_SECS` | no       | `30`    |
    pub fn from_env() -> Result<Self, WorkerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WorkerError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .ok_or_else(|| WorkerError::Config(format!("{key} environment variable is required")))
        };

        let engine_config_path = required("VANTAGE_ENGINE_CONFIG")?;
        let manifest_path = required("VANTAGE_MANIFEST")?;

        let max_concurrency: usize = match lookup("VANTAGE_MAX_CONCURRENCY") {
            Some(v) => v.trim().parse().map_err(|_| {
                WorkerError::Config(format!("VANTAGE_MAX_CONCURRENCY must be a positive integer, got '{v}'"))
            })?,
            None => DEFAULT_MAX_CONCURRENCY,
        };
        if max_concurrency == 0 {
            return Err(WorkerError::Config(
                "VANTAGE_MAX_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let timeout_secs: u64 = match lookup("VANTAGE_JOB_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|_| {
                WorkerError::Config(format!("VANTAGE_JOB_TIMEOUT_SECS must be a valid u64, got '{v}'"))
            })?,
            None => DEFAULT_JOB_TIMEOUT_SECS,
        };

        Ok(Self {
            engine_config_path,
            manifest_path,
            max_concurrency,
            job_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Read the engine configuration file and build the engine.
    pub fn load_engine(&self) -> Result<ValidationEngine, WorkerError> {
        load_engine(&self.engine_config_path)
    }
}

/// Build a [`ValidationEngine`] from a configuration file on disk.
pub fn load_engine(path: &Path) -> Result<ValidationEngine, WorkerError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        WorkerError::Config(format!("Could not read engine configuration {}: {e}", path.display()))
    })?;
    Ok(ValidationEngine::from_json(&json)?)
}
