//! Batch manifest: the list of image and analytics jobs for one run.
//!
//! ```json
//! {
//!   "images": [
//!     {
//!       "path": "renders/gym-01.png",
//!       "category": "health_fitness",
//!       "generation_model_id": "diffusion-xl-2",
//!       "description": "Professional photograph of an athlete in a gym",
//!       "expected_elements": ["dumbbells"]
//!     }
//!   ],
//!   "analytics": [
//!     {
//!       "chart_type": "line",
//!       "description": "Interactive revenue dashboard",
//!       "data_point_count": 48,
//!       "user_context": { "primary_device": "mobile" }
//!     }
//!   ]
//! }
//! ```
//!
//! Relative image paths resolve against the manifest's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use vantage_core::{AnalyticsPayload, ChartType, ContentCategory, ExpectedContentMetadata, UserContext};

use crate::error::WorkerError;

#[derive(Debug, Clone, Deserialize)]
pub struct ImageJob {
    pub path: PathBuf,
    pub category: ContentCategory,
    pub generation_model_id: String,
    #[serde(flatten)]
    pub metadata: ExpectedContentMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsJob {
    pub chart_type: ChartType,
    #[serde(flatten)]
    pub payload: AnalyticsPayload,
    #[serde(default)]
    pub user_context: UserContext,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub images: Vec<ImageJob>,
    #[serde(default)]
    pub analytics: Vec<AnalyticsJob>,
}

impl Manifest {
    /// Parse a manifest, resolving relative image paths against `base_dir`.
    pub fn from_json_str(json: &str, base_dir: &Path) -> Result<Self, WorkerError> {
        let mut manifest: Manifest = serde_json::from_str(json)?;
        for job in &mut manifest.images {
            if job.path.is_relative() {
                job.path = base_dir.join(&job.path);
            }
        }
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, WorkerError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            WorkerError::Manifest(format!("Could not read manifest {}: {e}", path.display()))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_str(&json, base_dir)
            .map_err(|e| WorkerError::Manifest(format!("{}: {e}", path.display())))
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.analytics.is_empty()
    }
}
