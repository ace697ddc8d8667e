//! JSON-lines output and batch summary logging.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use vantage_core::summary::{compute_analytics_summary, compute_summary};
use vantage_core::{PremiumAnalyticsValidation, ValidationMetrics};

use crate::error::WorkerError;
use crate::runner::BatchOutcome;

/// One output line.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchRecord<'a> {
    Image {
        source: &'a Path,
        verdict: &'a ValidationMetrics,
    },
    Analytics {
        verdict: &'a PremiumAnalyticsValidation,
    },
}

impl BatchOutcome {
    /// Image records first, then analytics, each in manifest order.
    pub fn records(&self) -> impl Iterator<Item = BatchRecord<'_>> {
        let images = self.images.iter().map(|(source, verdict)| BatchRecord::Image {
            source: source.as_path(),
            verdict,
        });
        let analytics = self
            .analytics
            .iter()
            .map(|verdict| BatchRecord::Analytics { verdict });
        images.chain(analytics)
    }
}

/// Write every record as one JSON object per line.
pub fn write_json_lines<W: Write>(out: &mut W, outcome: &BatchOutcome) -> Result<(), WorkerError> {
    for record in outcome.records() {
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Log aggregate counts for the run.
pub fn log_summary(outcome: &BatchOutcome) {
    let images = compute_summary(outcome.images.iter().map(|(_, v)| v));
    tracing::info!(
        total = images.total,
        approved = images.approved,
        needs_regeneration = images.needs_regeneration,
        requires_manual_review = images.requires_manual_review,
        rejected = images.rejected,
        flagged_for_review = images.flagged_for_review,
        mean_overall = images.mean_overall,
        approval_rate = images.approval_rate(),
        "Image batch summary"
    );

    let analytics = compute_analytics_summary(&outcome.analytics);
    tracing::info!(
        total = analytics.total,
        meets_premium_standards = analytics.meets_premium_standards,
        assessment_errors = analytics.assessment_errors,
        mean_overall = analytics.mean_overall,
        "Analytics batch summary"
    );
}
