//! Aggregate statistics over a batch of verdicts.

use serde::Serialize;

use crate::decision::ValidationResult;
use crate::engine::{PremiumAnalyticsValidation, ValidationMetrics};

/// Counts per outcome across many photorealism verdicts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub approved: usize,
    pub needs_regeneration: usize,
    pub requires_manual_review: usize,
    pub rejected: usize,
    /// Verdicts with `manual_review_required`, whatever their outcome.
    pub flagged_for_review: usize,
    /// `0.0` for an empty batch.
    pub mean_overall: f64,
}

impl ValidationSummary {
    /// Share of verdicts approved, `0.0` for an empty batch.
    pub fn approval_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.approved as f64 / self.total as f64
        }
    }
}

/// Summarize photorealism verdicts from any borrowed source.
pub fn compute_summary<'a>(
    verdicts: impl IntoIterator<Item = &'a ValidationMetrics>,
) -> ValidationSummary {
    let mut summary = ValidationSummary {
        total: 0,
        approved: 0,
        needs_regeneration: 0,
        requires_manual_review: 0,
        rejected: 0,
        flagged_for_review: 0,
        mean_overall: 0.0,
    };

    let mut overall_sum = 0.0;
    for v in verdicts {
        summary.total += 1;
        match v.validation_result {
            ValidationResult::Approved => summary.approved += 1,
            ValidationResult::NeedsRegeneration => summary.needs_regeneration += 1,
            ValidationResult::RequiresManualReview => summary.requires_manual_review += 1,
            ValidationResult::Rejected => summary.rejected += 1,
        }
        if v.manual_review_required {
            summary.flagged_for_review += 1;
        }
        overall_sum += v.photorealism_score.overall;
    }

    if summary.total > 0 {
        summary.mean_overall = overall_sum / summary.total as f64;
    }
    summary
}

/// Pass counts across many analytics verdicts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total: usize,
    pub meets_premium_standards: usize,
    pub assessment_errors: usize,
    pub mean_overall: f64,
}

/// Summarize a slice of analytics verdicts.
pub fn compute_analytics_summary(verdicts: &[PremiumAnalyticsValidation]) -> AnalyticsSummary {
    let total = verdicts.len();
    let mean_overall = if total == 0 {
        0.0
    } else {
        verdicts.iter().map(|v| v.overall_premium_score).sum::<f64>() / total as f64
    };

    AnalyticsSummary {
        total,
        meets_premium_standards: verdicts.iter().filter(|v| v.meets_premium_standards).count(),
        assessment_errors: verdicts.iter().filter(|v| v.assessment_error.is_some()).count(),
        mean_overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ContentCategory;
    use crate::config::EngineConfig;
    use crate::engine::ValidationEngine;
    use crate::features::{AnalyticsPayload, ChartType, ContentSource, ExpectedContentMetadata, UserContext};

    fn engine() -> ValidationEngine {
        ValidationEngine::new(EngineConfig::standard()).unwrap()
    }

    fn photo(description: &str) -> ValidationMetrics {
        engine().validate_photorealistic_content(
            &ContentSource::Descriptor {
                width: 1024,
                height: 1024,
            },
            ContentCategory::WellnessLifestyle,
            "gen-v1",
            &ExpectedContentMetadata {
                description: description.to_string(),
                expected_elements: Vec::new(),
            },
        )
    }

    #[test]
    fn summary_empty() {
        let s = compute_summary(&Vec::<ValidationMetrics>::new());
        assert_eq!(s.total, 0);
        assert_eq!(s.mean_overall, 0.0);
        assert_eq!(s.approval_rate(), 0.0);
    }

    #[test]
    fn summary_mixed() {
        let verdicts = vec![
            photo("professional photo of meditation in nature"),
            photo("cartoon drawing with flat colors"),
            engine().rejected_verdict(ContentCategory::Celebration, "gen-v1", "deadline exceeded"),
        ];
        let s = compute_summary(&verdicts);
        assert_eq!(s.total, 3);
        assert_eq!(s.approved, 1);
        assert_eq!(s.rejected, 2);
        assert_eq!(s.flagged_for_review, 1);
        assert!((s.approval_rate() - 1.0 / 3.0).abs() < 1e-9);
        let expected_mean = verdicts
            .iter()
            .map(|v| v.photorealism_score.overall)
            .sum::<f64>()
            / 3.0;
        assert!((s.mean_overall - expected_mean).abs() < 1e-9);
    }

    #[test]
    fn summary_reads_borrowed_records_without_collecting() {
        let labelled = vec![
            ("a.png", photo("candid photo of a family picnic in the park")),
            ("b.png", photo("anime sketch")),
        ];
        let s = compute_summary(labelled.iter().map(|(_, v)| v));
        assert_eq!(s.total, 2);
        assert_eq!(s.approved + s.rejected + s.requires_manual_review + s.needs_regeneration, 2);
    }

    #[test]
    fn analytics_summary_counts_passes() {
        let e = engine();
        let verdicts: Vec<_> = ["interactive professional animated accessible", "plain bar chart"]
            .iter()
            .map(|d| {
                e.validate_premium_analytics(
                    &AnalyticsPayload {
                        description: d.to_string(),
                        data_point_count: 20,
                        ..Default::default()
                    },
                    ChartType::Bar,
                    &UserContext::default(),
                )
            })
            .collect();
        let s = compute_analytics_summary(&verdicts);
        assert_eq!(s.total, 2);
        assert_eq!(s.meets_premium_standards, 1);
        assert_eq!(s.assessment_errors, 0);
        assert!((s.mean_overall - 8.0).abs() < 1e-6);
    }
}
