//! Validation orchestrator: the engine's only externally callable surface.
//!
//! [`ValidationEngine`] sequences extraction, scoring, classification and
//! decisioning, stamps each verdict with an identifier and timestamp, and
//! decides whether a human must also look at it. Calls never fail: extractor
//! errors and panics become a Rejected verdict flagged for manual review.
//!
//! The engine holds only read-only configuration and is cheap to clone, so
//! one instance can serve any number of concurrent callers.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::category::ContentCategory;
use crate::config::EngineConfig;
use crate::decision::{self, ValidationResult};
use crate::error::CoreError;
use crate::features::{
    AnalyticsFeatures, AnalyticsPayload, ChartType, ContentSource, ExpectedContentMetadata,
    FeatureExtractor, HeuristicExtractor, ImageFeatures, TechnicalMetrics, UserContext,
};
use crate::hashing::content_digest;
use crate::quality::QualityLevel;
use crate::scoring::{self, PhotorealismScore, PremiumAnalyticsScore};
use crate::types::{RecordId, Timestamp};

/// Overall scores in this band are always flagged for human review.
pub const BORDERLINE_REVIEW_BAND: Range<f64> = 6.0..7.0;

// ---------------------------------------------------------------------------
// Verdict records
// ---------------------------------------------------------------------------

/// Complete photorealism verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub id: RecordId,
    pub validated_at: Timestamp,
    pub photorealism_score: PhotorealismScore,
    pub quality_level: QualityLevel,
    pub validation_result: ValidationResult,
    pub content_category: ContentCategory,
    pub technical_metrics: TechnicalMetrics,
    pub generation_model_id: String,
    /// SHA-256 of the image bytes; absent for descriptor input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_sha256: Option<String>,
    /// Empty if and only if the result is `Approved`.
    pub rejection_reasons: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub manual_review_required: bool,
}

/// Complete premium analytics verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumAnalyticsValidation {
    pub id: RecordId,
    pub validated_at: Timestamp,
    pub chart_type: ChartType,
    pub visual_quality_score: f64,
    pub data_clarity_score: f64,
    pub professional_appearance_score: f64,
    pub mobile_optimization_score: f64,
    pub accessibility_score: f64,
    pub premium_features_score: f64,
    pub overall_premium_score: f64,
    pub meets_premium_standards: bool,
    pub improvement_suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_error: Option<String>,
}

impl PremiumAnalyticsValidation {
    /// The six dimension scores as a score value.
    pub fn score(&self) -> PremiumAnalyticsScore {
        PremiumAnalyticsScore {
            overall: self.overall_premium_score,
            visual_quality: self.visual_quality_score,
            data_clarity: self.data_clarity_score,
            professional_appearance: self.professional_appearance_score,
            mobile_optimization: self.mobile_optimization_score,
            accessibility: self.accessibility_score,
            premium_features: self.premium_features_score,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless validation engine bound to one configuration.
#[derive(Clone)]
pub struct ValidationEngine {
    config: Arc<EngineConfig>,
    extractor: Arc<dyn FeatureExtractor>,
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

struct ImageAssessment {
    features: ImageFeatures,
    score: PhotorealismScore,
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `f`, turning a panic into `CoreError::Internal`.
fn guarded<T>(stage: &str, f: impl FnOnce() -> Result<T, CoreError>) -> Result<T, CoreError> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(CoreError::Internal(format!(
            "{stage} panicked: {}",
            panic_message(payload)
        )))
    })
}

impl ValidationEngine {
    /// Build an engine with the built-in heuristic extractor.
    ///
    /// Fails fast on an invalid configuration.
    pub fn new(config: EngineConfig) -> Result<Self, CoreError> {
        let extractor = HeuristicExtractor::new(
            config.scoring.clone(),
            config.rejection_criteria.clone(),
        );
        Self::with_extractor(config, Arc::new(extractor))
    }

    /// Build an engine from a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Self::new(EngineConfig::from_json_str(json)?)
    }

    /// Build an engine around a custom feature-extraction backend.
    pub fn with_extractor(
        config: EngineConfig,
        extractor: Arc<dyn FeatureExtractor>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            extractor,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -- photorealism ------------------------------------------------------

    /// Validate generated image content for photorealism.
    pub fn validate_photorealistic_content(
        &self,
        content: &ContentSource,
        content_category: ContentCategory,
        generation_model_id: &str,
        expected: &ExpectedContentMetadata,
    ) -> ValidationMetrics {
        let content_sha256 = match content {
            ContentSource::ImageBytes(bytes) => Some(content_digest(bytes)),
            ContentSource::Descriptor { .. } => None,
        };

        let assessment = guarded("feature extraction", || {
            let features = self
                .extractor
                .extract_image(content, content_category, expected)?;
            let score = scoring::score_photorealism(&features);
            Ok(ImageAssessment { features, score })
        });

        let assessment = match assessment {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(
                    category = %content_category,
                    model = generation_model_id,
                    error = %e,
                    "Photorealism assessment failed"
                );
                let mut verdict = self.rejected_verdict(
                    content_category,
                    generation_model_id,
                    format!("Validation could not complete: {e}"),
                );
                verdict.content_sha256 = content_sha256;
                return verdict;
            }
        };

        let ImageAssessment { features, score } = assessment;
        let quality_level = QualityLevel::classify(score.overall);
        let decision = decision::evaluate_photorealism(
            &score,
            quality_level,
            content_category,
            &features,
            &self.config.photorealism,
        );

        let manual_review_required = decision.result == ValidationResult::RequiresManualReview
            || BORDERLINE_REVIEW_BAND.contains(&score.overall)
            || features.status.is_failed();

        let verdict = ValidationMetrics {
            id: RecordId::new_v4(),
            validated_at: chrono::Utc::now(),
            photorealism_score: score,
            quality_level,
            validation_result: decision.result,
            content_category,
            technical_metrics: features.technical,
            generation_model_id: generation_model_id.to_string(),
            content_sha256,
            rejection_reasons: decision.rejection_reasons,
            improvement_suggestions: decision.improvement_suggestions,
            manual_review_required,
        };

        tracing::debug!(
            validation_id = %verdict.id,
            category = %content_category,
            model = generation_model_id,
            overall = verdict.photorealism_score.overall,
            quality_level = %verdict.quality_level,
            result = %verdict.validation_result,
            manual_review = verdict.manual_review_required,
            "Photorealism validation complete"
        );

        verdict
    }

    /// Rejected, review-flagged verdict for a failure outside normal scoring.
    ///
    /// Used internally for extractor errors and by hosts for failures the
    /// engine never sees (unreadable files, exceeded deadlines).
    pub fn rejected_verdict(
        &self,
        content_category: ContentCategory,
        generation_model_id: &str,
        reason: impl Into<String>,
    ) -> ValidationMetrics {
        ValidationMetrics {
            id: RecordId::new_v4(),
            validated_at: chrono::Utc::now(),
            photorealism_score: PhotorealismScore::from_sub_scores([0.0; 8]),
            quality_level: QualityLevel::Rejected,
            validation_result: ValidationResult::Rejected,
            content_category,
            technical_metrics: TechnicalMetrics::degenerate(),
            generation_model_id: generation_model_id.to_string(),
            content_sha256: None,
            rejection_reasons: vec![reason.into()],
            improvement_suggestions: Vec::new(),
            manual_review_required: true,
        }
    }

    // -- premium analytics -------------------------------------------------

    /// Validate a generated analytics visualization against premium standards.
    pub fn validate_premium_analytics(
        &self,
        payload: &AnalyticsPayload,
        chart_type: ChartType,
        user_context: &UserContext,
    ) -> PremiumAnalyticsValidation {
        let assessed = guarded("analytics extraction", || {
            let features = self.extractor.extract_analytics(payload, chart_type)?;
            let score = scoring::score_premium_analytics(&features);
            Ok((features, score))
        });

        let (score, meets, suggestions, assessment_error) = match assessed {
            Ok((features, score)) => {
                let meets = decision::meets_premium_standards(&score, &self.config.analytics);
                let suggestions = decision::analytics_suggestions(
                    &score,
                    &features,
                    chart_type,
                    user_context,
                    &self.config.analytics,
                );
                (score, meets, suggestions, None)
            }
            Err(e) => {
                tracing::warn!(chart_type = %chart_type, error = %e, "Analytics assessment failed");
                let suggestions = decision::analytics_suggestions(
                    &PremiumAnalyticsScore::zero(),
                    &AnalyticsFeatures {
                        data_point_count: payload.data_point_count,
                        ..Default::default()
                    },
                    chart_type,
                    user_context,
                    &self.config.analytics,
                );
                (PremiumAnalyticsScore::zero(), false, suggestions, Some(e.to_string()))
            }
        };

        let verdict = PremiumAnalyticsValidation {
            id: RecordId::new_v4(),
            validated_at: chrono::Utc::now(),
            chart_type,
            visual_quality_score: score.visual_quality,
            data_clarity_score: score.data_clarity,
            professional_appearance_score: score.professional_appearance,
            mobile_optimization_score: score.mobile_optimization,
            accessibility_score: score.accessibility,
            premium_features_score: score.premium_features,
            overall_premium_score: score.overall,
            meets_premium_standards: meets,
            improvement_suggestions: suggestions,
            assessment_error,
        };

        tracing::debug!(
            validation_id = %verdict.id,
            chart_type = %chart_type,
            user_id = user_context.user_id.as_deref().unwrap_or("-"),
            overall = verdict.overall_premium_score,
            meets_premium_standards = verdict.meets_premium_standards,
            "Premium analytics validation complete"
        );

        verdict
    }
}
