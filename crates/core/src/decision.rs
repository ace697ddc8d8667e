//! Decision engine: thresholds and rejection criteria applied to a scored,
//! classified item.
//!
//! Each call is decided independently in a single pass:
//!
//! 1. collect rejection reasons (overall minimum, realism minimum,
//!    rejectable quality level, plus unreadable content);
//! 2. collect advisory improvement suggestions, which never block approval;
//! 3. map the reason count and overall score to a [`ValidationResult`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::ContentCategory;
use crate::config::{AnalyticsThresholds, PhotorealismThresholds};
use crate::features::{
    AnalyticsFeatures, ChartType, DeviceClass, ExtractionStatus, ImageFeatures, UserContext,
};
use crate::quality::QualityLevel;
use crate::scoring::{
    PhotorealismScore, PremiumAnalyticsScore, MAX_NOISE_LEVEL, MIN_DYNAMIC_RANGE,
    MIN_RECOMMENDED_PIXELS, MIN_SHARPNESS,
};

// ---------------------------------------------------------------------------
// Decision constants
// ---------------------------------------------------------------------------

/// Most reasons an item may carry and still be sent back for regeneration.
pub const REGENERATION_MAX_REASONS: usize = 2;
/// Lowest overall score eligible for regeneration.
pub const REGENERATION_MIN_OVERALL: f64 = 6.0;
/// Lowest overall score routed to a human instead of auto-rejected.
pub const MANUAL_REVIEW_MIN_OVERALL: f64 = 4.0;

const LIGHTING_SUGGESTION_BELOW: f64 = 7.0;
const COMPOSITION_SUGGESTION_BELOW: f64 = 6.0;
const HUMAN_LIKENESS_SUGGESTION_BELOW: f64 = 7.0;
const ENVIRONMENT_SUGGESTION_BELOW: f64 = 7.0;

/// Above this many points a chart is considered overcrowded.
const MAX_READABLE_DATA_POINTS: usize = 5000;
/// Most slices a pie or donut chart stays readable with.
const MAX_PROPORTIONAL_SLICES: usize = 8;
/// Context-driven analytics advice triggers under this dimension score.
const CONTEXT_SUGGESTION_BELOW: f64 = 8.0;

// ---------------------------------------------------------------------------
// Validation result
// ---------------------------------------------------------------------------

/// Terminal outcome of one photorealism validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationResult {
    Approved,
    NeedsRegeneration,
    RequiresManualReview,
    Rejected,
}

impl ValidationResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationResult::Approved => "approved",
            ValidationResult::NeedsRegeneration => "needs_regeneration",
            ValidationResult::RequiresManualReview => "requires_manual_review",
            ValidationResult::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a reason count and overall score to an outcome.
///
/// Priority order: no reasons approves; a few reasons on a decent score
/// regenerates; anything still at or above the manual-review floor goes to a
/// human; the rest is rejected.
pub fn decide(reason_count: usize, overall: f64) -> ValidationResult {
    if reason_count == 0 {
        ValidationResult::Approved
    } else if reason_count <= REGENERATION_MAX_REASONS && overall >= REGENERATION_MIN_OVERALL {
        ValidationResult::NeedsRegeneration
    } else if overall >= MANUAL_REVIEW_MIN_OVERALL {
        ValidationResult::RequiresManualReview
    } else {
        ValidationResult::Rejected
    }
}

// ---------------------------------------------------------------------------
// Photorealism decisioning
// ---------------------------------------------------------------------------

/// Outcome plus its justification.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotorealismDecision {
    pub result: ValidationResult,
    pub rejection_reasons: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

fn annotate(message: String, label: &str, terms: &[String]) -> String {
    if terms.is_empty() {
        message
    } else {
        format!("{message} ({label} indicators: {})", terms.join(", "))
    }
}

/// Every failed check, in evaluation order.
pub fn rejection_reasons(
    score: &PhotorealismScore,
    level: QualityLevel,
    category: ContentCategory,
    features: &ImageFeatures,
    thresholds: &PhotorealismThresholds,
) -> Vec<String> {
    let mut reasons = Vec::new();
    let indicators = &features.signals.indicators;

    if let ExtractionStatus::Failed { reason } = &features.status {
        reasons.push(format!("Content could not be analyzed: {reason}"));
    }

    if score.overall < thresholds.minimum_overall_score {
        reasons.push(annotate(
            format!(
                "Overall photorealism score {:.2} is below the minimum {:.2} for {} content",
                score.overall,
                thresholds.minimum_overall_score,
                category.label()
            ),
            "low-quality",
            &indicators.low_quality,
        ));
    }

    if score.realism < thresholds.minimum_realism_score {
        reasons.push(format!(
            "Realism score {:.2} is below the minimum {:.2}",
            score.realism, thresholds.minimum_realism_score
        ));
    }

    if level.is_rejectable() {
        let message = format!("Content classified as {level}, which is not acceptable as photography");
        let reason = match level {
            QualityLevel::Cartoon if !indicators.cartoon.is_empty() => {
                annotate(message, "cartoon", &indicators.cartoon)
            }
            QualityLevel::Illustration if !indicators.illustration.is_empty() => {
                annotate(message, "illustration", &indicators.illustration)
            }
            _ => annotate(message, "rejection", &indicators.all()),
        };
        reasons.push(reason);
    }

    reasons
}

fn technical_suggestions(features: &ImageFeatures, out: &mut Vec<String>) {
    let m = &features.technical;
    if m.total_pixels < MIN_RECOMMENDED_PIXELS {
        out.push(format!(
            "Regenerate at a higher resolution: at least 512x512 pixels, got {}x{}",
            m.width, m.height
        ));
    }
    if !m.pixel_data_measured {
        return;
    }
    if m.sharpness < MIN_SHARPNESS {
        out.push("Sharpen the subject: the image reads as soft or out of focus".to_string());
    }
    if m.noise_level > MAX_NOISE_LEVEL {
        out.push("Reduce visible noise and grain in smooth areas".to_string());
    }
    if m.dynamic_range < MIN_DYNAMIC_RANGE {
        out.push("Widen the tonal range: the image looks flat or washed out".to_string());
    }
    if m.compression_artifacts {
        out.push("Export with less compression to remove JPEG block artifacts".to_string());
    }
}

/// Advisory suggestions. Computed independently of pass/fail.
pub fn improvement_suggestions(
    score: &PhotorealismScore,
    level: QualityLevel,
    category: ContentCategory,
    features: &ImageFeatures,
    thresholds: &PhotorealismThresholds,
) -> Vec<String> {
    if features.status.is_failed() {
        return vec!["Regenerate or re-upload the content as a valid PNG, JPEG or WebP image".to_string()];
    }

    let mut out = Vec::new();

    if score.lighting_quality < LIGHTING_SUGGESTION_BELOW {
        out.push("Improve lighting: use soft natural light with realistic shadows and highlights".to_string());
    }
    if score.composition < COMPOSITION_SUGGESTION_BELOW {
        out.push("Rework the composition: give the subject a clear focal point and balanced framing".to_string());
    }
    if score.quality < thresholds.minimum_quality_score {
        out.push("Increase image quality: finer detail and cleaner textures".to_string());
    }
    if score.authenticity < thresholds.minimum_authenticity_score {
        out.push("Make the scene feel authentic: candid poses and real-world settings".to_string());
    }
    if score.professional < thresholds.minimum_professional_score {
        out.push("Raise production value to a professional photography standard".to_string());
    }
    if score.human_likeness < HUMAN_LIKENESS_SUGGESTION_BELOW {
        out.push("Improve human features: natural skin texture, proportions and expressions".to_string());
    }
    if score.environment_realism < ENVIRONMENT_SUGGESTION_BELOW {
        out.push("Place the subject in a realistic, physically plausible environment".to_string());
    }

    technical_suggestions(features, &mut out);

    // Non-photographic levels without a rejection of their own.
    let signals = &features.signals;
    if !level.is_photographic() && !level.is_rejectable() {
        out.push(annotate(
            "Reduce digital-art characteristics so the result reads as a photograph".to_string(),
            "digital-art",
            &signals.indicators.digital_art,
        ));
    }
    if signals.category_elements.is_empty() {
        out.push(format!(
            "Add elements typical of {} content to strengthen category relevance",
            category.label()
        ));
    }
    if !signals.missing_expected_elements.is_empty() {
        out.push(format!(
            "Include the expected elements: {}",
            signals.missing_expected_elements.join(", ")
        ));
    }

    out
}

/// Full single-pass evaluation.
pub fn evaluate_photorealism(
    score: &PhotorealismScore,
    level: QualityLevel,
    category: ContentCategory,
    features: &ImageFeatures,
    thresholds: &PhotorealismThresholds,
) -> PhotorealismDecision {
    let rejection_reasons = rejection_reasons(score, level, category, features, thresholds);
    let improvement_suggestions = improvement_suggestions(score, level, category, features, thresholds);
    PhotorealismDecision {
        result: decide(rejection_reasons.len(), score.overall),
        rejection_reasons,
        improvement_suggestions,
    }
}

// ---------------------------------------------------------------------------
// Premium analytics decisioning
// ---------------------------------------------------------------------------

/// Single AND of the three analytics threshold checks.
pub fn meets_premium_standards(score: &PremiumAnalyticsScore, thresholds: &AnalyticsThresholds) -> bool {
    score.visual_quality >= thresholds.minimum_visual_quality
        && score.professional_appearance >= thresholds.minimum_professional_appearance
        && score.overall >= thresholds.minimum_premium_score
}

/// Advisory suggestions for an analytics visualization.
pub fn analytics_suggestions(
    score: &PremiumAnalyticsScore,
    features: &AnalyticsFeatures,
    chart_type: ChartType,
    user_context: &UserContext,
    thresholds: &AnalyticsThresholds,
) -> Vec<String> {
    let mut out = Vec::new();

    if score.visual_quality < thresholds.minimum_visual_quality {
        out.push("Improve visual quality: high-definition rendering and refined styling".to_string());
    }
    if score.professional_appearance < thresholds.minimum_professional_appearance {
        out.push("Adopt a more professional presentation: consistent palette, typography and labels".to_string());
    }
    if score.overall < thresholds.minimum_premium_score && !features.missing_features.is_empty() {
        out.push(format!(
            "Add premium features such as {}",
            features.missing_features.join(", ")
        ));
    }

    match features.data_point_count {
        0 => out.push("The chart has no data points".to_string()),
        n if n > MAX_READABLE_DATA_POINTS => out.push(format!(
            "Aggregate or sample the data: {n} points will clutter the chart"
        )),
        _ => {}
    }
    if chart_type.is_proportional() && features.data_point_count > MAX_PROPORTIONAL_SLICES {
        out.push(format!(
            "Use a bar chart instead of a {chart_type} chart for more than {MAX_PROPORTIONAL_SLICES} categories"
        ));
    }

    if user_context.primary_device == DeviceClass::Mobile
        && score.mobile_optimization < CONTEXT_SUGGESTION_BELOW
    {
        out.push("Optimize the layout for mobile screens, where this user mostly views analytics".to_string());
    }
    if user_context.requires_accessibility && score.accessibility < CONTEXT_SUGGESTION_BELOW {
        out.push("Add accessibility support: sufficient contrast, text alternatives and keyboard navigation".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::features::{IndicatorMatches, SemanticSignals, TechnicalMetrics};

    fn thresholds() -> PhotorealismThresholds {
        EngineConfig::standard().photorealism
    }

    fn features_with(signals: SemanticSignals) -> ImageFeatures {
        ImageFeatures {
            technical: TechnicalMetrics::from_dimensions(1024, 1024),
            signals,
            status: ExtractionStatus::Complete,
        }
    }

    fn on_topic() -> SemanticSignals {
        SemanticSignals {
            category_elements: vec!["gym".to_string()],
            ..Default::default()
        }
    }

    fn evaluate_base(base: f64, signals: SemanticSignals) -> PhotorealismDecision {
        let score = PhotorealismScore::from_base(base);
        let level = QualityLevel::classify(score.overall);
        evaluate_photorealism(
            &score,
            level,
            ContentCategory::HealthFitness,
            &features_with(signals),
            &thresholds(),
        )
    }

    // -- decide --

    #[test]
    fn zero_reasons_always_approve() {
        for overall in [0.0, 3.9, 6.5, 10.0] {
            assert_eq!(decide(0, overall), ValidationResult::Approved);
        }
    }

    #[test]
    fn few_reasons_with_decent_score_regenerate() {
        assert_eq!(decide(1, 6.0), ValidationResult::NeedsRegeneration);
        assert_eq!(decide(2, 6.9), ValidationResult::NeedsRegeneration);
    }

    #[test]
    fn many_reasons_with_reasonable_score_go_to_review() {
        assert_eq!(decide(3, 6.5), ValidationResult::RequiresManualReview);
        assert_eq!(decide(1, 5.9), ValidationResult::RequiresManualReview);
        assert_eq!(decide(4, 4.0), ValidationResult::RequiresManualReview);
    }

    #[test]
    fn poor_scores_with_reasons_are_rejected() {
        for count in 1..=5 {
            assert_eq!(decide(count, 3.99), ValidationResult::Rejected);
            assert_eq!(decide(count, 0.0), ValidationResult::Rejected);
        }
    }

    // -- rejection reasons --

    #[test]
    fn strong_photo_has_no_reasons() {
        let decision = evaluate_base(8.8, on_topic());
        assert_eq!(decision.result, ValidationResult::Approved);
        assert!(decision.rejection_reasons.is_empty());
    }

    #[test]
    fn borderline_score_fails_overall_and_realism_checks() {
        // overall 6.5, realism 6.7: two reasons, regeneration eligible
        let decision = evaluate_base(6.5, on_topic());
        assert_eq!(decision.rejection_reasons.len(), 2);
        assert!(decision.rejection_reasons[0].contains("Health & Fitness"));
        assert!(decision.rejection_reasons[1].starts_with("Realism score"));
        assert_eq!(decision.result, ValidationResult::NeedsRegeneration);
    }

    #[test]
    fn cartoon_reason_names_matched_indicators() {
        let signals = SemanticSignals {
            indicators: IndicatorMatches {
                cartoon: vec!["cartoon".to_string(), "flat colors".to_string()],
                ..Default::default()
            },
            ..on_topic()
        };
        let decision = evaluate_base(2.5, signals);
        assert_eq!(decision.rejection_reasons.len(), 3);
        assert_eq!(
            decision.rejection_reasons[2],
            "Content classified as Cartoon, which is not acceptable as photography \
             (cartoon indicators: cartoon, flat colors)"
        );
        assert_eq!(decision.result, ValidationResult::Rejected);
    }

    #[test]
    fn low_quality_indicators_annotate_overall_reason() {
        let signals = SemanticSignals {
            indicators: IndicatorMatches {
                low_quality: vec!["blurry".to_string()],
                ..Default::default()
            },
            ..on_topic()
        };
        let decision = evaluate_base(5.5, signals);
        assert!(decision.rejection_reasons[0].ends_with("(low-quality indicators: blurry)"));
        assert_eq!(decision.result, ValidationResult::RequiresManualReview);
    }

    #[test]
    fn failed_extraction_leads_the_reason_list() {
        let mut features = features_with(SemanticSignals::default());
        features.status = ExtractionStatus::Failed {
            reason: "unrecognized image format".to_string(),
        };
        let score = PhotorealismScore::near_zero();
        let level = QualityLevel::classify(score.overall);
        let decision = evaluate_photorealism(
            &score,
            level,
            ContentCategory::NutritionFood,
            &features,
            &thresholds(),
        );
        assert_eq!(decision.rejection_reasons.len(), 4);
        assert!(decision.rejection_reasons[0].contains("unrecognized image format"));
        assert_eq!(decision.result, ValidationResult::Rejected);
        assert_eq!(decision.improvement_suggestions.len(), 1);
    }

    // -- suggestions --

    #[test]
    fn suggestions_do_not_block_approval() {
        let signals = SemanticSignals {
            missing_expected_elements: vec!["dumbbells".to_string()],
            ..on_topic()
        };
        let decision = evaluate_base(7.2, signals);
        assert_eq!(decision.result, ValidationResult::Approved);
        assert!(decision
            .improvement_suggestions
            .iter()
            .any(|s| s == "Include the expected elements: dumbbells"));
    }

    #[test]
    fn weak_lighting_and_composition_are_suggested() {
        let decision = evaluate_base(5.5, on_topic());
        let joined = decision.improvement_suggestions.join("\n");
        assert!(joined.contains("Improve lighting"));
        assert!(joined.contains("Rework the composition"));
        assert!(joined.contains("Reduce digital-art characteristics"));
    }

    #[test]
    fn digital_art_advice_only_for_unrejected_non_photographs() {
        let advises = |base: f64| {
            evaluate_base(base, on_topic())
                .improvement_suggestions
                .iter()
                .any(|s| s.starts_with("Reduce digital-art characteristics"))
        };
        assert!(advises(6.0));
        assert!(!advises(7.5));
        assert!(!advises(2.0));
    }

    #[test]
    fn off_topic_content_gets_category_suggestion() {
        let decision = evaluate_base(8.8, SemanticSignals::default());
        assert!(decision
            .improvement_suggestions
            .iter()
            .any(|s| s.contains("typical of Health & Fitness content")));
    }

    #[test]
    fn measured_defects_produce_technical_suggestions() {
        let mut features = features_with(on_topic());
        features.technical = TechnicalMetrics {
            sharpness: 1.0,
            noise_level: 30.0,
            dynamic_range: 10.0,
            compression_artifacts: true,
            pixel_data_measured: true,
            ..TechnicalMetrics::from_dimensions(300, 200)
        };
        let score = PhotorealismScore::from_base(8.0);
        let suggestions = improvement_suggestions(
            &score,
            QualityLevel::classify(score.overall),
            ContentCategory::HealthFitness,
            &features,
            &thresholds(),
        );
        assert_eq!(suggestions.len(), 5);
        assert!(suggestions[0].contains("got 300x200"));
    }

    // -- analytics --

    #[test]
    fn premium_check_is_a_strict_and() {
        let t = EngineConfig::standard().analytics;
        assert!(meets_premium_standards(&PremiumAnalyticsScore::from_base(9.0), &t));
        assert!(!meets_premium_standards(&PremiumAnalyticsScore::from_base(7.0), &t));
        // professional appearance 8.3 clears its own minimum
        assert!(meets_premium_standards(&PremiumAnalyticsScore::from_base(8.5), &t));
        let mut score = PremiumAnalyticsScore::from_base(9.0);
        score.professional_appearance = 7.4;
        assert!(!meets_premium_standards(&score, &t));
    }

    #[test]
    fn analytics_suggestions_follow_context() {
        let t = EngineConfig::standard().analytics;
        let features = AnalyticsFeatures {
            missing_features: vec!["animated".to_string()],
            data_point_count: 12,
            ..Default::default()
        };
        let ctx = UserContext {
            primary_device: DeviceClass::Mobile,
            requires_accessibility: true,
            ..Default::default()
        };
        let out = analytics_suggestions(
            &PremiumAnalyticsScore::from_base(7.0),
            &features,
            ChartType::Pie,
            &ctx,
            &t,
        );
        let joined = out.join("\n");
        assert!(joined.contains("Add premium features such as animated"));
        assert!(joined.contains("instead of a pie chart"));
        assert!(joined.contains("mobile screens"));
        assert!(joined.contains("accessibility support"));
    }

    #[test]
    fn empty_chart_is_flagged() {
        let out = analytics_suggestions(
            &PremiumAnalyticsScore::from_base(9.0),
            &AnalyticsFeatures::default(),
            ChartType::Line,
            &UserContext::default(),
            &EngineConfig::standard().analytics,
        );
        assert_eq!(out, vec!["The chart has no data points"]);
    }
}
