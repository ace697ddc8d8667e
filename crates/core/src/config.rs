//! Engine configuration: decision thresholds, rejection criteria and the
//! keyword tables used by the heuristic feature extractor.
//!
//! Loaded once when a [`crate::engine::ValidationEngine`] is constructed and
//! read-only afterwards. Threshold keys and the four rejection-indicator
//! lists are required; a document missing any of them fails construction
//! rather than silently falling back to a default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::ContentCategory;
use crate::error::CoreError;
use crate::threshold_validation::{validate_score_range, validate_term_list};

// ---------------------------------------------------------------------------
// Threshold sections
// ---------------------------------------------------------------------------

/// Minimum photorealism sub-scores used in decisioning and suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotorealismThresholds {
    pub minimum_overall_score: f64,
    pub minimum_realism_score: f64,
    pub minimum_quality_score: f64,
    pub minimum_authenticity_score: f64,
    pub minimum_professional_score: f64,
}

/// Minimum analytics sub-scores for the premium-standards check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsThresholds {
    pub minimum_visual_quality: f64,
    pub minimum_professional_appearance: f64,
    pub minimum_premium_score: f64,
}

/// Named indicator lists used to annotate rejection reasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionCriteria {
    pub cartoon_indicators: Vec<String>,
    pub digital_art_indicators: Vec<String>,
    pub illustration_indicators: Vec<String>,
    pub low_quality_indicators: Vec<String>,
}

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

const DEFAULT_PHOTOREALISTIC_SIGNALS: &[&str] = &[
    "professional",
    "high quality",
    "photograph",
    "photo",
    "natural lighting",
    "authentic",
    "realistic",
    "candid",
    "real person",
    "sharp focus",
    "dslr",
    "natural skin texture",
];

const DEFAULT_NON_PHOTOREALISTIC_SIGNALS: &[&str] = &[
    "cartoon",
    "illustration",
    "rendered",
    "3d render",
    "cgi",
    "anime",
    "drawing",
    "painting",
    "sketch",
    "digital art",
    "flat colors",
    "simplified shapes",
    "clip art",
    "vector art",
    "blurry",
    "pixelated",
];

const DEFAULT_PREMIUM_FEATURE_SIGNALS: &[&str] = &[
    "interactive",
    "animated",
    "accessible",
    "mobile optimized",
    "professional",
    "high definition",
];

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

fn default_photorealistic_signals() -> Vec<String> {
    owned(DEFAULT_PHOTOREALISTIC_SIGNALS)
}

fn default_non_photorealistic_signals() -> Vec<String> {
    owned(DEFAULT_NON_PHOTOREALISTIC_SIGNALS)
}

fn default_premium_feature_signals() -> Vec<String> {
    owned(DEFAULT_PREMIUM_FEATURE_SIGNALS)
}

fn default_category_keywords() -> BTreeMap<ContentCategory, Vec<String>> {
    ContentCategory::ALL
        .into_iter()
        .map(|c| (c, owned(c.default_expected_elements())))
        .collect()
}

/// Keyword tables consumed by the heuristic feature extractor.
///
/// Every field is optional in the configuration document and falls back to
/// the built-in table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringKeywords {
    #[serde(default = "default_photorealistic_signals")]
    pub photorealistic_signals: Vec<String>,
    #[serde(default = "default_non_photorealistic_signals")]
    pub non_photorealistic_signals: Vec<String>,
    #[serde(default = "default_premium_feature_signals")]
    pub premium_feature_signals: Vec<String>,
    #[serde(default = "default_category_keywords")]
    pub category_keywords: BTreeMap<ContentCategory, Vec<String>>,
}

impl Default for ScoringKeywords {
    fn default() -> Self {
        Self {
            photorealistic_signals: default_photorealistic_signals(),
            non_photorealistic_signals: default_non_photorealistic_signals(),
            premium_feature_signals: default_premium_feature_signals(),
            category_keywords: default_category_keywords(),
        }
    }
}

impl ScoringKeywords {
    /// Expected-element keywords for a category (empty if not configured).
    pub fn category_elements(&self, category: ContentCategory) -> &[String] {
        self.category_keywords
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub photorealism: PhotorealismThresholds,
    pub analytics: AnalyticsThresholds,
    pub rejection_criteria: RejectionCriteria,
    #[serde(default)]
    pub scoring: ScoringKeywords,
}

impl EngineConfig {
    /// Recommended production configuration.
    pub fn standard() -> Self {
        Self {
            photorealism: PhotorealismThresholds {
                minimum_overall_score: 7.0,
                minimum_realism_score: 7.0,
                minimum_quality_score: 6.5,
                minimum_authenticity_score: 6.5,
                minimum_professional_score: 6.5,
            },
            analytics: AnalyticsThresholds {
                minimum_visual_quality: 8.0,
                minimum_professional_appearance: 7.5,
                minimum_premium_score: 8.0,
            },
            rejection_criteria: RejectionCriteria {
                cartoon_indicators: owned(&[
                    "cartoon",
                    "anime",
                    "flat colors",
                    "simplified shapes",
                    "clip art",
                    "comic",
                ]),
                digital_art_indicators: owned(&[
                    "digital art",
                    "3d render",
                    "rendered",
                    "cgi",
                    "concept art",
                ]),
                illustration_indicators: owned(&[
                    "illustration",
                    "drawing",
                    "painting",
                    "sketch",
                    "vector art",
                ]),
                low_quality_indicators: owned(&[
                    "blurry",
                    "pixelated",
                    "low resolution",
                    "distorted",
                    "watermark",
                    "artifacts",
                ]),
            },
            scoring: ScoringKeywords::default(),
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Invalid engine configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Deserialize and validate an already-parsed configuration mapping.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        let config: EngineConfig = serde_json::from_value(value)
            .map_err(|e| CoreError::Config(format!("Invalid engine configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every threshold range and keyword list.
    pub fn validate(&self) -> Result<(), CoreError> {
        let p = &self.photorealism;
        validate_score_range(p.minimum_overall_score, "minimum_overall_score")?;
        validate_score_range(p.minimum_realism_score, "minimum_realism_score")?;
        validate_score_range(p.minimum_quality_score, "minimum_quality_score")?;
        validate_score_range(p.minimum_authenticity_score, "minimum_authenticity_score")?;
        validate_score_range(p.minimum_professional_score, "minimum_professional_score")?;

        let a = &self.analytics;
        validate_score_range(a.minimum_visual_quality, "minimum_visual_quality")?;
        validate_score_range(
            a.minimum_professional_appearance,
            "minimum_professional_appearance",
        )?;
        validate_score_range(a.minimum_premium_score, "minimum_premium_score")?;

        let r = &self.rejection_criteria;
        validate_term_list(&r.cartoon_indicators, "cartoon_indicators")?;
        validate_term_list(&r.digital_art_indicators, "digital_art_indicators")?;
        validate_term_list(&r.illustration_indicators, "illustration_indicators")?;
        validate_term_list(&r.low_quality_indicators, "low_quality_indicators")?;

        let s = &self.scoring;
        validate_term_list(&s.photorealistic_signals, "photorealistic_signals")?;
        validate_term_list(&s.non_photorealistic_signals, "non_photorealistic_signals")?;
        validate_term_list(&s.premium_feature_signals, "premium_feature_signals")?;
        for (category, terms) in &s.category_keywords {
            validate_term_list(terms, &format!("category_keywords.{category}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn minimal_document() -> serde_json::Value {
        json!({
            "photorealism": {
                "minimum_overall_score": 7.0,
                "minimum_realism_score": 7.0,
                "minimum_quality_score": 6.5,
                "minimum_authenticity_score": 6.5,
                "minimum_professional_score": 6.5
            },
            "analytics": {
                "minimum_visual_quality": 8.0,
                "minimum_professional_appearance": 7.5,
                "minimum_premium_score": 8.0
            },
            "rejection_criteria": {
                "cartoon_indicators": ["cartoon"],
                "digital_art_indicators": ["digital art"],
                "illustration_indicators": ["illustration"],
                "low_quality_indicators": ["blurry"]
            }
        })
    }

    // -- loading --

    #[test]
    fn standard_config_is_valid() {
        assert!(EngineConfig::standard().validate().is_ok());
    }

    #[test]
    fn minimal_document_uses_default_keyword_tables() {
        let config = EngineConfig::from_value(minimal_document()).unwrap();
        assert_eq!(config.scoring, ScoringKeywords::default());
        assert_eq!(config.photorealism.minimum_quality_score, 6.5);
    }

    #[test]
    fn json_string_round_trips_standard_config() {
        let text = serde_json::to_string(&EngineConfig::standard()).unwrap();
        assert_eq!(EngineConfig::from_json_str(&text).unwrap(), EngineConfig::standard());
    }

    #[test]
    fn missing_threshold_key_fails_fast() {
        let mut doc = minimal_document();
        doc["photorealism"]
            .as_object_mut()
            .unwrap()
            .remove("minimum_realism_score");
        let err = EngineConfig::from_value(doc).unwrap_err();
        assert_matches!(err, CoreError::Config(ref msg) if msg.contains("minimum_realism_score"));
    }

    #[test]
    fn missing_indicator_list_fails_fast() {
        let mut doc = minimal_document();
        doc["rejection_criteria"]
            .as_object_mut()
            .unwrap()
            .remove("low_quality_indicators");
        assert_matches!(EngineConfig::from_value(doc), Err(CoreError::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert_matches!(EngineConfig::from_json_str("{ not json"), Err(CoreError::Config(_)));
    }

    // -- validation --

    #[test]
    fn out_of_range_threshold_rejected() {
        let mut doc = minimal_document();
        doc["analytics"]["minimum_premium_score"] = json!(11.0);
        let err = EngineConfig::from_value(doc).unwrap_err();
        assert!(err.to_string().contains("minimum_premium_score"));
    }

    #[test]
    fn blank_category_keyword_rejected() {
        let mut config = EngineConfig::standard();
        config
            .scoring
            .category_keywords
            .insert(ContentCategory::Celebration, vec![String::new()]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("category_keywords.celebration"));
    }

    #[test]
    fn category_keywords_override_parses_enum_keys() {
        let mut doc = minimal_document();
        doc["scoring"] = json!({ "category_keywords": { "health_fitness": ["treadmill"] } });
        let config = EngineConfig::from_value(doc).unwrap();
        assert_eq!(
            config.scoring.category_elements(ContentCategory::HealthFitness),
            ["treadmill".to_string()]
        );
        assert!(config
            .scoring
            .category_elements(ContentCategory::Motivational)
            .is_empty());
    }
}
