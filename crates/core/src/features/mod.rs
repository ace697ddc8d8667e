//! Feature extraction: raw content in, fixed-shape features out.
//!
//! [`FeatureExtractor`] is the seam between the decision logic and whatever
//! produces quality signals. [`HeuristicExtractor`] measures real pixel
//! statistics and reads semantic signals from the content description; a
//! trained vision model can replace it without touching scoring,
//! classification or decisioning.

pub mod analytics;
pub mod image_metrics;
pub mod signals;

use serde::{Deserialize, Serialize};

use crate::category::ContentCategory;
use crate::config::{RejectionCriteria, ScoringKeywords};
use crate::error::CoreError;

pub use analytics::{
    extract_analytics, AnalyticsFeatures, AnalyticsPayload, ChartType, DeviceClass, UserContext,
};
pub use image_metrics::TechnicalMetrics;
use signals::TokenizedText;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The content under validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    /// Encoded image bytes (PNG, JPEG or WebP).
    ImageBytes(Vec<u8>),
    /// No pixels available; only the declared output dimensions.
    Descriptor { width: u32, height: u32 },
}

/// Caller-supplied description of what the content shows and should show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectedContentMetadata {
    /// Free-text description of the content (prompt or caption).
    #[serde(default)]
    pub description: String,
    /// Elements the content is expected to contain.
    #[serde(default)]
    pub expected_elements: Vec<String>,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Rejection-indicator terms found in the description, per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorMatches {
    pub cartoon: Vec<String>,
    pub digital_art: Vec<String>,
    pub illustration: Vec<String>,
    pub low_quality: Vec<String>,
}

impl IndicatorMatches {
    /// Every matched indicator, cartoon first, without duplicates.
    pub fn all(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for term in self
            .cartoon
            .iter()
            .chain(&self.illustration)
            .chain(&self.digital_art)
            .chain(&self.low_quality)
        {
            if !out.contains(term) {
                out.push(term.clone());
            }
        }
        out
    }
}

/// Semantic signals read from the content description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticSignals {
    pub photorealistic: Vec<String>,
    pub non_photorealistic: Vec<String>,
    /// Category expected-element keywords present in the description.
    pub category_elements: Vec<String>,
    /// Caller-expected elements absent from the description.
    pub missing_expected_elements: Vec<String>,
    pub indicators: IndicatorMatches,
}

/// Whether extraction produced usable measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionStatus {
    Complete,
    Failed { reason: String },
}

impl ExtractionStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, ExtractionStatus::Failed { .. })
    }
}

/// Everything the scorer needs about one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFeatures {
    pub technical: TechnicalMetrics,
    pub signals: SemanticSignals,
    pub status: ExtractionStatus,
}

// ---------------------------------------------------------------------------
// Extractor seam
// ---------------------------------------------------------------------------

/// Turns raw content into features.
///
/// Implementations must not fail on malformed content: undecodable input is
/// reported through [`ExtractionStatus::Failed`]. `Err` is reserved for
/// failures of the extractor itself (a model backend going away, etc.).
pub trait FeatureExtractor: Send + Sync {
    fn extract_image(
        &self,
        content: &ContentSource,
        category: ContentCategory,
        metadata: &ExpectedContentMetadata,
    ) -> Result<ImageFeatures, CoreError>;

    fn extract_analytics(
        &self,
        payload: &AnalyticsPayload,
        chart_type: ChartType,
    ) -> Result<AnalyticsFeatures, CoreError>;
}

/// Pixel statistics plus keyword signals from the content description.
#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    keywords: ScoringKeywords,
    criteria: RejectionCriteria,
}

impl HeuristicExtractor {
    pub fn new(keywords: ScoringKeywords, criteria: RejectionCriteria) -> Self {
        Self { keywords, criteria }
    }

    fn technical(&self, content: &ContentSource) -> (TechnicalMetrics, ExtractionStatus) {
        match content {
            ContentSource::ImageBytes(bytes) => match image_metrics::measure(bytes) {
                Ok(metrics) => (metrics, ExtractionStatus::Complete),
                Err(e) => (
                    TechnicalMetrics::degenerate(),
                    ExtractionStatus::Failed {
                        reason: e.to_string(),
                    },
                ),
            },
            ContentSource::Descriptor { width, height } if *width == 0 || *height == 0 => (
                TechnicalMetrics::degenerate(),
                ExtractionStatus::Failed {
                    reason: format!("declared dimensions {width}x{height} contain no pixels"),
                },
            ),
            ContentSource::Descriptor { width, height } => (
                TechnicalMetrics::from_dimensions(*width, *height),
                ExtractionStatus::Complete,
            ),
        }
    }

    fn signals(&self, category: ContentCategory, metadata: &ExpectedContentMetadata) -> SemanticSignals {
        let text = TokenizedText::new(&metadata.description);
        let missing_expected_elements = metadata
            .expected_elements
            .iter()
            .filter(|e| !e.trim().is_empty() && !text.contains_phrase(e))
            .cloned()
            .collect();

        SemanticSignals {
            photorealistic: text.matches(&self.keywords.photorealistic_signals),
            non_photorealistic: text.matches(&self.keywords.non_photorealistic_signals),
            category_elements: text.matches(self.keywords.category_elements(category)),
            missing_expected_elements,
            indicators: IndicatorMatches {
                cartoon: text.matches(&self.criteria.cartoon_indicators),
                digital_art: text.matches(&self.criteria.digital_art_indicators),
                illustration: text.matches(&self.criteria.illustration_indicators),
                low_quality: text.matches(&self.criteria.low_quality_indicators),
            },
        }
    }
}

impl FeatureExtractor for HeuristicExtractor {
    fn extract_image(
        &self,
        content: &ContentSource,
        category: ContentCategory,
        metadata: &ExpectedContentMetadata,
    ) -> Result<ImageFeatures, CoreError> {
        let (technical, status) = self.technical(content);
        if let ExtractionStatus::Failed { reason } = &status {
            tracing::warn!(%category, %reason, "Image feature extraction failed");
        }
        Ok(ImageFeatures {
            technical,
            signals: self.signals(category, metadata),
            status,
        })
    }

    fn extract_analytics(
        &self,
        payload: &AnalyticsPayload,
        _chart_type: ChartType,
    ) -> Result<AnalyticsFeatures, CoreError> {
        Ok(extract_analytics(payload, &self.keywords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn extractor() -> HeuristicExtractor {
        let config = EngineConfig::standard();
        HeuristicExtractor::new(config.scoring, config.rejection_criteria)
    }

    fn metadata(description: &str) -> ExpectedContentMetadata {
        ExpectedContentMetadata {
            description: description.to_string(),
            expected_elements: Vec::new(),
        }
    }

    #[test]
    fn descriptor_input_is_complete_without_pixels() {
        let features = extractor()
            .extract_image(
                &ContentSource::Descriptor {
                    width: 1024,
                    height: 1024,
                },
                ContentCategory::HealthFitness,
                &metadata("photo"),
            )
            .unwrap();
        assert_eq!(features.status, ExtractionStatus::Complete);
        assert!(!features.technical.pixel_data_measured);
    }

    #[test]
    fn malformed_bytes_report_failure_instead_of_erroring() {
        let features = extractor()
            .extract_image(
                &ContentSource::ImageBytes(vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0x11]),
                ContentCategory::Celebration,
                &metadata("party photo"),
            )
            .unwrap();
        assert!(features.status.is_failed());
        assert_eq!(features.technical, TechnicalMetrics::degenerate());
    }

    #[test]
    fn zero_sized_descriptor_reports_failure() {
        let features = extractor()
            .extract_image(
                &ContentSource::Descriptor {
                    width: 0,
                    height: 720,
                },
                ContentCategory::Motivational,
                &metadata(""),
            )
            .unwrap();
        assert!(features.status.is_failed());
    }

    #[test]
    fn signals_cover_every_table() {
        let meta = ExpectedContentMetadata {
            description: "blurry cartoon of a gym, digital art with natural lighting".to_string(),
            expected_elements: vec!["weights".to_string(), "gym".to_string()],
        };
        let features = extractor()
            .extract_image(
                &ContentSource::Descriptor {
                    width: 800,
                    height: 800,
                },
                ContentCategory::HealthFitness,
                &meta,
            )
            .unwrap();
        let s = &features.signals;
        assert_eq!(s.photorealistic, vec!["natural lighting"]);
        assert_eq!(s.non_photorealistic, vec!["cartoon", "digital art", "blurry"]);
        assert_eq!(s.category_elements, vec!["gym"]);
        assert_eq!(s.missing_expected_elements, vec!["weights"]);
        assert_eq!(s.indicators.cartoon, vec!["cartoon"]);
        assert_eq!(s.indicators.digital_art, vec!["digital art"]);
        assert_eq!(s.indicators.low_quality, vec!["blurry"]);
        assert_eq!(s.indicators.all(), vec!["cartoon", "digital art", "blurry"]);
    }
}
