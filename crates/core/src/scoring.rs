//! Dimensional scoring: extracted features to photorealism and premium
//! analytics scores.
//!
//! Both models compute one base value and derive every dimension from it
//! with a fixed offset, so dimensions move together but are not identical.
//! Every dimension is clamped to `[0.0, 10.0]` and `overall` is the mean of
//! the clamped dimensions.

use serde::{Deserialize, Serialize};

use crate::features::{AnalyticsFeatures, ImageFeatures, TechnicalMetrics};
use crate::types::clamp_score;

// ---------------------------------------------------------------------------
// Photorealism constants
// ---------------------------------------------------------------------------

/// Starting point before any signal is applied.
pub const PHOTOREALISM_BASE_SCORE: f64 = 6.5;
/// Added per distinct photorealistic signal.
pub const PHOTOREALISTIC_SIGNAL_BONUS: f64 = 0.5;
/// Subtracted per distinct non-photorealistic signal.
pub const NON_PHOTOREALISTIC_SIGNAL_PENALTY: f64 = 1.0;
/// Added once when any category expected element is present.
pub const CATEGORY_ELEMENT_BONUS: f64 = 0.3;
/// Value of every dimension when extraction failed.
pub const FAILED_EXTRACTION_SCORE: f64 = 0.5;

/// Offsets for realism, quality, authenticity, professional, human-likeness,
/// environment-realism, lighting-quality and composition, in that order.
const PHOTOREALISM_OFFSETS: [f64; 8] = [0.2, 0.1, 0.0, 0.3, -0.1, -0.2, 0.0, -0.3];

// ---------------------------------------------------------------------------
// Technical penalty constants
// ---------------------------------------------------------------------------

/// Below this pixel count (512x512) the content is too small for premium use.
pub const MIN_RECOMMENDED_PIXELS: u64 = 512 * 512;
pub const LOW_RESOLUTION_PENALTY: f64 = 1.0;

/// Laplacian variance under which content reads as soft or blurred.
pub const MIN_SHARPNESS: f64 = 25.0;
pub const LOW_SHARPNESS_PENALTY: f64 = 0.5;

/// Smooth-region standard deviation above which content reads as noisy.
pub const MAX_NOISE_LEVEL: f64 = 12.0;
pub const HIGH_NOISE_PENALTY: f64 = 0.5;

/// Luma percentile spread under which content looks washed out.
pub const MIN_DYNAMIC_RANGE: f64 = 64.0;
pub const LOW_DYNAMIC_RANGE_PENALTY: f64 = 0.3;

pub const COMPRESSION_ARTIFACT_PENALTY: f64 = 0.3;

// ---------------------------------------------------------------------------
// Analytics constants
// ---------------------------------------------------------------------------

/// Analytics content starts closer to acceptable than imagery does.
pub const ANALYTICS_BASE_SCORE: f64 = 7.0;
/// Added per distinct premium-feature signal.
pub const PREMIUM_FEATURE_BONUS: f64 = 0.5;

/// Offsets for visual quality, data clarity, professional appearance, mobile
/// optimization, accessibility and premium features, in that order.
const ANALYTICS_OFFSETS: [f64; 6] = [0.0, 0.2, -0.2, -0.3, -0.1, 0.4];

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ---------------------------------------------------------------------------
// Photorealism score
// ---------------------------------------------------------------------------

/// Nine-dimensional photorealism assessment. Every field is in `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotorealismScore {
    pub overall: f64,
    pub realism: f64,
    pub quality: f64,
    pub authenticity: f64,
    pub professional: f64,
    pub human_likeness: f64,
    pub environment_realism: f64,
    pub lighting_quality: f64,
    pub composition: f64,
}

impl PhotorealismScore {
    /// Build from the eight sub-scores (same order as [`Self::sub_scores`]),
    /// clamping each and deriving `overall`.
    pub fn from_sub_scores(sub: [f64; 8]) -> Self {
        let sub = sub.map(clamp_score);
        Self {
            overall: clamp_score(mean(&sub)),
            realism: sub[0],
            quality: sub[1],
            authenticity: sub[2],
            professional: sub[3],
            human_likeness: sub[4],
            environment_realism: sub[5],
            lighting_quality: sub[6],
            composition: sub[7],
        }
    }

    /// Every dimension offset from `base`.
    pub fn from_base(base: f64) -> Self {
        Self::from_sub_scores(PHOTOREALISM_OFFSETS.map(|offset| base + offset))
    }

    /// Pass-through score used when extraction failed.
    pub fn near_zero() -> Self {
        Self::from_sub_scores([FAILED_EXTRACTION_SCORE; 8])
    }

    /// The eight sub-scores `overall` is the mean of.
    pub fn sub_scores(&self) -> [f64; 8] {
        [
            self.realism,
            self.quality,
            self.authenticity,
            self.professional,
            self.human_likeness,
            self.environment_realism,
            self.lighting_quality,
            self.composition,
        ]
    }
}

/// Technical penalty for the measured metrics, as a non-positive delta.
pub fn technical_adjustment(metrics: &TechnicalMetrics) -> f64 {
    let mut delta = 0.0;
    if metrics.total_pixels < MIN_RECOMMENDED_PIXELS {
        delta -= LOW_RESOLUTION_PENALTY;
    }
    if !metrics.pixel_data_measured {
        return delta;
    }
    if metrics.sharpness < MIN_SHARPNESS {
        delta -= LOW_SHARPNESS_PENALTY;
    }
    if metrics.noise_level > MAX_NOISE_LEVEL {
        delta -= HIGH_NOISE_PENALTY;
    }
    if metrics.dynamic_range < MIN_DYNAMIC_RANGE {
        delta -= LOW_DYNAMIC_RANGE_PENALTY;
    }
    if metrics.compression_artifacts {
        delta -= COMPRESSION_ARTIFACT_PENALTY;
    }
    delta
}

/// Score an image from its extracted features.
///
/// Failed extraction skips the keyword logic entirely and yields
/// [`PhotorealismScore::near_zero`].
pub fn score_photorealism(features: &ImageFeatures) -> PhotorealismScore {
    if features.status.is_failed() {
        return PhotorealismScore::near_zero();
    }

    let signals = &features.signals;
    let mut base = PHOTOREALISM_BASE_SCORE;
    base += PHOTOREALISTIC_SIGNAL_BONUS * signals.photorealistic.len() as f64;
    base -= NON_PHOTOREALISTIC_SIGNAL_PENALTY * signals.non_photorealistic.len() as f64;
    if !signals.category_elements.is_empty() {
        base += CATEGORY_ELEMENT_BONUS;
    }
    base += technical_adjustment(&features.technical);

    PhotorealismScore::from_base(base)
}

// ---------------------------------------------------------------------------
// Premium analytics score
// ---------------------------------------------------------------------------

/// Six-dimensional analytics assessment. Every field is in `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumAnalyticsScore {
    pub overall: f64,
    pub visual_quality: f64,
    pub data_clarity: f64,
    pub professional_appearance: f64,
    pub mobile_optimization: f64,
    pub accessibility: f64,
    pub premium_features: f64,
}

impl PremiumAnalyticsScore {
    /// Build from the six sub-scores (same order as [`Self::sub_scores`]).
    pub fn from_sub_scores(sub: [f64; 6]) -> Self {
        let sub = sub.map(clamp_score);
        Self {
            overall: clamp_score(mean(&sub)),
            visual_quality: sub[0],
            data_clarity: sub[1],
            professional_appearance: sub[2],
            mobile_optimization: sub[3],
            accessibility: sub[4],
            premium_features: sub[5],
        }
    }

    pub fn from_base(base: f64) -> Self {
        Self::from_sub_scores(ANALYTICS_OFFSETS.map(|offset| base + offset))
    }

    /// All-zero score recorded when assessment failed.
    pub fn zero() -> Self {
        Self::from_sub_scores([0.0; 6])
    }

    pub fn sub_scores(&self) -> [f64; 6] {
        [
            self.visual_quality,
            self.data_clarity,
            self.professional_appearance,
            self.mobile_optimization,
            self.accessibility,
            self.premium_features,
        ]
    }
}

/// Score an analytics visualization from its extracted features.
pub fn score_premium_analytics(features: &AnalyticsFeatures) -> PremiumAnalyticsScore {
    let base = ANALYTICS_BASE_SCORE + PREMIUM_FEATURE_BONUS * features.premium_features.len() as f64;
    PremiumAnalyticsScore::from_base(base)
}
