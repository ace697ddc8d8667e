//! Analytics visualization inputs and their extracted premium signals.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::signals::{phrase_key, TokenizedText};
use crate::config::ScoringKeywords;
use crate::error::CoreError;

/// Signal implied by any declared interactive feature.
const INTERACTIVE_SIGNAL: &str = "interactive";

// ---------------------------------------------------------------------------
// Chart type
// ---------------------------------------------------------------------------

/// Kind of visualization being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Donut,
    Area,
    Scatter,
    Heatmap,
    Gauge,
    Radar,
    Table,
}

impl ChartType {
    pub const ALL: [ChartType; 10] = [
        ChartType::Line,
        ChartType::Bar,
        ChartType::Pie,
        ChartType::Donut,
        ChartType::Area,
        ChartType::Scatter,
        ChartType::Heatmap,
        ChartType::Gauge,
        ChartType::Radar,
        ChartType::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Donut => "donut",
            ChartType::Area => "area",
            ChartType::Scatter => "scatter",
            ChartType::Heatmap => "heatmap",
            ChartType::Gauge => "gauge",
            ChartType::Radar => "radar",
            ChartType::Table => "table",
        }
    }

    /// Charts that divide a whole into slices.
    pub fn is_proportional(&self) -> bool {
        matches!(self, ChartType::Pie | ChartType::Donut)
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = ChartType::ALL.iter().map(|c| c.as_str()).collect();
                CoreError::Validation(format!(
                    "Unknown chart type '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Payload and caller context
// ---------------------------------------------------------------------------

/// Structured description of a generated chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsPayload {
    pub description: String,
    #[serde(default)]
    pub data_point_count: usize,
    #[serde(default)]
    pub visual_style: Option<String>,
    #[serde(default)]
    pub interactive_features: Vec<String>,
}

/// Device the requesting user mostly views analytics on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

/// Who the visualization is for. Only shapes advisory suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub primary_device: DeviceClass,
    #[serde(default)]
    pub requires_accessibility: bool,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Signals extracted from an analytics payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsFeatures {
    /// Premium-feature signals present, in keyword-table order.
    pub premium_features: Vec<String>,
    /// Configured premium-feature signals that were not found.
    pub missing_features: Vec<String>,
    pub data_point_count: usize,
}

/// Match premium-feature signals against the payload text.
///
/// The description, visual style and declared feature names are searched
/// together. Declaring any interactive feature implies the `interactive`
/// signal when the keyword table carries it.
pub fn extract_analytics(payload: &AnalyticsPayload, keywords: &ScoringKeywords) -> AnalyticsFeatures {
    let mut text = payload.description.clone();
    if let Some(style) = &payload.visual_style {
        text.push(' ');
        text.push_str(style);
    }
    for feature in &payload.interactive_features {
        text.push(' ');
        text.push_str(feature);
    }

    let tokens = TokenizedText::new(&text);
    let declares_interaction = payload.interactive_features.iter().any(|f| !f.trim().is_empty());

    let mut seen = HashSet::new();
    let (premium_features, missing_features): (Vec<String>, Vec<String>) = keywords
        .premium_feature_signals
        .iter()
        .filter(|signal| seen.insert(phrase_key(signal)))
        .cloned()
        .partition(|signal| {
            tokens.contains_phrase(signal)
                || (declares_interaction && signal.eq_ignore_ascii_case(INTERACTIVE_SIGNAL))
        });

    AnalyticsFeatures {
        premium_features,
        missing_features,
        data_point_count: payload.data_point_count,
    }
}
