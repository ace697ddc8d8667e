//! Content categories attached to every photorealism validation request.
//!
//! The category biases scoring (expected-element bonus) and is named in
//! rejection messages so reviewers see what the content was meant to depict.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What the generated image is supposed to depict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    HealthFitness,
    NutritionFood,
    FinancialSuccess,
    WellnessLifestyle,
    Celebration,
    Motivational,
}

impl ContentCategory {
    /// Every category, in declaration order.
    pub const ALL: [ContentCategory; 6] = [
        ContentCategory::HealthFitness,
        ContentCategory::NutritionFood,
        ContentCategory::FinancialSuccess,
        ContentCategory::WellnessLifestyle,
        ContentCategory::Celebration,
        ContentCategory::Motivational,
    ];

    /// Stable snake_case identifier (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::HealthFitness => "health_fitness",
            ContentCategory::NutritionFood => "nutrition_food",
            ContentCategory::FinancialSuccess => "financial_success",
            ContentCategory::WellnessLifestyle => "wellness_lifestyle",
            ContentCategory::Celebration => "celebration",
            ContentCategory::Motivational => "motivational",
        }
    }

    /// Human-readable label used in rejection messages.
    pub fn label(&self) -> &'static str {
        match self {
            ContentCategory::HealthFitness => "Health & Fitness",
            ContentCategory::NutritionFood => "Nutrition & Food",
            ContentCategory::FinancialSuccess => "Financial Success",
            ContentCategory::WellnessLifestyle => "Wellness & Lifestyle",
            ContentCategory::Celebration => "Celebration",
            ContentCategory::Motivational => "Motivational",
        }
    }

    /// Built-in expected-element keywords for this category.
    ///
    /// Deployments may override these through the `scoring.category_keywords`
    /// section of the engine configuration.
    pub fn default_expected_elements(&self) -> &'static [&'static str] {
        match self {
            ContentCategory::HealthFitness => &[
                "gym", "exercise", "workout", "fitness", "training", "athlete", "running",
                "yoga", "weights",
            ],
            ContentCategory::NutritionFood => &[
                "food", "meal", "vegetables", "fruit", "healthy eating", "kitchen", "salad",
                "cooking",
            ],
            ContentCategory::FinancialSuccess => &[
                "office", "business", "laptop", "investment", "savings", "professional attire",
                "meeting",
            ],
            ContentCategory::WellnessLifestyle => &[
                "meditation", "relaxation", "nature", "spa", "self care", "outdoors", "sleep",
            ],
            ContentCategory::Celebration => &[
                "party", "celebration", "achievement", "milestone", "friends", "cheers",
                "confetti",
            ],
            ContentCategory::Motivational => &[
                "goal", "success", "determination", "sunrise", "mountain", "progress",
                "inspiration",
            ],
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = ContentCategory::ALL.iter().map(|c| c.as_str()).collect();
                CoreError::Validation(format!(
                    "Unknown content category '{s}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_identifier() {
        for category in ContentCategory::ALL {
            assert_eq!(category.as_str().parse::<ContentCategory>().unwrap(), category);
        }
    }

    #[test]
    fn unknown_identifier_rejected() {
        let msg = "sports".parse::<ContentCategory>().unwrap_err().to_string();
        assert!(msg.contains("Unknown content category"));
        assert!(msg.contains("health_fitness"));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ContentCategory::WellnessLifestyle).unwrap();
        assert_eq!(json, "\"wellness_lifestyle\"");
    }

    #[test]
    fn every_category_has_expected_elements() {
        for category in ContentCategory::ALL {
            assert!(!category.default_expected_elements().is_empty());
        }
    }
}
