//! Quality level taxonomy and classification by overall photorealism score.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal fidelity classification.
///
/// Variants are declared lowest first so the derived `Ord` reads naturally:
/// `Photorealistic > ProfessionalPhotography > ... > Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Rejected,
    Cartoon,
    Illustration,
    DigitalArt,
    LifestylePhotography,
    ProfessionalPhotography,
    Photorealistic,
}

/// Inclusive lower bound of each level, highest level first.
const CUT_POINTS: [(f64, QualityLevel); 6] = [
    (9.0, QualityLevel::Photorealistic),
    (8.0, QualityLevel::ProfessionalPhotography),
    (7.0, QualityLevel::LifestylePhotography),
    (5.0, QualityLevel::DigitalArt),
    (3.0, QualityLevel::Illustration),
    (1.0, QualityLevel::Cartoon),
];

impl QualityLevel {
    /// Every level, highest fidelity first.
    pub const ALL: [QualityLevel; 7] = [
        QualityLevel::Photorealistic,
        QualityLevel::ProfessionalPhotography,
        QualityLevel::LifestylePhotography,
        QualityLevel::DigitalArt,
        QualityLevel::Illustration,
        QualityLevel::Cartoon,
        QualityLevel::Rejected,
    ];

    /// Classify an overall score. Total over every `f64`; `NaN` is `Rejected`.
    pub fn classify(overall: f64) -> Self {
        CUT_POINTS
            .iter()
            .find(|(floor, _)| overall >= *floor)
            .map(|(_, level)| *level)
            .unwrap_or(QualityLevel::Rejected)
    }

    /// Levels that always produce a rejection reason.
    pub fn is_rejectable(&self) -> bool {
        matches!(
            self,
            QualityLevel::Cartoon | QualityLevel::Illustration | QualityLevel::Rejected
        )
    }

    /// Levels that read as a real photograph.
    pub fn is_photographic(&self) -> bool {
        *self >= QualityLevel::LifestylePhotography
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::Photorealistic => "Photorealistic",
            QualityLevel::ProfessionalPhotography => "Professional Photography",
            QualityLevel::LifestylePhotography => "Lifestyle Photography",
            QualityLevel::DigitalArt => "Digital Art",
            QualityLevel::Illustration => "Illustration",
            QualityLevel::Cartoon => "Cartoon",
            QualityLevel::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
