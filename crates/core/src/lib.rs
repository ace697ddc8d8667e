//! Validation and scoring engine for AI-generated premium content.
//!
//! Judges generated images for photorealism and generated analytics charts
//! for premium presentation quality. Pure domain logic: no network, database
//! or disk access. Hosts read content, call [`ValidationEngine`], and persist
//! the verdict records however they like.

pub mod category;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod features;
pub mod hashing;
pub mod quality;
pub mod scoring;
pub mod summary;
pub mod threshold_validation;
pub mod types;

pub use category::ContentCategory;
pub use config::EngineConfig;
pub use decision::ValidationResult;
pub use engine::{PremiumAnalyticsValidation, ValidationEngine, ValidationMetrics};
pub use error::CoreError;
pub use features::{
    AnalyticsPayload, ChartType, ContentSource, DeviceClass, ExpectedContentMetadata,
    FeatureExtractor, UserContext,
};
pub use quality::QualityLevel;
pub use scoring::{PhotorealismScore, PremiumAnalyticsScore};
