/// Verdict records are keyed by random UUIDs.
pub type RecordId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Lowest value any score may take.
pub const SCORE_MIN: f64 = 0.0;

/// Highest value any score may take.
pub const SCORE_MAX: f64 = 10.0;

/// Clamp a raw score into `[SCORE_MIN, SCORE_MAX]`. `NaN` maps to the floor.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        SCORE_MIN
    } else {
        value.clamp(SCORE_MIN, SCORE_MAX)
    }
}
