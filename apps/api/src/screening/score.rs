//! Display-score normalization.
//!
//! Raw match scores from the ranking service cluster in a narrow low band
//! (roughly 15–25). `normalize_and_inflate` stretches that band onto 50–95 and
//! reserves 5 and 100 for the two saturated edges. The result is for display
//! only; ranking order always comes from the raw score.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MIN_SCORE: f64 = 15.0;
pub const DEFAULT_MAX_SCORE: f64 = 25.0;

/// Lowest value ever displayed. A zero or negative score still shows something.
pub const FLOOR_DISPLAY: u8 = 5;
pub const CEILING_DISPLAY: u8 = 100;

const BAND_LOW: f64 = 50.0;
const BAND_WIDTH: f64 = 45.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("calibration bounds must be finite (min={min}, max={max})")]
    NonFinite { min: f64, max: f64 },

    #[error("calibration max ({max}) must be greater than min ({min})")]
    EmptyBand { min: f64, max: f64 },
}

/// The "typical" raw band that is mapped linearly onto 50–95.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreCalibration {
    min_score: f64,
    max_score: f64,
}

impl ScoreCalibration {
    pub fn new(min_score: f64, max_score: f64) -> Result<Self, ScoreError> {
        if !min_score.is_finite() || !max_score.is_finite() {
            return Err(ScoreError::NonFinite {
                min: min_score,
                max: max_score,
            });
        }
        if max_score <= min_score {
            return Err(ScoreError::EmptyBand {
                min: min_score,
                max: max_score,
            });
        }
        Ok(Self {
            min_score,
            max_score,
        })
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }
}

impl Default for ScoreCalibration {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_score: DEFAULT_MAX_SCORE,
        }
    }
}

/// User-facing percentage in `[5, 100]`.
///
/// Only [`normalize_and_inflate`] builds one, so it is serialize-only.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct DisplayScore(u8);

impl DisplayScore {
    pub fn value(self) -> u8 {
        self.0
    }

    pub fn tier(self) -> MatchTier {
        MatchTier::from_display(self)
    }
}

/// Maps a raw match score onto the display band.
///
/// Precedence: `>= 100` → 100, `<= 0` (and NaN) → 5, otherwise
/// `50 + 45 * (raw - min) / (max - min)` rounded half-up and clamped to `[5, 100]`.
/// Values outside the calibration band extrapolate before the final clamp.
pub fn normalize_and_inflate(raw: f64, calibration: &ScoreCalibration) -> DisplayScore {
    if raw >= 100.0 {
        return DisplayScore(CEILING_DISPLAY);
    }
    if raw.is_nan() || raw <= 0.0 {
        return DisplayScore(FLOOR_DISPLAY);
    }

    let normalized =
        (raw - calibration.min_score) / (calibration.max_score - calibration.min_score);
    let inflated = BAND_LOW + normalized * BAND_WIDTH;

    let rounded = (inflated + 0.5).floor();
    let clamped = rounded.clamp(f64::from(FLOOR_DISPLAY), f64::from(CEILING_DISPLAY));
    DisplayScore(clamped as u8)
}

/// Color band a display score falls into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Excellent,
    Good,
    Fair,
    Low,
}

impl MatchTier {
    pub fn from_display(score: DisplayScore) -> Self {
        match score.value() {
            85..=u8::MAX => MatchTier::Excellent,
            70..=84 => MatchTier::Good,
            55..=69 => MatchTier::Fair,
            _ => MatchTier::Low,
        }
    }
}
