// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MomentumSettings {
    /// RSI below this reads as oversold (buy pressure).
    pub rsi_oversold: f64,
    /// RSI above this reads as overbought (sell pressure).
    pub rsi_overbought: f64,
    /// Score needed before the voter commits to BUY or SELL.
    pub min_score: u32,
    /// Confidence granted per score point, capped at 100.
    pub confidence_per_point: f64,
}

impl Default for MomentumSettings {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            min_score: 3,
            confidence_per_point: 25.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TrendFollowingSettings {
    pub min_score: u32,
    pub confidence_per_point: f64,
}

impl Default for TrendFollowingSettings {
    fn default() -> Self {
        Self {
            min_score: 3,
            confidence_per_point: 20.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BreakoutSettings {
    /// Volume relative to its average that confirms a band break.
    pub volume_surge_ratio: f64,
    /// Band width below which a squeeze is flagged as WATCH.
    pub squeeze_width: f64,
    pub breakout_confidence: f64,
    pub squeeze_confidence: f64,
}

impl Default for BreakoutSettings {
    fn default() -> Self {
        Self {
            volume_surge_ratio: 1.5,
            squeeze_width: 0.1,
            breakout_confidence: 75.0,
            squeeze_confidence: 50.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MeanReversionSettings {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// Relative distance from the middle band treated as "at the mean".
    pub mean_tolerance: f64,
    pub extreme_confidence: f64,
    pub near_mean_confidence: f64,
}

impl Default for MeanReversionSettings {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            mean_tolerance: 0.01,
            extreme_confidence: 80.0,
            near_mean_confidence: 60.0,
        }
    }
}
