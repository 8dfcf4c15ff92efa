// In crates/strategies/src/trend_following.rs

use crate::types::TrendFollowingSettings;
use crate::{Result, Voter, insufficient_data, require};
use core_types::indicators::{CLOSE, EMA_12, EMA_26, SMA_20, SMA_50};
use core_types::{Action, IndicatorSnapshot, Signal};

/// Scores the ordering of price and moving averages.
#[derive(Debug, Default)]
pub struct TrendFollowing {
    settings: TrendFollowingSettings,
}

impl TrendFollowing {
    pub fn new(settings: TrendFollowingSettings) -> Self {
        Self { settings }
    }
}

impl Voter for TrendFollowing {
    fn name(&self) -> &'static str {
        "trend_following"
    }

    fn assess(&self, snapshot: &IndicatorSnapshot) -> Result<Signal> {
        let Some([close, sma_20, sma_50, ema_12, ema_26]) =
            require(snapshot, [CLOSE, SMA_20, SMA_50, EMA_12, EMA_26])
        else {
            return Ok(insufficient_data(self.name()));
        };

        let mut reasons = Vec::new();
        let mut buy_score: u32 = 0;
        let mut sell_score: u32 = 0;

        // (condition, points, reason) for each side.
        let bullish = [
            (close > sma_20, 1, "price above SMA 20"),
            (close > sma_50, 1, "price above SMA 50"),
            (ema_12 > ema_26, 2, "EMA 12 above EMA 26"),
            (sma_20 > sma_50, 1, "SMA 20 above SMA 50 (uptrend)"),
        ];
        let bearish = [
            (close < sma_20, 1, "price below SMA 20"),
            (close < sma_50, 1, "price below SMA 50"),
            (ema_12 < ema_26, 2, "EMA 12 below EMA 26"),
            (sma_20 < sma_50, 1, "SMA 20 below SMA 50 (downtrend)"),
        ];

        for (hit, points, reason) in bullish {
            if hit {
                buy_score += points;
                reasons.push(reason);
            }
        }
        for (hit, points, reason) in bearish {
            if hit {
                sell_score += points;
                reasons.push(reason);
            }
        }

        let min_score = self.settings.min_score;
        let per_point = self.settings.confidence_per_point;
        let signal = if buy_score >= min_score && buy_score > sell_score {
            Signal::new(self.name(), Action::Buy, f64::from(buy_score) * per_point)
        } else if sell_score >= min_score && sell_score > buy_score {
            Signal::new(self.name(), Action::Sell, f64::from(sell_score) * per_point)
        } else {
            Signal::hold(self.name())
        };

        Ok(reasons.into_iter().fold(signal, Signal::with_reason))
    }
}
