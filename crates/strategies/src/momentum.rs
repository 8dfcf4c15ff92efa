// In crates/strategies/src/momentum.rs

use crate::types::MomentumSettings;
use crate::{Result, Voter, insufficient_data, require};
use core_types::indicators::{MACD, MACD_SIGNAL, RSI};
use core_types::{Action, IndicatorSnapshot, Signal};

/// Oscillator momentum confirmed by the MACD trend line.
///
/// Each condition (RSI extreme, MACD versus its signal line) is worth two
/// points, so with the default `min_score` of 3 both must agree.
#[derive(Debug, Default)]
pub struct Momentum {
    settings: MomentumSettings,
}

impl Momentum {
    pub fn new(settings: MomentumSettings) -> Self {
        Self { settings }
    }
}

impl Voter for Momentum {
    fn name(&self) -> &'static str {
        "momentum"
    }

    fn assess(&self, snapshot: &IndicatorSnapshot) -> Result<Signal> {
        let Some([rsi, macd, macd_signal]) = require(snapshot, [RSI, MACD, MACD_SIGNAL]) else {
            return Ok(insufficient_data(self.name()));
        };

        let mut reasons = Vec::new();
        let mut buy_score = 0;
        let mut sell_score = 0;

        // --- Buy conditions ---
        if rsi < self.settings.rsi_oversold {
            buy_score += 2;
            reasons.push(format!("RSI oversold ({rsi:.2})"));
        }
        if macd > macd_signal {
            buy_score += 2;
            reasons.push("MACD above signal line".to_string());
        }

        // --- Sell conditions ---
        if rsi > self.settings.rsi_overbought {
            sell_score += 2;
            reasons.push(format!("RSI overbought ({rsi:.2})"));
        }
        if macd < macd_signal {
            sell_score += 2;
            reasons.push("MACD below signal line".to_string());
        }

        let per_point = self.settings.confidence_per_point;
        let signal = if buy_score >= self.settings.min_score {
            Signal::new(self.name(), Action::Buy, f64::from(buy_score) * per_point)
        } else if sell_score >= self.settings.min_score {
            Signal::new(self.name(), Action::Sell, f64::from(sell_score) * per_point)
        } else {
            Signal::hold(self.name())
        };

        Ok(reasons.into_iter().fold(signal, Signal::with_reason))
    }
}
