// In crates/strategies/src/mean_reversion.rs

use crate::types::MeanReversionSettings;
use crate::{Result, Voter, insufficient_data, require};
use core_types::indicators::{BB_HIGH, BB_LOW, BB_MID, CLOSE, RSI};
use core_types::{Action, IndicatorSnapshot, Signal};

/// Fades band extremes when the oscillator agrees.
#[derive(Debug, Default)]
pub struct MeanReversion {
    settings: MeanReversionSettings,
}

impl MeanReversion {
    pub fn new(settings: MeanReversionSettings) -> Self {
        Self { settings }
    }
}

impl Voter for MeanReversion {
    fn name(&self) -> &'static str {
        "mean_reversion"
    }

    fn assess(&self, snapshot: &IndicatorSnapshot) -> Result<Signal> {
        let Some([close, bb_high, bb_low, bb_mid, rsi]) =
            require(snapshot, [CLOSE, BB_HIGH, BB_LOW, BB_MID, RSI])
        else {
            return Ok(insufficient_data(self.name()));
        };
        // Zero readings count as missing.
        if [close, bb_high, bb_low, bb_mid, rsi].contains(&0.0) {
            return Ok(insufficient_data(self.name()));
        }
        let s = &self.settings;

        if close < bb_low && rsi < s.rsi_oversold {
            return Ok(Signal::new(self.name(), Action::Buy, s.extreme_confidence)
                .with_reason("price below lower band with oversold RSI"));
        }

        if close > bb_high && rsi > s.rsi_overbought {
            return Ok(Signal::new(self.name(), Action::Sell, s.extreme_confidence)
                .with_reason("price above upper band with overbought RSI"));
        }

        if ((close - bb_mid) / bb_mid).abs() < s.mean_tolerance {
            return Ok(Signal::new(self.name(), Action::Hold, s.near_mean_confidence)
                .with_reason("price near the mean"));
        }

        Ok(Signal::hold(self.name()))
    }
}
