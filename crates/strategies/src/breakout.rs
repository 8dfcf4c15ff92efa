// In crates/strategies/src/breakout.rs

use crate::types::BreakoutSettings;
use crate::{Result, Voter, insufficient_data, require};
use core_types::indicators::{BB_HIGH, BB_LOW, BB_WIDTH, CLOSE, VOLUME_RATIO};
use core_types::{Action, IndicatorSnapshot, Signal};

/// Band breakouts confirmed by a volume surge.
#[derive(Debug, Default)]
pub struct Breakout {
    settings: BreakoutSettings,
}

impl Breakout {
    pub fn new(settings: BreakoutSettings) -> Self {
        Self { settings }
    }
}

impl Voter for Breakout {
    fn name(&self) -> &'static str {
        "breakout"
    }

    fn assess(&self, snapshot: &IndicatorSnapshot) -> Result<Signal> {
        let Some([close, bb_high, bb_low, volume_ratio]) =
            require(snapshot, [CLOSE, BB_HIGH, BB_LOW, VOLUME_RATIO])
        else {
            return Ok(insufficient_data(self.name()));
        };
        let surge = volume_ratio > self.settings.volume_surge_ratio;

        if close > bb_high && surge {
            return Ok(
                Signal::new(self.name(), Action::Buy, self.settings.breakout_confidence)
                    .with_reason(format!("upside breakout on volume ({volume_ratio:.2}x)")),
            );
        }

        if close < bb_low && surge {
            return Ok(
                Signal::new(self.name(), Action::Sell, self.settings.breakout_confidence)
                    .with_reason(format!("downside breakout on volume ({volume_ratio:.2}x)")),
            );
        }

        // The band width is optional: without it there is simply no squeeze call.
        match snapshot.get(BB_WIDTH) {
            Some(width) if width < self.settings.squeeze_width => Ok(Signal::new(
                self.name(),
                Action::Watch,
                self.settings.squeeze_confidence,
            )
            .with_reason("narrow bands, breakout possible")),
            _ => Ok(Signal::hold(self.name())),
        }
    }
}
