// In crates/app-config/src/types.rs

use crate::{Error, Result};
use core_types::{Symbol, VoterConfig};
use risk::RiskSettings;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;
use strategies::factory::VOTER_NAMES;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub risk: RiskSettings,
    #[serde(default)]
    pub trading: TradingSettings,
    #[serde(default)]
    pub scanner: ScannerSettings,
    #[serde(default)]
    pub market_data: MarketDataSettings,
    /// Voter registry, in evaluation order. All four voters when omitted.
    #[serde(default = "strategies::default_voter_configs")]
    pub voters: Vec<VoterConfig>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TradingSettings {
    /// Composite confidence (0-100) required before a BUY or SELL is acted on.
    pub min_confidence: f64,
    /// Fallback stop distance as a fraction of entry when no ATR is available.
    pub stop_loss_percent: Decimal,
    /// Take-profit distance as a multiple of the stop distance.
    pub reward_ratio: Decimal,
    /// Close an open position when its symbol produces a SELL.
    pub auto_close_on_signal: bool,
    /// Sell everything at a fresh quote when the engine stops.
    pub liquidate_on_shutdown: bool,
}

impl Default for TradingSettings {
    fn default() -> Self {
        Self {
            min_confidence: 60.0,
            stop_loss_percent: dec!(0.02),
            reward_ratio: dec!(2.0),
            auto_close_on_signal: true,
            liquidate_on_shutdown: false,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ScannerSettings {
    pub watchlist: Vec<Symbol>,
    pub scan_interval_seconds: u64,
    /// Pause between symbols within one scan.
    pub symbol_delay_millis: u64,
    /// Stop after this many cycles. Runs until interrupted when unset.
    pub max_cycles: Option<u64>,
    /// Give up on a single fetch after this long. Fetches block when unset.
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            watchlist: ["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA"]
                .into_iter()
                .map(Symbol::from)
                .collect(),
            scan_interval_seconds: 300,
            symbol_delay_millis: 300,
            max_cycles: None,
            fetch_timeout_secs: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MarketDataSettings {
    /// JSON recording played back by the replay feed.
    pub replay_file: PathBuf,
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        Self {
            replay_file: PathBuf::from("data/replay.json"),
        }
    }
}

impl Settings {
    /// Rejects values the engine cannot start with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::Invalid(msg));
        let risk = &self.risk;

        if risk.initial_capital <= Decimal::ZERO {
            return invalid(format!(
                "risk.initial_capital must be positive, got {}",
                risk.initial_capital
            ));
        }
        if risk.max_risk_per_trade <= Decimal::ZERO || risk.max_risk_per_trade > Decimal::ONE {
            return invalid(format!(
                "risk.max_risk_per_trade must be in (0, 1], got {}",
                risk.max_risk_per_trade
            ));
        }
        if risk.max_daily_loss_fraction <= Decimal::ZERO
            || risk.max_daily_loss_fraction > Decimal::ONE
        {
            return invalid(format!(
                "risk.max_daily_loss_fraction must be in (0, 1], got {}",
                risk.max_daily_loss_fraction
            ));
        }
        if risk.max_open_positions == 0 {
            return invalid("risk.max_open_positions must be at least 1".to_string());
        }

        let trading = &self.trading;
        if !(0.0..=100.0).contains(&trading.min_confidence) {
            return invalid(format!(
                "trading.min_confidence must be within 0-100, got {}",
                trading.min_confidence
            ));
        }
        if trading.stop_loss_percent <= Decimal::ZERO || trading.stop_loss_percent >= Decimal::ONE
        {
            return invalid(format!(
                "trading.stop_loss_percent must be in (0, 1), got {}",
                trading.stop_loss_percent
            ));
        }
        if trading.reward_ratio <= Decimal::ZERO {
            return invalid(format!(
                "trading.reward_ratio must be positive, got {}",
                trading.reward_ratio
            ));
        }

        let scanner = &self.scanner;
        if scanner.watchlist.is_empty() {
            return invalid("scanner.watchlist must name at least one symbol".to_string());
        }
        if scanner.max_cycles == Some(0) {
            return invalid("scanner.max_cycles must be at least 1 when set".to_string());
        }
        if scanner.fetch_timeout_secs == Some(0) {
            return invalid("scanner.fetch_timeout_secs must be at least 1 when set".to_string());
        }

        if let Some(unknown) = self
            .voters
            .iter()
            .find(|v| !VOTER_NAMES.contains(&v.name.as_str()))
        {
            return invalid(format!("unknown voter '{}'", unknown.name));
        }
        if !self.voters.iter().any(|v| v.enabled) {
            return invalid("at least one voter must be enabled".to_string());
        }

        Ok(())
    }
}
