// In crates/app-config/src/lib.rs

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, MarketDataSettings, ScannerSettings, Settings, TradingSettings};

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let builder = Config::builder()
        .add_source(File::with_name("config/base"))
        .add_source(File::with_name(&format!("config/{environment}")).required(false));

    finish(with_env(builder))
}

/// Loads one explicit file, still letting environment variables override it.
pub fn load_settings_from(path: impl AsRef<Path>) -> Result<Settings> {
    let builder = Config::builder().add_source(File::from(path.as_ref()));
    finish(with_env(builder))
}

/// Parses settings from an in-memory TOML document. No environment overrides.
pub fn from_toml_str(toml: &str) -> Result<Settings> {
    finish(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
}

// e.g. `APP_RISK__MAX_OPEN_POSITIONS=3`, `APP_SCANNER__WATCHLIST=AAPL,MSFT`.
fn with_env(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("scanner.watchlist")
            .try_parsing(true),
    )
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Symbol;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.risk.initial_capital, dec!(10000));
        assert_eq!(settings.risk.max_open_positions, 5);
        assert_eq!(settings.trading.min_confidence, 60.0);
        assert_eq!(settings.trading.reward_ratio, dec!(2));
        assert!(settings.trading.auto_close_on_signal);
        assert!(!settings.trading.liquidate_on_shutdown);
        assert_eq!(settings.scanner.max_cycles, None);
        assert_eq!(settings.voters.len(), 4);
    }

    #[test]
    fn sections_override_defaults() {
        let settings = from_toml_str(
            r#"
            [risk]
            initial_capital = 25000
            max_risk_per_trade = 0.01
            max_open_positions = 3

            [trading]
            min_confidence = 70
            stop_loss_percent = 0.03

            [scanner]
            watchlist = ["TSLA", "AMD"]
            scan_interval_seconds = 60
            max_cycles = 10
            fetch_timeout_secs = 5

            [[voters]]
            name = "momentum"
            params = { min_score = 2 }

            [[voters]]
            name = "breakout"
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.risk.initial_capital, dec!(25000));
        assert_eq!(settings.risk.max_risk_per_trade, dec!(0.01));
        assert_eq!(settings.risk.max_daily_loss_fraction, dec!(0.1));
        assert_eq!(settings.trading.min_confidence, 70.0);
        assert_eq!(settings.trading.stop_loss_percent, dec!(0.03));
        assert_eq!(
            settings.scanner.watchlist,
            vec![Symbol::from("TSLA"), Symbol::from("AMD")]
        );
        assert_eq!(settings.scanner.max_cycles, Some(10));
        assert_eq!(settings.scanner.fetch_timeout_secs, Some(5));
        assert_eq!(settings.voters.len(), 2);
        assert!(!settings.voters[1].enabled);

        let voters = strategies::create_voters(&settings.voters).unwrap();
        assert_eq!(voters.len(), 1);
    }

    #[test]
    fn invalid_values_are_fatal() {
        let cases = [
            "[risk]\ninitial_capital = 0",
            "[risk]\nmax_open_positions = 0",
            "[trading]\nmin_confidence = 120",
            "[trading]\nstop_loss_percent = 1.5",
            "[scanner]\nwatchlist = []",
            "[scanner]\nmax_cycles = 0",
            "[[voters]]\nname = \"astrology\"",
            "[[voters]]\nname = \"momentum\"\nenabled = false",
        ];
        for case in cases {
            assert!(
                matches!(from_toml_str(case), Err(Error::Invalid(_))),
                "expected rejection for {case:?}"
            );
        }
    }
}
