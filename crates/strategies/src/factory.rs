// In crates/strategies/src/factory.rs

use crate::breakout::Breakout;
use crate::mean_reversion::MeanReversion;
use crate::momentum::Momentum;
use crate::trend_following::TrendFollowing;
use crate::types::{
    BreakoutSettings, MeanReversionSettings, MomentumSettings, TrendFollowingSettings,
};
use crate::{Error, Result, Voter};
use core_types::VoterConfig;
use serde::de::DeserializeOwned;

pub const VOTER_NAMES: [&str; 4] = ["momentum", "trend_following", "breakout", "mean_reversion"];

/// Builds the enabled voters from their config entries, in config order.
pub fn create_voters(configs: &[VoterConfig]) -> Result<Vec<Box<dyn Voter + Send + Sync>>> {
    let mut voters = Vec::new();

    for voter_config in configs.iter().filter(|c| c.enabled) {
        let voter: Box<dyn Voter + Send + Sync> = match voter_config.name.as_str() {
            "momentum" => Box::new(Momentum::new(params::<MomentumSettings>(voter_config)?)),
            "trend_following" => Box::new(TrendFollowing::new(params::<TrendFollowingSettings>(
                voter_config,
            )?)),
            "breakout" => Box::new(Breakout::new(params::<BreakoutSettings>(voter_config)?)),
            "mean_reversion" => Box::new(MeanReversion::new(params::<MeanReversionSettings>(
                voter_config,
            )?)),
            unknown => return Err(Error::UnknownVoter(unknown.to_string())),
        };
        voters.push(voter);
    }

    Ok(voters)
}

/// All four voters with default parameters.
pub fn default_voter_configs() -> Vec<VoterConfig> {
    VOTER_NAMES.iter().map(|name| VoterConfig::named(name)).collect()
}

fn params<T: DeserializeOwned>(config: &VoterConfig) -> Result<T> {
    config
        .params
        .clone()
        .try_into()
        .map_err(|source| Error::InvalidParams {
            voter: config.name.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_all_four_voters() {
        let voters = create_voters(&default_voter_configs()).unwrap();
        let names: Vec<_> = voters.iter().map(|v| v.name()).collect();
        assert_eq!(names, VOTER_NAMES);
    }

    #[test]
    fn disabled_voters_are_skipped() {
        let mut configs = default_voter_configs();
        configs[1].enabled = false;
        let voters = create_voters(&configs).unwrap();
        assert_eq!(voters.len(), 3);
        assert!(voters.iter().all(|v| v.name() != "trend_following"));
    }

    #[test]
    fn unknown_voter_is_rejected() {
        let err = create_voters(&[VoterConfig::named("astrology")]).err().unwrap();
        assert!(matches!(err, Error::UnknownVoter(name) if name == "astrology"));
    }

    #[test]
    fn params_override_defaults() {
        let config: VoterConfig = toml::from_str(
            r#"
            name = "momentum"
            params = { min_score = 2, rsi_oversold = 25.0 }
            "#,
        )
        .unwrap();
        let settings: MomentumSettings = params(&config).unwrap();
        assert_eq!(settings.min_score, 2);
        assert_eq!(settings.rsi_oversold, 25.0);
        assert_eq!(settings.rsi_overbought, 70.0);
    }

    #[test]
    fn malformed_params_are_reported() {
        let config: VoterConfig = toml::from_str(
            r#"
            name = "breakout"
            params = { volume_surge_ratio = "lots" }
            "#,
        )
        .unwrap();
        let err = create_voters(&[config]).err().unwrap();
        assert!(matches!(err, Error::InvalidParams { ref voter, .. } if voter == "breakout"));
    }
}
