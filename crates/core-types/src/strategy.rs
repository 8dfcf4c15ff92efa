use serde::Deserialize;
use toml::Value;

/// One `[[voters]]` entry from the configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct VoterConfig {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    // This will hold the `params = { ... }` table from the TOML
    #[serde(default = "empty_params")]
    pub params: Value,
}

impl VoterConfig {
    /// A config entry with default parameters for the named voter.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            params: empty_params(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn empty_params() -> Value {
    Value::Table(toml::map::Map::new())
}
