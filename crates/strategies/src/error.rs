// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown voter: {0}")]
    UnknownVoter(String),

    #[error("Invalid parameters for voter '{voter}': {source}")]
    InvalidParams {
        voter: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Voter '{voter}' failed: {reason}")]
    Evaluation { voter: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
