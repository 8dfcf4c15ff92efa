// In crates/core-types/src/lib.rs

pub mod error;
pub mod strategy;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use strategy::VoterConfig;
pub use types::{
    indicators, Action, CloseReason, IndicatorSnapshot, Position, Quote, Signal, Symbol,
    TradeRecord, Votes,
};
