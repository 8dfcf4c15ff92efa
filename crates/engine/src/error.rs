// In crates/engine/src/error.rs

use core_types::Symbol;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build voters: {0}")]
    Strategies(#[from] strategies::Error),

    #[error("Risk manager error: {0}")]
    Risk(#[from] risk::Error),

    #[error("Market data error: {0}")]
    MarketData(#[from] market_data::Error),

    #[error("Fetch for {symbol} timed out after {secs}s")]
    Timeout { symbol: Symbol, secs: u64 },

    #[error("No usable price for {0}")]
    NoPrice(Symbol),
}

pub type Result<T> = std::result::Result<T, Error>;
