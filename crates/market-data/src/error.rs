// In crates/market-data/src/error.rs

use core_types::Symbol;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No market data for symbol {0}")]
    UnknownSymbol(Symbol),

    #[error("Series for {0} has no ticks")]
    NoData(Symbol),

    #[error("Price {price} for {symbol} is not a valid decimal")]
    InvalidPrice { symbol: Symbol, price: f64 },

    #[error("Failed to read market data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse market data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Market data source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, Error>;
