// In crates/risk/src/error.rs

use core_types::Symbol;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Trading is blocked: {0}")]
    LimitsReached(String),

    #[error("A position is already open for {0}")]
    PositionExists(Symbol),

    #[error("Order cost {cost} exceeds available capital {available}")]
    InsufficientCapital { cost: Decimal, available: Decimal },

    #[error("No open position for {0}")]
    NoOpenPosition(Symbol),

    #[error(transparent)]
    InvalidPosition(#[from] core_types::Error),

    #[error("Invalid risk parameters: {0}")]
    InvalidParameters(String),
}

pub type Result<T> = std::result::Result<T, Error>;
