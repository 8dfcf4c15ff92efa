// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A tradable instrument identifier, e.g. "AAPL".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol(value.to_string())
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol(value)
    }
}

/// The action a voter (or the aggregator) recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
    Watch,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
            Action::Watch => "WATCH",
        };
        f.write_str(s)
    }
}

/// Vote tally attached to a composite signal. WATCH votes are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Votes {
    pub buy: u32,
    pub sell: u32,
    pub hold: u32,
}

/// A trading recommendation with a confidence score in `[0, 100]`.
///
/// Produced fresh on every evaluation; the `rationale` is diagnostic only and
/// never drives any decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// The voter that produced this signal, or "composite".
    pub source: String,
    pub action: Action,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<Votes>,
    #[serde(default)]
    pub rationale: Vec<String>,
    /// The per-voter signals behind a composite signal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Signal>,
}

impl Signal {
    pub fn new(source: impl Into<String>, action: Action, confidence: f64) -> Self {
        Self {
            source: source.into(),
            action,
            confidence: confidence.clamp(0.0, 100.0),
            votes: None,
            rationale: Vec::new(),
            details: Vec::new(),
        }
    }

    /// The neutral "nothing to do" answer: HOLD with zero confidence.
    pub fn hold(source: impl Into<String>) -> Self {
        Self::new(source, Action::Hold, 0.0)
    }

    /// Appends a human-readable reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.rationale.push(reason.into());
        self
    }

    /// True if this is a BUY or SELL at or above `min_confidence`.
    pub fn is_actionable(&self, min_confidence: f64) -> bool {
        matches!(self.action, Action::Buy | Action::Sell) && self.confidence >= min_confidence
    }
}

/// Well-known indicator names used as snapshot keys.
pub mod indicators {
    pub const CLOSE: &str = "close";
    pub const RSI: &str = "rsi";
    pub const MACD: &str = "macd";
    pub const MACD_SIGNAL: &str = "macd_signal";
    pub const SMA_20: &str = "sma_20";
    pub const SMA_50: &str = "sma_50";
    pub const EMA_12: &str = "ema_12";
    pub const EMA_26: &str = "ema_26";
    pub const BB_HIGH: &str = "bb_high";
    pub const BB_LOW: &str = "bb_low";
    pub const BB_MID: &str = "bb_mid";
    pub const BB_WIDTH: &str = "bb_width";
    pub const VOLUME_RATIO: &str = "volume_ratio";
    pub const ATR: &str = "atr";
}

/// A flat mapping of indicator name to value for one symbol at one instant.
///
/// Values may be absent (`None`) or NaN; both read back as missing through
/// [`IndicatorSnapshot::get`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub symbol: Symbol,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub values: HashMap<String, Option<f64>>,
}

impl IndicatorSnapshot {
    pub fn new(symbol: Symbol, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol,
            timestamp,
            values: HashMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, Some(value));
        self
    }

    pub fn insert(&mut self, name: &str, value: Option<f64>) {
        self.values.insert(name.to_string(), value);
    }

    /// Returns the value for `name` if it is present and finite.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .get(name)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
    }

    /// Last traded/close price carried by the snapshot.
    pub fn close(&self) -> Option<f64> {
        self.get(indicators::CLOSE)
    }
}

/// A last-trade price for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// One open long holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: Symbol,
    pub quantity: u64,
    pub entry_price: Decimal,
    pub entry_time: DateTime<Utc>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub current_price: Decimal,
}

impl Position {
    /// Opens a position, enforcing `quantity > 0`, a positive entry price and
    /// `stop_loss < entry_price < take_profit` for whichever thresholds are set.
    pub fn open(
        symbol: Symbol,
        quantity: u64,
        entry_price: Decimal,
        entry_time: DateTime<Utc>,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidPosition {
            symbol: symbol.0.clone(),
            reason,
        };

        if quantity == 0 {
            return Err(invalid("quantity must be positive".to_string()));
        }
        if entry_price <= Decimal::ZERO {
            return Err(invalid(format!("entry price {entry_price} must be positive")));
        }
        if let Some(sl) = stop_loss {
            if sl >= entry_price {
                return Err(invalid(format!(
                    "stop loss {sl} must be below entry price {entry_price}"
                )));
            }
        }
        if let Some(tp) = take_profit {
            if tp <= entry_price {
                return Err(invalid(format!(
                    "take profit {tp} must be above entry price {entry_price}"
                )));
            }
        }

        Ok(Self {
            symbol,
            quantity,
            entry_price,
            entry_time,
            stop_loss,
            take_profit,
            current_price: entry_price,
        })
    }

    pub fn update_price(&mut self, price: Decimal) {
        self.current_price = price;
    }

    /// Cash committed at entry.
    pub fn cost(&self) -> Decimal {
        Decimal::from(self.quantity) * self.entry_price
    }

    /// Mark-to-market value at the current price.
    pub fn market_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.current_price
    }

    /// Unrealized profit or loss.
    pub fn pnl(&self) -> Decimal {
        Decimal::from(self.quantity) * (self.current_price - self.entry_price)
    }

    /// Unrealized profit or loss as a percentage of the entry price.
    pub fn pnl_percent(&self) -> f64 {
        ((self.current_price - self.entry_price) / self.entry_price * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
    }

    pub fn should_stop_loss(&self) -> bool {
        self.stop_loss.is_some_and(|sl| self.current_price <= sl)
    }

    pub fn should_take_profit(&self) -> bool {
        self.take_profit.is_some_and(|tp| self.current_price >= tp)
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CloseReason {
    StopLoss,
    TakeProfit,
    SellSignal { confidence: f64 },
    Liquidation,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::StopLoss => f.write_str("stop loss"),
            CloseReason::TakeProfit => f.write_str("take profit"),
            CloseReason::SellSignal { confidence } => {
                write!(f, "sell signal (confidence {confidence:.0}%)")
            }
            CloseReason::Liquidation => f.write_str("liquidation on shutdown"),
        }
    }
}

/// Append-only audit record of opens and closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeRecord {
    Open {
        timestamp: DateTime<Utc>,
        symbol: Symbol,
        quantity: u64,
        price: Decimal,
        cost: Decimal,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    },
    Close {
        timestamp: DateTime<Utc>,
        symbol: Symbol,
        quantity: u64,
        entry_price: Decimal,
        exit_price: Decimal,
        pnl: Decimal,
        pnl_percent: f64,
        reason: CloseReason,
        holding_hours: f64,
    },
}
