// In crates/risk/src/types.rs

use core_types::{Position, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Account-level limits, loaded from the `[risk]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    pub initial_capital: Decimal,
    /// Fraction of capital put at risk (entry to stop distance) per trade.
    pub max_risk_per_trade: Decimal,
    /// Realized loss for the day, as a fraction of capital, that halts new trades.
    pub max_daily_loss_fraction: Decimal,
    pub max_open_positions: usize,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            initial_capital: dec!(10000),
            max_risk_per_trade: dec!(0.02),
            max_daily_loss_fraction: dec!(0.1),
            max_open_positions: 5,
        }
    }
}

/// One open position as shown in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub symbol: Symbol,
    pub quantity: u64,
    pub entry_price: Decimal,
    pub current_price: Decimal,
    pub pnl: Decimal,
    pub pnl_percent: f64,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
}

impl From<&Position> for PositionReport {
    fn from(p: &Position) -> Self {
        Self {
            symbol: p.symbol.clone(),
            quantity: p.quantity,
            entry_price: p.entry_price,
            current_price: p.current_price,
            pnl: p.pnl(),
            pnl_percent: p.pnl_percent(),
            stop_loss: p.stop_loss,
            take_profit: p.take_profit,
        }
    }
}

/// Read-only projection of the risk manager's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub initial_capital: Decimal,
    /// Uncommitted cash.
    pub capital: Decimal,
    pub open_positions_value: Decimal,
    pub total_value: Decimal,
    pub total_return_amount: Decimal,
    pub total_return_percent: f64,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub win_rate: f64,
    pub avg_profit: Decimal,
    pub avg_loss: Decimal,
    /// Gross profit over gross loss; zero when there are no losses yet.
    pub profit_factor: f64,
    pub max_drawdown_percent: f64,
    pub daily_loss: Decimal,
    pub open_positions: Vec<PositionReport>,
}
