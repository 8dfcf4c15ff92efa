// In crates/risk/src/manager.rs

use crate::clock::{Clock, SystemClock};
use crate::types::{PortfolioSummary, PositionReport, RiskSettings};
use crate::{Error, Result};
use chrono::NaiveDate;
use core_types::{CloseReason, Position, Symbol, TradeRecord};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Share of current capital a single position may consume.
const CAPITAL_BUFFER: Decimal = dec!(0.9);
/// ATR multiple used for volatility-based stops.
const VOLATILITY_STOP_MULTIPLE: Decimal = dec!(2);

/// Owns capital, open and closed positions, and the trading-limit state.
///
/// Capital is debited at open and credited at close using the exit price.
/// At most one position per symbol is open at any time.
pub struct RiskManager {
    settings: RiskSettings,
    capital: Decimal,
    positions: BTreeMap<Symbol, Position>,
    closed_positions: Vec<Position>,
    trade_history: Vec<TradeRecord>,

    total_trades: u32,
    winning_trades: u32,
    losing_trades: u32,
    total_profit: Decimal,
    total_loss: Decimal,
    peak_capital: Decimal,
    max_drawdown: Decimal,

    daily_loss: Decimal,
    last_reset_date: NaiveDate,
    clock: Box<dyn Clock>,
}

impl RiskManager {
    pub fn new(settings: RiskSettings) -> Result<Self> {
        Self::with_clock(settings, Box::new(SystemClock))
    }

    pub fn with_clock(settings: RiskSettings, clock: Box<dyn Clock>) -> Result<Self> {
        validate(&settings)?;
        let today = clock.now().date_naive();
        Ok(Self {
            capital: settings.initial_capital,
            peak_capital: settings.initial_capital,
            settings,
            positions: BTreeMap::new(),
            closed_positions: Vec::new(),
            trade_history: Vec::new(),
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            total_profit: Decimal::ZERO,
            total_loss: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
            daily_loss: Decimal::ZERO,
            last_reset_date: today,
            clock,
        })
    }

    /// Zeroes the daily loss the first time it is looked at on a new UTC day.
    fn reset_daily_counters(&mut self) {
        let today = self.clock.now().date_naive();
        if today > self.last_reset_date {
            if !self.daily_loss.is_zero() {
                info!(date = %today, previous_loss = %self.daily_loss, "Daily loss counter reset.");
            }
            self.daily_loss = Decimal::ZERO;
            self.last_reset_date = today;
        }
    }

    /// Returns the reason trading is blocked, if it is.
    pub fn check_limits(&mut self) -> Result<()> {
        self.reset_daily_counters();

        if self.positions.len() >= self.settings.max_open_positions {
            return Err(Error::LimitsReached(format!(
                "{} open positions (max {})",
                self.positions.len(),
                self.settings.max_open_positions
            )));
        }
        if self.capital <= Decimal::ZERO {
            return Err(Error::LimitsReached(format!(
                "no capital available ({})",
                self.capital
            )));
        }
        let loss_ratio = self.daily_loss.abs() / self.capital;
        if loss_ratio >= self.settings.max_daily_loss_fraction {
            return Err(Error::LimitsReached(format!(
                "daily loss {} reached {:.2}% of capital",
                self.daily_loss,
                loss_ratio * dec!(100)
            )));
        }
        Ok(())
    }

    pub fn can_trade(&mut self) -> bool {
        self.check_limits().is_ok()
    }

    /// `entry - 2 * volatility` when a positive volatility is supplied,
    /// otherwise `entry * (1 - percent)`.
    pub fn calculate_stop_loss(
        entry_price: Decimal,
        volatility: Option<Decimal>,
        stop_loss_percent: Decimal,
    ) -> Decimal {
        match volatility {
            Some(v) if v > Decimal::ZERO => entry_price - VOLATILITY_STOP_MULTIPLE * v,
            _ => entry_price * (Decimal::ONE - stop_loss_percent),
        }
    }

    pub fn calculate_take_profit(
        entry_price: Decimal,
        stop_loss: Decimal,
        reward_ratio: Decimal,
    ) -> Decimal {
        entry_price + (entry_price - stop_loss) * reward_ratio
    }

    /// Units to buy so that hitting the stop loses at most
    /// `capital * max_risk_per_trade`, capped by the capital buffer.
    pub fn calculate_position_size(
        &mut self,
        symbol: &Symbol,
        entry_price: Decimal,
        stop_loss: Decimal,
    ) -> u64 {
        if let Err(e) = self.check_limits() {
            debug!(%symbol, reason = %e, "Position size is zero.");
            return 0;
        }

        let risk_per_share = (entry_price - stop_loss).abs();
        if risk_per_share.is_zero() || entry_price <= Decimal::ZERO {
            return 0;
        }

        let risk_amount = self.capital * self.settings.max_risk_per_trade;
        let by_risk = risk_amount / risk_per_share;
        let by_capital = self.capital * CAPITAL_BUFFER / entry_price;

        by_risk.min(by_capital).trunc().to_u64().unwrap_or(0)
    }

    /// Opens a position and returns its OPEN record. Nothing is mutated on error.
    pub fn try_open_position(
        &mut self,
        symbol: &Symbol,
        quantity: u64,
        entry_price: Decimal,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> Result<TradeRecord> {
        self.check_limits()?;

        if self.positions.contains_key(symbol) {
            return Err(Error::PositionExists(symbol.clone()));
        }

        let cost = Decimal::from(quantity) * entry_price;
        let available = self.capital * CAPITAL_BUFFER;
        if cost > available {
            return Err(Error::InsufficientCapital { cost, available });
        }

        let now = self.clock.now();
        let position = Position::open(
            symbol.clone(),
            quantity,
            entry_price,
            now,
            stop_loss,
            take_profit,
        )?;

        self.capital -= cost;
        self.positions.insert(symbol.clone(), position);

        let record = TradeRecord::Open {
            timestamp: now,
            symbol: symbol.clone(),
            quantity,
            price: entry_price,
            cost,
            stop_loss,
            take_profit,
        };
        self.trade_history.push(record.clone());

        info!(
            %symbol,
            quantity,
            price = %entry_price,
            %cost,
            capital = %self.capital,
            "Position opened."
        );
        Ok(record)
    }

    pub fn open_position(
        &mut self,
        symbol: &Symbol,
        quantity: u64,
        entry_price: Decimal,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> bool {
        match self.try_open_position(symbol, quantity, entry_price, stop_loss, take_profit) {
            Ok(_) => true,
            Err(e) => {
                warn!(%symbol, error = %e, "Open rejected.");
                false
            }
        }
    }

    /// Closes the position at `exit_price` and returns its CLOSE record.
    pub fn try_close_position(
        &mut self,
        symbol: &Symbol,
        exit_price: Decimal,
        reason: CloseReason,
    ) -> Result<TradeRecord> {
        let mut position = self
            .positions
            .remove(symbol)
            .ok_or_else(|| Error::NoOpenPosition(symbol.clone()))?;
        position.update_price(exit_price);

        let proceeds = Decimal::from(position.quantity) * exit_price;
        let pnl = position.pnl();
        self.capital += proceeds;

        self.total_trades += 1;
        if pnl > Decimal::ZERO {
            self.winning_trades += 1;
            self.total_profit += pnl;
        } else {
            // A flat close counts as a loss.
            self.losing_trades += 1;
            self.total_loss += pnl.abs();
            self.reset_daily_counters();
            self.daily_loss += pnl.abs();
        }

        if self.capital > self.peak_capital {
            self.peak_capital = self.capital;
        }
        if self.peak_capital > Decimal::ZERO {
            let drawdown = (self.peak_capital - self.capital) / self.peak_capital;
            self.max_drawdown = self.max_drawdown.max(drawdown);
        }

        let now = self.clock.now();
        let holding_hours = (now - position.entry_time).num_seconds() as f64 / 3600.0;
        let record = TradeRecord::Close {
            timestamp: now,
            symbol: symbol.clone(),
            quantity: position.quantity,
            entry_price: position.entry_price,
            exit_price,
            pnl,
            pnl_percent: position.pnl_percent(),
            reason: reason.clone(),
            holding_hours,
        };
        self.trade_history.push(record.clone());
        self.closed_positions.push(position);

        info!(
            %symbol,
            exit = %exit_price,
            %pnl,
            %reason,
            capital = %self.capital,
            "Position closed."
        );
        Ok(record)
    }

    pub fn close_position(
        &mut self,
        symbol: &Symbol,
        exit_price: Decimal,
        reason: CloseReason,
    ) -> bool {
        match self.try_close_position(symbol, exit_price, reason) {
            Ok(_) => true,
            Err(e) => {
                warn!(%symbol, error = %e, "Close rejected.");
                false
            }
        }
    }

    /// Marks every priced position and closes those whose stop-loss or
    /// take-profit fired. Stop-loss wins when both would fire.
    pub fn update_positions(&mut self, prices: &HashMap<Symbol, Decimal>) -> Vec<TradeRecord> {
        let mut triggered = Vec::new();

        for (symbol, position) in self.positions.iter_mut() {
            let Some(&price) = prices.get(symbol) else {
                continue;
            };
            position.update_price(price);

            if position.should_stop_loss() {
                triggered.push((symbol.clone(), price, CloseReason::StopLoss));
            } else if position.should_take_profit() {
                triggered.push((symbol.clone(), price, CloseReason::TakeProfit));
            }
        }

        let mut closed = Vec::with_capacity(triggered.len());
        for (symbol, price, reason) in triggered {
            match self.try_close_position(&symbol, price, reason) {
                Ok(record) => closed.push(record),
                Err(e) => warn!(%symbol, error = %e, "Triggered close failed."),
            }
        }
        closed
    }

    pub fn portfolio_summary(&self) -> PortfolioSummary {
        let open_positions_value: Decimal =
            self.positions.values().map(Position::market_value).sum();
        let total_value = self.capital + open_positions_value;
        let initial = self.settings.initial_capital;
        let total_return_amount = total_value - initial;

        let ratio = |num: Decimal, den: Decimal| -> f64 {
            if den.is_zero() {
                0.0
            } else {
                (num / den).to_f64().unwrap_or(0.0)
            }
        };

        PortfolioSummary {
            initial_capital: initial,
            capital: self.capital,
            open_positions_value,
            total_value,
            total_return_amount,
            total_return_percent: ratio(total_return_amount, initial) * 100.0,
            total_trades: self.total_trades,
            winning_trades: self.winning_trades,
            losing_trades: self.losing_trades,
            win_rate: ratio(self.winning_trades.into(), self.total_trades.into()) * 100.0,
            avg_profit: average(self.total_profit, self.winning_trades),
            avg_loss: average(self.total_loss, self.losing_trades),
            profit_factor: ratio(self.total_profit, self.total_loss),
            max_drawdown_percent: self.max_drawdown() * 100.0,
            daily_loss: self.daily_loss(),
            open_positions: self.positions.values().map(PositionReport::from).collect(),
        }
    }

    pub fn settings(&self) -> &RiskSettings {
        &self.settings
    }

    pub fn capital(&self) -> Decimal {
        self.capital
    }

    pub fn positions(&self) -> &BTreeMap<Symbol, Position> {
        &self.positions
    }

    pub fn position(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn has_position(&self, symbol: &Symbol) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn closed_positions(&self) -> &[Position] {
        &self.closed_positions
    }

    pub fn trade_history(&self) -> &[TradeRecord] {
        &self.trade_history
    }

    /// Realized loss for the current UTC day. Reads as zero once the day has
    /// rolled over, even before the counter itself is reset.
    pub fn daily_loss(&self) -> Decimal {
        if self.clock.now().date_naive() > self.last_reset_date {
            Decimal::ZERO
        } else {
            self.daily_loss
        }
    }

    /// Largest peak-to-trough decline of capital, as a fraction.
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown.to_f64().unwrap_or(0.0)
    }
}

fn average(total: Decimal, count: u32) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

fn validate(settings: &RiskSettings) -> Result<()> {
    let fraction = |value: Decimal| value > Decimal::ZERO && value <= Decimal::ONE;

    if settings.initial_capital <= Decimal::ZERO {
        return Err(Error::InvalidParameters(format!(
            "initial_capital must be positive, got {}",
            settings.initial_capital
        )));
    }
    if !fraction(settings.max_risk_per_trade) {
        return Err(Error::InvalidParameters(format!(
            "max_risk_per_trade must be in (0, 1], got {}",
            settings.max_risk_per_trade
        )));
    }
    if !fraction(settings.max_daily_loss_fraction) {
        return Err(Error::InvalidParameters(format!(
            "max_daily_loss_fraction must be in (0, 1], got {}",
            settings.max_daily_loss_fraction
        )));
    }
    if settings.max_open_positions == 0 {
        return Err(Error::InvalidParameters(
            "max_open_positions must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap())
    }

    fn manager_with(settings: RiskSettings, clock: &ManualClock) -> RiskManager {
        RiskManager::with_clock(settings, Box::new(clock.clone())).unwrap()
    }

    fn manager(clock: &ManualClock) -> RiskManager {
        manager_with(RiskSettings::default(), clock)
    }

    fn sym(s: &str) -> Symbol {
        Symbol::from(s)
    }

    #[test]
    fn rejects_invalid_settings() {
        let bad = [
            RiskSettings { initial_capital: dec!(0), ..Default::default() },
            RiskSettings { max_risk_per_trade: dec!(1.5), ..Default::default() },
            RiskSettings { max_daily_loss_fraction: dec!(0), ..Default::default() },
            RiskSettings { max_open_positions: 0, ..Default::default() },
        ];
        for settings in bad {
            assert!(matches!(
                RiskManager::new(settings),
                Err(Error::InvalidParameters(_))
            ));
        }
    }

    #[test]
    fn stop_loss_uses_volatility_when_positive() {
        assert_eq!(
            RiskManager::calculate_stop_loss(dec!(100), Some(dec!(1.5)), dec!(0.02)),
            dec!(97)
        );
        assert_eq!(
            RiskManager::calculate_stop_loss(dec!(100), None, dec!(0.02)),
            dec!(98)
        );
        assert_eq!(
            RiskManager::calculate_stop_loss(dec!(100), Some(dec!(0)), dec!(0.02)),
            dec!(98)
        );
    }

    #[test]
    fn take_profit_applies_reward_ratio() {
        assert_eq!(
            RiskManager::calculate_take_profit(dec!(100), dec!(98), dec!(2.0)),
            dec!(104)
        );
    }

    #[test]
    fn sizing_scenario_marks_expected_pnl() {
        let clock = clock();
        let mut rm = manager(&clock);
        let aapl = sym("AAPL");

        let qty = rm.calculate_position_size(&aapl, dec!(150), dec!(147));
        assert_eq!(qty, 60);

        assert!(rm.open_position(&aapl, qty, dec!(150), Some(dec!(147)), Some(dec!(156))));
        assert_eq!(rm.capital(), dec!(1000));

        let closed = rm.update_positions(&HashMap::from([(aapl.clone(), dec!(152))]));
        assert!(closed.is_empty());
        let pos = rm.position(&aapl).unwrap();
        assert_eq!(pos.pnl(), dec!(120));
        assert!((pos.pnl_percent() - 1.333).abs() < 0.01);
    }

    #[test]
    fn size_is_zero_when_trading_is_blocked() {
        let clock = clock();
        let settings = RiskSettings {
            max_open_positions: 1,
            ..Default::default()
        };
        let mut rm = manager_with(settings, &clock);
        assert!(rm.open_position(&sym("AAPL"), 10, dec!(100), None, None));
        assert!(!rm.can_trade());
        assert_eq!(rm.calculate_position_size(&sym("MSFT"), dec!(100), dec!(98)), 0);
    }

    #[test]
    fn size_is_zero_for_zero_stop_distance() {
        let clock = clock();
        let mut rm = manager(&clock);
        assert_eq!(rm.calculate_position_size(&sym("AAPL"), dec!(100), dec!(100)), 0);
    }

    #[test]
    fn duplicate_open_fails_without_capital_change() {
        let clock = clock();
        let mut rm = manager(&clock);
        let aapl = sym("AAPL");
        assert!(rm.open_position(&aapl, 10, dec!(100), None, None));
        let capital = rm.capital();

        let err = rm.try_open_position(&aapl, 5, dec!(100), None, None).unwrap_err();
        assert_eq!(err, Error::PositionExists(aapl.clone()));
        assert_eq!(rm.capital(), capital);
        assert_eq!(rm.trade_history().len(), 1);
    }

    #[test]
    fn open_over_capital_buffer_is_rejected() {
        let clock = clock();
        let mut rm = manager(&clock);
        let err = rm
            .try_open_position(&sym("AAPL"), 91, dec!(100), None, None)
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientCapital { .. }));
        assert_eq!(rm.capital(), dec!(10000));
        assert!(rm.positions().is_empty());
    }

    #[test]
    fn open_with_inverted_stop_is_rejected() {
        let clock = clock();
        let mut rm = manager(&clock);
        let err = rm
            .try_open_position(&sym("AAPL"), 10, dec!(100), Some(dec!(101)), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPosition(_)));
        assert_eq!(rm.capital(), dec!(10000));
    }

    #[test]
    fn closing_missing_position_fails_without_capital_change() {
        let clock = clock();
        let mut rm = manager(&clock);
        assert!(!rm.close_position(&sym("NVDA"), dec!(500), CloseReason::StopLoss));
        assert_eq!(rm.capital(), dec!(10000));
    }

    #[test]
    fn round_trip_settles_capital_at_exit_price() {
        let clock = clock();
        let mut rm = manager(&clock);
        let msft = sym("MSFT");
        assert!(rm.open_position(&msft, 20, dec!(400), None, None));
        clock.advance(Duration::hours(3));

        let record = rm
            .try_close_position(&msft, dec!(410), CloseReason::TakeProfit)
            .unwrap();
        assert_eq!(rm.capital(), dec!(10000) - dec!(8000) + dec!(8200));
        match record {
            TradeRecord::Close { pnl, holding_hours, .. } => {
                assert_eq!(pnl, dec!(200));
                assert_eq!(holding_hours, 3.0);
            }
            other => panic!("expected a close record, got {other:?}"),
        }
        assert_eq!(rm.closed_positions().len(), 1);
        assert_eq!(rm.trade_history().len(), 2);

        let summary = rm.portfolio_summary();
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.winning_trades, 1);
        assert_eq!(summary.win_rate, 100.0);
        assert_eq!(summary.profit_factor, 0.0);
    }

    #[test]
    fn daily_loss_counts_losing_closes_and_resets_next_day() {
        let clock = clock();
        let mut rm = manager(&clock);
        let (a, b) = (sym("AAPL"), sym("MSFT"));

        assert!(rm.open_position(&a, 10, dec!(100), None, None));
        assert!(rm.open_position(&b, 10, dec!(100), None, None));
        rm.close_position(&a, dec!(110), CloseReason::TakeProfit);
        assert_eq!(rm.daily_loss(), dec!(0));

        rm.close_position(&b, dec!(90), CloseReason::StopLoss);
        assert_eq!(rm.daily_loss(), dec!(100));

        clock.advance(Duration::days(1));
        assert!(rm.can_trade());
        assert_eq!(rm.daily_loss(), dec!(0));
    }

    #[test]
    fn reports_see_the_rollover_before_any_limit_check() {
        let clock = clock();
        let mut rm = manager(&clock);
        let a = sym("AAPL");
        assert!(rm.open_position(&a, 10, dec!(100), None, None));
        rm.close_position(&a, dec!(90), CloseReason::StopLoss);
        assert_eq!(rm.portfolio_summary().daily_loss, dec!(100));

        clock.advance(Duration::days(1));
        assert_eq!(rm.daily_loss(), dec!(0));
        assert_eq!(rm.portfolio_summary().daily_loss, dec!(0));
        assert_eq!(rm.portfolio_summary().losing_trades, 1);
    }

    #[test]
    fn daily_loss_circuit_breaker_blocks_trading() {
        let clock = clock();
        let settings = RiskSettings {
            max_daily_loss_fraction: dec!(0.05),
            ..Default::default()
        };
        let mut rm = manager_with(settings, &clock);
        let a = sym("AAPL");
        assert!(rm.open_position(&a, 50, dec!(100), None, None));
        rm.close_position(&a, dec!(89), CloseReason::StopLoss);
        // 550 lost out of 9450 remaining is above 5%.
        assert!(matches!(rm.check_limits(), Err(Error::LimitsReached(_))));
        assert!(!rm.open_position(&sym("MSFT"), 1, dec!(10), None, None));
    }

    #[test]
    fn flat_close_counts_as_loss() {
        let clock = clock();
        let mut rm = manager(&clock);
        let a = sym("AAPL");
        assert!(rm.open_position(&a, 10, dec!(100), None, None));
        rm.close_position(&a, dec!(100), CloseReason::Liquidation);
        let summary = rm.portfolio_summary();
        assert_eq!(summary.losing_trades, 1);
        assert_eq!(summary.win_rate, 0.0);
    }

    #[test]
    fn stop_loss_wins_over_take_profit() {
        let clock = clock();
        let mut rm = manager(&clock);
        let a = sym("AAPL");
        // A position can't be opened with sl >= tp, so force both to fire by
        // moving the thresholds after the fact.
        assert!(rm.open_position(&a, 10, dec!(100), Some(dec!(95)), Some(dec!(105))));
        if let Some(p) = rm.positions.get_mut(&a) {
            p.stop_loss = Some(dec!(120));
            p.take_profit = Some(dec!(101));
        }
        let closed = rm.update_positions(&HashMap::from([(a.clone(), dec!(110))]));
        assert_eq!(closed.len(), 1);
        assert!(matches!(
            &closed[0],
            TradeRecord::Close { reason: CloseReason::StopLoss, .. }
        ));
    }

    #[test]
    fn update_positions_fires_each_trigger_once() {
        let clock = clock();
        let mut rm = manager(&clock);
        let (a, b, c) = (sym("AAPL"), sym("MSFT"), sym("NVDA"));
        assert!(rm.open_position(&a, 10, dec!(100), Some(dec!(95)), Some(dec!(110))));
        assert!(rm.open_position(&b, 10, dec!(100), Some(dec!(95)), Some(dec!(110))));
        assert!(rm.open_position(&c, 10, dec!(100), Some(dec!(95)), Some(dec!(110))));

        let prices = HashMap::from([
            (a.clone(), dec!(94)),
            (b.clone(), dec!(111)),
            (c.clone(), dec!(101)),
        ]);
        let closed = rm.update_positions(&prices);

        let reasons: Vec<_> = closed
            .iter()
            .filter_map(|r| match r {
                TradeRecord::Close { symbol, reason, .. } => Some((symbol.as_str(), reason.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![("AAPL", CloseReason::StopLoss), ("MSFT", CloseReason::TakeProfit)]
        );
        assert!(rm.has_position(&c));
        assert_eq!(rm.position(&c).unwrap().current_price, dec!(101));
    }

    #[test]
    fn drawdown_tracks_decline_from_peak() {
        let clock = clock();
        let mut rm = manager(&clock);
        let a = sym("AAPL");
        assert!(rm.open_position(&a, 10, dec!(100), None, None));
        rm.close_position(&a, dec!(200), CloseReason::TakeProfit);
        // peak is now 11000
        assert!(rm.open_position(&a, 10, dec!(100), None, None));
        rm.close_position(&a, dec!(0), CloseReason::StopLoss);
        // capital 10000, drawdown 1000 / 11000
        assert!((rm.max_drawdown() - 1.0 / 11.0).abs() < 1e-9);
        assert!((rm.portfolio_summary().max_drawdown_percent - 9.0909).abs() < 0.001);
    }

    #[test]
    fn summary_values_open_positions_at_current_price() {
        let clock = clock();
        let mut rm = manager(&clock);
        let a = sym("AAPL");
        assert!(rm.open_position(&a, 10, dec!(100), None, None));
        rm.update_positions(&HashMap::from([(a.clone(), dec!(120))]));

        let summary = rm.portfolio_summary();
        assert_eq!(summary.capital, dec!(9000));
        assert_eq!(summary.open_positions_value, dec!(1200));
        assert_eq!(summary.total_value, dec!(10200));
        assert_eq!(summary.total_return_amount, dec!(200));
        assert!((summary.total_return_percent - 2.0).abs() < 1e-9);
        assert_eq!(summary.open_positions.len(), 1);
        assert_eq!(summary.open_positions[0].pnl, dec!(200));
    }
}
