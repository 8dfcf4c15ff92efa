// In crates/engine/src/cycle.rs

use crate::{Engine, Result, with_limit};
use core_types::{Action, CloseReason, IndicatorSnapshot, Signal, Symbol, indicators};
use events::{CycleReport, EngineEvent};
use risk::RiskManager;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::collections::HashMap;
use std::time::Duration;

/// A symbol whose composite signal cleared the confidence bar.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub symbol: Symbol,
    pub signal: Signal,
    pub snapshot: IndicatorSnapshot,
}

#[derive(Debug, Default)]
struct ScanOutcome {
    buys: Vec<Candidate>,
    sells: Vec<Candidate>,
}

impl Engine {
    /// One full pass: scan, rank, sell, buy, refresh and report.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycle += 1;
        self.stats.scan_count += 1;
        tracing::info!(cycle = self.cycle, "Starting scan cycle.");

        let ScanOutcome { mut buys, sells } = self.scan().await;

        // Stable: equal confidences keep watchlist order.
        buys.sort_by(|a, b| b.signal.confidence.total_cmp(&a.signal.confidence));

        if self.trading.auto_close_on_signal {
            self.sell_phase(sells).await;
        }
        self.buy_phase(buys).await;
        self.refresh_positions().await;

        let report = self.report();
        tracing::info!(
            cycle = report.cycle,
            capital = %report.portfolio.capital,
            total_value = %report.portfolio.total_value,
            open_positions = report.portfolio.open_positions.len(),
            signals = report.stats.total_signals,
            executed = report.stats.executed_trades,
            skipped = report.stats.skipped_trades,
            "Cycle complete."
        );
        self.publish(EngineEvent::CycleReport(report.clone()));
        report
    }

    /// Evaluates every watchlist symbol once without trading. Symbols whose
    /// data cannot be fetched are logged and left out.
    pub async fn analyze_watchlist(&mut self) -> Vec<(Symbol, Signal)> {
        let watchlist = self.scanner.watchlist.clone();
        let mut results = Vec::with_capacity(watchlist.len());
        for (i, symbol) in watchlist.into_iter().enumerate() {
            if i > 0 {
                self.pause(self.symbol_delay()).await;
            }
            match self.snapshot(&symbol).await {
                Ok(snapshot) => {
                    let signal = self.aggregator.aggregate(&snapshot);
                    results.push((symbol, signal));
                }
                Err(e) => tracing::warn!(%symbol, error = %e, "Skipping symbol."),
            }
        }
        results
    }

    async fn scan(&mut self) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let watchlist = self.scanner.watchlist.clone();

        for (i, symbol) in watchlist.into_iter().enumerate() {
            if i > 0 {
                // Throttle only. A stop cuts the wait short but the scan finishes.
                self.pause(self.symbol_delay()).await;
            }

            let snapshot = match self.snapshot(&symbol).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    self.stats.failed_symbols += 1;
                    tracing::warn!(%symbol, error = %e, "Skipping symbol for this cycle.");
                    continue;
                }
            };

            let signal = self.aggregator.aggregate(&snapshot);
            tracing::debug!(
                %symbol,
                action = %signal.action,
                confidence = signal.confidence,
                "Composite signal."
            );

            if !signal.is_actionable(self.trading.min_confidence) {
                continue;
            }
            self.stats.total_signals += 1;
            tracing::info!(
                %symbol,
                action = %signal.action,
                confidence = signal.confidence,
                "Actionable signal."
            );

            let candidate = Candidate {
                symbol,
                signal,
                snapshot,
            };
            match candidate.signal.action {
                Action::Buy => outcome.buys.push(candidate),
                Action::Sell => outcome.sells.push(candidate),
                Action::Hold | Action::Watch => {}
            }
        }

        outcome
    }

    async fn sell_phase(&mut self, sells: Vec<Candidate>) {
        for candidate in sells {
            let symbol = &candidate.symbol;
            if !self.risk_manager.has_position(symbol) {
                continue;
            }

            let price = match self.fresh_price(symbol).await {
                Ok(price) => price,
                Err(e) => {
                    tracing::warn!(%symbol, error = %e, "Cannot act on sell signal.");
                    continue;
                }
            };

            let reason = CloseReason::SellSignal {
                confidence: candidate.signal.confidence,
            };
            match self.risk_manager.try_close_position(symbol, price, reason) {
                Ok(record) => {
                    self.stats.executed_trades += 1;
                    self.publish(EngineEvent::TradeExecuted(record));
                }
                Err(e) => tracing::warn!(%symbol, error = %e, "Sell signal close rejected."),
            }
        }
    }

    async fn buy_phase(&mut self, buys: Vec<Candidate>) {
        for candidate in buys {
            if let Err(e) = self.risk_manager.check_limits() {
                tracing::info!(reason = %e, "Trading limits reached. No more buys this cycle.");
                break;
            }

            let symbol = &candidate.symbol;
            if self.risk_manager.has_position(symbol) {
                tracing::debug!(%symbol, "Already holding. Ignoring buy signal.");
                continue;
            }

            match self.execute_buy(&candidate).await {
                Ok(true) => self.stats.executed_trades += 1,
                Ok(false) => self.stats.skipped_trades += 1,
                Err(e) => {
                    self.stats.skipped_trades += 1;
                    tracing::warn!(%symbol, error = %e, "Buy skipped.");
                }
            }
        }
    }

    /// Prices, sizes and opens one candidate. `Ok(false)` means it sized to zero.
    async fn execute_buy(&mut self, candidate: &Candidate) -> Result<bool> {
        let symbol = &candidate.symbol;
        let entry = match candidate
            .snapshot
            .close()
            .and_then(Decimal::from_f64)
            .filter(|p| *p > Decimal::ZERO)
        {
            Some(close) => close,
            None => self.fresh_price(symbol).await?,
        };

        let volatility = candidate
            .snapshot
            .get(indicators::ATR)
            .and_then(Decimal::from_f64);
        let stop = RiskManager::calculate_stop_loss(entry, volatility, self.trading.stop_loss_percent);
        let target = RiskManager::calculate_take_profit(entry, stop, self.trading.reward_ratio);
        let quantity = self.risk_manager.calculate_position_size(symbol, entry, stop);

        if quantity == 0 {
            tracing::info!(%symbol, %entry, %stop, "Position size is zero. Skipping.");
            return Ok(false);
        }

        let record =
            self.risk_manager
                .try_open_position(symbol, quantity, entry, Some(stop), Some(target))?;
        tracing::info!(
            %symbol,
            quantity,
            %entry,
            %stop,
            %target,
            confidence = candidate.signal.confidence,
            "Bought."
        );
        self.publish(EngineEvent::TradeExecuted(record));
        Ok(true)
    }

    /// Marks open positions at fresh quotes and lets stop-loss and
    /// take-profit fire.
    async fn refresh_positions(&mut self) {
        let open: Vec<Symbol> = self.risk_manager.positions().keys().cloned().collect();
        if open.is_empty() {
            return;
        }

        let mut prices = HashMap::with_capacity(open.len());
        for symbol in open {
            match self.fresh_price(&symbol).await {
                Ok(price) => {
                    prices.insert(symbol, price);
                }
                Err(e) => tracing::warn!(%symbol, error = %e, "Position not refreshed."),
            }
        }

        for record in self.risk_manager.update_positions(&prices) {
            self.publish(EngineEvent::TradeExecuted(record));
        }
    }

    async fn snapshot(&mut self, symbol: &Symbol) -> Result<IndicatorSnapshot> {
        let limit = self.scanner.fetch_timeout_secs;
        let fut = self.market_data.indicator_snapshot(symbol);
        with_limit(limit, symbol, fut).await
    }

    fn symbol_delay(&self) -> Duration {
        Duration::from_millis(self.scanner.symbol_delay_millis)
    }
}
