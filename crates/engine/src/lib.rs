// In crates/engine/src/lib.rs

pub mod cycle;
pub mod error;

pub use cycle::Candidate;
pub use error::{Error, Result};

use app_config::{ScannerSettings, Settings, TradingSettings};
use chrono::Utc;
use core_types::{CloseReason, Quote, Symbol};
use events::{CycleReport, EngineEvent, EngineStats};
use market_data::MarketData;
use risk::RiskManager;
use rust_decimal::Decimal;
use std::time::Duration;
use strategies::SignalAggregator;
use tokio::sync::{broadcast, watch};

/// The scan/decide/execute orchestrator.
///
/// Owns the aggregator, the risk manager and the market data feed. It is the
/// only mutator of risk state and runs on a single task; the only suspension
/// points are data fetches and the pauses between symbols and cycles.
pub struct Engine {
    trading: TradingSettings,
    scanner: ScannerSettings,
    aggregator: SignalAggregator,
    risk_manager: RiskManager,
    market_data: Box<dyn MarketData>,
    events_tx: broadcast::Sender<EngineEvent>,
    shutdown: watch::Receiver<bool>,
    stats: EngineStats,
    cycle: u64,
}

impl Engine {
    pub fn new(
        trading: TradingSettings,
        scanner: ScannerSettings,
        aggregator: SignalAggregator,
        risk_manager: RiskManager,
        market_data: Box<dyn MarketData>,
        events_tx: broadcast::Sender<EngineEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            trading,
            scanner,
            aggregator,
            risk_manager,
            market_data,
            events_tx,
            shutdown,
            stats: EngineStats::default(),
            cycle: 0,
        }
    }

    /// Builds the voters and the risk manager from loaded settings.
    pub fn from_settings(
        settings: &Settings,
        market_data: Box<dyn MarketData>,
        events_tx: broadcast::Sender<EngineEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let aggregator = SignalAggregator::from_configs(&settings.voters)?;
        let risk_manager = RiskManager::new(settings.risk.clone())?;
        Ok(Self::new(
            settings.trading.clone(),
            settings.scanner.clone(),
            aggregator,
            risk_manager,
            market_data,
            events_tx,
            shutdown,
        ))
    }

    /// Runs cycles until `max_cycles` is reached or a stop is requested, then
    /// shuts down. A stop is honoured between cycles, never mid-cycle.
    pub async fn run(&mut self) -> CycleReport {
        tracing::info!(
            watchlist = self.scanner.watchlist.len(),
            voters = ?self.aggregator.voter_names(),
            capital = %self.risk_manager.capital(),
            min_confidence = self.trading.min_confidence,
            max_cycles = ?self.scanner.max_cycles,
            "Engine starting."
        );

        loop {
            if self.stop_requested() {
                tracing::info!("Stop requested. Leaving the scan loop.");
                break;
            }

            self.run_cycle().await;

            if self.scanner.max_cycles.is_some_and(|max| self.cycle >= max) {
                tracing::info!(cycles = self.cycle, "Reached the configured cycle limit.");
                break;
            }

            let interval = Duration::from_secs(self.scanner.scan_interval_seconds);
            tracing::info!(seconds = interval.as_secs(), "Waiting for the next cycle.");
            if !self.pause(interval).await {
                tracing::info!("Stop requested during the wait.");
                break;
            }
        }

        self.shutdown().await
    }

    /// Optionally liquidates what is still open, then publishes the final report.
    pub async fn shutdown(&mut self) -> CycleReport {
        if self.trading.liquidate_on_shutdown {
            let open: Vec<Symbol> = self.risk_manager.positions().keys().cloned().collect();
            if !open.is_empty() {
                tracing::info!(positions = open.len(), "Liquidating open positions.");
            }
            for symbol in open {
                let price = match self.fresh_price(&symbol).await {
                    Ok(price) => price,
                    Err(e) => {
                        tracing::error!(%symbol, error = %e, "Cannot liquidate without a price.");
                        continue;
                    }
                };
                match self
                    .risk_manager
                    .try_close_position(&symbol, price, CloseReason::Liquidation)
                {
                    Ok(record) => self.publish(EngineEvent::TradeExecuted(record)),
                    Err(e) => tracing::error!(%symbol, error = %e, "Liquidation failed."),
                }
            }
        } else if !self.risk_manager.positions().is_empty() {
            tracing::info!(
                positions = self.risk_manager.positions().len(),
                "Leaving positions open on shutdown."
            );
        }

        let report = self.report();
        tracing::info!(
            cycles = report.cycle,
            total_value = %report.portfolio.total_value,
            total_return_percent = report.portfolio.total_return_percent,
            total_trades = report.portfolio.total_trades,
            "Engine stopped."
        );
        self.publish(EngineEvent::FinalReport(report.clone()));
        report
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn risk_manager(&self) -> &RiskManager {
        &self.risk_manager
    }

    fn report(&self) -> CycleReport {
        CycleReport {
            cycle: self.cycle,
            timestamp: Utc::now(),
            stats: self.stats,
            portfolio: self.risk_manager.portfolio_summary(),
        }
    }

    fn publish(&self, event: EngineEvent) {
        // No subscribers is fine.
        let _ = self.events_tx.send(event);
    }

    fn stop_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Sleeps for `duration` unless a stop arrives first. Returns false if stopped.
    async fn pause(&mut self, duration: Duration) -> bool {
        if self.stop_requested() {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            Ok(()) = self.shutdown.changed() => !*self.shutdown.borrow(),
        }
    }

    async fn quote(&mut self, symbol: &Symbol) -> Result<Option<Quote>> {
        let limit = self.scanner.fetch_timeout_secs;
        let fut = self.market_data.quote(symbol);
        with_limit(limit, symbol, fut).await
    }

    /// Latest positive quote price.
    async fn fresh_price(&mut self, symbol: &Symbol) -> Result<Decimal> {
        self.quote(symbol)
            .await?
            .map(|q| q.price)
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| Error::NoPrice(symbol.clone()))
    }
}

/// Applies `fetch_timeout_secs` to a market data call when configured.
async fn with_limit<T>(
    limit: Option<u64>,
    symbol: &Symbol,
    fut: impl Future<Output = market_data::Result<T>>,
) -> Result<T> {
    match limit {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
            .await
            .map_err(|_| Error::Timeout {
                symbol: symbol.clone(),
                secs,
            })?
            .map_err(Error::from),
        None => fut.await.map_err(Error::from),
    }
}
