// In crates/events/src/lib.rs

use chrono::{DateTime, Utc};
use core_types::TradeRecord;
use risk::PortfolioSummary;
use serde::Serialize;

/// Running counters kept by the engine across cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub scan_count: u64,
    /// Actionable BUY and SELL composites seen during scans.
    pub total_signals: u64,
    /// Opens plus signal-driven closes.
    pub executed_trades: u64,
    /// Buy candidates that sized to zero or were rejected.
    pub skipped_trades: u64,
    /// Symbols whose data could not be fetched or evaluated.
    pub failed_symbols: u64,
}

/// Snapshot of the engine after one full cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub timestamp: DateTime<Utc>,
    pub stats: EngineStats,
    pub portfolio: PortfolioSummary,
}

/// Everything the engine publishes on its broadcast channel.
/// `tag` and `content` are used by serde for clean JSON representation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum EngineEvent {
    CycleReport(CycleReport),
    TradeExecuted(TradeRecord),
    FinalReport(CycleReport),
}
