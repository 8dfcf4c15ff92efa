// In crates/market-data/src/replay.rs

use crate::{Error, MarketData, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{IndicatorSnapshot, Quote, Symbol, indicators};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// One recorded observation for a symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct Tick {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    #[serde(default)]
    pub indicators: HashMap<String, Option<f64>>,
}

#[derive(Debug)]
struct Series {
    ticks: Vec<Tick>,
    /// Index of the tick last served as a snapshot.
    cursor: Option<usize>,
}

impl Series {
    fn advance(&mut self) -> Option<&Tick> {
        let last = self.ticks.len().checked_sub(1)?;
        let next = self.cursor.map_or(0, |i| (i + 1).min(last));
        self.cursor = Some(next);
        self.ticks.get(next)
    }

    fn current(&self) -> Option<&Tick> {
        self.ticks.get(self.cursor.unwrap_or(0))
    }
}

/// A recorded market, played back one tick per snapshot request.
///
/// Each `indicator_snapshot` call moves that symbol's cursor forward and holds
/// at the final tick once the recording runs out. `quote` reads the tick under
/// the cursor without moving it.
#[derive(Debug)]
pub struct ReplayFeed {
    series: HashMap<Symbol, Series>,
}

impl ReplayFeed {
    pub fn from_ticks(ticks: HashMap<Symbol, Vec<Tick>>) -> Self {
        let series = ticks
            .into_iter()
            .map(|(symbol, ticks)| (symbol, Series { ticks, cursor: None }))
            .collect();
        Self { series }
    }

    /// Parses `{ "AAPL": [ { "timestamp": ..., "price": ..., "indicators": {...} } ] }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let ticks: HashMap<Symbol, Vec<Tick>> = serde_json::from_str(json)?;
        Ok(Self::from_ticks(ticks))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let feed = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            symbols = feed.series.len(),
            "Loaded replay market data."
        );
        Ok(feed)
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<_> = self.series.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    fn series_mut(&mut self, symbol: &Symbol) -> Result<&mut Series> {
        self.series
            .get_mut(symbol)
            .ok_or_else(|| Error::UnknownSymbol(symbol.clone()))
    }
}

fn to_decimal(symbol: &Symbol, price: f64) -> Result<Decimal> {
    Decimal::from_f64(price).ok_or_else(|| Error::InvalidPrice {
        symbol: symbol.clone(),
        price,
    })
}

#[async_trait]
impl MarketData for ReplayFeed {
    async fn quote(&mut self, symbol: &Symbol) -> Result<Option<Quote>> {
        let series = self.series_mut(symbol)?;
        let Some(tick) = series.current() else {
            return Ok(None);
        };
        Ok(Some(Quote {
            symbol: symbol.clone(),
            price: to_decimal(symbol, tick.price)?,
            timestamp: tick.timestamp,
        }))
    }

    async fn indicator_snapshot(&mut self, symbol: &Symbol) -> Result<IndicatorSnapshot> {
        let series = self.series_mut(symbol)?;
        let tick = series
            .advance()
            .ok_or_else(|| Error::NoData(symbol.clone()))?;

        let mut snapshot = IndicatorSnapshot::new(symbol.clone(), tick.timestamp);
        for (name, value) in &tick.indicators {
            snapshot.insert(name, *value);
        }
        if !tick.indicators.contains_key(indicators::CLOSE) {
            snapshot.insert(indicators::CLOSE, Some(tick.price));
        }
        debug!(%symbol, timestamp = %tick.timestamp, "Replayed snapshot.");
        Ok(snapshot)
    }
}
