// In crates/market-data/src/lib.rs

use async_trait::async_trait;
use core_types::{IndicatorSnapshot, Quote, Symbol};

pub mod error;
pub mod replay;

pub use error::{Error, Result};
pub use replay::{ReplayFeed, Tick};

/// The engine's view of the outside market.
///
/// Implementations own retrieval, caching and retries. The engine only asks
/// for the latest price and the latest indicator values of one symbol at a
/// time, and treats any error as "no data for this symbol this cycle".
#[async_trait]
pub trait MarketData: Send {
    /// Last traded price, or `None` if the source has nothing to offer.
    async fn quote(&mut self, symbol: &Symbol) -> Result<Option<Quote>>;

    /// Latest indicator values. Individual values may be missing or NaN.
    async fn indicator_snapshot(&mut self, symbol: &Symbol) -> Result<IndicatorSnapshot>;
}
