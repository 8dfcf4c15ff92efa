// In crates/strategies/src/lib.rs

use core_types::{IndicatorSnapshot, Signal};

pub mod aggregator;
pub mod breakout;
pub mod error;
pub mod factory;
pub mod mean_reversion;
pub mod momentum;
pub mod trend_following;
pub mod types;

pub use aggregator::SignalAggregator;
pub use error::{Error, Result};
pub use factory::{create_voters, default_voter_configs};

/// The universal interface for a strategy voter.
///
/// A voter encodes one independent heuristic over a single indicator snapshot.
/// Missing or NaN inputs are an expected condition: the voter answers HOLD with
/// zero confidence. An `Err` is reserved for genuine faults and causes the
/// aggregator to drop this voter from the current tally.
pub trait Voter {
    /// The name of the voter.
    fn name(&self) -> &'static str;

    fn assess(&self, snapshot: &IndicatorSnapshot) -> Result<Signal>;
}

/// Reads every named indicator, or `None` if any of them is missing.
pub(crate) fn require<const N: usize>(
    snapshot: &IndicatorSnapshot,
    names: [&str; N],
) -> Option<[f64; N]> {
    let mut values = [0.0; N];
    for (slot, name) in values.iter_mut().zip(names) {
        *slot = snapshot.get(name)?;
    }
    Some(values)
}

/// Shared answer for snapshots that lack the inputs a voter needs.
pub(crate) fn insufficient_data(source: &'static str) -> Signal {
    Signal::hold(source).with_reason("insufficient indicator data")
}
