// In crates/strategies/src/aggregator.rs

use crate::{Result, Voter, create_voters};
use core_types::{Action, IndicatorSnapshot, Signal, VoterConfig, Votes};
use tracing::{debug, warn};

pub const COMPOSITE_SOURCE: &str = "composite";
/// Confidence reported when no side wins the vote.
pub const NEUTRAL_CONFIDENCE: f64 = 50.0;

/// Combines independent voters into one composite signal by majority vote.
///
/// A side wins only if its count is strictly greater than both other counts.
/// A winning BUY or SELL carries the mean confidence of the voters that
/// backed it. Every other outcome (a HOLD majority, ties, no votes) is a HOLD
/// at [`NEUTRAL_CONFIDENCE`].
pub struct SignalAggregator {
    voters: Vec<Box<dyn Voter + Send + Sync>>,
}

impl SignalAggregator {
    pub fn new(voters: Vec<Box<dyn Voter + Send + Sync>>) -> Self {
        Self { voters }
    }

    pub fn from_configs(configs: &[VoterConfig]) -> Result<Self> {
        Ok(Self::new(create_voters(configs)?))
    }

    pub fn add_voter(&mut self, voter: Box<dyn Voter + Send + Sync>) {
        self.voters.push(voter);
    }

    pub fn voter_names(&self) -> Vec<&'static str> {
        self.voters.iter().map(|v| v.name()).collect()
    }

    pub fn aggregate(&self, snapshot: &IndicatorSnapshot) -> Signal {
        let mut details = Vec::with_capacity(self.voters.len());
        for voter in &self.voters {
            match voter.assess(snapshot) {
                Ok(signal) => details.push(signal),
                Err(e) => warn!(
                    symbol = %snapshot.symbol,
                    voter = voter.name(),
                    error = %e,
                    "Voter failed; excluded from this tally."
                ),
            }
        }

        let votes = tally(&details);
        let winner = if votes.buy > votes.sell && votes.buy > votes.hold {
            Some(Action::Buy)
        } else if votes.sell > votes.buy && votes.sell > votes.hold {
            Some(Action::Sell)
        } else if votes.hold > votes.buy && votes.hold > votes.sell {
            Some(Action::Hold)
        } else {
            None
        };

        let mut composite = match winner {
            Some(action @ (Action::Buy | Action::Sell)) => {
                let backing: Vec<f64> = details
                    .iter()
                    .filter(|s| s.action == action)
                    .map(|s| s.confidence)
                    .collect();
                let mean = backing.iter().sum::<f64>() / backing.len() as f64;
                Signal::new(COMPOSITE_SOURCE, action, mean)
            }
            _ => Signal::new(COMPOSITE_SOURCE, Action::Hold, NEUTRAL_CONFIDENCE),
        };

        composite.rationale.push(format!(
            "votes: {} buy, {} sell, {} hold",
            votes.buy, votes.sell, votes.hold
        ));
        if let Some(action) = winner {
            for signal in details.iter().filter(|s| s.action == action) {
                composite
                    .rationale
                    .extend(signal.rationale.iter().map(|r| format!("{}: {r}", signal.source)));
            }
        }

        debug!(
            symbol = %snapshot.symbol,
            action = %composite.action,
            confidence = composite.confidence,
            buy = votes.buy,
            sell = votes.sell,
            hold = votes.hold,
            "Aggregated signal"
        );

        composite.votes = Some(votes);
        composite.details = details;
        composite
    }
}

fn tally(signals: &[Signal]) -> Votes {
    signals.iter().fold(Votes::default(), |mut votes, signal| {
        match signal.action {
            Action::Buy => votes.buy += 1,
            Action::Sell => votes.sell += 1,
            Action::Hold => votes.hold += 1,
            Action::Watch => {}
        }
        votes
    })
}
