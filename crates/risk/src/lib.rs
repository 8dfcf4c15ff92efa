// In crates/risk/src/lib.rs

pub mod clock;
pub mod error;
pub mod manager;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use manager::RiskManager;
pub use types::{PortfolioSummary, PositionReport, RiskSettings};
