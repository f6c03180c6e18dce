//! Forex session clock and daily pivot point calculator.
//!
//! ```
//! use forex_tools::pivot::{pivot_sets, Level, PriceBar};
//!
//! let bar = PriceBar::parse("110", "90", "100", "95").unwrap();
//! let sets = pivot_sets(&bar);
//! let standard = &sets[0];
//! assert_eq!(standard.get(Level::P), Some(rust_decimal::Decimal::new(100, 0)));
//! # assert_eq!(sets.len(), 5);
//! ```
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod pivot;
pub mod session;


pub use config::ClockConfig;
pub use error::{Error, Result};
pub use pivot::{pivot_sets, PivotFamily, PivotSet, PriceBar};
pub use session::{forex_sessions, MarketSnapshot, Session};

/// Sends `tracing` output to stderr, filtered by `RUST_LOG`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("forex_tools=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
