//! # Stratest: signal-driven backtesting for trading strategies
//!
//! **Stratest** evaluates trading strategies against historical OHLCV price
//! series and reports risk/return statistics. A strategy is any generator of
//! per-bar directional signals (`-1` short, `0` flat, `1` long); the engine
//! turns that signal stream into a simulated single-position account with
//! risk-based position sizing, stop-loss/take-profit exits, flat fee
//! accounting, a mark-to-market equity curve and an append-only trade ledger.
//!
//! ## Core Components
//! | Component      | Description                                                              |
//! |----------------|--------------------------------------------------------------------------|
//! | **`Bar`**      | One timestep's OHLCV snapshot, validated at construction.                |
//! | **`Signal`**   | Directional intent for one bar: short, flat, or long.                    |
//! | **`simulate`** | The per-bar state machine: entries, exits, sizing, equity tracking.      |
//! | **`TradeLedger`** | Chronological record of every completed round trip.                   |
//! | **`Metrics`**  | Return, drawdown, Sharpe, CAGR, win rate and per-trade statistics.       |
//! | **`Strategy`** | Signal generator contract with optional lifecycle hooks.                 |
//! | **`Backtester`** | One-shot orchestration of hooks, signals, simulation and metrics.      |
//!
//! ## Execution model
//! The engine consumes one bar at a time in strict timestamp order. Each bar's
//! close is the only execution price; exit checks run before entry checks, in
//! a fixed priority (stop-loss, then take-profit, then opposing signal), so an
//! exit and a fresh entry may share a bar but never look ahead. At most one
//! position is live at any time. Runs are fully deterministic: identical
//! inputs produce identical ledgers and equity curves.
//!
//! ## Getting Started
//! ```rust
//! use stratest::prelude::*;
//! use chrono::DateTime;
//!
//! let closes = [100.0, 101.0, 103.0, 99.5, 98.0, 102.0];
//! let bars: Vec<Bar> = closes
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &close)| {
//!         BarBuilder::builder()
//!             .timestamp(DateTime::from_timestamp(1_700_000_000 + 86_400 * i as i64, 0).unwrap())
//!             .open(close)
//!             .high(close)
//!             .low(close)
//!             .close(close)
//!             .volume(1.0)
//!             .build()
//!             .unwrap()
//!     })
//!     .collect();
//!
//! let mut strategy = SmaCrossover::new(2, 4);
//! let backtester = Backtester::new(&bars, SimulationParams::default());
//! let metrics = backtester.run(&mut strategy).unwrap();
//!
//! println!("{metrics}");
//! assert_eq!(metrics.num_trades(), metrics.to_map()["num_trades"] as usize);
//! ```
//!
//! ## Features
//! | Feature       | Description                                                        |
//! |---------------|--------------------------------------------------------------------|
//! | `serde`       | Load bar series from JSON files, serialize trades and metrics.     |
//! | `optimizer`   | Parallel parameter sweeps over independent backtest runs.          |
//!
//! ## Error Handling
//! Malformed input (empty or non-chronological bars, mismatched signal
//! lengths, out-of-range parameters) is a fatal precondition violation: the
//! engine returns a typed error and never a partial result. Numeric
//! degenerate cases, such as a zero risk-per-share entry, are not errors —
//! they produce a zero-sized trade whose only cost is the flat fee.
//!
//! ## License
//! MIT
#![warn(missing_docs)]

/// Core simulation components: bars, signals, positions, ledger, and the engine.
pub mod engine;

/// Error types for the library.
pub mod errors;

/// Performance metrics: drawdown, Sharpe ratio, CAGR, win rate, etc.
pub mod metrics;

/// Signal generator contract, built-in strategies, and the registry.
pub mod strategy;

/// One-shot orchestration of a strategy run.
pub mod backtester;

/// Strategy and risk parameter optimization.
#[cfg(feature = "optimizer")]
pub mod optimizer;

/// Loading bar series from JSON records.
#[cfg(feature = "serde")]
pub mod data;

/// Re-exports of commonly used types and traits for convenience.
pub mod prelude {
    pub use super::*;
    pub use crate::backtester::*;
    pub use crate::engine::*;
    pub use crate::errors::*;
    pub use crate::metrics::*;
    pub use crate::strategy::*;

    #[cfg(feature = "optimizer")]
    pub use crate::optimizer::*;

    #[cfg(feature = "serde")]
    pub use crate::data::*;
}

use std::ops::{Div, Mul};

/// Trait for performing percentage-based calculations.
///
/// The engine sizes positions as a percentage of current equity; this keeps
/// that arithmetic in one place.
pub trait PercentCalculus<Rhs = Self> {
    /// Calculates the absolute value of a percentage.
    ///
    /// ### Arguments
    /// * `percent` - The percentage to calculate (e.g., 10.0 for 10%).
    ///
    /// ### Returns
    /// The absolute value of the given percentage.
    fn how_many(self, percent: Self) -> Self;
}

impl PercentCalculus for f64 {
    fn how_many(self, percent: Self) -> Self {
        percent.mul(self.div(100.0))
    }
}
