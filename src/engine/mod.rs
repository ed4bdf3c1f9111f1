//! Core simulation components.
//!
//! This module provides the fundamental types for backtesting:
//! - `Bar`: OHLCV data, validated at construction.
//! - `Signal`: Per-bar directional intent.
//! - `Position`: The single live trade with its exit levels.
//! - `TradeLedger`: Completed round trips, in exit order.
//! - `simulate`: The per-bar state machine tying them together.

mod bar;
mod ledger;
mod position;
mod signal;
mod sim;

pub use bar::*;
pub use ledger::*;
pub use position::*;
pub use signal::*;
pub use sim::*;

#[cfg(test)]
mod scenarios;
