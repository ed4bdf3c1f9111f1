use chrono::{DateTime, Utc};

use crate::engine::PositionSide;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ExitReason {
    /// The close reached the stop-loss level.
    StopLoss,
    /// The close reached the take-profit level.
    TakeProfit,
    /// An opposing signal closed the position.
    Signal,
}

impl ExitReason {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::Signal => "signal",
        }
    }
}

/// One completed round trip. Immutable once recorded.
///
/// `pnl` is net of the flat fee; `entry_timestamp < exit_timestamp` always
/// holds because exits are checked only on bars after the entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trade {
    /// Timestamp of the entry bar.
    pub entry_timestamp: DateTime<Utc>,
    /// Timestamp of the exit bar.
    pub exit_timestamp: DateTime<Utc>,
    /// Direction of the trade.
    pub side: PositionSide,
    /// Execution price at entry.
    pub entry_price: f64,
    /// Execution price at exit.
    pub exit_price: f64,
    /// Number of units traded.
    pub size: f64,
    /// Realized profit or loss, net of the flat fee.
    pub pnl: f64,
    /// What closed the trade.
    pub exit_reason: ExitReason,
}

/// Column headers matching [`TradeLedger::rows`].
pub const LEDGER_COLUMNS: [&str; 8] = [
    "entry_time",
    "exit_time",
    "side",
    "entry_price",
    "exit_price",
    "size",
    "pnl",
    "exit_reason",
];

/// Append-only record of completed trades, chronological by exit.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    /// Records a completed trade.
    pub(crate) fn append(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    /// Number of recorded trades.
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Whether no trade has completed.
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Returns an iterator over the recorded trades, in exit order.
    pub fn trades(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    /// Renders the ledger as display rows, one per trade, columns per
    /// [`LEDGER_COLUMNS`].
    pub fn rows(&self) -> Vec<[String; 8]> {
        self.trades
            .iter()
            .map(|trade| {
                [
                    trade.entry_timestamp.to_rfc3339(),
                    trade.exit_timestamp.to_rfc3339(),
                    match trade.side {
                        PositionSide::Long => "long".into(),
                        PositionSide::Short => "short".into(),
                    },
                    format!("{:.8}", trade.entry_price),
                    format!("{:.8}", trade.exit_price),
                    format!("{:.8}", trade.size),
                    format!("{:.8}", trade.pnl),
                    trade.exit_reason.label().into(),
                ]
            })
            .collect()
    }
}
