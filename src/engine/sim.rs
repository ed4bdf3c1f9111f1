use chrono::{DateTime, Utc};

use crate::PercentCalculus;
use crate::engine::{Bar, ExitReason, Position, Signal, Trade, TradeLedger, validate_bars};
use crate::errors::{Error, Result};

/// Account and risk settings for one simulation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationParams {
    /// Starting account balance. Must be positive.
    pub initial_cash: f64,
    /// Flat fee charged once per completed trade, at exit.
    pub fee_per_trade: f64,
    /// Percentage of current equity risked per trade (e.g., 1.0 for 1%).
    pub risk_factor_pct: f64,
    /// Take-profit distance as a multiple of the stop distance.
    pub risk_reward_ratio: f64,
    /// Stop distance as a fraction of entry price, within (0, 1).
    pub stop_loss_pct: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_cash: 100_000.0,
            fee_per_trade: 0.0,
            risk_factor_pct: 1.0,
            risk_reward_ratio: 2.0,
            stop_loss_pct: 0.01,
        }
    }
}

impl SimulationParams {
    /// Checks every parameter range. Run once before simulating.
    pub fn validate(&self) -> Result<()> {
        if self.initial_cash <= 0.0 || !self.initial_cash.is_finite() {
            return Err(Error::InvalidInitialCash(self.initial_cash));
        }
        if self.fee_per_trade < 0.0 || !self.fee_per_trade.is_finite() {
            return Err(Error::InvalidFee(self.fee_per_trade));
        }
        if self.risk_factor_pct <= 0.0 || !self.risk_factor_pct.is_finite() {
            return Err(Error::InvalidRiskFactor(self.risk_factor_pct));
        }
        if self.risk_reward_ratio <= 0.0 || !self.risk_reward_ratio.is_finite() {
            return Err(Error::InvalidRiskReward(self.risk_reward_ratio));
        }
        if self.stop_loss_pct <= 0.0 || self.stop_loss_pct >= 1.0 || !self.stop_loss_pct.is_finite()
        {
            return Err(Error::InvalidStopLoss(self.stop_loss_pct));
        }
        Ok(())
    }
}

/// Mark-to-market account value at one bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EquityPoint {
    /// Timestamp of the bar.
    pub timestamp: DateTime<Utc>,
    /// Realized cash plus any open position's unrealized pnl.
    pub equity: f64,
}

/// One point per input bar, in bar order.
pub type EquityCurve = Vec<EquityPoint>;

/// Runs the per-bar simulation over a signal stream.
///
/// The account holds at most one position. On every bar, in order:
///
/// 1. If a position is open, check exits against the bar's close — stop-loss
///    first, then take-profit, then an opposing signal. The first trigger
///    closes the trade at the close, charges the flat fee, and books the pnl.
/// 2. If flat (including right after an exit on this same bar) and the signal
///    is directional, open a position at the close. The stop sits
///    `stop_loss_pct` against the entry, the target mirrors that distance
///    scaled by `risk_reward_ratio`, and the size risks
///    `risk_factor_pct`% of current equity down to the stop.
/// 3. Record a mark-to-market equity point.
///
/// Entries are never revised mid-trade and only closes are ever executed
/// against, so the run is free of lookahead and fully deterministic.
///
/// ### Arguments
/// * `bars` - The price series, strictly increasing timestamps.
/// * `signals` - One signal per bar.
/// * `params` - Validated account and risk settings.
///
/// ### Returns
/// The equity curve (one point per bar) and the completed-trade ledger, or a
/// precondition error before any work is done.
pub fn simulate(
    bars: &[Bar],
    signals: &[Signal],
    params: &SimulationParams,
) -> Result<(EquityCurve, TradeLedger)> {
    params.validate()?;
    validate_bars(bars)?;
    if signals.len() != bars.len() {
        return Err(Error::SignalLengthMismatch(signals.len(), bars.len()));
    }

    let mut equity = params.initial_cash;
    let mut curve = Vec::with_capacity(bars.len());
    let mut ledger = TradeLedger::default();
    let mut open: Option<Position> = None;

    for (bar, &signal) in bars.iter().zip(signals) {
        let close = bar.close();

        if let Some(position) = &open {
            let exit_reason = if position.stop_hit(close) {
                Some(ExitReason::StopLoss)
            } else if position.target_hit(close) {
                Some(ExitReason::TakeProfit)
            } else if signal.opposes(position.side()) {
                Some(ExitReason::Signal)
            } else {
                None
            };

            if let Some(reason) = exit_reason {
                let pnl = position.unrealized_pnl(close) - params.fee_per_trade;
                ledger.append(Trade {
                    entry_timestamp: position.entry_timestamp(),
                    exit_timestamp: bar.timestamp(),
                    side: position.side(),
                    entry_price: position.entry_price(),
                    exit_price: close,
                    size: position.size(),
                    pnl,
                    exit_reason: reason,
                });
                equity += pnl;
                open = None;
            }
        }

        if open.is_none()
            && let Some(side) = signal.side()
        {
            let risk_per_trade = equity.how_many(params.risk_factor_pct);
            open = Some(Position::open(
                side,
                close,
                params.stop_loss_pct,
                params.risk_reward_ratio,
                risk_per_trade,
                bar.timestamp(),
            ));
        }

        let marked = match &open {
            Some(position) => equity + position.unrealized_pnl(close),
            None => equity,
        };
        curve.push(EquityPoint {
            timestamp: bar.timestamp(),
            equity: marked,
        });
    }

    Ok((curve, ledger))
}
