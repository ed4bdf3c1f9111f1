//! Performance metrics for a completed run.
//!
//! Everything is derived in one pass from the equity curve and the trade
//! ledger; nothing here mutates the inputs. Degenerate inputs (single bar, no
//! trades) degrade to documented sentinels instead of failing: `sharpe` is 0,
//! `cagr` and `win_rate` go NaN, the biggest-trade fields stay `None`.

use std::collections::BTreeMap;
use std::fmt;

use crate::engine::{EquityCurve, Trade, TradeLedger};
use crate::errors::{Error, Result};

/// Annualization factor for the Sharpe ratio (daily bars assumed).
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Guard added to the return deviation so a flat curve cannot divide by zero.
pub const SHARPE_EPSILON: f64 = 1e-9;

/// Mean year length used for the CAGR exponent.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Metric names owned by [`Metrics::compute`]. Custom metrics may not reuse
/// them.
pub const RESERVED_KEYS: [&str; 9] = [
    "final_equity",
    "total_return",
    "max_drawdown",
    "sharpe",
    "num_trades",
    "avg_win",
    "avg_loss",
    "cagr",
    "win_rate",
];

/// Risk/return statistics for one backtest run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metrics {
    final_equity: f64,
    total_return: f64,
    max_drawdown: f64,
    sharpe: f64,
    num_trades: usize,
    avg_win: f64,
    avg_loss: f64,
    cagr: f64,
    win_rate: f64,
    biggest_win: Option<Trade>,
    biggest_loss: Option<Trade>,
    custom: BTreeMap<String, f64>,
}

impl Metrics {
    /// Derives all statistics from a finished run.
    ///
    /// ### Arguments
    /// * `curve` - The mark-to-market equity curve, one point per bar.
    /// * `ledger` - The completed trades, in exit order.
    /// * `initial_cash` - The starting balance the run began with.
    ///
    /// ### Returns
    /// The metrics, or an error for an empty curve or non-positive starting
    /// balance.
    pub fn compute(curve: &EquityCurve, ledger: &TradeLedger, initial_cash: f64) -> Result<Self> {
        if initial_cash <= 0.0 || !initial_cash.is_finite() {
            return Err(Error::InvalidInitialCash(initial_cash));
        }
        let first = curve.first().ok_or(Error::EmptyEquityCurve)?;
        let last = curve.last().ok_or(Error::EmptyEquityCurve)?;

        let final_equity = last.equity;
        let total_return = final_equity / initial_cash - 1.0;

        let mut peak = f64::MIN;
        let mut max_drawdown = 0.0f64;
        for point in curve {
            peak = peak.max(point.equity);
            max_drawdown = max_drawdown.min(point.equity / peak - 1.0);
        }

        // Sample deviation (ddof 1) needs at least two per-bar returns.
        let sharpe = if curve.len() < 3 {
            0.0
        } else {
            let returns: Vec<f64> = curve
                .windows(2)
                .map(|w| w[1].equity / w[0].equity - 1.0)
                .collect();
            let mean = returns.iter().sum::<f64>() / returns.len() as f64;
            let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
                / (returns.len() - 1) as f64;
            mean / (variance.sqrt() + SHARPE_EPSILON) * TRADING_DAYS_PER_YEAR.sqrt()
        };

        let days_span = (last.timestamp - first.timestamp).num_seconds() as f64 / 86_400.0;
        let cagr = if days_span > 0.0 {
            (final_equity / initial_cash).powf(DAYS_PER_YEAR / days_span) - 1.0
        } else {
            f64::NAN
        };

        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut win_sum = 0.0;
        let mut loss_sum = 0.0;
        let mut biggest_win: Option<&Trade> = None;
        let mut biggest_loss: Option<&Trade> = None;
        for trade in ledger.trades() {
            if trade.pnl > 0.0 {
                wins += 1;
                win_sum += trade.pnl;
            } else if trade.pnl < 0.0 {
                losses += 1;
                loss_sum += trade.pnl;
            }
            // Strict comparisons: on a tie the earliest exit stands.
            if biggest_win.is_none_or(|best| trade.pnl > best.pnl) {
                biggest_win = Some(trade);
            }
            if biggest_loss.is_none_or(|worst| trade.pnl < worst.pnl) {
                biggest_loss = Some(trade);
            }
        }

        let avg_win = if wins > 0 { win_sum / wins as f64 } else { 0.0 };
        let avg_loss = if losses > 0 {
            loss_sum / losses as f64
        } else {
            0.0
        };
        let decided = wins + losses;
        let win_rate = if decided > 0 {
            wins as f64 / decided as f64
        } else {
            f64::NAN
        };

        Ok(Self {
            final_equity,
            total_return,
            max_drawdown,
            sharpe,
            num_trades: ledger.len(),
            avg_win,
            avg_loss,
            cagr,
            win_rate,
            biggest_win: biggest_win.cloned(),
            biggest_loss: biggest_loss.cloned(),
            custom: BTreeMap::new(),
        })
    }

    /// Account value at the last bar.
    pub fn final_equity(&self) -> f64 {
        self.final_equity
    }

    /// Fractional return over the whole run.
    pub fn total_return(&self) -> f64 {
        self.total_return
    }

    /// Deepest peak-to-trough fractional loss, always ≤ 0.
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    /// Annualized Sharpe ratio over per-bar returns, risk-free rate 0.
    pub fn sharpe(&self) -> f64 {
        self.sharpe
    }

    /// Number of completed trades.
    pub fn num_trades(&self) -> usize {
        self.num_trades
    }

    /// Mean pnl of winning trades, 0 when there were none.
    pub fn avg_win(&self) -> f64 {
        self.avg_win
    }

    /// Mean pnl of losing trades (negative), 0 when there were none.
    pub fn avg_loss(&self) -> f64 {
        self.avg_loss
    }

    /// Compound annual growth rate; NaN when the run spans no time.
    pub fn cagr(&self) -> f64 {
        self.cagr
    }

    /// Fraction of decided trades that won; NaN when nothing was decided.
    pub fn win_rate(&self) -> f64 {
        self.win_rate
    }

    /// The most profitable trade, if any completed.
    pub fn biggest_win(&self) -> Option<&Trade> {
        self.biggest_win.as_ref()
    }

    /// The most costly trade, if any completed.
    pub fn biggest_loss(&self) -> Option<&Trade> {
        self.biggest_loss.as_ref()
    }

    /// Strategy-supplied metrics merged via [`Metrics::merge_custom`].
    pub fn custom(&self) -> &BTreeMap<String, f64> {
        &self.custom
    }

    /// Merges strategy-supplied metrics.
    ///
    /// ### Returns
    /// Ok, or [`Error::ReservedMetricKey`] when a key collides with one of
    /// [`RESERVED_KEYS`]. Nothing is merged on error.
    pub fn merge_custom(&mut self, custom: BTreeMap<String, f64>) -> Result<()> {
        if let Some(key) = custom.keys().find(|k| RESERVED_KEYS.contains(&k.as_str())) {
            return Err(Error::ReservedMetricKey(key.clone()));
        }
        self.custom.extend(custom);
        Ok(())
    }

    /// Renders the scalar fields plus any custom metrics as an ordered map.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        map.insert("final_equity".into(), self.final_equity);
        map.insert("total_return".into(), self.total_return);
        map.insert("max_drawdown".into(), self.max_drawdown);
        map.insert("sharpe".into(), self.sharpe);
        map.insert("num_trades".into(), self.num_trades as f64);
        map.insert("avg_win".into(), self.avg_win);
        map.insert("avg_loss".into(), self.avg_loss);
        map.insert("cagr".into(), self.cagr);
        map.insert("win_rate".into(), self.win_rate);
        for (key, value) in &self.custom {
            map.insert(key.clone(), *value);
        }
        map
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Backtest Metrics ===")?;
        writeln!(f, "Final Equity: {:.2}", self.final_equity)?;
        writeln!(f, "Total Return: {:.2}%", self.total_return * 100.0)?;
        writeln!(f, "Max Drawdown: {:.2}%", self.max_drawdown * 100.0)?;
        writeln!(f, "Sharpe Ratio: {:.2}", self.sharpe)?;
        writeln!(f, "CAGR: {:.2}%", self.cagr * 100.0)?;
        writeln!(f, "Trades: {}", self.num_trades)?;
        writeln!(f, "Win Rate: {:.2}%", self.win_rate * 100.0)?;
        writeln!(f, "Avg Win: {:.2}", self.avg_win)?;
        writeln!(f, "Avg Loss: {:.2}", self.avg_loss)?;
        for (key, value) in &self.custom {
            writeln!(f, "{key}: {value:.4}")?;
        }
        Ok(())
    }
}
