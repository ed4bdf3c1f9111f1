//! Runs one strategy against one bar series, end to end.

use crate::engine::{Bar, Signal, SimulationParams, simulate};
use crate::errors::Result;
use crate::metrics::Metrics;
use crate::strategy::Strategy;

/// One-shot backtest orchestrator.
///
/// Owns the run sequence: `before_run` hook, signal generation (padded or
/// truncated to the bar count), simulation, metrics, custom-metric merge,
/// `after_run` hook. The borrowed bar series is never modified, so one
/// `Backtester` can evaluate any number of strategies against the same data.
#[derive(Debug, Clone)]
pub struct Backtester<'a> {
    bars: &'a [Bar],
    params: SimulationParams,
}

impl<'a> Backtester<'a> {
    /// Creates a backtester over a bar series.
    pub fn new(bars: &'a [Bar], params: SimulationParams) -> Self {
        Self { bars, params }
    }

    /// The bar series under test.
    pub fn bars(&self) -> &[Bar] {
        self.bars
    }

    /// The simulation settings in use.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Runs a full backtest of `strategy`.
    ///
    /// ### Returns
    /// The computed metrics, including any custom metrics the strategy
    /// contributed, or the first error encountered.
    pub fn run(&self, strategy: &mut dyn Strategy) -> Result<Metrics> {
        strategy.before_run(self.bars);

        // A generator may stop early or overshoot; missing entries mean flat.
        let mut signals = strategy.signals(self.bars);
        signals.resize(self.bars.len(), Signal::Flat);

        let (curve, ledger) = simulate(self.bars, &signals, &self.params)?;
        let mut metrics = Metrics::compute(&curve, &ledger, self.params.initial_cash)?;
        metrics.merge_custom(strategy.custom_metrics(&ledger, self.bars))?;

        strategy.after_run(&metrics);
        Ok(metrics)
    }
}
