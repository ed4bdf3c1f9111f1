//! Strategy parameter optimization.
//!
//! Sweeps a grid of parameter combinations, running one independent backtest
//! per combination across a rayon thread pool. Runs share nothing mutable, so
//! results are identical to running the sweep serially.

use std::marker::PhantomData;

use crate::backtester::Backtester;
use crate::engine::{Bar, SimulationParams};
use crate::errors::Result;
use crate::strategy::Strategy;

use rayon::prelude::*;

/// Trait defining how to generate parameter combinations for optimization.
///
/// The associated type `Output` represents a single combination (e.g., a
/// tuple of window lengths).
pub trait ParameterCombination: Sync {
    /// Type representing a single parameter combination.
    type Output: Clone + Send + Sync;

    /// Generates all combinations to test.
    fn generate() -> Vec<Self::Output>;
}

/// Runs a backtest per parameter combination and collects the outcomes.
pub struct Optimizer<PC: ParameterCombination> {
    bars: Vec<Bar>,
    params: SimulationParams,
    _marker: PhantomData<PC>,
}

impl<PC: ParameterCombination> Optimizer<PC> {
    /// Creates an optimizer over a bar series.
    ///
    /// ### Arguments
    /// * `bars` - Historical data shared by every run.
    /// * `params` - Simulation settings shared by every run.
    pub fn new(bars: Vec<Bar>, params: SimulationParams) -> Self {
        Self {
            bars,
            params,
            _marker: PhantomData,
        }
    }

    /// Evaluates every combination produced by `PC::generate`.
    ///
    /// ### Arguments
    /// * `combinator` - Builds a fresh strategy for one combination. Called
    ///   once per combination, possibly from several threads at once.
    ///
    /// ### Returns
    /// One `(combination, final equity)` pair per combination, or the first
    /// error any run produced.
    pub fn with<C>(&self, combinator: C) -> Result<Vec<(PC::Output, f64)>>
    where
        C: Fn(&PC::Output) -> Result<Box<dyn Strategy>> + Sync,
    {
        let combinations = PC::generate();
        let chunk_size = combinations.len().div_ceil(num_cpus::get()).max(1);

        combinations
            .par_chunks(chunk_size)
            .map::<_, Result<_>>(|chunk| {
                let backtester = Backtester::new(&self.bars, self.params.clone());
                let mut local_results = Vec::with_capacity(chunk.len());

                for combination in chunk {
                    let mut strategy = combinator(combination)?;
                    let metrics = backtester.run(strategy.as_mut())?;
                    local_results.push((combination.clone(), metrics.final_equity()));
                }

                Ok(local_results)
            })
            .collect::<Result<Vec<_>>>()
            .map(|chunks| chunks.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BarBuilder;
    use crate::strategy::SmaCrossover;
    use chrono::DateTime;

    struct SmaGrid;

    impl ParameterCombination for SmaGrid {
        type Output = (usize, usize);

        fn generate() -> Vec<Self::Output> {
            (2..=4)
                .flat_map(|fast| (5..=8).map(move |slow| (fast, slow)))
                .collect()
        }
    }

    fn wavy_bars() -> Vec<Bar> {
        (0..80)
            .map(|i| {
                let close = 100.0 + 5.0 * ((i as f64) * 0.25).sin();
                BarBuilder::builder()
                    .timestamp(
                        DateTime::from_timestamp(1_700_000_000 + 86_400 * i as i64, 0).unwrap(),
                    )
                    .open(close)
                    .high(close)
                    .low(close)
                    .close(close)
                    .volume(1.0)
                    .build()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn sweeps_every_combination() {
        let optimizer = Optimizer::<SmaGrid>::new(wavy_bars(), SimulationParams::default());
        let results = optimizer
            .with(|&(fast, slow)| Ok(Box::new(SmaCrossover::new(fast, slow)) as Box<dyn Strategy>))
            .unwrap();

        assert_eq!(results.len(), SmaGrid::generate().len());
        for ((fast, slow), final_equity) in &results {
            assert!(final_equity.is_finite(), "({fast}, {slow})");
        }
    }

    #[test]
    fn sweep_matches_serial_runs() {
        let bars = wavy_bars();
        let params = SimulationParams::default();

        let optimizer = Optimizer::<SmaGrid>::new(bars.clone(), params.clone());
        let parallel = optimizer
            .with(|&(fast, slow)| Ok(Box::new(SmaCrossover::new(fast, slow)) as Box<dyn Strategy>))
            .unwrap();

        let backtester = Backtester::new(&bars, params);
        for (combination, final_equity) in parallel {
            let mut strategy = SmaCrossover::new(combination.0, combination.1);
            let metrics = backtester.run(&mut strategy).unwrap();
            assert_eq!(metrics.final_equity(), final_equity);
        }
    }
}
