//! The strategy contract and the built-in signal generators.
//!
//! A strategy is anything that turns a bar series into one [`Signal`] per
//! bar. The lifecycle hooks are optional: `before_run` can warm internal
//! state, `after_run` sees the finished [`Metrics`], and `custom_metrics` may
//! contribute extra named values to the report.

use std::collections::BTreeMap;

use crate::engine::{Bar, Signal, TradeLedger};
use crate::errors::{Error, Result};
use crate::metrics::Metrics;

pub mod indicators;

mod impulse_macd;
mod macd_crossover;
mod rsi_mean_reversion;
mod sma_crossover;

pub use impulse_macd::*;
pub use macd_crossover::*;
pub use rsi_mean_reversion::*;
pub use sma_crossover::*;

/// A signal generator with optional lifecycle hooks.
pub trait Strategy {
    /// Stable identifier, also used for registry lookup.
    fn name(&self) -> &'static str;

    /// Produces one signal per bar. Shorter outputs are padded with
    /// [`Signal::Flat`] by the orchestrator; longer outputs are truncated.
    fn signals(&self, bars: &[Bar]) -> Vec<Signal>;

    /// Called once before signal generation.
    fn before_run(&mut self, _bars: &[Bar]) {}

    /// Called once after metrics are computed.
    fn after_run(&mut self, _metrics: &Metrics) {}

    /// Extra named metrics merged into the report. Keys colliding with the
    /// engine-computed fields are rejected by the orchestrator.
    fn custom_metrics(&self, _ledger: &TradeLedger, _bars: &[Bar]) -> BTreeMap<String, f64> {
        BTreeMap::new()
    }
}

/// Named strategy parameters with defaulted lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, f64>);

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(mut self, key: &str, value: f64) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    /// Looks up a parameter, falling back to `default`.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).copied().unwrap_or(default)
    }

    /// Looks up a whole-number parameter, falling back to `default`.
    pub fn get_usize_or(&self, key: &str, default: usize) -> usize {
        self.0
            .get(key)
            .map(|&v| v.max(1.0) as usize)
            .unwrap_or(default)
    }
}

/// Constructor signature stored in the [`Registry`].
pub type StrategyBuilder = fn(&Params) -> Box<dyn Strategy>;

/// Maps strategy names to constructors.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    builders: BTreeMap<&'static str, StrategyBuilder>,
}

impl Registry {
    /// Creates a registry with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in strategies.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("sma_crossover", |p| Box::new(SmaCrossover::from_params(p)));
        registry.register("rsi_mean_reversion", |p| {
            Box::new(RsiMeanReversion::from_params(p))
        });
        registry.register("macd_crossover", |p| {
            Box::new(MacdCrossover::from_params(p))
        });
        registry.register("impulse_macd", |p| Box::new(ImpulseMacd::from_params(p)));
        registry
    }

    /// Adds or replaces an entry.
    pub fn register(&mut self, name: &'static str, builder: StrategyBuilder) {
        self.builders.insert(name, builder);
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.builders.keys().copied().collect()
    }

    /// Instantiates a strategy by name.
    ///
    /// ### Returns
    /// The boxed strategy, or [`Error::UnknownStrategy`].
    pub fn build(&self, name: &str, params: &Params) -> Result<Box<dyn Strategy>> {
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| Error::UnknownStrategy(name.to_string()))?;
        Ok(builder(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_defaults() {
        let params = Params::new().set("fast", 5.0);
        assert_eq!(params.get_or("fast", 10.0), 5.0);
        assert_eq!(params.get_or("slow", 30.0), 30.0);
        assert_eq!(params.get_usize_or("fast", 10), 5);
        assert_eq!(params.get_usize_or("slow", 30), 30);
    }

    #[test]
    fn builtin_names() {
        let registry = Registry::builtin();
        assert_eq!(
            registry.names(),
            vec![
                "impulse_macd",
                "macd_crossover",
                "rsi_mean_reversion",
                "sma_crossover"
            ]
        );
    }

    #[test]
    fn builds_registered_strategy() {
        let registry = Registry::builtin();
        let strategy = registry
            .build("sma_crossover", &Params::new().set("fast", 3.0))
            .unwrap();
        assert_eq!(strategy.name(), "sma_crossover");
    }

    #[test]
    fn unknown_name_is_an_error() {
        let registry = Registry::builtin();
        let result = registry.build("holy_grail", &Params::new());
        assert!(matches!(result, Err(Error::UnknownStrategy(name)) if name == "holy_grail"));
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = Registry::empty();
        assert!(registry.names().is_empty());
        assert!(registry.build("sma_crossover", &Params::new()).is_err());
    }
}
