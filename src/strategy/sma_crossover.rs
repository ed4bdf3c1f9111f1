use crate::engine::{Bar, Signal};
use crate::strategy::{Params, Strategy, indicators};

/// Moving-average crossover: long while the fast average sits above the slow
/// one, short while it sits below, flat on exact equality.
///
/// Both averages warm up from the first bar, so early signals reflect partial
/// windows rather than staying flat.
#[derive(Debug, Clone)]
pub struct SmaCrossover {
    fast: usize,
    slow: usize,
}

impl SmaCrossover {
    /// Creates the strategy with explicit window lengths.
    pub fn new(fast: usize, slow: usize) -> Self {
        Self {
            fast: fast.max(1),
            slow: slow.max(1),
        }
    }

    /// Creates the strategy from named parameters (`fast` = 10, `slow` = 30).
    pub fn from_params(params: &Params) -> Self {
        Self::new(params.get_usize_or("fast", 10), params.get_usize_or("slow", 30))
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &'static str {
        "sma_crossover"
    }

    fn signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = indicators::closes(bars);
        let fast = indicators::rolling_mean(&closes, self.fast);
        let slow = indicators::rolling_mean(&closes, self.slow);

        fast.iter()
            .zip(&slow)
            .map(|(f, s)| {
                if f > s {
                    Signal::Long
                } else if f < s {
                    Signal::Short
                } else {
                    Signal::Flat
                }
            })
            .collect()
    }
}
