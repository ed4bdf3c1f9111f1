use crate::engine::{Bar, Signal};
use crate::strategy::{Params, Strategy, indicators};

/// MACD crossover: long while the MACD line sits above its signal line, short
/// while below, flat on exact equality.
#[derive(Debug, Clone)]
pub struct MacdCrossover {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl MacdCrossover {
    /// Creates the strategy with explicit EMA spans.
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast: fast.max(1),
            slow: slow.max(1),
            signal: signal.max(1),
        }
    }

    /// Creates the strategy from named parameters
    /// (`fast` = 12, `slow` = 26, `signal` = 9).
    pub fn from_params(params: &Params) -> Self {
        Self::new(
            params.get_usize_or("fast", 12),
            params.get_usize_or("slow", 26),
            params.get_usize_or("signal", 9),
        )
    }

    /// MACD line and signal line for a close series.
    pub(crate) fn macd_lines(&self, closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let fast = indicators::ema(closes, self.fast);
        let slow = indicators::ema(closes, self.slow);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = indicators::ema(&macd, self.signal);
        (macd, signal)
    }
}

impl Strategy for MacdCrossover {
    fn name(&self) -> &'static str {
        "macd_crossover"
    }

    fn signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = indicators::closes(bars);
        let (macd, signal) = self.macd_lines(&closes);

        macd.iter()
            .zip(&signal)
            .map(|(m, s)| {
                if m > s {
                    Signal::Long
                } else if m < s {
                    Signal::Short
                } else {
                    Signal::Flat
                }
            })
            .collect()
    }
}
