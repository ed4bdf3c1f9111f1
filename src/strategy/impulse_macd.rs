use crate::engine::{Bar, Signal};
use crate::strategy::{MacdCrossover, Params, Strategy, indicators};

/// Impulse MACD: histogram breakouts plus MACD-line reversals, both against
/// thresholds re-derived from a trailing lookback window on every bar.
///
/// The first `lookback` bars have no complete window and stay flat. Breakout
/// checks run before reversal checks, matching the order the thresholds are
/// meant to gate each other.
#[derive(Debug, Clone)]
pub struct ImpulseMacd {
    macd: MacdCrossover,
    hist_clip: f64,
    lookback: usize,
}

impl ImpulseMacd {
    /// Creates the strategy with explicit settings.
    pub fn new(fast: usize, slow: usize, signal: usize, hist_clip: f64, lookback: usize) -> Self {
        Self {
            macd: MacdCrossover::new(fast, slow, signal),
            hist_clip: hist_clip.max(0.0),
            lookback: lookback.max(1),
        }
    }

    /// Creates the strategy from named parameters
    /// (`fast` = 12, `slow` = 26, `signal` = 9, `hist_clip` = 0.5,
    /// `lookback` = 22).
    pub fn from_params(params: &Params) -> Self {
        Self::new(
            params.get_usize_or("fast", 12),
            params.get_usize_or("slow", 26),
            params.get_usize_or("signal", 9),
            params.get_or("hist_clip", 0.5),
            params.get_usize_or("lookback", 22),
        )
    }

    /// Breakout bounds: the window's 90th/10th histogram percentiles, clipped
    /// so the upper bound stays within [0, hist_clip] and the lower within
    /// [-hist_clip, 0].
    fn histogram_bounds(&self, window: &[f64]) -> (f64, f64) {
        let upper = indicators::percentile(window, 90.0).clamp(0.0, self.hist_clip);
        let lower = indicators::percentile(window, 10.0).clamp(-self.hist_clip, 0.0);
        (upper, lower)
    }
}

/// Reversal levels from the window's MACD values: the overbought level
/// averages the peaks below the absolute maximum, the oversold level averages
/// the troughs ahead of the mildest of the four.
fn reversal_levels(window: &[f64]) -> (f64, f64) {
    let mut sorted = window.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let take = sorted.len().min(4);
    let troughs = &sorted[..take];
    let peaks = &sorted[sorted.len() - take..];

    let mean = |values: &[f64]| values.iter().sum::<f64>() / values.len() as f64;
    let overbought = if take > 1 {
        mean(&peaks[..take - 1])
    } else {
        mean(peaks)
    };
    let oversold = if take > 1 {
        mean(&troughs[..take - 1])
    } else {
        mean(troughs)
    };
    (oversold, overbought)
}

impl Strategy for ImpulseMacd {
    fn name(&self) -> &'static str {
        "impulse_macd"
    }

    fn signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = indicators::closes(bars);
        let (macd, signal) = self.macd.macd_lines(&closes);
        let hist: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        (0..bars.len())
            .map(|i| {
                if i < self.lookback {
                    return Signal::Flat;
                }
                let (upper, lower) = self.histogram_bounds(&hist[i - self.lookback..i]);
                let (oversold, overbought) = reversal_levels(&macd[i - self.lookback..i]);

                if hist[i] > upper {
                    Signal::Long
                } else if hist[i] < lower {
                    Signal::Short
                } else if macd[i] < oversold {
                    Signal::Long
                } else if macd[i] > overbought {
                    Signal::Short
                } else {
                    Signal::Flat
                }
            })
            .collect()
    }
}
