use crate::engine::{Bar, Signal};
use crate::strategy::{Params, Strategy, indicators};

/// RSI mean reversion: buy oversold, sell overbought.
///
/// Shorts additionally require the close to sit below a trend moving average,
/// so overbought readings inside a strong uptrend are left alone.
#[derive(Debug, Clone)]
pub struct RsiMeanReversion {
    period: usize,
    lower: f64,
    upper: f64,
    trend_ma: usize,
}

impl RsiMeanReversion {
    /// Creates the strategy with explicit thresholds.
    pub fn new(period: usize, lower: f64, upper: f64, trend_ma: usize) -> Self {
        Self {
            period: period.max(1),
            lower,
            upper,
            trend_ma: trend_ma.max(1),
        }
    }

    /// Creates the strategy from named parameters
    /// (`period` = 14, `lower` = 30, `upper` = 70, `trend_ma` = 50).
    pub fn from_params(params: &Params) -> Self {
        Self::new(
            params.get_usize_or("period", 14),
            params.get_or("lower", 30.0),
            params.get_or("upper", 70.0),
            params.get_usize_or("trend_ma", 50),
        )
    }
}

impl Strategy for RsiMeanReversion {
    fn name(&self) -> &'static str {
        "rsi_mean_reversion"
    }

    fn signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = indicators::closes(bars);
        let rsi = indicators::rsi(&closes, self.period);
        let trend = indicators::rolling_mean(&closes, self.trend_ma);

        // The first bar's RSI is NaN: both comparisons fail and it stays flat.
        closes
            .iter()
            .zip(rsi.iter().zip(&trend))
            .map(|(&close, (&rsi, &ma))| {
                if rsi < self.lower {
                    Signal::Long
                } else if rsi > self.upper && close < ma {
                    Signal::Short
                } else {
                    Signal::Flat
                }
            })
            .collect()
    }
}
