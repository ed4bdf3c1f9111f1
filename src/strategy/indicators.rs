//! Shared numeric helpers for the built-in strategies.
//!
//! Warm-up handling follows the usual charting conventions: rolling means
//! average however many values exist so far instead of waiting for a full
//! window, and the EMA is seeded with the first value.

use crate::engine::Bar;

/// Extracts the close series from a bar slice.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(Bar::close).collect()
}

/// Rolling mean over a trailing window, averaging partial windows during
/// warm-up.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut prefix = Vec::with_capacity(values.len() + 1);
    prefix.push(0.0);
    for &value in values {
        prefix.push(prefix.last().copied().unwrap_or(0.0) + value);
    }

    (0..values.len())
        .map(|i| {
            let lo = (i + 1).saturating_sub(window);
            (prefix[i + 1] - prefix[lo]) / (i + 1 - lo) as f64
        })
        .collect()
}

/// Exponential moving average with smoothing `alpha = 2 / (span + 1)`,
/// seeded with the first value.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    for &value in values {
        let next = match out.last() {
            Some(&previous) => alpha * value + (1.0 - alpha) * previous,
            None => value,
        };
        out.push(next);
    }
    out
}

/// Relative strength index over close-to-close deltas.
///
/// The first bar has no delta and yields NaN; comparisons against NaN are
/// always false, so callers naturally stay flat there. Average gain and loss
/// warm up like [`rolling_mean`], and the loss side carries a 1e-9 guard so a
/// loss-free window saturates near 100 instead of dividing by zero.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let mut gains = Vec::with_capacity(closes.len().saturating_sub(1));
    let mut losses = Vec::with_capacity(closes.len().saturating_sub(1));
    for window in closes.windows(2) {
        let delta = window[1] - window[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let mut out = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        if i == 0 {
            out.push(f64::NAN);
            continue;
        }
        let lo = i.saturating_sub(period);
        let count = (i - lo) as f64;
        let avg_gain = gains[lo..i].iter().sum::<f64>() / count;
        let avg_loss = losses[lo..i].iter().sum::<f64>() / count;
        let rs = avg_gain / (avg_loss + 1e-9);
        out.push(100.0 - 100.0 / (1.0 + rs));
    }
    out
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is in [0, 100]. Returns NaN for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
}
