use chrono::{DateTime, Utc};

use crate::errors::{Error, Result};

/// A single OHLCV timestep.
///
/// Bars are immutable once built; every numeric invariant (positive finite
/// prices, non-negative finite volume) is enforced by [`BarBuilder::build`],
/// so holding a `Bar` means holding valid data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bar {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Bar {
    /// Timestamp of the bar.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Opening price.
    pub fn open(&self) -> f64 {
        self.open
    }

    /// Highest price.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Lowest price.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Closing price. The engine's only execution price.
    pub fn close(&self) -> f64 {
        self.close
    }

    /// Traded volume.
    pub fn volume(&self) -> f64 {
        self.volume
    }
}

/// Builder for [`Bar`] enforcing the numeric invariants.
///
/// ### Example
/// ```rust
/// use stratest::prelude::*;
/// use chrono::DateTime;
///
/// let bar = BarBuilder::builder()
///     .timestamp(DateTime::default())
///     .open(100.0)
///     .high(101.0)
///     .low(99.0)
///     .close(100.5)
///     .volume(1250.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(bar.close(), 100.5);
/// ```
#[derive(Debug, Default, Clone)]
pub struct BarBuilder {
    timestamp: Option<DateTime<Utc>>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl BarBuilder {
    /// Creates an empty builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Sets the bar timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the opening price.
    pub fn open(mut self, open: f64) -> Self {
        self.open = Some(open);
        self
    }

    /// Sets the highest price.
    pub fn high(mut self, high: f64) -> Self {
        self.high = Some(high);
        self
    }

    /// Sets the lowest price.
    pub fn low(mut self, low: f64) -> Self {
        self.low = Some(low);
        self
    }

    /// Sets the closing price.
    pub fn close(mut self, close: f64) -> Self {
        self.close = Some(close);
        self
    }

    /// Sets the traded volume.
    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Validates the fields and builds the [`Bar`].
    ///
    /// ### Returns
    /// The bar, or an error when a field is missing or out of range.
    pub fn build(self) -> Result<Bar> {
        let timestamp = self.timestamp.ok_or(Error::MissingBarField("timestamp"))?;
        let open = self.open.ok_or(Error::MissingBarField("open"))?;
        let high = self.high.ok_or(Error::MissingBarField("high"))?;
        let low = self.low.ok_or(Error::MissingBarField("low"))?;
        let close = self.close.ok_or(Error::MissingBarField("close"))?;
        let volume = self.volume.ok_or(Error::MissingBarField("volume"))?;

        for price in [open, high, low, close] {
            if price <= 0.0 || !price.is_finite() {
                return Err(Error::InvalidPrice(price));
            }
        }
        if volume < 0.0 || !volume.is_finite() {
            return Err(Error::InvalidVolume(volume));
        }

        Ok(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Checks that a bar series is usable by the engine: non-empty, with strictly
/// increasing timestamps.
pub fn validate_bars(bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        return Err(Error::EmptyBars);
    }
    for (index, window) in bars.windows(2).enumerate() {
        if window[1].timestamp <= window[0].timestamp {
            return Err(Error::NonMonotonicTimestamps(index + 1));
        }
    }
    Ok(())
}
