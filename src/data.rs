//! Loading bar series from JSON records.
//!
//! Records are deserialized leniently (common exchange-export field names are
//! accepted as aliases) and then pushed through [`BarBuilder`], so a loaded
//! series carries the same guarantees as one built in code.

use chrono::{DateTime, Utc, serde::ts_seconds};
use serde::Deserialize;

use crate::engine::{Bar, BarBuilder};
use crate::errors::{Error, Result};

/// One raw JSON bar record, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct BarRecord {
    #[serde(with = "ts_seconds", alias = "open_time", alias = "time")]
    timestamp: DateTime<Utc>,
    #[serde(alias = "open_price")]
    open: f64,
    #[serde(alias = "high_price")]
    high: f64,
    #[serde(alias = "low_price")]
    low: f64,
    #[serde(alias = "close_price")]
    close: f64,
    #[serde(default)]
    volume: f64,
}

impl BarRecord {
    /// Validates the record into a [`Bar`].
    pub fn into_bar(self) -> Result<Bar> {
        BarBuilder::builder()
            .timestamp(self.timestamp)
            .open(self.open)
            .high(self.high)
            .low(self.low)
            .close(self.close)
            .volume(self.volume)
            .build()
    }
}

/// Reads a JSON array of bar records from `filepath` and validates each into
/// a [`Bar`]. Series-level checks (ordering) happen at simulation time.
pub fn bars_from_file(filepath: std::path::PathBuf) -> Result<Vec<Bar>> {
    use std::{fs::File, io::BufReader};

    let file = File::open(filepath)?;
    let reader = BufReader::new(file);
    let records: Vec<BarRecord> = serde_json::from_reader(reader).map_err(Error::from)?;
    records.into_iter().map(BarRecord::into_bar).collect()
}
