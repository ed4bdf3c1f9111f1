/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while building inputs or running a simulation.
///
/// Precondition violations are reported before any simulation work starts: the
/// caller gets either a complete, internally consistent result or one of these
/// errors, never a partial run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The bar series provided is empty. Simulation requires at least one bar.
    #[error("Bar data is empty: simulation requires at least one bar")]
    EmptyBars,

    /// Bar timestamps must be strictly increasing. Holds the offending index.
    #[error("Bar timestamps must be strictly increasing (violation at bar {0})")]
    NonMonotonicTimestamps(usize),

    /// A required field was not supplied to the bar builder.
    #[error("Missing bar field: {0}")]
    MissingBarField(&'static str),

    /// A price field is not a positive, finite number.
    #[error("Price fields must be positive and finite (got: {0})")]
    InvalidPrice(f64),

    /// Volume is negative or not finite.
    #[error("Volume must be non-negative and finite (got: {0})")]
    InvalidVolume(f64),

    /// A raw signal value is outside {-1, 0, 1}.
    #[error("Signal must be -1, 0, or 1 (got: {0})")]
    InvalidSignal(i8),

    /// The signal series does not line up with the bar series.
    #[error("Signal series length {0} does not match bar series length {1}")]
    SignalLengthMismatch(usize, usize),

    /// The starting account balance is not positive.
    #[error("Initial cash must be positive (got: {0})")]
    InvalidInitialCash(f64),

    /// The flat per-trade fee is negative or not finite.
    #[error("Fee per trade must be non-negative and finite (got: {0})")]
    InvalidFee(f64),

    /// The per-trade risk fraction is not positive.
    #[error("Risk factor must be positive (got: {0})")]
    InvalidRiskFactor(f64),

    /// The risk:reward ratio is not positive.
    #[error("Risk:reward ratio must be positive (got: {0})")]
    InvalidRiskReward(f64),

    /// The stop-loss fraction is outside the open interval (0, 1).
    #[error("Stop-loss fraction must be within (0, 1) (got: {0})")]
    InvalidStopLoss(f64),

    /// The equity curve handed to the metrics calculator is empty.
    #[error("Equity curve is empty: metrics require at least one point")]
    EmptyEquityCurve,

    /// A custom metric tried to shadow one of the engine-computed fields.
    #[error("Custom metric key collides with a reserved metric name: {0}")]
    ReservedMetricKey(String),

    /// No strategy is registered under the requested name.
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    /// I/O error occurred.
    // data.rs
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error occurred.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
