use crate::engine::PositionSide;
use crate::errors::{Error, Result};

/// Directional intent attached to one bar.
///
/// `Short` and `Long` ask for a position in that direction (or close an
/// opposing one); `Flat` asks for nothing. A missing signal is treated as
/// `Flat` by the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Signal {
    /// Bearish intent (-1).
    Short = -1,
    /// No intent (0).
    #[default]
    Flat = 0,
    /// Bullish intent (1).
    Long = 1,
}

impl Signal {
    /// The raw integer encoding: -1, 0, or 1.
    pub fn as_i8(self) -> i8 {
        self as i8
    }

    /// The position side this signal asks for, if any.
    pub fn side(self) -> Option<PositionSide> {
        match self {
            Signal::Short => Some(PositionSide::Short),
            Signal::Flat => None,
            Signal::Long => Some(PositionSide::Long),
        }
    }

    /// Whether this signal closes a position on the given side.
    pub fn opposes(self, side: PositionSide) -> bool {
        self.as_i8() == -side.sign()
    }
}

impl TryFrom<i8> for Signal {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self> {
        match value {
            -1 => Ok(Signal::Short),
            0 => Ok(Signal::Flat),
            1 => Ok(Signal::Long),
            other => Err(Error::InvalidSignal(other)),
        }
    }
}
