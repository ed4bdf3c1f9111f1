use chrono::{DateTime, Utc};

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PositionSide {
    /// Profits when price rises.
    Long,
    /// Profits when price falls.
    Short,
}

impl PositionSide {
    /// Integer sign of the side: 1 for long, -1 for short.
    pub fn sign(self) -> i8 {
        match self {
            PositionSide::Long => 1,
            PositionSide::Short => -1,
        }
    }

    /// Sign as a pnl multiplier.
    pub fn direction(self) -> f64 {
        f64::from(self.sign())
    }
}

/// One live position. The engine holds at most one at a time, as
/// `Option<Position>`, so a flat account carries no stale entry state.
///
/// Stop, target and size are fixed at entry and never adjusted afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    side: PositionSide,
    entry_price: f64,
    stop_loss: f64,
    take_profit: f64,
    size: f64,
    entry_timestamp: DateTime<Utc>,
}

impl Position {
    /// Opens a position at `entry_price`.
    ///
    /// The stop sits `stop_loss_pct` (a fraction of entry) against the trade,
    /// the target mirrors the stop distance scaled by `risk_reward_ratio`, and
    /// the size is chosen so that a stop-out loses `risk_per_trade` before
    /// fees. A zero stop distance gives a zero-sized position rather than an
    /// error.
    pub fn open(
        side: PositionSide,
        entry_price: f64,
        stop_loss_pct: f64,
        risk_reward_ratio: f64,
        risk_per_trade: f64,
        entry_timestamp: DateTime<Utc>,
    ) -> Self {
        let direction = side.direction();
        let stop_loss = entry_price * (1.0 - direction * stop_loss_pct);
        let stop_distance = (entry_price - stop_loss).abs();
        let take_profit = entry_price + direction * stop_distance * risk_reward_ratio;
        let size = if stop_distance > 0.0 {
            risk_per_trade / stop_distance
        } else {
            0.0
        };

        Self {
            side,
            entry_price,
            stop_loss,
            take_profit,
            size,
            entry_timestamp,
        }
    }

    /// Direction of the position.
    pub fn side(&self) -> PositionSide {
        self.side
    }

    /// Execution price at entry.
    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    /// Stop-loss level.
    pub fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    /// Take-profit level.
    pub fn take_profit(&self) -> f64 {
        self.take_profit
    }

    /// Number of units held.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Timestamp of the entry bar.
    pub fn entry_timestamp(&self) -> DateTime<Utc> {
        self.entry_timestamp
    }

    /// Whether `price` has reached the stop-loss level.
    pub fn stop_hit(&self, price: f64) -> bool {
        match self.side {
            PositionSide::Long => price <= self.stop_loss,
            PositionSide::Short => price >= self.stop_loss,
        }
    }

    /// Whether `price` has reached the take-profit level.
    pub fn target_hit(&self, price: f64) -> bool {
        match self.side {
            PositionSide::Long => price >= self.take_profit,
            PositionSide::Short => price <= self.take_profit,
        }
    }

    /// Mark-to-market profit or loss at `price`, before fees.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.side.direction() * self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn long_at_100() -> Position {
        Position::open(
            PositionSide::Long,
            100.0,
            0.01,
            2.0,
            1000.0,
            DateTime::default(),
        )
    }

    #[test]
    fn long_levels_and_size() {
        let position = long_at_100();
        assert_relative_eq!(position.stop_loss(), 99.0);
        assert_relative_eq!(position.take_profit(), 102.0);
        assert_relative_eq!(position.size(), 1000.0);
    }

    #[test]
    fn short_levels_mirror_long() {
        let position = Position::open(
            PositionSide::Short,
            200.0,
            0.05,
            1.5,
            500.0,
            DateTime::default(),
        );
        assert_relative_eq!(position.stop_loss(), 210.0);
        assert_relative_eq!(position.take_profit(), 185.0);
        assert_relative_eq!(position.size(), 50.0);
    }

    #[test]
    fn long_triggers() {
        let position = long_at_100();
        assert!(position.stop_hit(99.0));
        assert!(position.stop_hit(98.5));
        assert!(!position.stop_hit(99.5));
        assert!(position.target_hit(102.0));
        assert!(!position.target_hit(101.9));
    }

    #[test]
    fn short_triggers() {
        let position = Position::open(
            PositionSide::Short,
            100.0,
            0.01,
            2.0,
            1000.0,
            DateTime::default(),
        );
        assert!(position.stop_hit(101.0));
        assert!(!position.stop_hit(100.5));
        assert!(position.target_hit(98.0));
        assert!(!position.target_hit(98.5));
    }

    #[test]
    fn pnl_signs() {
        let long = long_at_100();
        assert_relative_eq!(long.unrealized_pnl(101.0), 1000.0);
        assert_relative_eq!(long.unrealized_pnl(99.0), -1000.0);

        let short = Position::open(
            PositionSide::Short,
            100.0,
            0.01,
            2.0,
            1000.0,
            DateTime::default(),
        );
        assert_relative_eq!(short.unrealized_pnl(99.0), 1000.0);
        assert_relative_eq!(short.unrealized_pnl(101.0), -1000.0);
    }

    #[test]
    fn zero_stop_distance_zero_size() {
        // A stop fraction small enough to round away leaves nothing to risk.
        let position = Position::open(
            PositionSide::Long,
            100.0,
            1e-300,
            2.0,
            1000.0,
            DateTime::default(),
        );
        assert_eq!(position.stop_loss(), 100.0);
        assert_eq!(position.size(), 0.0);
        assert_eq!(position.unrealized_pnl(150.0), 0.0);
    }
}
