use approx::assert_relative_eq;
use chrono::DateTime;

use super::*;
use crate::errors::Error;

fn daily_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            BarBuilder::builder()
                .timestamp(DateTime::from_timestamp(1_700_000_000 + 86_400 * i as i64, 0).unwrap())
                .open(close)
                .high(close)
                .low(close)
                .close(close)
                .volume(1.0)
                .build()
                .unwrap()
        })
        .collect()
}

fn signals(raw: &[i8]) -> Vec<Signal> {
    raw.iter().map(|&s| Signal::try_from(s).unwrap()).collect()
}

fn params() -> SimulationParams {
    SimulationParams {
        initial_cash: 100_000.0,
        fee_per_trade: 0.0,
        risk_factor_pct: 1.0,
        risk_reward_ratio: 3.0,
        stop_loss_pct: 0.01,
    }
}

#[test]
fn stop_loss_closes_long() {
    // Entry at 100: stop 99, size 1000 (risking 1% of 100k over a 1.0 stop
    // distance). The drop to 98.9 crosses the stop.
    let bars = daily_bars(&[100.0, 98.9]);
    let (curve, ledger) = simulate(&bars, &signals(&[1, 0]), &params()).unwrap();

    assert_eq!(ledger.len(), 1);
    let trade = ledger.trades().next().unwrap();
    assert_eq!(trade.exit_reason, ExitReason::StopLoss);
    assert_eq!(trade.side, PositionSide::Long);
    assert_relative_eq!(trade.size, 1000.0);
    assert_relative_eq!(trade.pnl, -1100.0);

    assert_relative_eq!(curve[0].equity, 100_000.0);
    assert_relative_eq!(curve[1].equity, 98_900.0);
}

#[test]
fn take_profit_closes_long() {
    // Same entry: target 103 (three times the stop distance). 103.5 is past
    // it and the exit executes at the close, not the target level.
    let bars = daily_bars(&[100.0, 103.5]);
    let (curve, ledger) = simulate(&bars, &signals(&[1, 0]), &params()).unwrap();

    assert_eq!(ledger.len(), 1);
    let trade = ledger.trades().next().unwrap();
    assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
    assert_relative_eq!(trade.exit_price, 103.5);
    assert_relative_eq!(trade.pnl, 3500.0);
    assert_relative_eq!(curve[1].equity, 103_500.0);
}

#[test]
fn opposing_signal_exits_and_reverses_same_bar() {
    let bars = daily_bars(&[100.0, 100.5, 102.0]);
    let (curve, ledger) = simulate(&bars, &signals(&[1, -1, 0]), &params()).unwrap();

    assert_eq!(ledger.len(), 2);
    let trades: Vec<&Trade> = ledger.trades().collect();

    // Bar 1: the short signal closes the long at 100.5 and immediately opens
    // a short at the same close.
    assert_eq!(trades[0].exit_reason, ExitReason::Signal);
    assert_eq!(trades[0].side, PositionSide::Long);
    assert_relative_eq!(trades[0].pnl, 500.0);

    // Bar 2: 102 crosses the short's stop (100.5 x 1.01).
    assert_eq!(trades[1].exit_reason, ExitReason::StopLoss);
    assert_eq!(trades[1].side, PositionSide::Short);
    assert_relative_eq!(trades[1].entry_price, 100.5);
    assert_relative_eq!(trades[1].size, 1000.0, epsilon = 1e-9);
    assert_relative_eq!(trades[1].pnl, -1500.0, epsilon = 1e-6);

    assert_relative_eq!(curve[2].equity, 99_000.0, epsilon = 1e-6);
}

#[test]
fn zero_stop_distance_trades_cost_only_the_fee() {
    let mut degenerate = params();
    degenerate.fee_per_trade = 100.0;
    // Small enough that entry * (1 - pct) rounds back to the entry price.
    degenerate.stop_loss_pct = 1e-300;

    let bars = daily_bars(&[100.0, 101.0]);
    let (curve, ledger) = simulate(&bars, &signals(&[1, 0]), &degenerate).unwrap();

    assert_eq!(ledger.len(), 1);
    let trade = ledger.trades().next().unwrap();
    assert_eq!(trade.size, 0.0);
    assert_eq!(trade.pnl, -100.0);
    assert_eq!(curve[1].equity, 99_900.0);
}

#[test]
fn no_pyramiding_while_position_open() {
    // Repeated long signals must not add to the open position; the entry
    // stays anchored at 100 and the curve marks from there.
    let bars = daily_bars(&[100.0, 100.5, 100.8]);
    let (curve, ledger) = simulate(&bars, &signals(&[1, 1, 1]), &params()).unwrap();

    assert!(ledger.is_empty());
    assert_relative_eq!(curve[0].equity, 100_000.0);
    assert_relative_eq!(curve[1].equity, 100_500.0);
    assert_relative_eq!(curve[2].equity, 100_800.0);
}

#[test]
fn all_flat_signals_leave_the_account_untouched() {
    let bars = daily_bars(&[100.0, 90.0, 110.0, 50.0]);
    let (curve, ledger) = simulate(&bars, &signals(&[0, 0, 0, 0]), &params()).unwrap();

    assert!(ledger.is_empty());
    assert_eq!(curve.len(), bars.len());
    for point in &curve {
        assert_eq!(point.equity, 100_000.0);
    }
}

#[test]
fn realized_equity_matches_ledger_sum() {
    let closes = [100.0, 101.5, 99.2, 100.1, 103.0, 97.5, 98.0, 104.0];
    let raw = [1, 0, -1, 0, 1, 0, -1, 0];
    let bars = daily_bars(&closes);
    let (curve, ledger) = simulate(&bars, &signals(&raw), &params()).unwrap();

    let booked: f64 = ledger.trades().map(|t| t.pnl).sum();
    // The run ends flat (no open position can survive these exits unchecked),
    // so the final curve point is fully realized.
    let last = curve.last().unwrap();
    assert_relative_eq!(last.equity, 100_000.0 + booked, epsilon = 1e-9);

    for trade in ledger.trades() {
        assert!(trade.entry_timestamp < trade.exit_timestamp);
    }
}

#[test]
fn one_equity_point_per_bar() {
    let bars = daily_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
    let (curve, _) = simulate(&bars, &signals(&[0, 1, 0, 0, -1]), &params()).unwrap();
    assert_eq!(curve.len(), bars.len());
    for (point, bar) in curve.iter().zip(&bars) {
        assert_eq!(point.timestamp, bar.timestamp());
    }
}

#[test]
fn identical_inputs_identical_outputs() {
    let closes = [100.0, 102.0, 99.0, 101.0, 98.0, 103.0];
    let raw = [1, -1, 1, -1, 1, 0];
    let bars = daily_bars(&closes);

    let first = simulate(&bars, &signals(&raw), &params()).unwrap();
    let second = simulate(&bars, &signals(&raw), &params()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_bars_is_fatal() {
    let result = simulate(&[], &[], &params());
    assert!(matches!(result, Err(Error::EmptyBars)));
}

#[test]
fn signal_length_mismatch_is_fatal() {
    let bars = daily_bars(&[100.0, 101.0]);
    let result = simulate(&bars, &signals(&[1]), &params());
    assert!(matches!(result, Err(Error::SignalLengthMismatch(1, 2))));
}

#[test]
fn non_monotonic_bars_are_fatal() {
    let mut bars = daily_bars(&[100.0, 101.0, 102.0]);
    bars.swap(1, 2);
    let result = simulate(&bars, &signals(&[0, 0, 0]), &params());
    assert!(matches!(result, Err(Error::NonMonotonicTimestamps(_))));
}

#[test]
fn invalid_params_fail_before_any_work() {
    let bars = daily_bars(&[100.0, 101.0]);
    let mut bad = params();
    bad.stop_loss_pct = 1.0;
    let result = simulate(&bars, &signals(&[1, 0]), &bad);
    assert!(matches!(result, Err(Error::InvalidStopLoss(_))));
}
