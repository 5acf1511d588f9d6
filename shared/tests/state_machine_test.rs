//! End-to-end walks of the trade closing state machine.

use chrono::Utc;
use shared::entity::trades;
use shared::entity::trades::{STATUS_CLOSED, STATUS_OPEN};
use shared::monitor::{apply_transition, evaluate_trade, transition_message, Transition};

fn open_trade(open_price: f64) -> trades::Model {
    trades::Model {
        id: 42,
        user_id: 1,
        strategy: "trend_follow".to_string(),
        symbol: "ETH-USDT".to_string(),
        open_time: Some(Utc::now()),
        close_time: None,
        open_price,
        close_price: None,
        status: STATUS_OPEN.to_string(),
        result: None,
    }
}

/// Simulate one monitor tick against a fixed price.
fn tick(trade: &mut trades::Model, price: f64) -> Option<Transition> {
    let transition = evaluate_trade(trade, price)?;
    apply_transition(trade, transition, Utc::now());
    Some(transition)
}

#[test]
fn trade_rides_through_partial_to_win() {
    let mut trade = open_trade(100.0);

    // Price drifts, nothing happens.
    assert_eq!(tick(&mut trade, 101.0), None);
    assert_eq!(tick(&mut trade, 103.9), None);

    // First target reached: partial result, still open.
    assert!(matches!(
        tick(&mut trade, 105.0),
        Some(Transition::PartialWin { .. })
    ));
    assert_eq!(trade.status, STATUS_OPEN);
    assert_eq!(trade.result.as_deref(), Some("partial_win"));

    // Same price again: idempotent.
    assert_eq!(tick(&mut trade, 105.0), None);

    // Second target: closed as a win, close fields populated.
    assert!(matches!(
        tick(&mut trade, 110.5),
        Some(Transition::CloseWin { .. })
    ));
    assert_eq!(trade.status, STATUS_CLOSED);
    assert_eq!(trade.result.as_deref(), Some("win"));
    assert_eq!(trade.close_price, Some(110.5));
    assert!(trade.close_time.is_some());

    // Closed trades are an immutable audit trail.
    assert_eq!(tick(&mut trade, 50.0), None);
}

#[test]
fn trade_with_partial_result_can_still_stop_out() {
    let mut trade = open_trade(100.0);
    tick(&mut trade, 105.0);
    assert_eq!(trade.result.as_deref(), Some("partial_win"));

    assert!(matches!(
        tick(&mut trade, 94.9),
        Some(Transition::CloseLoss { .. })
    ));
    assert_eq!(trade.status, STATUS_CLOSED);
    assert_eq!(trade.result.as_deref(), Some("loss"));
    assert_eq!(trade.close_price, Some(94.9));
}

#[test]
fn unknown_price_skips_the_trade_for_the_tick() {
    let mut trade = open_trade(100.0);
    let before = trade.clone();

    assert_eq!(tick(&mut trade, 0.0), None);
    assert_eq!(trade, before);
}

#[test]
fn close_invariant_holds_across_every_path() {
    for price in [50.0, 94.0, 100.0, 104.5, 111.0] {
        let mut trade = open_trade(100.0);
        tick(&mut trade, price);

        let closed = trade.status == STATUS_CLOSED;
        assert_eq!(closed, trade.close_price.is_some(), "price {}", price);
        assert_eq!(closed, trade.close_time.is_some(), "price {}", price);
    }
}

#[test]
fn messages_name_the_symbol_and_price() {
    let loss = transition_message("BTC-USDT", &Transition::CloseLoss { close_price: 94.0 });
    assert!(loss.contains("BTC-USDT") && loss.contains("94"));

    let win = transition_message("BTC-USDT", &Transition::CloseWin { close_price: 111.0 });
    assert!(win.contains("BTC-USDT") && win.contains("111"));

    let partial = transition_message("BTC-USDT", &Transition::PartialWin { price: 105.0 });
    assert!(partial.contains("BTC-USDT") && partial.contains("105"));
}
