//! Closing state machine for open trades.
//!
//! One decision per trade per monitor tick. The stop-loss branch is checked
//! first so a price that has fallen through every threshold always closes
//! as a loss; the full take-profit is checked before the partial one so a
//! price that has jumped straight past both closes as a win.

use chrono::{DateTime, Utc};

use crate::entity::trades;
use crate::entity::trades::{STATUS_CLOSED, STATUS_OPEN};
use crate::signal::TradeTargets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeResult {
    Win,
    Loss,
    PartialWin,
}

impl TradeResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeResult::Win => "win",
            TradeResult::Loss => "loss",
            TradeResult::PartialWin => "partial_win",
        }
    }
}

/// The single transition a tick may apply to one trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Stop loss hit: close as a loss.
    CloseLoss { close_price: f64 },
    /// Second take-profit hit: close as a win.
    CloseWin { close_price: f64 },
    /// First take-profit hit: record the partial result, stay open.
    /// One-shot, never fires again once any result is recorded.
    PartialWin { price: f64 },
}

/// Decide the transition for one trade at the current price.
///
/// A zero price is the adapter's "unknown" sentinel: the trade is left
/// untouched and re-checked next tick. Branches are mutually exclusive, at
/// most one fires.
pub fn evaluate_trade(trade: &trades::Model, current_price: f64) -> Option<Transition> {
    if trade.status != STATUS_OPEN || current_price <= 0.0 {
        return None;
    }
    let targets = TradeTargets::for_entry(trade.open_price);

    if current_price <= targets.stop_loss {
        Some(Transition::CloseLoss {
            close_price: current_price,
        })
    } else if current_price >= targets.take_profit_2 {
        Some(Transition::CloseWin {
            close_price: current_price,
        })
    } else if current_price >= targets.take_profit_1 && trade.result.is_none() {
        Some(Transition::PartialWin {
            price: current_price,
        })
    } else {
        None
    }
}

/// Apply a transition in memory. Close fields are set together with the
/// closed status and never on a partial result.
pub fn apply_transition(trade: &mut trades::Model, transition: Transition, now: DateTime<Utc>) {
    match transition {
        Transition::CloseLoss { close_price } => {
            trade.status = STATUS_CLOSED.to_string();
            trade.close_time = Some(now);
            trade.close_price = Some(close_price);
            trade.result = Some(TradeResult::Loss.as_str().to_string());
        }
        Transition::CloseWin { close_price } => {
            trade.status = STATUS_CLOSED.to_string();
            trade.close_time = Some(now);
            trade.close_price = Some(close_price);
            trade.result = Some(TradeResult::Win.as_str().to_string());
        }
        Transition::PartialWin { .. } => {
            trade.result = Some(TradeResult::PartialWin.as_str().to_string());
        }
    }
}

/// Text sent to the trade's owner for a transition.
pub fn transition_message(symbol: &str, transition: &Transition) -> String {
    match transition {
        Transition::CloseLoss { close_price } => {
            format!("⚠️ {} closed at a loss at {}", symbol, close_price)
        }
        Transition::CloseWin { close_price } => {
            format!("✅ {} closed in profit at {}", symbol, close_price)
        }
        Transition::PartialWin { price } => {
            format!(
                "🎯 {} reached the first take-profit at {} — second target still open",
                symbol, price
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_trade(open_price: f64) -> trades::Model {
        trades::Model {
            id: 1,
            user_id: 7,
            strategy: "fib_retrace".to_string(),
            symbol: "BTC-USDT".to_string(),
            open_time: Some(Utc::now()),
            close_time: None,
            open_price,
            close_price: None,
            status: STATUS_OPEN.to_string(),
            result: None,
        }
    }

    #[test]
    fn stop_loss_closes_as_loss() {
        let trade = open_trade(100.0);
        assert_eq!(
            evaluate_trade(&trade, 94.0),
            Some(Transition::CloseLoss { close_price: 94.0 })
        );
    }

    #[test]
    fn first_target_records_partial_win() {
        let trade = open_trade(100.0);
        assert_eq!(
            evaluate_trade(&trade, 105.0),
            Some(Transition::PartialWin { price: 105.0 })
        );
    }

    #[test]
    fn second_target_closes_as_win() {
        let trade = open_trade(100.0);
        assert_eq!(
            evaluate_trade(&trade, 111.0),
            Some(Transition::CloseWin { close_price: 111.0 })
        );
    }

    #[test]
    fn unchanged_price_is_a_no_op() {
        let trade = open_trade(100.0);
        assert_eq!(evaluate_trade(&trade, 100.0), None);
    }

    #[test]
    fn unknown_price_leaves_trade_untouched() {
        let trade = open_trade(100.0);
        assert_eq!(evaluate_trade(&trade, 0.0), None);
    }

    #[test]
    fn cratered_price_is_a_loss_not_a_stale_partial() {
        // Below the stop and nominally "past" both profit ratios of a tiny
        // open price: the stop-loss branch wins.
        let trade = open_trade(100.0);
        assert_eq!(
            evaluate_trade(&trade, 10.0),
            Some(Transition::CloseLoss { close_price: 10.0 })
        );
    }

    #[test]
    fn partial_win_is_one_shot() {
        let mut trade = open_trade(100.0);
        let first = evaluate_trade(&trade, 105.0).unwrap();
        apply_transition(&mut trade, first, Utc::now());
        assert_eq!(trade.status, STATUS_OPEN);
        assert_eq!(trade.result.as_deref(), Some("partial_win"));
        assert!(trade.close_time.is_none());
        assert!(trade.close_price.is_none());

        // Same price next tick: nothing fires again.
        assert_eq!(evaluate_trade(&trade, 105.0), None);
    }

    #[test]
    fn partial_win_still_escalates_to_win_or_loss() {
        let mut trade = open_trade(100.0);
        apply_transition(&mut trade, Transition::PartialWin { price: 105.0 }, Utc::now());

        assert_eq!(
            evaluate_trade(&trade, 111.0),
            Some(Transition::CloseWin { close_price: 111.0 })
        );
        assert_eq!(
            evaluate_trade(&trade, 94.0),
            Some(Transition::CloseLoss { close_price: 94.0 })
        );
    }

    #[test]
    fn closed_trade_is_never_touched() {
        let mut trade = open_trade(100.0);
        let close = evaluate_trade(&trade, 111.0).unwrap();
        apply_transition(&mut trade, close, Utc::now());
        assert_eq!(trade.status, STATUS_CLOSED);

        for price in [0.0, 50.0, 105.0, 200.0] {
            assert_eq!(evaluate_trade(&trade, price), None);
        }
    }

    #[test]
    fn close_fields_set_iff_closed() {
        let now = Utc::now();

        let mut win = open_trade(100.0);
        apply_transition(&mut win, Transition::CloseWin { close_price: 111.0 }, now);
        assert_eq!(win.status, STATUS_CLOSED);
        assert_eq!(win.close_price, Some(111.0));
        assert_eq!(win.close_time, Some(now));
        assert_eq!(win.result.as_deref(), Some("win"));

        let mut loss = open_trade(100.0);
        apply_transition(&mut loss, Transition::CloseLoss { close_price: 94.0 }, now);
        assert_eq!(loss.status, STATUS_CLOSED);
        assert_eq!(loss.close_price, Some(94.0));
        assert_eq!(loss.close_time, Some(now));
        assert_eq!(loss.result.as_deref(), Some("loss"));

        let mut partial = open_trade(100.0);
        apply_transition(&mut partial, Transition::PartialWin { price: 105.0 }, now);
        assert_eq!(partial.status, STATUS_OPEN);
        assert!(partial.close_price.is_none());
        assert!(partial.close_time.is_none());
    }
}
