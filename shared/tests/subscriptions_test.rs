//! Subscription window predicates used by the commands and the expiry sweep.

use chrono::{Duration, Utc};
use shared::entity::subscriptions;
use shared::entity::subscriptions::{STATUS_ACTIVE, STATUS_EXPIRED};

fn subscription(status: &str, start_offset_days: i64, end_offset_days: i64) -> subscriptions::Model {
    let now = Utc::now();
    subscriptions::Model {
        id: 1,
        user_id: 9,
        strategy: "trend_follow".to_string(),
        start_date: Some(now + Duration::days(start_offset_days)),
        end_date: Some(now + Duration::days(end_offset_days)),
        status: status.to_string(),
        payment_id: Some("4522480693".to_string()),
        amount: Some(40.0),
        currency: Some("usdt".to_string()),
    }
}

#[test]
fn active_inside_the_paid_window() {
    let now = Utc::now();
    assert!(subscription(STATUS_ACTIVE, -1, 29).is_active_at(now));
}

#[test]
fn not_active_outside_the_window_or_when_expired() {
    let now = Utc::now();
    // Window has not started yet.
    assert!(!subscription(STATUS_ACTIVE, 1, 31).is_active_at(now));
    // Window has passed.
    assert!(!subscription(STATUS_ACTIVE, -40, -10).is_active_at(now));
    // Flipped by the sweep.
    assert!(!subscription(STATUS_EXPIRED, -1, 29).is_active_at(now));
}

#[test]
fn unconfirmed_subscription_without_dates_is_inactive() {
    let now = Utc::now();
    let mut sub = subscription(STATUS_ACTIVE, -1, 29);
    sub.start_date = None;
    sub.end_date = None;
    assert!(!sub.is_active_at(now));
    assert!(!sub.should_expire(now));
}

#[test]
fn sweep_expires_only_past_end_active_rows() {
    let now = Utc::now();
    // Past end, still active: the sweep flips this one.
    assert!(subscription(STATUS_ACTIVE, -40, -1).should_expire(now));
    // End in the future: untouched.
    assert!(!subscription(STATUS_ACTIVE, -1, 29).should_expire(now));
    // Already expired: untouched, never resurrected.
    assert!(!subscription(STATUS_EXPIRED, -40, -1).should_expire(now));
}
