//! Subscription expiry sweep, on the same cadence as the trade monitor.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{error, info};

use crate::state::AppState;

use super::JobHandle;

pub fn start(state: Arc<AppState>, every: Duration) -> JobHandle {
    let (tx, mut rx) = watch::channel(false);
    let handle = tokio::spawn(async move {
        let mut timer = interval(every);
        timer.tick().await;
        info!("subscription expiry sweep started, running every {:?}", every);
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    if let Err(e) = sweep(&state).await {
                        error!("subscription expiry sweep failed: {}", e);
                    }
                }
                _ = rx.changed() => {
                    info!("subscription expiry sweep stopping");
                    break;
                }
            }
        }
    });
    JobHandle::new(tx, handle)
}

/// Flip every active subscription whose paid window has passed, as one
/// batch. Returns how many rows were expired.
pub async fn sweep(state: &AppState) -> anyhow::Result<usize> {
    let now = Utc::now();
    let expired: Vec<_> = state
        .subscriptions
        .list_active_expired(now)
        .await?
        .into_iter()
        .filter(|sub| sub.should_expire(now))
        .collect();
    if expired.is_empty() {
        return Ok(0);
    }

    let count = expired.len();
    state.subscriptions.expire_all(expired).await?;
    info!("expired {} subscriptions", count);
    Ok(count)
}
