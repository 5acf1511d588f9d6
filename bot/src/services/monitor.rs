//! Periodic trade monitor: reprice every open trade and run the closing
//! state machine over it.

use chrono::Utc;
use shared::monitor::{apply_transition, evaluate_trade, transition_message};
use shared::Notifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::state::AppState;

use super::JobHandle;

#[derive(Clone)]
pub struct TradeMonitor {
    state: Arc<AppState>,
    notifier: Arc<dyn Notifier>,
    pass_lock: Arc<Mutex<()>>,
}

impl TradeMonitor {
    pub fn new(state: Arc<AppState>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state,
            notifier,
            pass_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Spawn the monitor loop. Each tick launches a pass as its own task;
    /// the pass lock makes a tick that would overlap a still-running pass
    /// skip instead of queue.
    pub fn start(self, every: Duration) -> JobHandle {
        let (tx, mut rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut timer = interval(every);
            timer.tick().await; // consume the immediate first tick
            info!("trade monitor started, running every {:?}", every);
            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let monitor = self.clone();
                        tokio::spawn(async move { monitor.run_once().await });
                    }
                    _ = rx.changed() => {
                        info!("trade monitor stopping");
                        break;
                    }
                }
            }
        });
        JobHandle::new(tx, handle)
    }

    pub async fn run_once(&self) {
        let Ok(_guard) = self.pass_lock.try_lock() else {
            warn!("previous trade monitor pass still running, skipping this tick");
            return;
        };
        if let Err(e) = self.pass().await {
            error!("trade monitor pass failed: {}", e);
        }
    }

    /// One monitor pass: evaluate every open trade independently, notify
    /// owners as transitions fire, then persist the whole batch at once.
    async fn pass(&self) -> anyhow::Result<()> {
        let now = Utc::now();
        let open_trades = self.state.trades.list_open().await?;
        if open_trades.is_empty() {
            return Ok(());
        }
        info!("monitoring {} open trades", open_trades.len());

        let mut updated = Vec::new();
        for mut trade in open_trades {
            let price = self.state.market.current_price(&trade.symbol).await;
            let Some(transition) = evaluate_trade(&trade, price) else {
                continue;
            };
            apply_transition(&mut trade, transition, now);
            self.notify_owner(trade.user_id, &transition_message(&trade.symbol, &transition))
                .await;
            updated.push(trade);
        }

        if !updated.is_empty() {
            let count = updated.len();
            self.state.trades.commit_pass(updated).await?;
            info!("committed {} trade transitions", count);
        }
        Ok(())
    }

    async fn notify_owner(&self, user_id: i64, text: &str) {
        let chat_id = match self.state.users.find_by_id(user_id).await {
            Ok(Some(user)) => user.telegram_id.parse::<i64>().ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("owner lookup failed for user {}: {}", user_id, e);
                None
            }
        };
        if let Some(chat_id) = chat_id {
            self.notifier.send(chat_id, text).await;
        }
    }
}
