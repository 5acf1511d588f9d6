use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::prelude::*;
use sea_orm::ActiveValue::Set;
use sea_orm::TransactionTrait;
use shared::entity::trades;
use shared::entity::trades::STATUS_OPEN;
use shared::StrategyKind;
use std::sync::Arc;

#[derive(Clone)]
pub struct TradeRepository {
    db: Arc<DatabaseConnection>,
}

impl TradeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Every open trade across all users, as one monitor-pass working set.
    pub async fn list_open(&self) -> Result<Vec<trades::Model>> {
        let open = trades::Entity::find()
            .filter(trades::Column::Status.eq(STATUS_OPEN))
            .all(self.db.as_ref())
            .await?;
        Ok(open)
    }

    pub async fn has_open_trade(
        &self,
        user_id: i64,
        strategy: StrategyKind,
        symbol: &str,
    ) -> Result<bool> {
        let count = trades::Entity::find()
            .filter(trades::Column::UserId.eq(user_id))
            .filter(trades::Column::Strategy.eq(strategy.as_str()))
            .filter(trades::Column::Symbol.eq(symbol))
            .filter(trades::Column::Status.eq(STATUS_OPEN))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    /// Record an acted-upon recommendation as an open trade.
    pub async fn open_trade(
        &self,
        user_id: i64,
        strategy: StrategyKind,
        symbol: &str,
        open_price: f64,
        now: DateTime<Utc>,
    ) -> Result<trades::Model> {
        let trade = trades::ActiveModel {
            user_id: Set(user_id),
            strategy: Set(strategy.as_str().to_string()),
            symbol: Set(symbol.to_string()),
            open_time: Set(Some(now)),
            open_price: Set(open_price),
            status: Set(STATUS_OPEN.to_string()),
            ..Default::default()
        };

        let trade = trades::Entity::insert(trade)
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(trade)
    }

    /// Persist one monitor pass as a batch: all rows in one transaction so
    /// a commit failure aborts the tick as a whole and the next tick
    /// re-derives from current prices.
    pub async fn commit_pass(&self, updated: Vec<trades::Model>) -> Result<()> {
        let txn = self.db.begin().await?;
        for trade in updated {
            let status = trade.status.clone();
            let close_time = trade.close_time;
            let close_price = trade.close_price;
            let result = trade.result.clone();

            let mut update: trades::ActiveModel = trade.into();
            update.status = Set(status);
            update.close_time = Set(close_time);
            update.close_price = Set(close_price);
            update.result = Set(result);
            trades::Entity::update(update).exec(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }
}
