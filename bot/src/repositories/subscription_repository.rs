use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::prelude::*;
use sea_orm::ActiveValue::Set;
use sea_orm::TransactionTrait;
use shared::entity::subscriptions;
use shared::entity::subscriptions::{STATUS_ACTIVE, STATUS_EXPIRED};
use shared::StrategyKind;
use std::sync::Arc;

#[derive(Clone)]
pub struct SubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Subscriptions usable right now: active and inside their paid window.
    pub async fn find_active_for_user(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<subscriptions::Model>> {
        let subs = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::Status.eq(STATUS_ACTIVE))
            .filter(subscriptions::Column::StartDate.lte(now))
            .filter(subscriptions::Column::EndDate.gte(now))
            .all(self.db.as_ref())
            .await?;
        Ok(subs)
    }

    pub async fn find_active_by_strategy(
        &self,
        user_id: i64,
        strategy: StrategyKind,
        now: DateTime<Utc>,
    ) -> Result<Option<subscriptions::Model>> {
        let sub = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::Strategy.eq(strategy.as_str()))
            .filter(subscriptions::Column::Status.eq(STATUS_ACTIVE))
            .filter(subscriptions::Column::StartDate.lte(now))
            .filter(subscriptions::Column::EndDate.gte(now))
            .one(self.db.as_ref())
            .await?;
        Ok(sub)
    }

    /// Rows the expiry sweep should flip: still active, paid window passed.
    pub async fn list_active_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<subscriptions::Model>> {
        let subs = subscriptions::Entity::find()
            .filter(subscriptions::Column::Status.eq(STATUS_ACTIVE))
            .filter(subscriptions::Column::EndDate.lt(now))
            .all(self.db.as_ref())
            .await?;
        Ok(subs)
    }

    /// Flip a batch of subscriptions to expired in one transaction.
    pub async fn expire_all(&self, subs: Vec<subscriptions::Model>) -> Result<()> {
        let txn = self.db.begin().await?;
        for sub in subs {
            let mut update: subscriptions::ActiveModel = sub.into();
            update.status = Set(STATUS_EXPIRED.to_string());
            subscriptions::Entity::update(update).exec(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }
}
