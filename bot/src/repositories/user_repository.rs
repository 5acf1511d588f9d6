use anyhow::Result;
use chrono::Utc;
use sea_orm::prelude::*;
use sea_orm::ActiveValue::Set;
use shared::entity::users;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<users::Model>> {
        let user = users::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?;
        Ok(user)
    }

    pub async fn find_by_telegram_id(&self, telegram_id: &str) -> Result<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::TelegramId.eq(telegram_id))
            .one(self.db.as_ref())
            .await?;
        Ok(user)
    }

    /// Users are registered on first contact; later interactions reuse the
    /// existing row.
    pub async fn get_or_create(
        &self,
        telegram_id: &str,
        username: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<users::Model> {
        if let Some(user) = self.find_by_telegram_id(telegram_id).await? {
            return Ok(user);
        }

        let new_user = users::ActiveModel {
            telegram_id: Set(telegram_id.to_string()),
            username: Set(username),
            first_name: Set(first_name),
            last_name: Set(last_name),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        };

        let user = users::Entity::insert(new_user)
            .exec_with_returning(self.db.as_ref())
            .await?;
        Ok(user)
    }
}
