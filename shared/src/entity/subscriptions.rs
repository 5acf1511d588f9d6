//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_EXPIRED: &str = "expired";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub user_id: i64,
    pub strategy: String,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub payment_id: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub amount: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub currency: Option<String>,
}

impl Model {
    /// Subscription is usable right now: confirmed active and `now` falls
    /// inside its paid window.
    pub fn is_active_at(&self, now: DateTimeUtc) -> bool {
        self.status == STATUS_ACTIVE
            && self.start_date.map_or(false, |start| start <= now)
            && self.end_date.map_or(false, |end| end >= now)
    }

    /// Sweep predicate: still marked active but the paid window has passed.
    /// Rows already expired never match, so a sweep cannot resurrect them.
    pub fn should_expire(&self, now: DateTimeUtc) -> bool {
        self.status == STATUS_ACTIVE && self.end_date.map_or(false, |end| end < now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
