use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users table (no dependencies)
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).big_integer().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::TelegramId).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).text().null())
                    .col(ColumnDef::new(Users::FirstName).text().null())
                    .col(ColumnDef::new(Users::LastName).text().null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await?;

        // Subscriptions table
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subscriptions::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(Subscriptions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Subscriptions::Strategy).string().not_null())
                    .col(ColumnDef::new(Subscriptions::StartDate).timestamp().null())
                    .col(ColumnDef::new(Subscriptions::EndDate).timestamp().null())
                    .col(ColumnDef::new(Subscriptions::Status).string().not_null().default("active")) // "active", "expired"
                    .col(ColumnDef::new(Subscriptions::PaymentId).text().null())
                    .col(ColumnDef::new(Subscriptions::Amount).double().null())
                    .col(ColumnDef::new(Subscriptions::Currency).string().null())
                    .index(
                        Index::create()
                            .name("idx_subscriptions_user_status")
                            .table(Subscriptions::Table)
                            .col(Subscriptions::UserId)
                            .col(Subscriptions::Status)
                    )
                    .index(
                        Index::create()
                            .name("idx_subscriptions_status_end")
                            .table(Subscriptions::Table)
                            .col(Subscriptions::Status)
                            .col(Subscriptions::EndDate)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_user")
                            .from(Subscriptions::Table, Subscriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Trades table
        manager
            .create_table(
                Table::create()
                    .table(Trades::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trades::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(Trades::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Trades::Strategy).string().not_null())
                    .col(ColumnDef::new(Trades::Symbol).string().not_null())
                    .col(ColumnDef::new(Trades::OpenTime).timestamp().null())
                    .col(ColumnDef::new(Trades::CloseTime).timestamp().null())
                    .col(ColumnDef::new(Trades::OpenPrice).double().not_null())
                    .col(ColumnDef::new(Trades::ClosePrice).double().null())
                    .col(ColumnDef::new(Trades::Status).string().not_null().default("open")) // "open", "closed"
                    .col(ColumnDef::new(Trades::Result).text().null()) // "win", "loss", "partial_win"
                    .index(
                        Index::create()
                            .name("idx_trades_status")
                            .table(Trades::Table)
                            .col(Trades::Status)
                    )
                    .index(
                        Index::create()
                            .name("idx_trades_user_symbol")
                            .table(Trades::Table)
                            .col(Trades::UserId)
                            .col(Trades::Symbol)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trades_user")
                            .from(Trades::Table, Trades::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    TelegramId,
    Username,
    FirstName,
    LastName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    Strategy,
    StartDate,
    EndDate,
    Status,
    PaymentId,
    Amount,
    Currency,
}

#[derive(DeriveIden)]
enum Trades {
    Table,
    Id,
    UserId,
    Strategy,
    Symbol,
    OpenTime,
    CloseTime,
    OpenPrice,
    ClosePrice,
    Status,
    Result,
}
