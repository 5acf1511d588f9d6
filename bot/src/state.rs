use anyhow::Result;
use sea_orm::DatabaseConnection;
use shared::{get_db_connection, CoinGeckoClient, Config, NowPaymentsClient};
use std::sync::Arc;

use crate::repositories::{SubscriptionRepository, TradeRepository, UserRepository};

pub type HandlerResult = Result<(), anyhow::Error>;

/// Everything the handlers and background jobs share. Constructed once in
/// `main`; nothing in this crate holds process-global state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Arc<DatabaseConnection>,
    pub market: CoinGeckoClient,
    pub payments: NowPaymentsClient,
    pub users: UserRepository,
    pub subscriptions: SubscriptionRepository,
    pub trades: TradeRepository,
}

impl AppState {
    pub async fn new() -> Result<Self, anyhow::Error> {
        let config = Config::from_env()?;
        let db = Arc::new(get_db_connection(&config.database_url).await?);
        tracing::info!("Connected to database successfully");

        Ok(AppState {
            market: CoinGeckoClient::new(),
            payments: NowPaymentsClient::new(config.nowpayments_api_key.clone()),
            users: UserRepository::new(db.clone()),
            subscriptions: SubscriptionRepository::new(db.clone()),
            trades: TradeRepository::new(db.clone()),
            config,
            db,
        })
    }
}
