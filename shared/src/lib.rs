pub mod config;
pub mod database;
pub mod entity;
pub mod market;
pub mod monitor;
pub mod notify;
pub mod payments;
pub mod signal;
pub mod strategy;

pub use config::Config;
pub use database::get_db_connection;
pub use market::{CoinGeckoClient, PricePoint};
pub use notify::{Notifier, TelegramNotifier};
pub use payments::NowPaymentsClient;
pub use strategy::{strategy_for, Strategy, StrategyKind};
