use anyhow::Result;
use shared::TelegramNotifier;
use std::sync::Arc;
use std::time::Duration;
use teloxide::{dispatching::UpdateHandler, prelude::*};

mod commands;
mod repositories;
mod services;
mod state;

use crate::commands::{
    handle_advice, handle_help, handle_invalid, handle_start, handle_status, handle_subscribe,
    handle_version, Command,
};
use crate::services::monitor::TradeMonitor;
use crate::state::AppState;

fn schema() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(handle_start))
        .branch(case![Command::Help].endpoint(handle_help))
        .branch(case![Command::Subscribe(strategy)].endpoint(handle_subscribe))
        .branch(case![Command::Status].endpoint(handle_status))
        .branch(case![Command::Advice].endpoint(handle_advice))
        .branch(case![Command::Version].endpoint(handle_version));

    Update::filter_message()
        .branch(command_handler)
        .branch(dptree::endpoint(handle_invalid))
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting market-signals bot...");

    let app_state = Arc::new(AppState::new().await?);
    tracing::info!("AppState initialized");

    let bot = Bot::new(&app_state.config.bot_token);

    // Background jobs share the monitor cadence: reprice open trades, then
    // sweep expired subscriptions.
    let tick = Duration::from_secs(app_state.config.monitor_interval_secs);
    let notifier = Arc::new(TelegramNotifier::new(bot.clone()));
    let monitor_handle = TradeMonitor::new(app_state.clone(), notifier).start(tick);
    let expiry_handle = services::expiry::start(app_state.clone(), tick);

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![app_state.clone()])
        .enable_ctrlc_handler()
        .build();

    tracing::info!("Bot is running and waiting for updates...");
    dispatcher.dispatch().await;

    // Dispatcher returned (ctrl-c): stop the background jobs before exit.
    monitor_handle.shutdown().await;
    expiry_handle.shutdown().await;

    Ok(())
}
