use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::Message;
use teloxide::utils::command::BotCommands;

pub mod advice;
pub mod start;
pub mod status;
pub mod subscribe;

pub use advice::handle_advice;
pub use start::handle_start;
pub use status::handle_status;
pub use subscribe::handle_subscribe;

use crate::state::HandlerResult;
use shared::StrategyKind;

/// Commands the bot understands.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Register and get started
    Start,
    /// List the available commands
    Help,
    /// Subscribe to a strategy: /subscribe trend_follow
    Subscribe(String),
    /// Show your subscription status
    Status,
    /// Get the current buy recommendations
    Advice,
    /// Show the running bot version
    Version,
}

pub async fn handle_help(bot: Bot, msg: Message) -> HandlerResult {
    let mut help_text = String::from("📖 Commands:\n");
    for kind in StrategyKind::ALL {
        help_text.push_str(&format!(
            "/subscribe {} — {} strategy (${:.0}/month)\n",
            kind.as_str(),
            kind.title(),
            kind.monthly_price_usd(),
        ));
    }
    help_text.push_str("/status — your subscription status\n");
    help_text.push_str("/advice — current buy recommendations\n");

    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}

pub async fn handle_version(bot: Bot, msg: Message) -> HandlerResult {
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let version_info = format!(
        "🤖 market-signals-bot v{} ({})",
        env!("CARGO_PKG_VERSION"),
        if git_hash.is_empty() { "unknown" } else { git_hash },
    );
    bot.send_message(msg.chat.id, version_info).await?;
    Ok(())
}

pub async fn handle_invalid(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, "❓ Unknown command, use /help.")
        .await?;
    Ok(())
}
