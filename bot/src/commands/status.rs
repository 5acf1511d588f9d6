use chrono::Utc;
use shared::StrategyKind;
use std::sync::Arc;
use teloxide::prelude::*;

use crate::state::{AppState, HandlerResult};

/// Handler for /status: list the sender's active subscriptions.
pub async fn handle_status(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let telegram_id = from.id.0.to_string();

    let Some(user) = state.users.find_by_telegram_id(&telegram_id).await? else {
        bot.send_message(msg.chat.id, "🚫 No active subscription. Use /subscribe.")
            .await?;
        return Ok(());
    };

    let subs = state
        .subscriptions
        .find_active_for_user(user.id, Utc::now())
        .await?;
    if subs.is_empty() {
        bot.send_message(msg.chat.id, "🚫 No active subscription. Use /subscribe.")
            .await?;
        return Ok(());
    }

    let mut lines = Vec::new();
    for sub in subs {
        let title = StrategyKind::parse(&sub.strategy)
            .map(|k| k.title())
            .unwrap_or("Unknown strategy");
        match sub.end_date {
            Some(end) => lines.push(format!(
                "✅ {} active until {}",
                title,
                end.format("%Y-%m-%d")
            )),
            None => lines.push(format!("✅ {} active", title)),
        }
    }

    bot.send_message(msg.chat.id, lines.join("\n")).await?;
    Ok(())
}
