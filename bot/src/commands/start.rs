use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;

use crate::state::{AppState, HandlerResult};

/// Handler for /start: register the sender on first contact and greet.
pub async fn handle_start(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let telegram_id = from.id.0.to_string();
    info!("Processing /start command from user {}", telegram_id);

    let user = state
        .users
        .get_or_create(
            &telegram_id,
            from.username.clone(),
            Some(from.first_name.clone()),
            from.last_name.clone(),
        )
        .await?;

    let name = user.first_name.unwrap_or_default();
    bot.send_message(
        msg.chat.id,
        format!(
            "Welcome {}! 👋\nThe bot is up and running.\nUse /help to see what it can do.",
            name
        ),
    )
    .await?;
    Ok(())
}
