//! Outbound user notifications.

use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::warn;

/// Best-effort delivery of a text message to a user's chat.
///
/// Implementations swallow their own errors: a failed send is logged and
/// must never abort the monitor pass that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str);
}

#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, chat_id: i64, text: &str) {
        if let Err(e) = self
            .bot
            .send_message(ChatId(chat_id), text.to_string())
            .await
        {
            warn!("failed to send message to chat {}: {}", chat_id, e);
        }
    }
}
