use chrono::Utc;
use shared::payments::{OrderInfo, IPN_ROUTE};
use shared::StrategyKind;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::state::{AppState, HandlerResult};

/// Handler for /subscribe: create a hosted invoice for the chosen strategy.
/// The subscription itself is only created once the payment webhook
/// confirms the invoice.
pub async fn handle_subscribe(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    strategy_arg: String,
) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let telegram_id = from.id.0.to_string();

    let user = state
        .users
        .get_or_create(
            &telegram_id,
            from.username.clone(),
            Some(from.first_name.clone()),
            from.last_name.clone(),
        )
        .await?;

    let Some(kind) = StrategyKind::parse(&strategy_arg) else {
        let mut text = String::from("Pick a strategy to subscribe to:\n");
        for kind in StrategyKind::ALL {
            text.push_str(&format!(
                "/subscribe {} — {} (${:.0}/month)\n",
                kind.as_str(),
                kind.title(),
                kind.monthly_price_usd(),
            ));
        }
        bot.send_message(msg.chat.id, text).await?;
        return Ok(());
    };

    let now = Utc::now();
    if state
        .subscriptions
        .find_active_by_strategy(user.id, kind, now)
        .await?
        .is_some()
    {
        bot.send_message(
            msg.chat.id,
            format!("🚫 You already have an active {} subscription.", kind.title()),
        )
        .await?;
        return Ok(());
    }

    let order = OrderInfo {
        telegram_id: telegram_id.clone(),
        strategy: kind.as_str().to_string(),
    };
    let callback_url = format!("{}{}", state.config.public_base_url, IPN_ROUTE);

    match state
        .payments
        .create_invoice(&order, kind.monthly_price_usd(), &callback_url)
        .await
    {
        Ok(invoice_url) => {
            info!(
                "created invoice for user {} on strategy {}",
                telegram_id,
                kind.as_str()
            );
            bot.send_message(
                msg.chat.id,
                format!(
                    "Pay here to activate {} for 30 days:\n{}",
                    kind.title(),
                    invoice_url
                ),
            )
            .await?;
        }
        Err(e) => {
            warn!("invoice creation failed for user {}: {}", telegram_id, e);
            bot.send_message(
                msg.chat.id,
                "Could not create a payment link, please try again later.",
            )
            .await?;
        }
    }
    Ok(())
}
