use chrono::Utc;
use shared::signal::TradeTargets;
use shared::strategy::{strategy_for, StrategyKind, WATCHLIST};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;

use crate::state::{AppState, HandlerResult};

/// Handler for /advice: run every subscribed strategy over the watchlist
/// and record each fresh recommendation as an open trade so the monitor
/// can track it against its targets.
pub async fn handle_advice(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let telegram_id = from.id.0.to_string();

    let Some(user) = state.users.find_by_telegram_id(&telegram_id).await? else {
        bot.send_message(msg.chat.id, "🚫 Please subscribe first.").await?;
        return Ok(());
    };

    let now = Utc::now();
    let subs = state.subscriptions.find_active_for_user(user.id, now).await?;
    if subs.is_empty() {
        bot.send_message(msg.chat.id, "🚫 Please subscribe first.").await?;
        return Ok(());
    }

    let mut lines = Vec::new();
    for sub in subs {
        let Some(kind) = StrategyKind::parse(&sub.strategy) else {
            continue;
        };
        let strategy = strategy_for(kind);
        for symbol in WATCHLIST {
            if !strategy.should_recommend(&state.market, symbol).await {
                continue;
            }
            let price = state.market.current_price(symbol).await;
            if price <= 0.0 {
                // Price source is down for this symbol; nothing to act on.
                continue;
            }
            if state.trades.has_open_trade(user.id, kind, symbol).await? {
                lines.push(format!(
                    "📈 {} ({}) — entry already recorded, still in play",
                    symbol,
                    kind.title()
                ));
                continue;
            }

            let targets = TradeTargets::for_entry(price);
            state
                .trades
                .open_trade(user.id, kind, symbol, price, now)
                .await?;
            info!(
                "opened trade for user {} on {} at {} ({})",
                user.id,
                symbol,
                price,
                kind.as_str()
            );
            lines.push(format!(
                "📈 Buy {} at {:.4} ({})\n🎯 TP1 {:.4} | TP2 {:.4} | SL {:.4}",
                symbol,
                price,
                kind.title(),
                targets.take_profit_1,
                targets.take_profit_2,
                targets.stop_loss,
            ));
        }
    }

    let reply = if lines.is_empty() {
        "📊 No recommendations right now.".to_string()
    } else {
        lines.join("\n\n")
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}
