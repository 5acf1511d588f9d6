//! Payment-confirmation webhook server.
//!
//! NowPayments calls the IPN route once an invoice settles; a finished
//! payment activates a 30-day subscription for the buyer and confirms it
//! over chat. Everything else the bot does lives in the bot binary.

use anyhow::Result;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use sea_orm::prelude::*;
use sea_orm::ActiveValue::Set;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use shared::entity::{subscriptions, users};
use shared::payments::{IpnPayload, OrderInfo, IPN_ROUTE, SUBSCRIPTION_DAYS};
use shared::{get_db_connection, Config, Notifier, StrategyKind, TelegramNotifier};
use std::sync::Arc;
use teloxide::Bot;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
struct ApiState {
    db: Arc<DatabaseConnection>,
    ipn_secret: String,
    notifier: Arc<TelegramNotifier>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting market-signals API server...");

    let config = Config::from_env()?;
    let db = Arc::new(get_db_connection(&config.database_url).await?);
    info!("Connected to database");

    let notifier = Arc::new(TelegramNotifier::new(Bot::new(&config.bot_token)));
    let state = ApiState {
        db,
        ipn_secret: config.nowpayments_ipn_secret.clone(),
        notifier,
    };

    let app = Router::new()
        .route("/health", get(health_check))
        .route(IPN_ROUTE, post(nowpayments_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("API server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn nowpayments_webhook(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(payload): Json<IpnPayload>,
) -> StatusCode {
    let signature = headers
        .get("x-nowpayments-sig")
        .and_then(|v| v.to_str().ok());
    if signature != Some(state.ipn_secret.as_str()) {
        warn!("rejected IPN call with missing or bad signature");
        return StatusCode::UNAUTHORIZED;
    }

    if payload.payment_status != "finished" {
        info!("ignoring IPN with status {}", payload.payment_status);
        return StatusCode::OK;
    }

    match confirm_payment(&state, &payload).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!("failed to process confirmed payment: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Activate the subscription a finished invoice paid for.
async fn confirm_payment(state: &ApiState, payload: &IpnPayload) -> Result<()> {
    let description = payload
        .order_description
        .as_deref()
        .unwrap_or_default();
    let order: OrderInfo = serde_json::from_str(description)?;

    let Some(user) = users::Entity::find()
        .filter(users::Column::TelegramId.eq(order.telegram_id.as_str()))
        .one(state.db.as_ref())
        .await?
    else {
        // Payment for an account we have never seen; nothing to activate.
        warn!("confirmed payment for unknown telegram id {}", order.telegram_id);
        return Ok(());
    };

    let kind = StrategyKind::parse(&order.strategy)
        .ok_or_else(|| anyhow::anyhow!("unknown strategy in order: {}", order.strategy))?;

    let start_date = Utc::now();
    let end_date = start_date + Duration::days(SUBSCRIPTION_DAYS);

    let subscription = subscriptions::ActiveModel {
        user_id: Set(user.id),
        strategy: Set(kind.as_str().to_string()),
        start_date: Set(Some(start_date)),
        end_date: Set(Some(end_date)),
        status: Set(subscriptions::STATUS_ACTIVE.to_string()),
        payment_id: Set(payload.payment_id_str()),
        amount: Set(payload.pay_amount),
        currency: Set(payload.pay_currency.clone()),
        ..Default::default()
    };
    subscriptions::Entity::insert(subscription)
        .exec(state.db.as_ref())
        .await?;

    info!(
        "activated {} subscription for user {} until {}",
        kind.as_str(),
        user.id,
        end_date.format("%Y-%m-%d")
    );

    if let Ok(chat_id) = user.telegram_id.parse::<i64>() {
        state
            .notifier
            .send(
                chat_id,
                &format!(
                    "✅ Your {} subscription is active until {}",
                    kind.title(),
                    end_date.format("%Y-%m-%d")
                ),
            )
            .await;
    }

    Ok(())
}
