//! CoinGecko market data client.
//!
//! Every call is an independent best-effort request with a short timeout.
//! Failures degrade to sentinel values (`0.0` price, empty history) so the
//! periodic jobs can skip the symbol and retry on their next pass.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

const API_BASE: &str = "https://api.coingecko.com/api/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// One daily point of the historical series, oldest-to-newest.
///
/// The `market_chart` endpoint only carries closes, so `high` and `low`
/// mirror `close`.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: i64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    /// Point the client at a different host (used against a stub server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Map a `BASE-QUOTE` pair like `BTC-USDT` to the CoinGecko coin id.
    fn coin_id(symbol: &str) -> String {
        let base = symbol
            .split('-')
            .next()
            .unwrap_or(symbol)
            .to_lowercase();
        match base.as_str() {
            "btc" => "bitcoin".to_string(),
            "eth" => "ethereum".to_string(),
            "xrp" => "ripple".to_string(),
            other => other.to_string(),
        }
    }

    /// Current USD price for a symbol. Returns `0.0` when the price could
    /// not be fetched; callers must treat that as "unknown" and skip.
    pub async fn current_price(&self, symbol: &str) -> f64 {
        match self.fetch_current_price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!("price lookup failed for {}: {}", symbol, e);
                0.0
            }
        }
    }

    async fn fetch_current_price(&self, symbol: &str) -> Result<f64> {
        let coin = Self::coin_id(symbol);
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url, coin
        );
        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let data: serde_json::Value = response.json().await?;
        Ok(data
            .get(&coin)
            .and_then(|c| c.get("usd"))
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0))
    }

    /// Daily close series for the last `lookback_days` days, oldest first.
    /// Returns an empty vec when the series could not be fetched.
    pub async fn price_history(&self, symbol: &str, lookback_days: u32) -> Vec<PricePoint> {
        match self.fetch_history(symbol, lookback_days).await {
            Ok(points) => points,
            Err(e) => {
                warn!("history lookup failed for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }

    async fn fetch_history(&self, symbol: &str, lookback_days: u32) -> Result<Vec<PricePoint>> {
        #[derive(Deserialize)]
        struct MarketChart {
            prices: Vec<(f64, f64)>,
            total_volumes: Vec<(f64, f64)>,
        }

        let coin = Self::coin_id(symbol);
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days={}&interval=daily",
            self.base_url, coin, lookback_days
        );
        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let chart: MarketChart = response.json().await?;

        let points = chart
            .prices
            .iter()
            .enumerate()
            .map(|(i, (timestamp, close))| PricePoint {
                timestamp: *timestamp as i64,
                close: *close,
                high: *close,
                low: *close,
                volume: chart.total_volumes.get(i).map(|(_, v)| *v).unwrap_or(0.0),
            })
            .collect();
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_bases_to_coingecko_ids() {
        assert_eq!(CoinGeckoClient::coin_id("BTC-USDT"), "bitcoin");
        assert_eq!(CoinGeckoClient::coin_id("ETH-USDT"), "ethereum");
        assert_eq!(CoinGeckoClient::coin_id("XRP-USDT"), "ripple");
    }

    #[test]
    fn unknown_base_falls_through_lowercased() {
        assert_eq!(CoinGeckoClient::coin_id("DOGE-USDT"), "doge");
        assert_eq!(CoinGeckoClient::coin_id("sol"), "sol");
    }
}
