//! Subscription strategies: each one is a recommendation filter over a
//! symbol's recent price history.

use async_trait::async_trait;

use crate::market::CoinGeckoClient;
use crate::signal;

/// Symbols every strategy is evaluated against.
pub const WATCHLIST: [&str; 3] = ["BTC-USDT", "ETH-USDT", "XRP-USDT"];

/// Days of daily history fetched for an evaluation.
pub const HISTORY_DAYS: u32 = 50;

/// The closed set of strategies a subscription can be sold for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    TrendFollow,
    FibRetrace,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::TrendFollow, StrategyKind::FibRetrace];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::TrendFollow => "trend_follow",
            StrategyKind::FibRetrace => "fib_retrace",
        }
    }

    /// Accepts the stored identifier and the short numeric aliases used in
    /// chat commands.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trend_follow" | "1" => Some(StrategyKind::TrendFollow),
            "fib_retrace" | "2" => Some(StrategyKind::FibRetrace),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StrategyKind::TrendFollow => "Trend Follow",
            StrategyKind::FibRetrace => "Fibonacci Retrace",
        }
    }

    pub fn monthly_price_usd(&self) -> f64 {
        match self {
            StrategyKind::TrendFollow => 40.0,
            StrategyKind::FibRetrace => 70.0,
        }
    }
}

/// A buy-recommendation filter. Conservative by contract: any failure to
/// obtain usable history means no signal.
#[async_trait]
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn should_recommend(&self, market: &CoinGeckoClient, symbol: &str) -> bool;
}

/// Momentum filter: close above the short moving average in an uptrend.
pub struct TrendFollowStrategy;

#[async_trait]
impl Strategy for TrendFollowStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TrendFollow
    }

    async fn should_recommend(&self, market: &CoinGeckoClient, symbol: &str) -> bool {
        let history = market.price_history(symbol, HISTORY_DAYS).await;
        signal::trend_signal(&history)
    }
}

/// Support/Fibonacci entry-zone filter.
pub struct FibRetraceStrategy;

#[async_trait]
impl Strategy for FibRetraceStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FibRetrace
    }

    async fn should_recommend(&self, market: &CoinGeckoClient, symbol: &str) -> bool {
        let history = market.price_history(symbol, HISTORY_DAYS).await;
        signal::entry_signal(&history)
    }
}

pub fn strategy_for(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::TrendFollow => Box::new(TrendFollowStrategy),
        StrategyKind::FibRetrace => Box::new(FibRetraceStrategy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_storage_form() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_accepts_chat_aliases() {
        assert_eq!(StrategyKind::parse("1"), Some(StrategyKind::TrendFollow));
        assert_eq!(StrategyKind::parse(" 2 "), Some(StrategyKind::FibRetrace));
        assert_eq!(StrategyKind::parse("FIB_RETRACE"), Some(StrategyKind::FibRetrace));
        assert_eq!(StrategyKind::parse("hodl"), None);
    }
}
