//! Shared enums and wire primitives used across all market clients.
//!
//! These types are serialization-transparent: they serialize to exactly the
//! string forms Binance expects in query params and sends back in responses,
//! so the same type is usable in both requests and wire structs.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

// ─── Side ────────────────────────────────────────────────────────────────────

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Order types ─────────────────────────────────────────────────────────────

/// Order type accepted by the spot API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotOrderType {
    Limit,
    Market,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    LimitMaker,
}

/// Order type accepted by the futures APIs (USD-M and COIN-M).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuturesOrderType {
    Limit,
    Market,
    Stop,
    StopMarket,
    TakeProfit,
    TakeProfitMarket,
    TrailingStopMarket,
}

// ─── Order parameters ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled.
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
    /// Good till crossing (post-only, futures).
    Gtx,
    /// Good till date (futures).
    Gtd,
}

/// Response detail level for order placement (`newOrderRespType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderResponseType {
    Ack,
    Result,
    Full,
}

/// Position side for hedge-mode futures accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Both,
    Long,
    Short,
}

/// Trigger price type for conditional futures orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkingType {
    MarkPrice,
    ContractPrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarginType {
    Isolated,
    Crossed,
}

// ─── KlineInterval ───────────────────────────────────────────────────────────

/// Candlestick interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "3m")]
    Minute3,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[default]
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "2h")]
    Hour2,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "6h")]
    Hour6,
    #[serde(rename = "8h")]
    Hour8,
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "3d")]
    Day3,
    #[serde(rename = "1w")]
    Week1,
    #[serde(rename = "1M")]
    Month1,
}

impl KlineInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute3 => "3m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1h",
            Self::Hour2 => "2h",
            Self::Hour4 => "4h",
            Self::Hour6 => "6h",
            Self::Hour8 => "8h",
            Self::Hour12 => "12h",
            Self::Day1 => "1d",
            Self::Day3 => "3d",
            Self::Week1 => "1w",
            Self::Month1 => "1M",
        }
    }
}

impl std::fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── PriceLevel ──────────────────────────────────────────────────────────────

/// One order book level: `[price, quantity]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel(pub Decimal, pub Decimal);

impl PriceLevel {
    pub fn price(&self) -> Decimal {
        self.0
    }

    pub fn quantity(&self) -> Decimal {
        self.1
    }
}

// ─── Kline ───────────────────────────────────────────────────────────────────

/// A single candlestick.
///
/// Binance sends klines as heterogeneous JSON arrays; this deserializes the
/// array into named fields. The trailing "ignore" element is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Kline {
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: i64,
    pub quote_asset_volume: Decimal,
    pub trade_count: u64,
    pub taker_buy_base_volume: Decimal,
    pub taker_buy_quote_volume: Decimal,
}

impl<'de> Deserialize<'de> for Kline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw(
            i64,
            Decimal,
            Decimal,
            Decimal,
            Decimal,
            Decimal,
            i64,
            Decimal,
            u64,
            Decimal,
            Decimal,
            serde_json::Value,
        );

        let raw = Raw::deserialize(deserializer)?;
        Ok(Kline {
            open_time: raw.0,
            open: raw.1,
            high: raw.2,
            low: raw.3,
            close: raw.4,
            volume: raw.5,
            close_time: raw.6,
            quote_asset_volume: raw.7,
            trade_count: raw.8,
            taker_buy_base_volume: raw.9,
            taker_buy_quote_volume: raw.10,
        })
    }
}

// ─── OneOrMany ───────────────────────────────────────────────────────────────

/// Binance returns either a single object or an array for endpoints where the
/// `symbol` param is optional (e.g. `ticker/price`). This models both shapes
/// with one return type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Flatten into a vec regardless of wire shape.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_side_serde() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
        let side: Side = serde_json::from_str("\"SELL\"").unwrap();
        assert_eq!(side, Side::Sell);
    }

    #[test]
    fn test_futures_order_type_serde() {
        assert_eq!(
            serde_json::to_string(&FuturesOrderType::StopMarket).unwrap(),
            "\"STOP_MARKET\""
        );
        assert_eq!(
            serde_json::to_string(&FuturesOrderType::TrailingStopMarket).unwrap(),
            "\"TRAILING_STOP_MARKET\""
        );
    }

    #[test]
    fn test_kline_interval_serde() {
        let i: KlineInterval = serde_json::from_str("\"1M\"").unwrap();
        assert_eq!(i, KlineInterval::Month1);
        assert_eq!(serde_json::to_string(&KlineInterval::Minute5).unwrap(), "\"5m\"");
    }

    #[test]
    fn test_kline_from_array() {
        let json = r#"[
            1625097600000, "33500.00", "34000.00", "33000.00", "33800.00",
            "1200.5", 1625101199999, "40600000.0", 8421, "600.1", "20300000.0", "0"
        ]"#;
        let kline: Kline = serde_json::from_str(json).unwrap();
        assert_eq!(kline.open_time, 1625097600000);
        assert_eq!(kline.close, Decimal::from_str("33800.00").unwrap());
        assert_eq!(kline.trade_count, 8421);
    }

    #[test]
    fn test_price_level_from_pair() {
        let level: PriceLevel = serde_json::from_str(r#"["33500.10", "0.5"]"#).unwrap();
        assert_eq!(level.price(), Decimal::from_str("33500.10").unwrap());
        assert_eq!(level.quantity(), Decimal::from_str("0.5").unwrap());
    }

    #[test]
    fn test_one_or_many() {
        let one: OneOrMany<Side> = serde_json::from_str("\"BUY\"").unwrap();
        assert_eq!(one.into_vec(), vec![Side::Buy]);
        let many: OneOrMany<Side> = serde_json::from_str(r#"["BUY", "SELL"]"#).unwrap();
        assert_eq!(many.into_vec(), vec![Side::Buy, Side::Sell]);
    }
}
