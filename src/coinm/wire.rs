//! Wire types for the COIN-M futures REST API (`dapi/*`).
//!
//! Coin-margined contracts quote quantities in contracts and accumulate in
//! the base asset (`cumBase`, `baseQty`), and most endpoints carry both
//! `symbol` and the underlying `pair`. Delivery contracts have no funding,
//! so `lastFundingRate` arrives as an empty string and stays a `String`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::{
    FuturesOrderType, KlineInterval, OrderResponseType, PositionSide, PriceLevel, Side,
    TimeInForce, WorkingType,
};
use crate::usdm::wire::ContractType;

// ─── Market data requests ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTradesRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTradesRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggTradesRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KlinesRequest {
    pub symbol: String,
    pub interval: KlineInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuousKlinesRequest {
    pub pair: String,
    pub contract_type: ContractType,
    pub interval: KlineInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairKlinesRequest {
    pub pair: String,
    pub interval: KlineInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

/// Funding applies to perpetuals only; `symbol` is required here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateHistoryRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

/// Shared query shape for the `futures/data/*` analytics endpoints, which
/// key by pair (and contract type where relevant) on COIN-M.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesDataRequest {
    pub pair: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    pub period: KlineInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasisRequest {
    pub pair: String,
    pub contract_type: ContractType,
    pub period: KlineInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

// ─── Trade requests ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub symbol: String,
    pub side: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_side: Option<PositionSide>,
    #[serde(rename = "type")]
    pub order_type: FuturesOrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// Number of contracts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_position: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_type: Option<WorkingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_protect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_order_resp_type: Option<OrderResponseType>,
}

impl NewOrderRequest {
    /// Minimal market order; everything else defaults to absent.
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            position_side: None,
            order_type: FuturesOrderType::Market,
            time_in_force: None,
            quantity: Some(quantity),
            reduce_only: None,
            price: None,
            new_client_order_id: None,
            stop_price: None,
            close_position: None,
            activation_price: None,
            callback_rate: None,
            working_type: None,
            price_protect: None,
            new_order_resp_type: None,
        }
    }

    /// Minimal GTC limit order.
    pub fn limit(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            order_type: FuturesOrderType::Limit,
            time_in_force: Some(TimeInForce::Gtc),
            price: Some(price),
            ..Self::market(symbol, side, quantity)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOrderRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_client_order_id: Option<String>,
    pub side: Side,
    pub quantity: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_client_order_id: Option<String>,
}

/// Batch cancel by order id and/or original client order id. The id lists
/// are JSON-stringified into single params on dispatch, as the API requires.
#[derive(Debug, Clone)]
pub struct CancelMultipleOrdersRequest {
    pub symbol: String,
    pub order_id_list: Option<Vec<u64>>,
    pub orig_client_order_id_list: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownCancelAllRequest {
    pub symbol: String,
    /// Countdown in milliseconds; 0 disables the timer.
    pub countdown_time: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_client_order_id: Option<String>,
}

/// Query all orders by symbol or by pair (one of the two must be given).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllOrdersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderModifyHistoryRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceOrdersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_close_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

/// Account trades by symbol or by pair (one of the two must be given).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTradesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

// ─── Account requests ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetIsolatedMarginRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_side: Option<PositionSide>,
    pub amount: Decimal,
    /// 1 = add margin, 2 = reduce margin.
    #[serde(rename = "type")]
    pub margin_action: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeHistoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionMarginHistoryRequest {
    pub symbol: String,
    /// 1 = add margin, 2 = reduce margin.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub margin_action: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
}

// ─── Market data responses ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub rate_limit_type: String,
    pub interval: String,
    pub interval_num: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub pair: String,
    pub contract_type: String,
    pub delivery_date: i64,
    pub onboard_date: i64,
    pub contract_status: String,
    /// Contract multiplier in the quote currency (e.g. 100 USD per contract).
    pub contract_size: u64,
    pub margin_asset: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub price_precision: u32,
    pub quantity_precision: u32,
    pub base_asset_precision: u32,
    pub quote_precision: u32,
    pub order_types: Vec<String>,
    pub time_in_force: Vec<String>,
    #[serde(default)]
    pub filters: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub timezone: String,
    pub server_time: i64,
    pub rate_limits: Vec<RateLimit>,
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    pub last_update_id: u64,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub pair: Option<String>,
    /// Message output time.
    #[serde(rename = "E")]
    pub message_time: i64,
    /// Transaction time.
    #[serde(rename = "T")]
    pub transaction_time: i64,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesTrade {
    pub id: u64,
    pub price: Decimal,
    pub qty: Decimal,
    pub base_qty: Decimal,
    pub time: i64,
    pub is_buyer_maker: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggTrade {
    #[serde(rename = "a")]
    pub agg_trade_id: u64,
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "q")]
    pub qty: Decimal,
    #[serde(rename = "f")]
    pub first_trade_id: u64,
    #[serde(rename = "l")]
    pub last_trade_id: u64,
    #[serde(rename = "T")]
    pub time: i64,
    #[serde(rename = "m")]
    pub is_buyer_maker: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPrice {
    pub symbol: String,
    pub pair: String,
    pub mark_price: Decimal,
    pub index_price: Decimal,
    pub estimated_settle_price: Decimal,
    /// Empty string on delivery contracts, which have no funding.
    pub last_funding_rate: String,
    #[serde(default)]
    pub interest_rate: Option<String>,
    pub next_funding_time: i64,
    pub time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateEntry {
    pub symbol: String,
    pub funding_rate: Decimal,
    pub funding_time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub pair: String,
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub weighted_avg_price: Decimal,
    pub last_price: Decimal,
    pub last_qty: Decimal,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    /// Volume in contracts.
    pub volume: Decimal,
    /// Volume in the base asset.
    pub base_volume: Decimal,
    pub open_time: i64,
    pub close_time: i64,
    pub first_id: i64,
    pub last_id: i64,
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolPrice {
    pub symbol: String,
    /// Pair symbol, e.g. `BTCUSD` for `BTCUSD_PERP`.
    pub ps: String,
    pub price: Decimal,
    pub time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTicker {
    pub symbol: String,
    pub pair: String,
    pub bid_price: Decimal,
    pub bid_qty: Decimal,
    pub ask_price: Decimal,
    pub ask_qty: Decimal,
    pub time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInterest {
    pub symbol: String,
    pub pair: String,
    pub open_interest: Decimal,
    pub contract_type: String,
    pub time: i64,
}

// ─── Trade responses ─────────────────────────────────────────────────────────

/// A COIN-M order as returned by placement, modification, cancellation and
/// query endpoints. Accumulates in the base asset (`cumBase`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesOrder {
    pub client_order_id: String,
    #[serde(default)]
    pub cum_qty: Option<Decimal>,
    pub cum_base: Decimal,
    pub executed_qty: Decimal,
    pub order_id: u64,
    #[serde(default)]
    pub avg_price: Option<Decimal>,
    pub orig_qty: Decimal,
    pub price: Decimal,
    pub reduce_only: bool,
    pub side: Side,
    pub position_side: PositionSide,
    pub status: String,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub close_position: Option<bool>,
    pub symbol: String,
    pub pair: String,
    pub time_in_force: TimeInForce,
    #[serde(rename = "type")]
    pub order_type: FuturesOrderType,
    #[serde(default)]
    pub orig_type: Option<FuturesOrderType>,
    #[serde(default)]
    pub activate_price: Option<Decimal>,
    #[serde(default)]
    pub price_rate: Option<Decimal>,
    #[serde(default)]
    pub time: Option<i64>,
    pub update_time: i64,
    #[serde(default)]
    pub working_type: Option<WorkingType>,
    #[serde(default)]
    pub price_protect: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelAllResult {
    pub code: i64,
    pub msg: String,
}

/// `{code, msg}` acknowledgment for mode-change endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ModeChangeResult {
    pub code: i64,
    pub msg: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLeverageResult {
    pub leverage: u32,
    /// Maximum quantity in contracts at this leverage.
    pub max_qty: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionModeResponse {
    pub dual_side_position: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTrade {
    pub symbol: String,
    pub pair: String,
    pub id: u64,
    pub order_id: u64,
    pub side: Side,
    pub price: Decimal,
    pub qty: Decimal,
    pub realized_pnl: Decimal,
    pub margin_asset: String,
    pub base_qty: Decimal,
    pub commission: Decimal,
    pub commission_asset: String,
    pub position_side: PositionSide,
    pub buyer: bool,
    pub maker: bool,
    pub time: i64,
}

// ─── Account responses ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub account_alias: String,
    pub asset: String,
    pub balance: Decimal,
    pub withdraw_available: Decimal,
    pub cross_wallet_balance: Decimal,
    pub cross_un_pnl: Decimal,
    pub available_balance: Decimal,
    pub update_time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInformation {
    pub fee_tier: u32,
    pub can_trade: bool,
    pub can_deposit: bool,
    pub can_withdraw: bool,
    pub update_time: i64,
    pub assets: Vec<Value>,
    pub positions: Vec<Value>,
}

/// Position risk entry (`dapi/v1/positionRisk`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub position_amt: Decimal,
    pub entry_price: Decimal,
    #[serde(default)]
    pub break_even_price: Option<Decimal>,
    pub mark_price: Decimal,
    pub un_realized_profit: Decimal,
    pub liquidation_price: Decimal,
    pub leverage: Decimal,
    /// Maximum quantity in contracts.
    #[serde(default)]
    pub max_qty: Option<Decimal>,
    /// `"isolated"` or `"cross"` — lowercase on the wire, unlike the setter.
    pub margin_type: String,
    pub isolated_margin: Decimal,
    /// Sent as the strings `"true"`/`"false"`.
    pub is_auto_add_margin: String,
    pub position_side: PositionSide,
    #[serde(default)]
    pub notional_value: Option<Decimal>,
    #[serde(default)]
    pub isolated_wallet: Option<Decimal>,
    pub update_time: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntry {
    #[serde(default)]
    pub symbol: Option<String>,
    pub income_type: String,
    pub income: Decimal,
    pub asset: String,
    #[serde(default)]
    pub info: Option<String>,
    pub time: i64,
    pub tran_id: i64,
    #[serde(default)]
    pub trade_id: Option<String>,
}

/// COIN-M brackets cap by quantity in contracts, not notional value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverageBracket {
    pub bracket: u32,
    pub initial_leverage: u32,
    pub qty_cap: u64,
    pub qty_floor: u64,
    pub maint_margin_ratio: f64,
    pub cum: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairLeverageBrackets {
    pub pair: String,
    pub brackets: Vec<LeverageBracket>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRate {
    pub symbol: String,
    pub maker_commission_rate: Decimal,
    pub taker_commission_rate: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_order_request_serializes_in_field_order() {
        let request = NewOrderRequest::limit("BTCUSD_PERP", Side::Sell, dec("2"), dec("41000"));
        let map = crate::auth::to_param_map(&request).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["symbol", "side", "type", "timeInForce", "quantity", "price"]
        );
    }

    #[test]
    fn test_mark_price_delivery_contract_has_empty_funding() {
        let json = r#"{
            "symbol": "BTCUSD_231229",
            "pair": "BTCUSD",
            "markPrice": "43269.15372826",
            "indexPrice": "43273.01195333",
            "estimatedSettlePrice": "43270.85136636",
            "lastFundingRate": "",
            "interestRate": "",
            "nextFundingTime": 0,
            "time": 1702396803000
        }"#;
        let mark: MarkPrice = serde_json::from_str(json).unwrap();
        assert!(mark.last_funding_rate.is_empty());
        assert_eq!(mark.next_funding_time, 0);
    }

    #[test]
    fn test_futures_order_uses_cum_base() {
        let json = r#"{
            "clientOrderId": "x-umBfYLQHtestorder1",
            "cumQty": "0",
            "cumBase": "0",
            "executedQty": "0",
            "orderId": 22542179,
            "avgPrice": "0.0",
            "origQty": "10",
            "price": "0",
            "reduceOnly": false,
            "side": "BUY",
            "positionSide": "SHORT",
            "status": "NEW",
            "stopPrice": "9300",
            "closePosition": false,
            "symbol": "BTCUSD_200925",
            "pair": "BTCUSD",
            "timeInForce": "GTC",
            "type": "TRAILING_STOP_MARKET",
            "origType": "TRAILING_STOP_MARKET",
            "activatePrice": "9020",
            "priceRate": "0.3",
            "updateTime": 1566818724722,
            "workingType": "CONTRACT_PRICE",
            "priceProtect": false
        }"#;
        let order: FuturesOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.pair, "BTCUSD");
        assert_eq!(order.cum_base, dec("0"));
    }

    #[test]
    fn test_balance_carries_withdraw_available() {
        let json = r#"{
            "accountAlias": "SgsR",
            "asset": "BTC",
            "balance": "0.00250000",
            "withdrawAvailable": "0.00250000",
            "crossWalletBalance": "0.00241969",
            "crossUnPnl": "0.00000000",
            "availableBalance": "0.00241969",
            "updateTime": 1592468353979
        }"#;
        let balance: AccountBalance = serde_json::from_str(json).unwrap();
        assert_eq!(balance.withdraw_available, dec("0.00250000"));
    }
}
