//! USD-M futures client — one method per `fapi/*` endpoint.

use serde_json::{Map, Value};

use crate::auth::to_param_map;
use crate::config::ClientOptions;
use crate::error::SdkError;
use crate::http::BinanceHttp;
use crate::network::ApiCategory;
use crate::order_id::ensure_order_id;
use crate::shared::{Kline, MarginType, OneOrMany};
use crate::usdm::wire::*;

/// Client for the USD-margined futures REST API.
#[derive(Debug, Clone)]
pub struct UsdmClient {
    http: BinanceHttp,
}

impl UsdmClient {
    pub fn builder() -> UsdmClientBuilder {
        UsdmClientBuilder::default()
    }

    pub fn category(&self) -> ApiCategory {
        self.http.category()
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    // ── Time sync ────────────────────────────────────────────────────────

    /// Current server time in epoch milliseconds.
    pub async fn server_time(&self) -> Result<i64, SdkError> {
        self.http.server_time().await
    }

    /// Measure clock drift against the server and fold it into subsequent
    /// signed timestamps. Returns the new offset.
    pub async fn sync_time(&self) -> Result<i64, SdkError> {
        self.http.sync_time().await
    }

    pub fn time_offset_millis(&self) -> i64 {
        self.http.time_sync().offset_millis()
    }

    // ── Market data ──────────────────────────────────────────────────────

    pub async fn test_connectivity(&self) -> Result<(), SdkError> {
        let _: Value = self.http.get("fapi/v1/ping", &()).await?;
        Ok(())
    }

    pub async fn get_exchange_info(&self) -> Result<ExchangeInfo, SdkError> {
        self.http.get("fapi/v1/exchangeInfo", &()).await
    }

    pub async fn get_order_book(&self, params: &OrderBookRequest) -> Result<OrderBook, SdkError> {
        self.http.get("fapi/v1/depth", params).await
    }

    pub async fn get_recent_trades(
        &self,
        params: &RecentTradesRequest,
    ) -> Result<Vec<FuturesTrade>, SdkError> {
        self.http.get("fapi/v1/trades", params).await
    }

    pub async fn get_historical_trades(
        &self,
        params: &HistoricalTradesRequest,
    ) -> Result<Vec<FuturesTrade>, SdkError> {
        self.http.get("fapi/v1/historicalTrades", params).await
    }

    pub async fn get_aggregate_trades(
        &self,
        params: &AggTradesRequest,
    ) -> Result<Vec<AggTrade>, SdkError> {
        self.http.get("fapi/v1/aggTrades", params).await
    }

    pub async fn get_klines(&self, params: &KlinesRequest) -> Result<Vec<Kline>, SdkError> {
        self.http.get("fapi/v1/klines", params).await
    }

    pub async fn get_continuous_contract_klines(
        &self,
        params: &ContinuousKlinesRequest,
    ) -> Result<Vec<Kline>, SdkError> {
        self.http.get("fapi/v1/continuousKlines", params).await
    }

    pub async fn get_index_price_klines(
        &self,
        params: &PairKlinesRequest,
    ) -> Result<Vec<Kline>, SdkError> {
        self.http.get("fapi/v1/indexPriceKlines", params).await
    }

    pub async fn get_mark_price_klines(
        &self,
        params: &KlinesRequest,
    ) -> Result<Vec<Kline>, SdkError> {
        self.http.get("fapi/v1/markPriceKlines", params).await
    }

    pub async fn get_premium_index_klines(
        &self,
        params: &KlinesRequest,
    ) -> Result<Vec<Kline>, SdkError> {
        self.http.get("fapi/v1/premiumIndexKlines", params).await
    }

    /// Mark price and funding info; one entry or all symbols depending on
    /// whether `symbol` is given.
    pub async fn get_mark_price(
        &self,
        symbol: Option<&str>,
    ) -> Result<OneOrMany<MarkPrice>, SdkError> {
        self.http
            .get("fapi/v1/premiumIndex", &symbol_params(symbol))
            .await
    }

    pub async fn get_funding_rate_history(
        &self,
        params: &FundingRateHistoryRequest,
    ) -> Result<Vec<FundingRateEntry>, SdkError> {
        self.http.get("fapi/v1/fundingRate", params).await
    }

    pub async fn get_funding_rates(&self) -> Result<Value, SdkError> {
        self.http.get("fapi/v1/fundingInfo", &()).await
    }

    pub async fn get_24hr_change_statistics(
        &self,
        symbol: Option<&str>,
    ) -> Result<OneOrMany<Ticker24h>, SdkError> {
        self.http
            .get("fapi/v1/ticker/24hr", &symbol_params(symbol))
            .await
    }

    pub async fn get_symbol_price_ticker(
        &self,
        symbol: Option<&str>,
    ) -> Result<OneOrMany<SymbolPrice>, SdkError> {
        self.http
            .get("fapi/v1/ticker/price", &symbol_params(symbol))
            .await
    }

    pub async fn get_symbol_price_ticker_v2(
        &self,
        symbol: Option<&str>,
    ) -> Result<OneOrMany<SymbolPrice>, SdkError> {
        self.http
            .get("fapi/v2/ticker/price", &symbol_params(symbol))
            .await
    }

    pub async fn get_symbol_order_book_ticker(
        &self,
        symbol: Option<&str>,
    ) -> Result<OneOrMany<BookTicker>, SdkError> {
        self.http
            .get("fapi/v1/ticker/bookTicker", &symbol_params(symbol))
            .await
    }

    pub async fn get_quarterly_contract_settlement_prices(
        &self,
        pair: &str,
    ) -> Result<Vec<SettlementPrice>, SdkError> {
        let mut params = Map::new();
        params.insert("pair".to_string(), Value::String(pair.to_string()));
        self.http.get("futures/data/delivery-price", &params).await
    }

    pub async fn get_open_interest(&self, symbol: &str) -> Result<OpenInterest, SdkError> {
        self.http
            .get("fapi/v1/openInterest", &symbol_params(Some(symbol)))
            .await
    }

    pub async fn get_open_interest_statistics(
        &self,
        params: &FuturesDataRequest,
    ) -> Result<Value, SdkError> {
        self.http.get("futures/data/openInterestHist", params).await
    }

    pub async fn get_top_traders_long_short_position_ratio(
        &self,
        params: &FuturesDataRequest,
    ) -> Result<Value, SdkError> {
        self.http
            .get("futures/data/topLongShortPositionRatio", params)
            .await
    }

    pub async fn get_top_traders_long_short_account_ratio(
        &self,
        params: &FuturesDataRequest,
    ) -> Result<Value, SdkError> {
        self.http
            .get("futures/data/topLongShortAccountRatio", params)
            .await
    }

    pub async fn get_global_long_short_account_ratio(
        &self,
        params: &FuturesDataRequest,
    ) -> Result<Value, SdkError> {
        self.http
            .get("futures/data/globalLongShortAccountRatio", params)
            .await
    }

    pub async fn get_taker_buy_sell_volume(
        &self,
        params: &FuturesDataRequest,
    ) -> Result<Value, SdkError> {
        self.http
            .get("futures/data/takerlongshortRatio", params)
            .await
    }

    pub async fn get_composite_symbol_index(
        &self,
        symbol: Option<&str>,
    ) -> Result<Value, SdkError> {
        self.http
            .get("fapi/v1/indexInfo", &symbol_params(symbol))
            .await
    }

    pub async fn get_multi_assets_mode_asset_index(
        &self,
        symbol: Option<&str>,
    ) -> Result<Value, SdkError> {
        self.http
            .get("fapi/v1/assetIndex", &symbol_params(symbol))
            .await
    }

    pub async fn get_basis(&self, params: &BasisRequest) -> Result<Value, SdkError> {
        self.http.get("futures/data/basis", params).await
    }

    pub async fn get_index_price_constituents(&self, symbol: &str) -> Result<Value, SdkError> {
        self.http
            .get("fapi/v1/constituents", &symbol_params(Some(symbol)))
            .await
    }

    // ── Trade ────────────────────────────────────────────────────────────

    /// Place an order. A missing `newClientOrderId` is filled with a
    /// generated one; a non-conforming id is logged and sent as-is.
    pub async fn submit_new_order(
        &self,
        params: &NewOrderRequest,
    ) -> Result<FuturesOrder, SdkError> {
        let mut params = to_param_map(params)?;
        ensure_order_id(&mut params, "newClientOrderId", self.category());
        self.http.post_private_params("fapi/v1/order", params).await
    }

    /// Place up to five orders at once. This endpoint does not fail as a
    /// whole: rejected entries come back as `{code, msg}` objects in the
    /// response array.
    pub async fn submit_multiple_orders(
        &self,
        orders: &[NewOrderRequest],
    ) -> Result<Vec<Value>, SdkError> {
        let mut encoded = Vec::with_capacity(orders.len());
        for order in orders {
            let mut entry = to_param_map(order)?;
            ensure_order_id(&mut entry, "newClientOrderId", self.category());
            encoded.push(serde_json::to_string(&entry)?);
        }

        let mut params = Map::new();
        params.insert(
            "batchOrders".to_string(),
            Value::String(format!("[{}]", encoded.join(","))),
        );
        self.http
            .post_private_params("fapi/v1/batchOrders", params)
            .await
    }

    /// Modify an order. Only LIMIT orders can be modified; modified orders
    /// lose their place in the match queue.
    pub async fn modify_order(
        &self,
        params: &ModifyOrderRequest,
    ) -> Result<FuturesOrder, SdkError> {
        self.http.put_private("fapi/v1/order", params).await
    }

    pub async fn modify_multiple_orders(
        &self,
        orders: &[ModifyOrderRequest],
    ) -> Result<Vec<Value>, SdkError> {
        let mut encoded = Vec::with_capacity(orders.len());
        for order in orders {
            encoded.push(serde_json::to_string(&to_param_map(order)?)?);
        }

        let mut params = Map::new();
        params.insert(
            "batchOrders".to_string(),
            Value::String(format!("[{}]", encoded.join(","))),
        );
        self.http
            .put_private_params("fapi/v1/batchOrders", params)
            .await
    }

    pub async fn get_order_modify_history(
        &self,
        params: &OrderModifyHistoryRequest,
    ) -> Result<Value, SdkError> {
        self.http.get_private("fapi/v1/orderAmendment", params).await
    }

    pub async fn cancel_order(
        &self,
        params: &CancelOrderRequest,
    ) -> Result<FuturesOrder, SdkError> {
        self.http.delete_private("fapi/v1/order", params).await
    }

    pub async fn cancel_multiple_orders(
        &self,
        params: &CancelMultipleOrdersRequest,
    ) -> Result<Vec<Value>, SdkError> {
        let mut map = Map::new();
        map.insert(
            "symbol".to_string(),
            Value::String(params.symbol.clone()),
        );
        if let Some(ids) = &params.order_id_list {
            map.insert(
                "orderIdList".to_string(),
                Value::String(serde_json::to_string(ids)?),
            );
        }
        if let Some(ids) = &params.orig_client_order_id_list {
            map.insert(
                "origClientOrderIdList".to_string(),
                Value::String(serde_json::to_string(ids)?),
            );
        }
        self.http
            .delete_private_params("fapi/v1/batchOrders", map)
            .await
    }

    pub async fn cancel_all_open_orders(&self, symbol: &str) -> Result<CancelAllResult, SdkError> {
        self.http
            .delete_private("fapi/v1/allOpenOrders", &symbol_params(Some(symbol)))
            .await
    }

    /// Arm (or disarm with `countdown_time = 0`) the cancel-all dead-man
    /// switch.
    pub async fn set_cancel_orders_on_timeout(
        &self,
        params: &CountdownCancelAllRequest,
    ) -> Result<Value, SdkError> {
        self.http
            .post_private("fapi/v1/countdownCancelAll", params)
            .await
    }

    pub async fn get_order(&self, params: &GetOrderRequest) -> Result<FuturesOrder, SdkError> {
        self.http.get_private("fapi/v1/order", params).await
    }

    pub async fn get_all_orders(
        &self,
        params: &AllOrdersRequest,
    ) -> Result<Vec<FuturesOrder>, SdkError> {
        self.http.get_private("fapi/v1/allOrders", params).await
    }

    pub async fn get_all_open_orders(
        &self,
        symbol: Option<&str>,
    ) -> Result<Vec<FuturesOrder>, SdkError> {
        self.http
            .get_private("fapi/v1/openOrders", &symbol_params(symbol))
            .await
    }

    pub async fn get_current_open_order(
        &self,
        params: &GetOrderRequest,
    ) -> Result<FuturesOrder, SdkError> {
        self.http.get_private("fapi/v1/openOrder", params).await
    }

    pub async fn get_force_orders(
        &self,
        params: &ForceOrdersRequest,
    ) -> Result<Value, SdkError> {
        self.http.get_private("fapi/v1/forceOrders", params).await
    }

    pub async fn get_account_trades(
        &self,
        params: &AccountTradesRequest,
    ) -> Result<Vec<AccountTrade>, SdkError> {
        self.http.get_private("fapi/v1/userTrades", params).await
    }

    // ── Account ──────────────────────────────────────────────────────────

    pub async fn set_margin_type(
        &self,
        symbol: &str,
        margin_type: MarginType,
    ) -> Result<ModeChangeResult, SdkError> {
        let mut params = symbol_params(Some(symbol));
        params.insert(
            "marginType".to_string(),
            serde_json::to_value(margin_type)?,
        );
        self.http
            .post_private_params("fapi/v1/marginType", params)
            .await
    }

    pub async fn set_position_mode(
        &self,
        dual_side_position: bool,
    ) -> Result<ModeChangeResult, SdkError> {
        let mut params = Map::new();
        params.insert(
            "dualSidePosition".to_string(),
            Value::String(dual_side_position.to_string()),
        );
        self.http
            .post_private_params("fapi/v1/positionSide/dual", params)
            .await
    }

    pub async fn set_leverage(
        &self,
        symbol: &str,
        leverage: u32,
    ) -> Result<SetLeverageResult, SdkError> {
        let mut params = symbol_params(Some(symbol));
        params.insert("leverage".to_string(), leverage.into());
        self.http
            .post_private_params("fapi/v1/leverage", params)
            .await
    }

    pub async fn set_multi_assets_mode(
        &self,
        multi_assets_margin: bool,
    ) -> Result<ModeChangeResult, SdkError> {
        let mut params = Map::new();
        params.insert(
            "multiAssetsMargin".to_string(),
            Value::String(multi_assets_margin.to_string()),
        );
        self.http
            .post_private_params("fapi/v1/multiAssetsMargin", params)
            .await
    }

    pub async fn get_position_mode(&self) -> Result<PositionModeResponse, SdkError> {
        self.http
            .get_private("fapi/v1/positionSide/dual", &())
            .await
    }

    pub async fn get_multi_assets_mode(&self) -> Result<MultiAssetsModeResponse, SdkError> {
        self.http
            .get_private("fapi/v1/multiAssetsMargin", &())
            .await
    }

    pub async fn set_isolated_position_margin(
        &self,
        params: &SetIsolatedMarginRequest,
    ) -> Result<Value, SdkError> {
        self.http
            .post_private("fapi/v1/positionMargin", params)
            .await
    }

    pub async fn get_positions(&self, symbol: Option<&str>) -> Result<Vec<Position>, SdkError> {
        self.http
            .get_private("fapi/v2/positionRisk", &symbol_params(symbol))
            .await
    }

    pub async fn get_positions_v3(&self, symbol: Option<&str>) -> Result<Vec<Position>, SdkError> {
        self.http
            .get_private("fapi/v3/positionRisk", &symbol_params(symbol))
            .await
    }

    pub async fn get_adl_quantile_estimation(
        &self,
        symbol: Option<&str>,
    ) -> Result<Value, SdkError> {
        self.http
            .get_private("fapi/v1/adlQuantile", &symbol_params(symbol))
            .await
    }

    pub async fn get_position_margin_change_history(
        &self,
        params: &PositionMarginHistoryRequest,
    ) -> Result<Value, SdkError> {
        self.http
            .get_private("fapi/v1/positionMargin/history", params)
            .await
    }

    pub async fn get_balance(&self) -> Result<Vec<AccountBalance>, SdkError> {
        self.http.get_private("fapi/v2/balance", &()).await
    }

    pub async fn get_account_information(&self) -> Result<AccountInformation, SdkError> {
        self.http.get_private("fapi/v2/account", &()).await
    }

    pub async fn get_commission_rate(&self, symbol: &str) -> Result<CommissionRate, SdkError> {
        self.http
            .get_private("fapi/v1/commissionRate", &symbol_params(Some(symbol)))
            .await
    }

    pub async fn get_income_history(
        &self,
        params: &IncomeHistoryRequest,
    ) -> Result<Vec<IncomeEntry>, SdkError> {
        self.http.get_private("fapi/v1/income", params).await
    }

    pub async fn get_leverage_brackets(
        &self,
        symbol: Option<&str>,
    ) -> Result<Vec<SymbolLeverageBrackets>, SdkError> {
        self.http
            .get_private("fapi/v1/leverageBracket", &symbol_params(symbol))
            .await
    }

    pub async fn get_api_trading_status(
        &self,
        symbol: Option<&str>,
    ) -> Result<Value, SdkError> {
        self.http
            .get_private("fapi/v1/apiTradingStatus", &symbol_params(symbol))
            .await
    }
}

/// `{"symbol": ...}` or an empty map when no symbol is given.
fn symbol_params(symbol: Option<&str>) -> Map<String, Value> {
    let mut params = Map::new();
    if let Some(symbol) = symbol {
        params.insert("symbol".to_string(), Value::String(symbol.to_string()));
    }
    params
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct UsdmClientBuilder {
    options: ClientOptions,
}

impl UsdmClientBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.options.api_key = Some(key.into());
        self
    }

    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.options.api_secret = Some(secret.into());
        self
    }

    /// Explicit base URL; wins over the category default.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.options.base_url = Some(url.into());
        self
    }

    pub fn testnet(mut self, testnet: bool) -> Self {
        self.options.testnet = testnet;
        self
    }

    /// `recvWindow` attached to every signed request, in milliseconds.
    pub fn recv_window(mut self, window: u64) -> Self {
        self.options.recv_window = Some(window);
        self
    }

    pub fn build(self) -> Result<UsdmClient, SdkError> {
        let category = self
            .options
            .pick_category(ApiCategory::Usdm, ApiCategory::UsdmTestnet);
        Ok(UsdmClient {
            http: self.options.into_http(category)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_production() {
        let client = UsdmClient::builder().build().unwrap();
        assert_eq!(client.category(), ApiCategory::Usdm);
        assert_eq!(client.base_url(), "https://fapi.binance.com");
    }

    #[test]
    fn test_builder_testnet() {
        let client = UsdmClient::builder().testnet(true).build().unwrap();
        assert_eq!(client.category(), ApiCategory::UsdmTestnet);
        assert_eq!(client.base_url(), "https://testnet.binancefuture.com");
    }

    #[test]
    fn test_builder_base_url_override_wins() {
        let client = UsdmClient::builder()
            .base_url("http://127.0.0.1:9010")
            .testnet(true)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9010");
    }

    #[test]
    fn test_symbol_params() {
        assert!(symbol_params(None).is_empty());
        let params = symbol_params(Some("BTCUSDT"));
        assert_eq!(params["symbol"], serde_json::json!("BTCUSDT"));
    }
}
