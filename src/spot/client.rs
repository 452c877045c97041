//! Spot market client — one method per `api/v3/*` endpoint.
//!
//! Market data endpoints are unsigned; trade and account endpoints are
//! HMAC-signed and require credentials. Client order ids on order-placing
//! endpoints are generated or prefix-checked before dispatch.

use serde_json::{Map, Value};

use crate::auth::to_param_map;
use crate::config::ClientOptions;
use crate::error::SdkError;
use crate::http::BinanceHttp;
use crate::network::ApiCategory;
use crate::order_id::ensure_order_id;
use crate::shared::{Kline, OneOrMany};
use crate::spot::wire::*;

/// Client for the spot REST API (`api.binance.com` / `testnet.binance.vision`).
#[derive(Debug, Clone)]
pub struct SpotClient {
    http: BinanceHttp,
}

impl SpotClient {
    pub fn builder() -> SpotClientBuilder {
        SpotClientBuilder::default()
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
        let _: Value = self.http.get("api/v3/ping", &()).await?;
        Ok(())
    }

    pub async fn get_exchange_info(
        &self,
        symbol: Option<&str>,
    ) -> Result<ExchangeInfo, SdkError> {
        self.http
            .get("api/v3/exchangeInfo", &symbol_params(symbol))
            .await
    }

    pub async fn get_order_book(&self, params: &OrderBookRequest) -> Result<OrderBook, SdkError> {
        self.http.get("api/v3/depth", params).await
    }

    pub async fn get_recent_trades(
        &self,
        params: &RecentTradesRequest,
    ) -> Result<Vec<SpotTrade>, SdkError> {
        self.http.get("api/v3/trades", params).await
    }

    pub async fn get_historical_trades(
        &self,
        params: &HistoricalTradesRequest,
    ) -> Result<Vec<SpotTrade>, SdkError> {
        self.http.get("api/v3/historicalTrades", params).await
    }

    pub async fn get_aggregate_trades(
        &self,
        params: &AggTradesRequest,
    ) -> Result<Vec<AggTrade>, SdkError> {
        self.http.get("api/v3/aggTrades", params).await
    }

    pub async fn get_klines(&self, params: &KlinesRequest) -> Result<Vec<Kline>, SdkError> {
        self.http.get("api/v3/klines", params).await
    }

    /// Current average price over the exchange-defined window.
    pub async fn get_average_price(&self, symbol: &str) -> Result<AvgPrice, SdkError> {
        self.http
            .get("api/v3/avgPrice", &symbol_params(Some(symbol)))
            .await
    }

    pub async fn get_24hr_change_statistics(
        &self,
        symbol: Option<&str>,
    ) -> Result<OneOrMany<Ticker24h>, SdkError> {
        self.http
            .get("api/v3/ticker/24hr", &symbol_params(symbol))
            .await
    }

    pub async fn get_symbol_price_ticker(
        &self,
        symbol: Option<&str>,
    ) -> Result<OneOrMany<SymbolPrice>, SdkError> {
        self.http
            .get("api/v3/ticker/price", &symbol_params(symbol))
            .await
    }

    pub async fn get_symbol_order_book_ticker(
        &self,
        symbol: Option<&str>,
    ) -> Result<OneOrMany<BookTicker>, SdkError> {
        self.http
            .get("api/v3/ticker/bookTicker", &symbol_params(symbol))
            .await
    }

    // ── Trade ────────────────────────────────────────────────────────────

    /// Validate a new order against the matching engine without placing it.
    pub async fn test_new_order(&self, params: &NewOrderRequest) -> Result<Value, SdkError> {
        let mut params = to_param_map(params)?;
        ensure_order_id(&mut params, "newClientOrderId", self.category());
        self.http
            .post_private_params("api/v3/order/test", params)
            .await
    }

    /// Place an order. A missing `newClientOrderId` is filled with a
    /// generated one; a non-conforming id is logged and sent as-is.
    pub async fn submit_new_order(
        &self,
        params: &NewOrderRequest,
    ) -> Result<NewOrderResult, SdkError> {
        let mut params = to_param_map(params)?;
        ensure_order_id(&mut params, "newClientOrderId", self.category());
        self.http.post_private_params("api/v3/order", params).await
    }

    pub async fn cancel_order(
        &self,
        params: &CancelOrderRequest,
    ) -> Result<CancelOrderResult, SdkError> {
        self.http.delete_private("api/v3/order", params).await
    }

    /// Cancel every open order on a symbol, including legs of order lists.
    pub async fn cancel_all_symbol_orders(&self, symbol: &str) -> Result<Vec<Value>, SdkError> {
        self.http
            .delete_private("api/v3/openOrders", &symbol_params(Some(symbol)))
            .await
    }

    pub async fn get_order(&self, params: &GetOrderRequest) -> Result<SpotOrder, SdkError> {
        self.http.get_private("api/v3/order", params).await
    }

    pub async fn get_open_orders(
        &self,
        symbol: Option<&str>,
    ) -> Result<Vec<SpotOrder>, SdkError> {
        self.http
            .get_private("api/v3/openOrders", &symbol_params(symbol))
            .await
    }

    pub async fn get_all_orders(
        &self,
        params: &AllOrdersRequest,
    ) -> Result<Vec<SpotOrder>, SdkError> {
        self.http.get_private("api/v3/allOrders", params).await
    }

    /// Place an OCO order list. `listClientOrderId` gets the same
    /// generate-or-check treatment as single-order client ids.
    pub async fn submit_new_order_list(
        &self,
        params: &NewOrderListRequest,
    ) -> Result<Value, SdkError> {
        let mut params = to_param_map(params)?;
        ensure_order_id(&mut params, "listClientOrderId", self.category());
        self.http
            .post_private_params("api/v3/order/oco", params)
            .await
    }

    pub async fn cancel_order_list(
        &self,
        params: &CancelOrderListRequest,
    ) -> Result<Value, SdkError> {
        self.http.delete_private("api/v3/orderList", params).await
    }

    // ── Account ──────────────────────────────────────────────────────────

    pub async fn get_account_information(&self) -> Result<AccountInformation, SdkError> {
        self.http.get_private("api/v3/account", &()).await
    }

    pub async fn get_account_trades(
        &self,
        params: &MyTradesRequest,
    ) -> Result<Vec<AccountTrade>, SdkError> {
        self.http.get_private("api/v3/myTrades", params).await
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
pub struct SpotClientBuilder {
    options: ClientOptions,
}

impl SpotClientBuilder {
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

    pub fn build(self) -> Result<SpotClient, SdkError> {
        let category = self
            .options
            .pick_category(ApiCategory::Spot, ApiCategory::SpotTestnet);
        Ok(SpotClient {
            http: self.options.into_http(category)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_production() {
        let client = SpotClient::builder().build().unwrap();
        assert_eq!(client.category(), ApiCategory::Spot);
        assert_eq!(client.base_url(), "https://api.binance.com");
    }

    #[test]
    fn test_builder_testnet() {
        let client = SpotClient::builder().testnet(true).build().unwrap();
        assert_eq!(client.category(), ApiCategory::SpotTestnet);
        assert_eq!(client.base_url(), "https://testnet.binance.vision");
    }

    #[test]
    fn test_builder_base_url_override_wins() {
        let client = SpotClient::builder()
            .base_url("http://127.0.0.1:9000/")
            .testnet(true)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_builder_rejects_partial_credentials() {
        let err = SpotClient::builder().api_key("k").build().unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }
}
