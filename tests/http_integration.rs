//! End-to-end HTTP tests against a local mock server.
//!
//! These exercise the full dispatch path: parameter flattening, order-id
//! injection, timestamping, signing and response decoding, without touching
//! the real exchange.

use httpmock::prelude::*;
use rust_decimal::Decimal;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use binance_rest_sdk::auth::sign_query;
use binance_rest_sdk::prelude::*;
use binance_rest_sdk::usdm::wire::NewOrderRequest;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn order_response_body() -> serde_json::Value {
    serde_json::json!({
        "clientOrderId": "x-gBhMvywyT3sT0rder16ch",
        "cumQty": "0",
        "cumQuote": "0",
        "executedQty": "0",
        "orderId": 4206942069u64,
        "avgPrice": "0.00000",
        "origQty": "0.010",
        "price": "42000",
        "reduceOnly": false,
        "side": "BUY",
        "positionSide": "BOTH",
        "status": "NEW",
        "symbol": "BTCUSDT",
        "timeInForce": "GTC",
        "type": "LIMIT",
        "updateTime": 1700000000000u64
    })
}

#[tokio::test]
async fn test_signed_order_carries_key_signature_and_generated_id() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/fapi/v1/order")
                .header("X-MBX-APIKEY", "test-key")
                .query_param("symbol", "BTCUSDT")
                .query_param("side", "BUY")
                .query_param_matches("newClientOrderId", "^x-gBhMvywy")
                .query_param_exists("timestamp")
                .query_param_exists("signature");
            then.status(200).json_body(order_response_body());
        })
        .await;

    let client = UsdmClient::builder()
        .api_key("test-key")
        .api_secret("test-secret")
        .base_url(server.base_url())
        .build()
        .unwrap();

    let order = client
        .submit_new_order(&NewOrderRequest::limit(
            "BTCUSDT",
            Side::Buy,
            dec("0.01"),
            dec("42000"),
        ))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(order.order_id, 4206942069);
    assert_eq!(order.side, Side::Buy);
}

#[tokio::test]
async fn test_wire_signature_recomputes_from_received_query() {
    // A bare TCP listener instead of the mock server: the raw request line is
    // needed to recompute the HMAC over the exact bytes that were signed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (request_tx, request_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            if n == 0 || raw.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let body = order_response_body().to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = request_tx.send(String::from_utf8_lossy(&raw).into_owned());
    });

    let client = UsdmClient::builder()
        .api_key("test-key")
        .api_secret("test-secret")
        .base_url(format!("http://{addr}"))
        .build()
        .unwrap();

    client
        .submit_new_order(&NewOrderRequest::limit(
            "BTCUSDT",
            Side::Buy,
            dec("0.01"),
            dec("42000"),
        ))
        .await
        .unwrap();

    // "POST /fapi/v1/order?<query>&signature=<sig> HTTP/1.1"
    let request = request_rx.await.unwrap();
    let request_line = request.lines().next().unwrap();
    let target = request_line.split_whitespace().nth(1).unwrap();
    let query = target.split_once('?').unwrap().1;
    let (unsigned, signature) = query.rsplit_once("&signature=").unwrap();

    assert_eq!(sign_query(unsigned, "test-secret"), signature);
}

#[tokio::test]
async fn test_caller_supplied_id_is_sent_unmodified() {
    let server = MockServer::start_async().await;

    // "my-own-id" does not carry the USD-M prefix; it must still go out
    // exactly as given.
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/fapi/v1/order")
                .query_param("newClientOrderId", "my-own-id")
                .query_param_exists("signature");
            then.status(200).json_body(order_response_body());
        })
        .await;

    let client = UsdmClient::builder()
        .api_key("test-key")
        .api_secret("test-secret")
        .base_url(server.base_url())
        .build()
        .unwrap();

    let mut request = NewOrderRequest::limit("BTCUSDT", Side::Buy, dec("0.01"), dec("42000"));
    request.new_client_order_id = Some("my-own-id".to_string());
    client.submit_new_order(&request).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_credentials_fails_before_any_request() {
    let server = MockServer::start_async().await;

    // No mock registered: a request reaching the server would 404 into an
    // HTTP error, not an auth error.
    let client = UsdmClient::builder()
        .base_url(server.base_url())
        .build()
        .unwrap();

    let err = client
        .submit_new_order(&NewOrderRequest::market("BTCUSDT", Side::Sell, dec("1")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SdkError::Auth(AuthError::MissingCredentials)
    ));
}

#[tokio::test]
async fn test_exchange_error_body_maps_to_api_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/fapi/v1/order");
            then.status(400)
                .json_body(serde_json::json!({"code": -1121, "msg": "Invalid symbol."}));
        })
        .await;

    let client = UsdmClient::builder()
        .api_key("test-key")
        .api_secret("test-secret")
        .base_url(server.base_url())
        .build()
        .unwrap();

    let err = client
        .submit_new_order(&NewOrderRequest::market("NOPEUSDT", Side::Buy, dec("1")))
        .await
        .unwrap_err();

    match err {
        SdkError::Http(HttpError::Api { code, msg, .. }) => {
            assert_eq!(code, -1121);
            assert_eq!(msg, "Invalid symbol.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sync_time_tracks_server_drift() {
    let server = MockServer::start_async().await;

    let skew_ms: i64 = 5_000;
    let server_now = chrono::Utc::now().timestamp_millis() + skew_ms;
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/fapi/v1/time");
            then.status(200)
                .json_body(serde_json::json!({"serverTime": server_now}));
        })
        .await;

    let client = UsdmClient::builder()
        .base_url(server.base_url())
        .build()
        .unwrap();

    let offset = client.sync_time().await.unwrap();
    // Allow for the round trip between sampling local time and the mock
    // answering.
    assert!((offset - skew_ms).abs() < 2_000, "offset was {offset}");
    assert_eq!(offset, client.time_offset_millis());
}

#[tokio::test]
async fn test_spot_ticker_decodes_single_object() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v3/ticker/price")
                .query_param("symbol", "BTCUSDT");
            then.status(200)
                .json_body(serde_json::json!({"symbol": "BTCUSDT", "price": "43210.50"}));
        })
        .await;

    let client = SpotClient::builder()
        .base_url(server.base_url())
        .build()
        .unwrap();

    let prices = client
        .get_symbol_price_ticker(Some("BTCUSDT"))
        .await
        .unwrap()
        .into_vec();

    mock.assert_async().await;
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].price, dec("43210.50"));
}

#[tokio::test]
async fn test_spot_ticker_decodes_full_array() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/ticker/price");
            then.status(200).json_body(serde_json::json!([
                {"symbol": "BTCUSDT", "price": "43210.50"},
                {"symbol": "ETHUSDT", "price": "2310.01"}
            ]));
        })
        .await;

    let client = SpotClient::builder()
        .base_url(server.base_url())
        .build()
        .unwrap();

    let prices = client
        .get_symbol_price_ticker(None)
        .await
        .unwrap()
        .into_vec();

    mock.assert_async().await;
    assert_eq!(prices.len(), 2);
}
