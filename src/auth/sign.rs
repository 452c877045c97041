//! Canonical query serialization and HMAC-SHA256 request signing.
//!
//! Binance signs the exact query string that goes on the wire: parameters in
//! insertion order (never sorted), values URL-encoded, `timestamp` appended
//! last before the signature itself. `serde_json`'s `preserve_order` feature
//! keeps the flattened param map in struct-field order so the canonical
//! string is stable for a given request type.

use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::Sha256;

use crate::error::SdkError;

type HmacSha256 = Hmac<Sha256>;

/// Flatten a `Serialize` params struct into an ordered map of scalar values.
///
/// Unset `Option` fields are expected to be skipped by the struct's serde
/// attributes; any `null` that still shows up is dropped here. Nested objects
/// and arrays are rejected — request params are flat key/value pairs, and a
/// nested value means the caller forgot to JSON-stringify it (as the batch
/// endpoints require).
pub fn to_param_map(params: &impl Serialize) -> Result<Map<String, Value>, SdkError> {
    let value = serde_json::to_value(params)?;
    let map = match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(SdkError::Validation(format!(
                "request params must serialize to an object, got {other}"
            )))
        }
    };

    let mut flat = Map::new();
    for (key, val) in map {
        match val {
            Value::Null => {}
            Value::Object(_) | Value::Array(_) => {
                return Err(SdkError::Validation(format!(
                    "param `{key}` is not a scalar; nested values must be stringified"
                )))
            }
            scalar => {
                flat.insert(key, scalar);
            }
        }
    }
    Ok(flat)
}

/// Serialize an ordered param map into a URL-encoded query string.
pub fn serialize_params(params: &Map<String, Value>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(&render_scalar(value))))
        .collect::<Vec<_>>()
        .join("&")
}

/// HMAC-SHA256 over the canonical query string, hex-encoded.
pub fn sign_query(query: &str, api_secret: &str) -> String {
    // HMAC accepts keys of any length.
    let mut mac =
        HmacSha256::new_from_slice(api_secret.as_bytes()).expect("HMAC key of any length");
    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Build the full signed query for a private request.
///
/// Appends `recvWindow` (when configured) and `timestamp`, signs the
/// canonical string, and appends `signature` last. Deterministic given
/// identical (params, secret, timestamp).
pub fn build_signed_query(
    mut params: Map<String, Value>,
    api_secret: &str,
    timestamp: i64,
    recv_window: Option<u64>,
) -> String {
    if let Some(window) = recv_window {
        params.insert("recvWindow".to_string(), window.into());
    }
    params.insert("timestamp".to_string(), timestamp.into());

    let canonical = serialize_params(&params);
    let signature = sign_query(&canonical, api_secret);
    format!("{canonical}&signature={signature}")
}

/// Render a scalar JSON value the way it appears in a query string.
pub(crate) fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // to_param_map only admits scalars.
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct OrderParams {
        symbol: String,
        side: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        quantity: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reduce_only: Option<bool>,
    }

    fn params() -> OrderParams {
        OrderParams {
            symbol: "BTCUSDT".to_string(),
            side: "BUY".to_string(),
            quantity: Some("1".to_string()),
            reduce_only: None,
        }
    }

    #[test]
    fn test_param_map_keeps_insertion_order() {
        let map = to_param_map(&params()).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["symbol", "side", "quantity"]);
    }

    #[test]
    fn test_unset_options_are_absent() {
        let map = to_param_map(&params()).unwrap();
        assert!(!map.contains_key("reduceOnly"));
    }

    #[test]
    fn test_nested_params_rejected() {
        let nested = serde_json::json!({ "batch": [{"symbol": "BTCUSDT"}] });
        let err = to_param_map(&nested).unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[test]
    fn test_serialize_url_encodes_values() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::String("x y&z".to_string()));
        map.insert("b".to_string(), Value::Bool(true));
        assert_eq!(serialize_params(&map), "a=x%20y%26z&b=true");
    }

    #[test]
    fn test_sign_query_known_vector() {
        // Example from the Binance API docs (signed endpoint example).
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        assert_eq!(
            sign_query(query, secret),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let map = to_param_map(&params()).unwrap();
        let a = build_signed_query(map.clone(), "secret", 1_700_000_000_000, Some(5000));
        let b = build_signed_query(map, "secret", 1_700_000_000_000, Some(5000));
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_character_edit_changes_signature() {
        let base = to_param_map(&params()).unwrap();
        let sig_of = |map: Map<String, Value>| {
            let query = build_signed_query(map, "secret", 1_700_000_000_000, None);
            query.rsplit_once("signature=").unwrap().1.to_string()
        };

        let original = sig_of(base.clone());

        // Sample single-character edits across param values.
        for (edited_key, edited_value) in [
            ("symbol", "BTCUSDD"),
            ("side", "BUX"),
            ("quantity", "2"),
        ] {
            let mut edited = base.clone();
            edited.insert(
                edited_key.to_string(),
                Value::String(edited_value.to_string()),
            );
            assert_ne!(original, sig_of(edited), "edit of {edited_key} must change signature");
        }
    }

    #[test]
    fn test_signed_query_layout() {
        let map = to_param_map(&params()).unwrap();
        let query = build_signed_query(map, "secret", 42, Some(5000));
        assert!(query.starts_with("symbol=BTCUSDT&side=BUY&quantity=1&recvWindow=5000&timestamp=42&signature="));
        let sig = query.rsplit_once("signature=").unwrap().1;
        // 256-bit HMAC, hex-encoded.
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
