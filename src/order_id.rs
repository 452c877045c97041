//! Client order-id generation and advisory validation.
//!
//! Binance requires broker order ids to start with `x-<prefix>`, where the
//! prefix is fixed per API category. Validation is advisory only: a
//! non-conforming caller-supplied id is logged and sent unmodified — the
//! exchange, not this client, is the source of truth for validity.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::auth::sign::render_scalar;
use crate::network::ApiCategory;

/// Length of the random tail appended to generated ids. Combined with the
/// prefix this stays well under Binance's 36-character id limit.
const GENERATED_TAIL_LEN: usize = 16;

/// Mandated order-id prefix for a category. Stable across calls.
pub fn order_id_prefix(category: ApiCategory) -> &'static str {
    match category {
        ApiCategory::Spot | ApiCategory::SpotTestnet => "HNXUSLLO",
        ApiCategory::Usdm | ApiCategory::UsdmTestnet => "gBhMvywy",
        ApiCategory::Coinm | ApiCategory::CoinmTestnet => "umBfYLQH",
    }
}

/// Generate a fresh client order id: `x-<prefix>` plus a random alphanumeric
/// tail long enough to avoid collision within a short time window.
pub fn generate_order_id(category: ApiCategory) -> String {
    let tail: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_TAIL_LEN)
        .map(char::from)
        .collect();
    format!("x-{}{}", order_id_prefix(category), tail)
}

/// Outcome of checking an order-id param.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderIdCheck {
    /// The field was absent or empty; a generated id was injected.
    Generated(String),
    /// The supplied id carries the mandated prefix.
    Valid,
    /// The supplied id lacks the mandated prefix. The request proceeds
    /// unmodified; this is advisory only.
    InvalidPrefix { expected: String, supplied: String },
}

/// Check (and enrich) the order-id field of an outgoing param map.
///
/// Pure apart from the randomness consumed when generating: absent/empty →
/// inject a generated id, present-but-unprefixed → report, never error.
pub fn check_order_id(
    params: &mut Map<String, Value>,
    field: &str,
    category: ApiCategory,
) -> OrderIdCheck {
    let supplied = params
        .get(field)
        .map(render_scalar)
        .filter(|id| !id.is_empty());

    match supplied {
        None => {
            let id = generate_order_id(category);
            params.insert(field.to_string(), Value::String(id.clone()));
            OrderIdCheck::Generated(id)
        }
        Some(id) => {
            let expected = format!("x-{}", order_id_prefix(category));
            if id.starts_with(&expected) {
                OrderIdCheck::Valid
            } else {
                OrderIdCheck::InvalidPrefix {
                    expected,
                    supplied: id,
                }
            }
        }
    }
}

/// Dispatcher-facing wrapper: apply [`check_order_id`] and emit exactly one
/// warning when the supplied id is non-conforming.
pub fn ensure_order_id(params: &mut Map<String, Value>, field: &str, category: ApiCategory) {
    match check_order_id(params, field, category) {
        OrderIdCheck::Generated(id) => {
            debug!(field, id = %id, "injected generated client order id");
        }
        OrderIdCheck::Valid => {}
        OrderIdCheck::InvalidPrefix { expected, supplied } => {
            warn!(
                field,
                supplied = %supplied,
                expected_prefix = %expected,
                "client order id does not start with the mandated prefix; sending unmodified"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    /// Counts WARN events so tests can assert on the advisory path.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings(f: impl FnOnce()) -> usize {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = Registry::default().with(WarnCounter(warnings.clone()));
        tracing::subscriber::with_default(subscriber, f);
        warnings.load(Ordering::SeqCst)
    }

    const ALL_CATEGORIES: [ApiCategory; 6] = [
        ApiCategory::Spot,
        ApiCategory::SpotTestnet,
        ApiCategory::Usdm,
        ApiCategory::UsdmTestnet,
        ApiCategory::Coinm,
        ApiCategory::CoinmTestnet,
    ];

    fn params_without_id() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("symbol".to_string(), json!("BTCUSDT"));
        map.insert("side".to_string(), json!("BUY"));
        map
    }

    #[test]
    fn test_prefix_is_stable() {
        for category in ALL_CATEGORIES {
            assert_eq!(order_id_prefix(category), order_id_prefix(category));
            assert!(!order_id_prefix(category).is_empty());
        }
    }

    #[test]
    fn test_testnet_shares_production_prefix() {
        assert_eq!(
            order_id_prefix(ApiCategory::Usdm),
            order_id_prefix(ApiCategory::UsdmTestnet)
        );
    }

    #[test]
    fn test_generated_ids_carry_prefix_and_differ() {
        for category in ALL_CATEGORIES {
            let expected = format!("x-{}", order_id_prefix(category));
            let a = generate_order_id(category);
            let b = generate_order_id(category);
            assert!(a.starts_with(&expected));
            assert!(a.len() <= 36);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_absent_id_is_injected() {
        let mut params = params_without_id();
        let check = check_order_id(&mut params, "newClientOrderId", ApiCategory::Usdm);

        let injected = params["newClientOrderId"].as_str().unwrap();
        assert!(injected.starts_with("x-gBhMvywy"));
        assert!(matches!(check, OrderIdCheck::Generated(id) if id == injected));
    }

    #[test]
    fn test_empty_id_is_replaced() {
        let mut params = params_without_id();
        params.insert("newClientOrderId".to_string(), json!(""));
        let check = check_order_id(&mut params, "newClientOrderId", ApiCategory::Usdm);
        assert!(matches!(check, OrderIdCheck::Generated(_)));
    }

    #[test]
    fn test_valid_id_untouched() {
        let mut params = params_without_id();
        params.insert("newClientOrderId".to_string(), json!("x-gBhMvywyCUSTOM1"));
        let check = check_order_id(&mut params, "newClientOrderId", ApiCategory::Usdm);
        assert_eq!(check, OrderIdCheck::Valid);
        assert_eq!(params["newClientOrderId"], json!("x-gBhMvywyCUSTOM1"));
    }

    #[test]
    fn test_invalid_prefix_leaves_params_unmodified() {
        let mut params = params_without_id();
        params.insert("newClientOrderId".to_string(), json!("my-own-id"));
        let before = params.clone();

        let check = check_order_id(&mut params, "newClientOrderId", ApiCategory::Usdm);

        assert_eq!(params, before);
        assert_eq!(
            check,
            OrderIdCheck::InvalidPrefix {
                expected: "x-gBhMvywy".to_string(),
                supplied: "my-own-id".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_prefix_warns_exactly_once() {
        let warnings = count_warnings(|| {
            let mut params = params_without_id();
            params.insert("newClientOrderId".to_string(), json!("my-own-id"));
            ensure_order_id(&mut params, "newClientOrderId", ApiCategory::Usdm);
        });
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_conforming_and_generated_ids_do_not_warn() {
        let warnings = count_warnings(|| {
            let mut params = params_without_id();
            params.insert("newClientOrderId".to_string(), json!("x-gBhMvywyCUSTOM1"));
            ensure_order_id(&mut params, "newClientOrderId", ApiCategory::Usdm);

            let mut params = params_without_id();
            ensure_order_id(&mut params, "newClientOrderId", ApiCategory::Usdm);
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_ensure_order_id_never_errors() {
        // Non-string value: rendered and checked like any supplied id.
        let mut params = params_without_id();
        params.insert("newClientOrderId".to_string(), json!(12345));
        ensure_order_id(&mut params, "newClientOrderId", ApiCategory::Spot);
        assert_eq!(params["newClientOrderId"], json!(12345));
    }
}
