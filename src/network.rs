//! API categories and base URL resolution.
//!
//! An [`ApiCategory`] is the logical identity of a client instance
//! (market + environment). It determines the REST host, the server-time
//! endpoint used for clock-drift measurement, and the mandated client
//! order-id prefix (see [`crate::order_id`]).

use std::str::FromStr;

use crate::error::ConfigError;

/// Production spot REST host.
pub const SPOT_API_URL: &str = "https://api.binance.com";
/// Spot testnet REST host.
pub const SPOT_TESTNET_API_URL: &str = "https://testnet.binance.vision";
/// Production USD-M futures REST host.
pub const USDM_API_URL: &str = "https://fapi.binance.com";
/// Production COIN-M futures REST host.
pub const COINM_API_URL: &str = "https://dapi.binance.com";
/// Futures testnet REST host (shared by USD-M and COIN-M testnets).
pub const FUTURES_TESTNET_API_URL: &str = "https://testnet.binancefuture.com";

// ─── ApiCategory ─────────────────────────────────────────────────────────────

/// Market + environment a client instance belongs to. Immutable once the
/// client is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiCategory {
    Spot,
    SpotTestnet,
    Usdm,
    UsdmTestnet,
    Coinm,
    CoinmTestnet,
}

impl ApiCategory {
    /// Default REST host for this category.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Spot => SPOT_API_URL,
            Self::SpotTestnet => SPOT_TESTNET_API_URL,
            Self::Usdm => USDM_API_URL,
            Self::UsdmTestnet => FUTURES_TESTNET_API_URL,
            Self::Coinm => COINM_API_URL,
            Self::CoinmTestnet => FUTURES_TESTNET_API_URL,
        }
    }

    /// Public server-time endpoint, used for clock-drift measurement.
    pub fn server_time_path(&self) -> &'static str {
        match self {
            Self::Spot | Self::SpotTestnet => "api/v3/time",
            Self::Usdm | Self::UsdmTestnet => "fapi/v1/time",
            Self::Coinm | Self::CoinmTestnet => "dapi/v1/time",
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(
            self,
            Self::SpotTestnet | Self::UsdmTestnet | Self::CoinmTestnet
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::SpotTestnet => "spot-testnet",
            Self::Usdm => "usdm-futures",
            Self::UsdmTestnet => "usdm-futures-testnet",
            Self::Coinm => "coinm-futures",
            Self::CoinmTestnet => "coinm-futures-testnet",
        }
    }
}

impl std::fmt::Display for ApiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApiCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spot" => Ok(Self::Spot),
            "spot-testnet" => Ok(Self::SpotTestnet),
            "usdm-futures" => Ok(Self::Usdm),
            "usdm-futures-testnet" => Ok(Self::UsdmTestnet),
            "coinm-futures" => Ok(Self::Coinm),
            "coinm-futures-testnet" => Ok(Self::CoinmTestnet),
            other => Err(ConfigError::UnknownCategory(other.to_string())),
        }
    }
}

/// Resolve the REST base URL for a category.
///
/// An explicit override wins verbatim (trailing `/` trimmed); otherwise the
/// per-category default applies. Overrides are parsed for well-formedness
/// only — the host is not interpreted further.
pub fn resolve_base_url(
    category: ApiCategory,
    override_url: Option<&str>,
) -> Result<String, ConfigError> {
    match override_url {
        Some(url) => {
            let trimmed = url.trim_end_matches('/');
            reqwest::Url::parse(trimmed)
                .map_err(|e| ConfigError::InvalidBaseUrl(format!("{url}: {e}")))?;
            Ok(trimmed.to_string())
        }
        None => Ok(category.default_base_url().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in [
            ApiCategory::Spot,
            ApiCategory::SpotTestnet,
            ApiCategory::Usdm,
            ApiCategory::UsdmTestnet,
            ApiCategory::Coinm,
            ApiCategory::CoinmTestnet,
        ] {
            let parsed: ApiCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_unknown_category_is_config_error() {
        let err = "options".parse::<ApiCategory>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCategory(s) if s == "options"));
    }

    #[test]
    fn test_resolve_default_urls() {
        assert_eq!(
            resolve_base_url(ApiCategory::Usdm, None).unwrap(),
            "https://fapi.binance.com"
        );
        assert_eq!(
            resolve_base_url(ApiCategory::UsdmTestnet, None).unwrap(),
            "https://testnet.binancefuture.com"
        );
        assert_eq!(
            resolve_base_url(ApiCategory::Spot, None).unwrap(),
            "https://api.binance.com"
        );
    }

    #[test]
    fn test_resolve_override_wins_verbatim() {
        let url = resolve_base_url(ApiCategory::Usdm, Some("http://127.0.0.1:9010")).unwrap();
        assert_eq!(url, "http://127.0.0.1:9010");
    }

    #[test]
    fn test_resolve_override_trims_trailing_slash() {
        let url = resolve_base_url(ApiCategory::Spot, Some("https://example.com/")).unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[test]
    fn test_resolve_invalid_override() {
        let err = resolve_base_url(ApiCategory::Spot, Some("not a url")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_server_time_paths() {
        assert_eq!(ApiCategory::Spot.server_time_path(), "api/v3/time");
        assert_eq!(ApiCategory::UsdmTestnet.server_time_path(), "fapi/v1/time");
        assert_eq!(ApiCategory::Coinm.server_time_path(), "dapi/v1/time");
    }
}
