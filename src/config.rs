//! Client construction options shared by all market clients.

use crate::auth::Credentials;
use crate::error::{ConfigError, SdkError};
use crate::http::BinanceHttp;
use crate::network::{resolve_base_url, ApiCategory};

/// Options collected by the per-market client builders.
///
/// Immutable after the client is constructed. Credentials are validated for
/// presence only; key format is the exchange's concern.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Explicit base URL override; wins over the category default.
    pub base_url: Option<String>,
    pub testnet: bool,
    /// Optional `recvWindow` attached to every signed request.
    pub recv_window: Option<u64>,
}

impl ClientOptions {
    /// Resolve options into a transport for the given category.
    pub(crate) fn into_http(self, category: ApiCategory) -> Result<BinanceHttp, SdkError> {
        let credentials = match (self.api_key, self.api_secret) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::MissingOption("api_secret must be set with api_key").into())
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingOption("api_key must be set with api_secret").into())
            }
        };

        let base_url = resolve_base_url(category, self.base_url.as_deref())?;
        Ok(BinanceHttp::new(
            category,
            base_url,
            credentials,
            self.recv_window,
        ))
    }

    /// Category for a production/testnet pair, honoring the testnet flag.
    pub(crate) fn pick_category(
        &self,
        production: ApiCategory,
        testnet: ApiCategory,
    ) -> ApiCategory {
        if self.testnet {
            testnet
        } else {
            production
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_credentials_rejected() {
        let options = ClientOptions {
            api_key: Some("K".to_string()),
            ..Default::default()
        };
        let err = options.into_http(ApiCategory::Spot).unwrap_err();
        assert!(matches!(err, SdkError::Config(ConfigError::MissingOption(_))));
    }

    #[test]
    fn test_no_credentials_is_fine() {
        let options = ClientOptions::default();
        let http = options.into_http(ApiCategory::Spot).unwrap();
        assert_eq!(http.base_url(), "https://api.binance.com");
    }

    #[test]
    fn test_testnet_flag_picks_testnet_category() {
        let options = ClientOptions {
            testnet: true,
            ..Default::default()
        };
        let category = options.pick_category(ApiCategory::Usdm, ApiCategory::UsdmTestnet);
        assert_eq!(category, ApiCategory::UsdmTestnet);
    }
}
