//! Low-level HTTP client — `BinanceHttp`.
//!
//! Owns the transport, the canonical-query construction, and the
//! public/private split. Market clients hold one `BinanceHttp` each and map
//! endpoint methods onto it. Retries, backoff and rate limiting are
//! deliberately absent: transport-level failures and exchange error codes are
//! surfaced to the caller untouched.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::auth::{build_signed_query, serialize_params, to_param_map, Credentials};
use crate::error::{AuthError, HttpError, SdkError};
use crate::network::ApiCategory;
use crate::time_sync::TimeSync;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";

#[derive(Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerTimeResponse {
    server_time: i64,
}

/// Low-level HTTP client for one Binance REST API family.
pub struct BinanceHttp {
    category: ApiCategory,
    base_url: String,
    client: Client,
    credentials: Option<Credentials>,
    recv_window: Option<u64>,
    time_sync: Arc<TimeSync>,
}

impl BinanceHttp {
    pub fn new(
        category: ApiCategory,
        base_url: String,
        credentials: Option<Credentials>,
        recv_window: Option<u64>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            category,
            base_url,
            client,
            credentials,
            recv_window,
            time_sync: Arc::new(TimeSync::new()),
        }
    }

    pub fn category(&self) -> ApiCategory {
        self.category
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn time_sync(&self) -> &TimeSync {
        &self.time_sync
    }

    // ── Time sync ────────────────────────────────────────────────────────

    /// Current server time (epoch ms) from the category's public time
    /// endpoint.
    pub async fn server_time(&self) -> Result<i64, SdkError> {
        let response: ServerTimeResponse = self.get(self.category.server_time_path(), &()).await?;
        Ok(response.server_time)
    }

    /// Fetch server time and record a clock-drift sample. Returns the new
    /// offset in milliseconds.
    pub async fn sync_time(&self) -> Result<i64, SdkError> {
        let local = chrono::Utc::now().timestamp_millis();
        let server = self.server_time().await?;
        self.time_sync.record_sample(server, local);
        Ok(self.time_sync.offset_millis())
    }

    // ── Public endpoints ─────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &impl Serialize,
    ) -> Result<T, SdkError> {
        self.request_public(Method::GET, path, to_param_map(params)?)
            .await
    }

    // ── Private (signed) endpoints ───────────────────────────────────────

    pub async fn get_private<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &impl Serialize,
    ) -> Result<T, SdkError> {
        self.request_private(Method::GET, path, to_param_map(params)?)
            .await
    }

    pub async fn post_private<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &impl Serialize,
    ) -> Result<T, SdkError> {
        self.request_private(Method::POST, path, to_param_map(params)?)
            .await
    }

    pub async fn put_private<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &impl Serialize,
    ) -> Result<T, SdkError> {
        self.request_private(Method::PUT, path, to_param_map(params)?)
            .await
    }

    pub async fn delete_private<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &impl Serialize,
    ) -> Result<T, SdkError> {
        self.request_private(Method::DELETE, path, to_param_map(params)?)
            .await
    }

    // Map-taking variants for dispatchers that enrich params first
    // (order-id injection, batch stringification).

    pub async fn post_private_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Map<String, Value>,
    ) -> Result<T, SdkError> {
        self.request_private(Method::POST, path, params).await
    }

    pub async fn delete_private_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Map<String, Value>,
    ) -> Result<T, SdkError> {
        self.request_private(Method::DELETE, path, params).await
    }

    pub async fn put_private_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Map<String, Value>,
    ) -> Result<T, SdkError> {
        self.request_private(Method::PUT, path, params).await
    }

    // ── Internal dispatch ────────────────────────────────────────────────

    async fn request_public<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Map<String, Value>,
    ) -> Result<T, SdkError> {
        let query = serialize_params(&params);
        let url = if query.is_empty() {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/{}?{}", self.base_url, path, query)
        };
        debug!(%method, path, "dispatching public request");
        self.dispatch(self.client.request(method, &url)).await
    }

    async fn request_private<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Map<String, Value>,
    ) -> Result<T, SdkError> {
        // Credential check happens before any network I/O so a partial
        // signed request can never leak.
        let credentials = self
            .credentials
            .as_ref()
            .filter(|c| c.is_complete())
            .ok_or(AuthError::MissingCredentials)?;

        let timestamp = self.time_sync.timestamp_millis();
        let query = build_signed_query(
            params,
            &credentials.api_secret,
            timestamp,
            self.recv_window,
        );
        let url = format!("{}/{}?{}", self.base_url, path, query);

        debug!(%method, path, "dispatching signed request");
        let request = self
            .client
            .request(method, &url)
            .header(API_KEY_HEADER, credentials.api_key());
        self.dispatch(request).await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SdkError> {
        let response = request.send().await.map_err(HttpError::from)?;
        let status = response.status();

        if status.is_success() {
            let parsed = response.json::<T>().await.map_err(HttpError::from)?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();

        // Binance reports errors as `{"code": <i64>, "msg": <str>}`; keep
        // code and message verbatim when that shape parses.
        if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(&body) {
            return Err(HttpError::Api {
                status: status_code,
                code: api_error.code,
                msg: api_error.msg,
            }
            .into());
        }

        let err = match status_code {
            401 => HttpError::Unauthorized(body),
            404 => HttpError::NotFound(body),
            418 | 429 => HttpError::RateLimited {
                status: status_code,
                body,
            },
            400..=499 => HttpError::BadRequest(body),
            _ => HttpError::ServerError {
                status: status_code,
                body,
            },
        };
        Err(err.into())
    }
}

impl Clone for BinanceHttp {
    fn clone(&self) -> Self {
        Self {
            category: self.category,
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            credentials: self.credentials.clone(),
            recv_window: self.recv_window,
            time_sync: self.time_sync.clone(),
        }
    }
}

impl std::fmt::Debug for BinanceHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceHttp")
            .field("category", &self.category)
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("recv_window", &self.recv_window)
            .finish()
    }
}
