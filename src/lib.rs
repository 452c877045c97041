//! # Binance REST SDK
//!
//! A Rust client for the Binance REST APIs: spot, USD-margined futures and
//! coin-margined futures, including their testnets.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared wire types, network constants, error types
//! 2. **Auth** — Credentials + HMAC-SHA256 request signing
//! 3. **HTTP** — `BinanceHttp` with timestamping, signing and drift correction
//! 4. **Market clients** — `SpotClient`, `UsdmClient`, `CoinmClient`, one
//!    method per endpoint
//!
//! Signed requests are canonicalized in parameter insertion order, signed
//! with the account secret, and stamped with a drift-corrected timestamp;
//! client order ids are generated (or prefix-checked) per market before
//! dispatch.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use binance_rest_sdk::prelude::*;
//!
//! let client = UsdmClient::builder()
//!     .api_key("...")
//!     .api_secret("...")
//!     .build()?;
//!
//! client.sync_time().await?;
//! let order = client
//!     .submit_new_order(&NewOrderRequest::limit("BTCUSDT", Side::Buy, qty, price))
//!     .await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Enums and wire types shared across markets.
pub mod shared;

/// Unified SDK error types.
pub mod error;

/// API categories and base URL resolution.
pub mod network;

/// Clock drift tracking for signed timestamps.
pub mod time_sync;

/// Client order id generation and prefix validation.
pub mod order_id;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Credentials and HMAC-SHA256 query signing.
pub mod auth;

// ── Layer 3: HTTP ────────────────────────────────────────────────────────────

/// Signed/unsigned HTTP dispatch against a market base URL.
pub mod http;

/// Builder-level client options shared by the market clients.
pub mod config;

// ── Layer 4: Market clients ──────────────────────────────────────────────────

/// Spot market (`api/v3/*`).
pub mod spot;

/// USD-margined futures (`fapi/*`).
pub mod usdm;

/// Coin-margined futures (`dapi/*`).
pub mod coinm;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared enums and types
    pub use crate::shared::{
        FuturesOrderType, Kline, KlineInterval, MarginType, OneOrMany, OrderResponseType,
        PositionSide, PriceLevel, Side, SpotOrderType, TimeInForce, WorkingType,
    };

    // Errors
    pub use crate::error::{AuthError, ConfigError, HttpError, SdkError};

    // Network
    pub use crate::network::ApiCategory;

    // Auth
    pub use crate::auth::Credentials;

    // Market clients
    pub use crate::coinm::{CoinmClient, CoinmClientBuilder};
    pub use crate::spot::{SpotClient, SpotClientBuilder};
    pub use crate::usdm::{UsdmClient, UsdmClientBuilder};
}
