//! Authentication — API credentials and the request-signing engine.
//!
//! ## Security Model
//!
//! - The API secret lives only inside [`Credentials`]; its `Debug` impl
//!   redacts it and there is no accessor that leaks it outside the crate.
//! - Private requests carry the API key in the `X-MBX-APIKEY` header and an
//!   HMAC-SHA256 `signature` over the canonical query string (see [`sign`]).
//! - Missing credentials fail a private call before any network I/O, so a
//!   partially signed request is never sent.

pub mod sign;

pub use sign::{build_signed_query, serialize_params, sign_query, to_param_map};

/// API key + secret for private endpoints.
///
/// Validated for presence only, not format — the exchange is the source of
/// truth for key validity.
#[derive(Clone)]
pub struct Credentials {
    pub(crate) api_key: String,
    pub(crate) api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Both parts non-empty.
    pub(crate) fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("key", "super-secret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("key"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_is_complete() {
        assert!(Credentials::new("k", "s").is_complete());
        assert!(!Credentials::new("k", "").is_complete());
        assert!(!Credentials::new("", "s").is_complete());
    }
}
