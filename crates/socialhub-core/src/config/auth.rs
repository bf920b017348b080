//! Bearer token configuration.

use serde::{Deserialize, Serialize};

/// Settings for validating the session tokens issued by the auth layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the token issuer.
    #[serde(default = "default_secret")]
    pub jwt_secret: String,
    /// Expected `iss` claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Lifetime of issued tokens in seconds.
    #[serde(default = "default_ttl")]
    pub token_ttl_seconds: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_secret(),
            issuer: default_issuer(),
            token_ttl_seconds: default_ttl(),
        }
    }
}

fn default_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_issuer() -> String {
    "socialhub".to_string()
}

fn default_ttl() -> i64 {
    7 * 24 * 3600
}
