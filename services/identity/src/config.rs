use serde::Deserialize;

use linguamate_core::config::Config;

/// Identity service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct IdentityConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing JWT access and refresh tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Cookie domain attribute (root domain, e.g. "linguamate.app"). Env var: `COOKIE_DOMAIN`.
    pub cookie_domain: String,
    /// TCP port to listen on (default 3110). Env var: `IDENTITY_PORT`.
    #[serde(default = "default_identity_port")]
    pub identity_port: u16,
    /// Verification-code lifetime in seconds (default 600). Env var: `CODE_TTL_SECS`.
    #[serde(default = "default_code_ttl_secs")]
    pub code_ttl_secs: i64,
}

fn default_identity_port() -> u16 {
    3110
}

fn default_code_ttl_secs() -> i64 {
    600
}

impl Config for IdentityConfig {}
