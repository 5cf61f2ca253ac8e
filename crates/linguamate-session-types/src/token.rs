//! JWT access-token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// User identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    /// Whether the account has completed email (OTP) verification.
    pub verified: bool,
    pub access_token_exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload shared by token creation (identity service) and
/// validation (every other consumer).
///
/// # Fields
///
/// | Field | JWT claim | Rust type | Meaning |
/// |-------|-----------|-----------|---------|
/// | `sub` | `sub` | UUID string | user ID |
/// | `verified` | custom | `bool` | email verification completed |
/// | `exp` | `exp` | seconds since epoch | token expiration |
///
/// # Feature gate
///
/// [`Deserialize`] is always available — all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_IDENTITY_SERVICE`** cargo feature.
/// Only the identity service enables it because it is the sole token issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test), derive(Serialize))]
pub struct JwtClaims {
    /// User ID (UUID string).
    pub sub: String,
    /// Whether the account passed OTP verification when the token was minted.
    pub verified: bool,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

// ── Core decode (private) ────────────────────────────────────────────────

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s — tolerates clock skew between services.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    Ok(data.claims)
}

// ── Public: all consumers ────────────────────────────────────────────────

/// Validate an access-token cookie value, returning parsed identity.
///
/// This is the primary public API for token validation. Every authenticated
/// endpoint calls this to extract user identity from the JWT cookie.
pub fn validate_access_token(cookie_value: &str, secret: &str) -> Result<TokenInfo, SessionError> {
    let claims = decode_jwt(cookie_value, secret)?;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| SessionError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        verified: claims.verified,
        access_token_exp: claims.exp,
    })
}

// ── Feature-gated: identity service only ─────────────────────────────────

/// Validate a token and return raw JWT claims.
///
/// Used by the identity service's refresh flow — validates the refresh token,
/// then looks up the user from the `sub` claim to issue new tokens.
///
/// Requires the `USE_ONLY_IN_IDENTITY_SERVICE` feature. Only the identity
/// service should call this directly; all other consumers use
/// [`validate_access_token`].
#[cfg(any(feature = "USE_ONLY_IN_IDENTITY_SERVICE", test))]
pub fn validate_token(token: &str, secret: &str) -> Result<JwtClaims, SessionError> {
    decode_jwt(token, secret)
}
