//! Session-token verification for the dashboard's cookie auth.
//!
//! The dashboard backend issues an HS256 JWT in a cookie named `token` with
//! the user id in a `userId` claim. Verification happens before any chat
//! machinery runs; a bad or missing token never reaches the orchestrator.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Signing secret used when none is configured. Matches the dashboard
/// backend's own fallback so a dev setup works without any env vars.
pub const DEFAULT_JWT_SECRET: &str = "drone-survey-secret-key";

const TOKEN_COOKIE: &str = "token";

/// Claims carried by the session token.
#[derive(Debug, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

/// Extract and verify the session token from the request's cookies. Tokens
/// without an `exp` claim are accepted; expired ones are rejected.
pub fn authenticate(headers: &HeaderMap, secret: &SecretString) -> Result<Claims, AuthError> {
    let token = session_token(headers).ok_or(AuthError::MissingToken)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();

    decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == TOKEN_COOKIE).then(|| value.to_string())
        })
}
