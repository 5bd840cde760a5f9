use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Role claim carried by admin session tokens.
pub const ADMIN_ROLE: &str = "admin";

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign an admin session token valid for `ttl_hours`.
pub fn sign(secret: &str, ttl_hours: i64) -> Result<(String, i64)> {
    let now = Utc::now();
    let exp = (now + Duration::hours(ttl_hours)).timestamp();

    let claims = Claims {
        sub: ADMIN_ROLE.to_owned(),
        role: ADMIN_ROLE.to_owned(),
        iat: now.timestamp(),
        exp,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, exp))
}

/// Verify and decode a JWT token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
