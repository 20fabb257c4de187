use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a login token stays valid.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub uid: Uuid,   // User ID
    pub exp: usize,  // Expiration timestamp
}

/// Sign a new JWT token for a user.
pub fn sign(user_id: Uuid, username: &str, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(TOKEN_TTL_DAYS))
        .ok_or_else(|| anyhow!("token expiration overflows"))?
        .timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        uid: user_id,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
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
