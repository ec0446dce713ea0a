use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::user::{Claims, UserId};

// Generates a JWT for the user, valid for `ttl`.
pub fn create_jwt(
    secret_key: &str,
    user_id: UserId,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    // Subject is the user id, expiry is an absolute unix timestamp
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + ttl).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret_key.as_bytes()),
    )
}

// Validates the provided JWT token and returns the user ID if valid.
pub fn validate_token(secret_key: &str, token: &str) -> Option<UserId> {
    let validation = Validation::new(Algorithm::HS256);

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret_key.as_bytes()),
        &validation,
    ) {
        Ok(data) => data.claims.sub.parse().ok(),
        Err(_) => None, // invalid signature or expired
    }
}
