//! Bearer-token authentication.
//!
//! Token issuance lives in an external identity service; this module only
//! validates the `Authorization: Bearer` header against the shared signing
//! secret and hands the owning user's ID to route handlers. Handlers take
//! the owner explicitly via the [Claims] extractor rather than reading it
//! from ambient request state.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

/// The ID of a user registered with the external identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The integer representation, used for binding database parameters.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// The contents of a validated bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: i64,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
}

impl Claims {
    /// The authenticated user the token belongs to.
    pub fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::Unauthenticated)?;

        let state = AppState::from_ref(state);

        let token_data = decode_token(bearer.token(), &state.decoding_key)?;

        Ok(token_data.claims)
    }
}

fn decode_token(
    token: &str,
    decoding_key: &DecodingKey,
) -> Result<jsonwebtoken::TokenData<Claims>, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default()).map_err(|error| {
        tracing::debug!("Rejected bearer token: {error}");
        Error::Unauthenticated
    })
}

/// Create a token the way the external identity service would.
///
/// Only used to exercise protected routes in tests.
#[cfg(test)]
pub(crate) fn encode_token(user_id: UserId, secret: &str) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = time::OffsetDateTime::now_utc().unix_timestamp() as usize;
    let claims = Claims {
        sub: user_id.as_i64(),
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .expect("could not encode test token")
}
