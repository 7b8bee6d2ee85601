//! Bearer tokens that identify the owner of a request.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, OwnerId};

/// Resolves a bearer token to the owner it was issued for.
pub trait TokenVerifier {
    /// Check `token` and return the owner it identifies.
    ///
    /// # Errors
    /// Returns [Error::Unauthorized] if the token is malformed, has a bad
    /// signature, has expired or does not name an owner.
    fn verify(&self, token: &str) -> Result<OwnerId, Error>;
}

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the owner the token was issued for.
    pub sub: String,
    /// The expiry time of the token as a Unix timestamp.
    pub exp: i64,
    /// The time the token was issued as a Unix timestamp.
    pub iat: i64,
    /// Email associated with the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Signs and verifies HS256 JSON Web Tokens with a shared secret.
#[derive(Clone)]
pub struct JwtVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Create a verifier for tokens signed with `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Create a signed token for `owner` that expires after `valid_for`.
    ///
    /// # Errors
    /// Returns [Error::TokenCreation] if the token could not be signed.
    pub fn create_token(
        &self,
        owner: &OwnerId,
        email: Option<String>,
        valid_for: Duration,
    ) -> Result<String, Error> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: owner.to_string(),
            exp: (now + valid_for).unix_timestamp(),
            iat: now.unix_timestamp(),
            email,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| Error::TokenCreation(error.to_string()))
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<OwnerId, Error> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|error| {
                tracing::debug!("rejected bearer token: {error}");
                Error::Unauthorized
            })?;

        if token_data.claims.sub.trim().is_empty() {
            tracing::debug!("rejected bearer token without a subject");
            return Err(Error::Unauthorized);
        }

        Ok(OwnerId::new(token_data.claims.sub))
    }
}
