//! HS256 token issuance and verification

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::payload::{Payload, ISSUER};
use crate::error::{Error, Result};

/// Minimum accepted length of the HMAC secret, in bytes
pub const MIN_SECRET_KEY_SIZE: usize = 32;

/// Signs and verifies self-contained bearer tokens.
///
/// Built once at startup and shared read-only by the auth service and the
/// auth middleware.
#[derive(Clone)]
pub struct TokenMaker {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMaker").finish_non_exhaustive()
    }
}

impl TokenMaker {
    pub fn new(secret_key: &str) -> Result<Self> {
        if secret_key.len() < MIN_SECRET_KEY_SIZE {
            return Err(Error::Signing(format!(
                "invalid key size: must be at least {} characters",
                MIN_SECRET_KEY_SIZE
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "iss"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
            validation,
        })
    }

    /// Create a signed token for `session_id`/`user_id` valid for `duration`
    pub fn issue(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        duration: chrono::Duration,
    ) -> Result<(String, Payload)> {
        let payload = Payload::new(session_id, user_id, duration);
        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| Error::Signing(format!("Failed to create token: {}", e)))?;
        Ok((token, payload))
    }

    /// Check the signature and expiry of `token` and return its payload
    pub fn verify(&self, token: &str) -> Result<Payload> {
        let payload = decode::<Payload>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::ExpiredToken,
                _ => Error::InvalidToken,
            })?;

        // The library tolerates exp == now; the payload check does not.
        payload.valid()?;
        Ok(payload)
    }
}
