//! Portal token utilities
//!
//! Implements the identity-issuer boundary: short-lived bearer credentials
//! carrying a user id, email, and custom portal claims. Used by the
//! partner claim-access flow to hand a venue its portal session.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims for a portal credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalClaims {
    /// Subject (stable user id)
    pub sub: String,
    /// Email bound to the credential
    pub email: String,
    /// Custom claim: which portal this credential unlocks (e.g. "venue")
    pub portal_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl PortalClaims {
    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Service for minting and verifying portal credentials
#[derive(Clone)]
pub struct PortalTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: i64,
}

impl PortalTokenService {
    /// Create a new service with the given secret and expiry (seconds)
    #[must_use]
    pub fn new(secret: &str, token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry,
        }
    }

    /// Mint a short-lived portal credential for a user
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn mint(
        &self,
        user_id: &str,
        email: &str,
        portal_type: &str,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = PortalClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            portal_type: portal_type.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.token_expiry)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify a bearer credential and return the decoded claims
    ///
    /// # Errors
    /// Returns `TokenExpired` for expired tokens and `InvalidToken` for
    /// anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<PortalClaims, AppError> {
        decode::<PortalClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }
}
