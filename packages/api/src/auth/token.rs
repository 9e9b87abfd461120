//! # Signed bearer tokens — HS256 JWT
//!
//! [`TokenIssuer`] is created once from [`AuthConfig`] and shared by the login path
//! (which calls [`issue`](TokenIssuer::issue)) and the request-identity path (which
//! calls [`verify`](TokenIssuer::verify)). Tokens carry the user id as `sub`, the
//! issue time as `iat`, and `exp` = `iat` + the configured lifetime (15 minutes by
//! default). Expiry is enforced with zero leeway.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::AuthConfig;
use crate::error::{ApiError, ApiResult};

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Issues and verifies tokens with a single HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: chrono::Duration::from_std(config.token_ttl)
                .unwrap_or_else(|_| chrono::Duration::minutes(15)),
        }
    }

    /// Issue a token for `user_id`, valid from now.
    pub fn issue(&self, user_id: Uuid) -> ApiResult<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> ApiResult<String> {
        let iat = issued_at.timestamp().max(0) as u64;
        let exp = (issued_at + self.ttl).timestamp().max(0) as u64;
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!("failed to sign token: {}", e);
            ApiError::Internal("internal server error".to_string())
        })
    }

    /// Check signature and expiry, returning the subject.
    pub fn verify(&self, token: &str) -> ApiResult<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!("rejected token: {}", e);
            ApiError::Auth("invalid or expired token".to_string())
        })?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| ApiError::Auth("invalid or expired token".to_string()))
    }
}
