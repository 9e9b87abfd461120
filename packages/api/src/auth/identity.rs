//! # Request identity
//!
//! Every component call takes an explicit [`Identity`] describing who is acting.
//! The server resolves it per request with [`Authenticator::authenticate`] from
//! the `Authorization` and `User-Agent` headers:
//!
//! | Request | Identity |
//! |---------|----------|
//! | valid `Bearer` token | [`Identity::User`] with the token subject |
//! | no token, `User-Agent` equal to the trusted agent string | [`Identity::TrustedAgent`] |
//! | no token | [`Identity::Anonymous`] |
//! | token present but malformed, badly signed or expired | rejected with [`ApiError::Auth`] |

use uuid::Uuid;

use super::config::AuthConfig;
use super::token::TokenIssuer;
use crate::error::{ApiError, ApiResult};

/// Who is performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    User(Uuid),
    /// The scraper; allowed to create listings without an account.
    TrustedAgent,
    Anonymous,
}

impl Identity {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Identity::User(id) => Some(*id),
            _ => None,
        }
    }

    /// The acting user, or an auth error for anyone else.
    pub fn require_user(&self) -> ApiResult<Uuid> {
        self.user_id()
            .ok_or_else(|| ApiError::Auth("authentication required".to_string()))
    }
}

/// Turns raw request credentials into an [`Identity`].
#[derive(Clone)]
pub struct Authenticator {
    tokens: TokenIssuer,
    trusted_agent: String,
}

impl Authenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            tokens: TokenIssuer::new(config),
            trusted_agent: config.trusted_agent.clone(),
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Resolve the caller from the `Authorization` and `User-Agent` header values.
    pub fn authenticate(
        &self,
        authorization: Option<&str>,
        user_agent: Option<&str>,
    ) -> ApiResult<Identity> {
        if let Some(header) = authorization {
            let token = bearer_token(header)
                .ok_or_else(|| ApiError::Auth("expected a bearer token".to_string()))?;
            return self.tokens.verify(token).map(Identity::User);
        }

        if user_agent == Some(self.trusted_agent.as_str()) {
            return Ok(Identity::TrustedAgent);
        }

        Ok(Identity::Anonymous)
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
