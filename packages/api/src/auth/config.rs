//! Authentication configuration handed in by the server's settings.

use std::time::Duration;

/// User agent the scraper sends when it creates listings without an account.
pub const DEFAULT_TRUSTED_AGENT: &str = "MunchCritic/1.0";

/// Lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Token signing and caller-recognition settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for HS256 tokens.
    pub secret: String,
    pub token_ttl: Duration,
    /// Exact `User-Agent` value identifying the trusted scraper.
    pub trusted_agent: String,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: DEFAULT_TOKEN_TTL,
            trusted_agent: DEFAULT_TRUSTED_AGENT.to_string(),
        }
    }

    /// Builder method to override the token lifetime.
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Builder method to override the trusted agent string.
    pub fn with_trusted_agent(mut self, agent: impl Into<String>) -> Self {
        self.trusted_agent = agent.into();
        self
    }
}
