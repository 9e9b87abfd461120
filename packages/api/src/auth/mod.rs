//! Authentication: password hashing, bearer tokens and request identity.

mod config;
mod identity;
mod password;
mod token;

pub use config::{AuthConfig, DEFAULT_TOKEN_TTL, DEFAULT_TRUSTED_AGENT};
pub use identity::{Authenticator, Identity};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};
