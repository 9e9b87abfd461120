//! # API crate — domain components for Munch
//!
//! Everything between the HTTP surface and storage lives here. Components are
//! generic over [`store::DocumentStore`], take the acting [`Identity`]
//! explicitly, and report failures as [`ApiError`].
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | — | Argon2 password hashing, HS256 token issuance/verification, request identity resolution |
//! | [`users`] | — | [`IdentityService`]: register, login, profile, public user view, user update |
//! | [`food_trucks`] | — | [`FoodTruckRegistry`]: create, list, get, update with hours validation and ownership checks |
//! | [`reviews`] | — | [`ReviewLedger`]: review submission with running-average maintenance, relink repair, listings |
//! | [`db`] | `postgres` | PostgreSQL connection pool, [`db::PgStore`] and embedded migrations |
//! | [`models`] | — | Request bodies and response projections |
//! | [`error`] | — | [`ApiError`] taxonomy and store error conversion |
//!
//! ## Dependency order
//!
//! `store` → [`auth`] / [`users`] → [`food_trucks`] → [`reviews`]. The
//! ledger reads food trucks directly through the store rather than through the
//! registry, so the components share nothing but the store handle.

pub mod auth;
#[cfg(feature = "postgres")]
pub mod db;
pub mod error;
pub mod food_trucks;
pub mod models;
pub mod reviews;
pub mod users;

pub use auth::{AuthConfig, Authenticator, Identity, TokenIssuer};
pub use error::{ApiError, ApiResult};
pub use food_trucks::FoodTruckRegistry;
pub use reviews::ReviewLedger;
pub use users::IdentityService;
