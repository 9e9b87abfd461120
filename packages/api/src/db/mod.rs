//! # Database module — PostgreSQL persistence
//!
//! [`PgStore`] implements [`store::DocumentStore`] on top of a sqlx [`sqlx::PgPool`].
//! The whole module is gated behind the `postgres` feature (on by default) so the
//! domain components and their tests build without SQLx.
//!
//! ## Layout
//!
//! Each collection is one table. Relationship lists are `UUID[]` columns and the
//! weekly hours are a `JSONB` array, so a row maps onto a stored record without
//! joins. A `seq` column records insertion order for the list operations.
//!
//! The schema lives in `migrations/` and is embedded into the binary;
//! [`PgStore::migrate`] applies it at start-up.
//!
//! ## Re-exports
//!
//! - [`connect_pool`] — opens a pool with a bounded number of connections.
//! - [`PgStore`] — the store handle, cheap to clone.

mod pool;
mod postgres;

pub use pool::connect_pool;
pub use postgres::PgStore;
