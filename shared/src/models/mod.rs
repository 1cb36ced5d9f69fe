//! Data models
//!
//! Shared between paddock-server and its clients (member portal, admin
//! dashboard, vendor kiosks).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Member and account IDs are UUID strings; vehicle and deal IDs are
//! snowflake `i64`s (JS-safe numbers).

pub mod deal;
pub mod member;
pub mod vehicle;

// Re-exports
pub use deal::*;
pub use member::*;
pub use vehicle::*;
