//! Shared types for the Paddock membership service
//!
//! Common types used across the workspace: the unified error system,
//! domain models, and small utility functions.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
