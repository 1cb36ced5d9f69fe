//! Vehicle models

use serde::{Deserialize, Serialize};

/// Vehicle registered on a membership
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Vehicle {
    pub id: i64,
    pub member_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub plate: Option<String>,
    pub created_at: i64,
}

/// Create vehicle payload (registration and profile self-service)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleCreate {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub plate: Option<String>,
}
