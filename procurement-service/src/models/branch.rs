//! Branch model for procurement-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Store branch master record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Branch {
    pub branch_id: Uuid,
    pub name: String,
    pub code: String,
    pub location: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub is_main_branch: bool,
    pub active: bool,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a branch.
#[derive(Debug, Clone)]
pub struct CreateBranch {
    pub name: String,
    pub code: String,
    pub location: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub is_main_branch: bool,
}

/// Input for updating a branch.
#[derive(Debug, Clone, Default)]
pub struct UpdateBranch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub is_main_branch: Option<bool>,
    pub active: Option<bool>,
}
