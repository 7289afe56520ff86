//! Personnel domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employee record. The SGK number doubles as the second login
/// factor for `user` accounts linked to this record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Personnel {
    pub id: Uuid,
    pub full_name: String,
    pub sgk_number: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePersonnel {
    pub full_name: String,
    pub sgk_number: String,
}
