//! Audit log domain model.
//!
//! Audit events are append-only: created once, never updated or
//! deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PortalError;

/// Actor recorded for attempts that did not resolve to an account.
pub const ANONYMOUS_ACTOR: &str = "Anonymous";

/// Well-known audit topics.
pub mod topics {
    pub const FAILED_LOGIN: &str = "Failed Login";
    pub const SYSTEM: &str = "System";
}

/// Well-known audit details.
pub mod details {
    pub const ADMIN_LOGIN_SUCCESS: &str = "Admin Login Success";
    pub const USER_LOGIN_SUCCESS: &str = "User Login Success";
    pub const SGK_MISMATCH: &str = "SGK Mismatch";

    /// Detail for a failed credential check.
    pub fn attempted_username(username: &str) -> String {
        format!("Attempted username: {username}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditCategory {
    Login,
    Account,
}

impl AuditCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditCategory::Login => "LOGIN",
            AuditCategory::Account => "ACCOUNT",
        }
    }
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditCategory {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOGIN" => Ok(AuditCategory::Login),
            "ACCOUNT" => Ok(AuditCategory::Account),
            other => Err(PortalError::Validation {
                message: format!("unknown audit category: {other}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    /// Username, or [`ANONYMOUS_ACTOR`].
    pub actor: String,
    pub category: AuditCategory,
    pub topic: String,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditEvent {
    pub actor: String,
    pub category: AuditCategory,
    pub topic: String,
    pub detail: String,
}

impl CreateAuditEvent {
    pub fn login(
        actor: impl Into<String>,
        topic: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            category: AuditCategory::Login,
            topic: topic.into(),
            detail: detail.into(),
        }
    }
}
