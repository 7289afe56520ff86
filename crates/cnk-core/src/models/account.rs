//! Account domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PortalError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Admin,
    User,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Admin => "admin",
            AccountRole::User => "user",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AccountRole::Admin),
            "user" => Ok(AccountRole::User),
            other => Err(PortalError::Validation {
                message: format!("unknown account role: {other}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Unique, compared case-sensitively.
    pub username: String,
    /// Argon2id PHC string. Never the raw password.
    pub password_hash: String,
    pub role: AccountRole,
    /// Linked personnel record; required for `user` logins.
    pub personnel_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    pub username: String,
    /// Raw password (will be hashed with Argon2id before storage).
    pub password: String,
    pub role: AccountRole,
    pub personnel_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAccount {
    pub username: Option<String>,
    /// Raw password; re-hashed before storage.
    pub password: Option<String>,
    pub role: Option<AccountRole>,
    /// `Some(Some(id))` = link, `Some(None)` = unlink, `None` = no change.
    pub personnel_id: Option<Option<Uuid>>,
}

/// An account that passed the login procedure, stripped of its
/// credential material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub id: Uuid,
    pub username: String,
    pub role: AccountRole,
    pub personnel_id: Option<Uuid>,
}

impl From<Account> for AuthenticatedAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            role: account.role,
            personnel_id: account.personnel_id,
        }
    }
}
