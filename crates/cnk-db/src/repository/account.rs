//! SurrealDB implementation of [`AccountRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use cnk_core::error::PortalResult;
use cnk_core::models::account::{Account, AccountRole, CreateAccount, UpdateAccount};
use cnk_core::repository::AccountRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AccountRow {
    username: String,
    password_hash: String,
    role: String,
    personnel_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AccountRowWithId {
    record_id: String,
    username: String,
    password_hash: String,
    role: String,
    personnel_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<AccountRole, DbError> {
    s.parse()
        .map_err(|_| DbError::Corrupt(format!("unknown account role: {s}")))
}

fn parse_personnel_id(s: Option<String>) -> Result<Option<Uuid>, DbError> {
    s.map(|id| {
        Uuid::parse_str(&id)
            .map_err(|e| DbError::Corrupt(format!("invalid personnel UUID: {e}")))
    })
    .transpose()
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Result<Account, DbError> {
        Ok(Account {
            id,
            role: parse_role(&self.role)?,
            personnel_id: parse_personnel_id(self.personnel_id)?,
            username: self.username,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<Account, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        AccountRow {
            username: self.username,
            password_hash: self.password_hash,
            role: self.role,
            personnel_id: self.personnel_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_account(id)
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Hashing(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the Account repository.
///
/// Clones share one in-process write lock. The last-admin rule is
/// enforced by the `keep_last_admin` event in the database, so separate
/// handles and processes are bound by it too.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
    write_lock: Arc<Mutex<()>>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            db,
            pepper: None,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            pepper: Some(pepper),
            ..Self::new(db)
        }
    }
}

/// How often a write that lost a commit race is re-run. A re-run sees
/// the winner's data, so a second conflict needs a third writer.
const WRITE_CONFLICT_RETRIES: u32 = 3;

/// Column values for one `UPDATE`, already hashed and stringified.
struct AccountChanges {
    username: Option<String>,
    password_hash: Option<String>,
    role: Option<String>,
    /// `Some(None)` clears the link.
    personnel_id: Option<Option<String>>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    async fn update_once(
        &self,
        id_str: &str,
        changes: &AccountChanges,
    ) -> Result<AccountRow, DbError> {
        let mut sets = Vec::new();
        if changes.username.is_some() {
            sets.push("username = $username");
        }
        if changes.password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if changes.role.is_some() {
            sets.push("role = $role");
        }
        if changes.personnel_id.is_some() {
            sets.push("personnel_id = $personnel_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('account', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.to_string()));

        if let Some(username) = &changes.username {
            builder = builder.bind(("username", username.clone()));
        }
        if let Some(password_hash) = &changes.password_hash {
            builder = builder.bind(("password_hash", password_hash.clone()));
        }
        if let Some(role) = &changes.role {
            builder = builder.bind(("role", role.clone()));
        }
        if let Some(personnel_id) = &changes.personnel_id {
            builder = builder.bind(("personnel_id", personnel_id.clone()));
        }

        let result = builder
            .await
            .map_err(|e| DbError::from_write(e.to_string()))?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e.to_string()))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str.to_string(),
        })
    }

    async fn delete_once(&self, id_str: &str) -> Result<(), DbError> {
        let result = self
            .db
            .query("DELETE type::record('account', $id) RETURN BEFORE")
            .bind(("id", id_str.to_string()))
            .await
            .map_err(|e| DbError::from_write(e.to_string()))?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e.to_string()))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "account".into(),
                id: id_str.to_string(),
            });
        }

        Ok(())
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create(&self, input: CreateAccount) -> PortalResult<Account> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('account', $id) SET \
                 username = $username, \
                 password_hash = $password_hash, \
                 role = $role, \
                 personnel_id = $personnel_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("username", input.username))
            .bind(("password_hash", password_hash))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("personnel_id", input.personnel_id.map(|p| p.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> PortalResult<Account> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_username(&self, username: &str) -> PortalResult<Account> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM account \
                 WHERE username = $username",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: format!("username={username}"),
        })?;

        Ok(row.try_into_account()?)
    }

    async fn update(&self, id: Uuid, input: UpdateAccount) -> PortalResult<Account> {
        let id_str = id.to_string();

        let password_hash = input
            .password
            .as_deref()
            .map(|p| hash_password(p, self.pepper.as_deref()))
            .transpose()?;

        let changes = AccountChanges {
            username: input.username,
            password_hash,
            role: input.role.map(|r| r.as_str().to_string()),
            personnel_id: input.personnel_id.map(|p| p.map(|id| id.to_string())),
        };

        let mut attempt = 0;
        let row = loop {
            match self.update_once(&id_str, &changes).await {
                Err(DbError::Conflict(e)) if attempt < WRITE_CONFLICT_RETRIES => {
                    attempt += 1;
                    debug!(account_id = %id, attempt, error = %e, "Retrying account update");
                }
                other => break other?,
            }
        };

        Ok(row.into_account(id)?)
    }

    async fn delete(&self, id: Uuid) -> PortalResult<()> {
        let id_str = id.to_string();

        let mut attempt = 0;
        loop {
            match self.delete_once(&id_str).await {
                Err(DbError::Conflict(e)) if attempt < WRITE_CONFLICT_RETRIES => {
                    attempt += 1;
                    debug!(account_id = %id, attempt, error = %e, "Retrying account delete");
                }
                other => return Ok(other?),
            }
        }
    }

    async fn list(&self) -> PortalResult<Vec<Account>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM account \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;

        let accounts = rows
            .into_iter()
            .map(|row| row.try_into_account())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(accounts)
    }

    async fn count_by_role(&self, role: AccountRole) -> PortalResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM account \
                 WHERE role = $role GROUP ALL",
            )
            .bind(("role", role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn lock_writes(&self) -> OwnedMutexGuard<()> {
        self.write_lock.clone().lock_owned().await
    }
}
