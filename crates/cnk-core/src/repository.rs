//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups of a missing record
//! return [`PortalError::NotFound`](crate::error::PortalError::NotFound).

use chrono::{DateTime, Utc};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::error::PortalResult;
use crate::models::{
    account::{Account, AccountRole, CreateAccount, UpdateAccount},
    audit::{AuditCategory, AuditEvent, CreateAuditEvent},
    personnel::{CreatePersonnel, Personnel},
};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Assigns the id and hashes the password.
    fn create(&self, input: CreateAccount) -> impl Future<Output = PortalResult<Account>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PortalResult<Account>> + Send;
    /// Exact, case-sensitive username match.
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = PortalResult<Account>> + Send;
    /// Demoting the only admin fails with
    /// [`PortalError::LastAdmin`](crate::error::PortalError::LastAdmin).
    fn update(
        &self,
        id: Uuid,
        input: UpdateAccount,
    ) -> impl Future<Output = PortalResult<Account>> + Send;
    /// Hard delete. Deleting the only admin fails with
    /// [`PortalError::LastAdmin`](crate::error::PortalError::LastAdmin).
    ///
    /// The store enforces the last-admin rule atomically, for every
    /// handle and process sharing the database.
    fn delete(&self, id: Uuid) -> impl Future<Output = PortalResult<()>> + Send;
    /// All accounts, oldest first.
    fn list(&self) -> impl Future<Output = PortalResult<Vec<Account>>> + Send;
    /// Live count of accounts holding `role`.
    fn count_by_role(&self, role: AccountRole) -> impl Future<Output = PortalResult<u64>> + Send;

    /// Acquire the handle's in-process write lock.
    ///
    /// Callers that read, decide, then write hold the guard for the whole
    /// sequence so local callers see each other's writes. It only orders
    /// callers sharing this handle; the store's own constraints remain
    /// the authority. The repository's methods never take it, so holding
    /// it while calling them does not deadlock.
    fn lock_writes(&self) -> impl Future<Output = OwnedMutexGuard<()>> + Send;
}

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

pub trait PersonnelRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePersonnel,
    ) -> impl Future<Output = PortalResult<Personnel>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = PortalResult<Personnel>> + Send;
    /// All personnel records, ordered by full name.
    fn list(&self) -> impl Future<Output = PortalResult<Vec<Personnel>>> + Send;
}

// ---------------------------------------------------------------------------
// Audit (append-only)
// ---------------------------------------------------------------------------

/// Query filters for audit events.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub actor: Option<String>,
    pub category: Option<AuditCategory>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub trait AuditLogRepository: Send + Sync {
    /// Append a new audit event. No update or delete operations exist.
    fn append(
        &self,
        input: CreateAuditEvent,
    ) -> impl Future<Output = PortalResult<AuditEvent>> + Send;
    /// Matching events, oldest first.
    fn list(
        &self,
        filter: AuditLogFilter,
    ) -> impl Future<Output = PortalResult<Vec<AuditEvent>>> + Send;
}
