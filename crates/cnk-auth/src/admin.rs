//! Account administration: create, update, and delete accounts while
//! keeping usernames unique and at least one admin in the store.
//!
//! Callers are assumed to be authorized admins already. Every mutation
//! holds the repository's write lock from its first read to its write,
//! so calls through one handle observe a consistent admin count and
//! username set. Across handles and processes the store itself refuses
//! to drop the last admin (surfacing as [`AdminError::LastAdminProtected`])
//! and to duplicate a username (a unique index).

use cnk_core::models::account::{Account, AccountRole, CreateAccount, UpdateAccount};
use cnk_core::models::personnel::Personnel;
use cnk_core::repository::{AccountRepository, PersonnelRepository};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AdminError;

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub role: AccountRole,
    /// Ignored for admin accounts.
    pub personnel_id: Option<Uuid>,
}

/// Partial update of an account. Absent fields keep their values.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub username: Option<String>,
    /// `None` and `Some("")` both keep the stored password.
    pub password: Option<String>,
    pub role: Option<AccountRole>,
    /// `Some(None)` unlinks the personnel record.
    pub personnel_id: Option<Option<Uuid>>,
}

pub struct AccountAdminService<A, P>
where
    A: AccountRepository,
    P: PersonnelRepository,
{
    accounts: A,
    personnel: P,
}

impl<A, P> AccountAdminService<A, P>
where
    A: AccountRepository,
    P: PersonnelRepository,
{
    pub fn new(accounts: A, personnel: P) -> Self {
        Self {
            accounts,
            personnel,
        }
    }

    /// All accounts, oldest first.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AdminError> {
        Ok(self.accounts.list().await?)
    }

    /// Personnel records an account can be linked to.
    pub async fn list_personnel(&self) -> Result<Vec<Personnel>, AdminError> {
        Ok(self.personnel.list().await?)
    }

    pub async fn create_account(&self, input: NewAccount) -> Result<Account, AdminError> {
        if input.username.is_empty() {
            return Err(AdminError::MissingRequiredField { field: "username" });
        }
        if input.password.is_empty() {
            return Err(AdminError::MissingRequiredField { field: "password" });
        }

        let _guard = self.accounts.lock_writes().await;

        self.ensure_username_free(&input.username, None).await?;

        let personnel_id = match input.role {
            AccountRole::Admin => None,
            AccountRole::User => input.personnel_id,
        };

        let account = self
            .accounts
            .create(CreateAccount {
                username: input.username,
                password: input.password,
                role: input.role,
                personnel_id,
            })
            .await?;

        info!(
            account_id = %account.id,
            username = %account.username,
            role = %account.role,
            "Account created"
        );

        Ok(account)
    }

    pub async fn update_account(
        &self,
        id: Uuid,
        patch: AccountPatch,
    ) -> Result<Account, AdminError> {
        if patch.username.as_deref() == Some("") {
            return Err(AdminError::MissingRequiredField { field: "username" });
        }

        let _guard = self.accounts.lock_writes().await;

        let current = self
            .accounts
            .get_by_id(id)
            .await
            .map_err(|e| AdminError::from_lookup(id, e))?;

        if let Some(username) = patch.username.as_deref() {
            if username != current.username {
                self.ensure_username_free(username, Some(id)).await?;
            }
        }

        if current.is_admin() && patch.role == Some(AccountRole::User) {
            self.ensure_not_last_admin(&current).await?;
        }

        let account = self
            .accounts
            .update(
                id,
                UpdateAccount {
                    username: patch.username,
                    password: patch.password.filter(|p| !p.is_empty()),
                    role: patch.role,
                    personnel_id: patch.personnel_id,
                },
            )
            .await
            .map_err(|e| AdminError::from_lookup(id, e))?;

        info!(account_id = %id, username = %account.username, "Account updated");

        Ok(account)
    }

    pub async fn delete_account(&self, id: Uuid) -> Result<(), AdminError> {
        let _guard = self.accounts.lock_writes().await;

        let current = self
            .accounts
            .get_by_id(id)
            .await
            .map_err(|e| AdminError::from_lookup(id, e))?;

        if current.is_admin() {
            self.ensure_not_last_admin(&current).await?;
        }

        self.accounts
            .delete(id)
            .await
            .map_err(|e| AdminError::from_lookup(id, e))?;

        info!(account_id = %id, username = %current.username, "Account deleted");

        Ok(())
    }

    /// Must be called with the write lock held.
    async fn ensure_username_free(
        &self,
        username: &str,
        except: Option<Uuid>,
    ) -> Result<(), AdminError> {
        match self.accounts.get_by_username(username).await {
            Ok(existing) if Some(existing.id) != except => {
                warn!(%username, "Refused: username already exists");
                Err(AdminError::DuplicateUsername {
                    username: username.to_string(),
                })
            }
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Must be called with the write lock held.
    async fn ensure_not_last_admin(&self, account: &Account) -> Result<(), AdminError> {
        let admins = self.accounts.count_by_role(AccountRole::Admin).await?;
        if admins <= 1 {
            warn!(
                account_id = %account.id,
                username = %account.username,
                "Refused: last admin account"
            );
            return Err(AdminError::LastAdminProtected);
        }
        Ok(())
    }
}
