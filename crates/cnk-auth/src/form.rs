//! Selection state of the account management screen.
//!
//! `Idle -> Editing -> Idle` on save, delete, or cancel of an existing
//! account; `Idle -> Creating -> Idle` on save or cancel of a new one.
//! A failed save or delete leaves the state as it was, so the form
//! stays populated for correction. The state is held by the caller and
//! never persisted.

use cnk_core::models::account::{Account, AccountRole};
use cnk_core::repository::{AccountRepository, PersonnelRepository};
use uuid::Uuid;

use crate::admin::{AccountAdminService, AccountPatch, NewAccount};
use crate::error::AdminError;

/// Editable form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub username: String,
    /// Always starts blank; on edit, blank keeps the stored password.
    pub password: String,
    pub role: AccountRole,
    /// Only meaningful for `user` accounts.
    pub personnel_id: Option<Uuid>,
}

impl Default for AccountDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            role: AccountRole::User,
            personnel_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccountFormState {
    #[default]
    Idle,
    Editing {
        account_id: Uuid,
        draft: AccountDraft,
    },
    Creating {
        draft: AccountDraft,
    },
}

impl AccountFormState {
    /// Start editing `account`. The stored password is never shown.
    pub fn select(account: &Account) -> Self {
        AccountFormState::Editing {
            account_id: account.id,
            draft: AccountDraft {
                username: account.username.clone(),
                password: String::new(),
                role: account.role,
                personnel_id: account.personnel_id,
            },
        }
    }

    /// Start a blank new-account form.
    pub fn new_account() -> Self {
        AccountFormState::Creating {
            draft: AccountDraft::default(),
        }
    }

    pub fn cancel(self) -> Self {
        AccountFormState::Idle
    }

    pub fn draft(&self) -> Option<&AccountDraft> {
        match self {
            AccountFormState::Idle => None,
            AccountFormState::Editing { draft, .. } | AccountFormState::Creating { draft } => {
                Some(draft)
            }
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut AccountDraft> {
        match self {
            AccountFormState::Idle => None,
            AccountFormState::Editing { draft, .. } | AccountFormState::Creating { draft } => {
                Some(draft)
            }
        }
    }

    /// Id of the account being edited, if any.
    pub fn selected(&self) -> Option<Uuid> {
        match self {
            AccountFormState::Editing { account_id, .. } => Some(*account_id),
            _ => None,
        }
    }

    /// Submit the form. Returns the next state with the outcome; saving
    /// from `Idle` is a no-op.
    pub async fn save<A, P>(
        self,
        admin: &AccountAdminService<A, P>,
    ) -> (Self, Option<Result<Account, AdminError>>)
    where
        A: AccountRepository,
        P: PersonnelRepository,
    {
        let result = match &self {
            AccountFormState::Idle => None,
            AccountFormState::Creating { draft } => Some(
                admin
                    .create_account(NewAccount {
                        username: draft.username.clone(),
                        password: draft.password.clone(),
                        role: draft.role,
                        personnel_id: draft.personnel_id,
                    })
                    .await,
            ),
            AccountFormState::Editing { account_id, draft } => Some(
                admin
                    .update_account(
                        *account_id,
                        AccountPatch {
                            username: Some(draft.username.clone()),
                            password: Some(draft.password.clone()),
                            role: Some(draft.role),
                            personnel_id: Some(draft.personnel_id),
                        },
                    )
                    .await,
            ),
        };

        match result {
            None => (self, None),
            Some(Ok(account)) => (AccountFormState::Idle, Some(Ok(account))),
            Some(Err(e)) => (self, Some(Err(e))),
        }
    }

    /// Delete the selected account. Only valid while `Editing`.
    pub async fn delete<A, P>(
        self,
        admin: &AccountAdminService<A, P>,
    ) -> (Self, Option<Result<(), AdminError>>)
    where
        A: AccountRepository,
        P: PersonnelRepository,
    {
        let Some(account_id) = self.selected() else {
            return (self, None);
        };

        match admin.delete_account(account_id).await {
            Ok(()) => (AccountFormState::Idle, Some(Ok(()))),
            Err(e) => (self, Some(Err(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "ahmet".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            role: AccountRole::User,
            personnel_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn select_prefills_fields_with_blank_password() {
        let account = stored_account();
        let state = AccountFormState::select(&account);

        assert_eq!(state.selected(), Some(account.id));
        let draft = state.draft().unwrap();
        assert_eq!(draft.username, "ahmet");
        assert_eq!(draft.password, "");
        assert_eq!(draft.role, AccountRole::User);
        assert_eq!(draft.personnel_id, account.personnel_id);
    }

    #[test]
    fn new_account_starts_blank_as_user() {
        let state = AccountFormState::new_account();
        assert_eq!(state.selected(), None);
        assert_eq!(state.draft(), Some(&AccountDraft::default()));
        assert_eq!(state.draft().unwrap().role, AccountRole::User);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let state = AccountFormState::select(&stored_account());
        assert_eq!(state.cancel(), AccountFormState::Idle);
        assert_eq!(AccountFormState::new_account().cancel(), AccountFormState::Idle);
    }

    #[test]
    fn idle_has_no_draft() {
        let mut state = AccountFormState::default();
        assert!(state.draft().is_none());
        assert!(state.draft_mut().is_none());
    }

    #[test]
    fn draft_edits_are_kept_in_state() {
        let mut state = AccountFormState::new_account();
        let draft = state.draft_mut().unwrap();
        draft.username = "mehmet".into();
        draft.role = AccountRole::Admin;

        assert_eq!(state.draft().unwrap().username, "mehmet");
        assert_eq!(state.draft().unwrap().role, AccountRole::Admin);
    }
}
