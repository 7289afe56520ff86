//! Login orchestration: credential check, role branch, SGK second
//! factor, and one audit event per attempt.

use cnk_core::models::account::{AccountRole, AuthenticatedAccount};
use cnk_core::models::audit::{ANONYMOUS_ACTOR, CreateAuditEvent, details, topics};
use cnk_core::repository::{AccountRepository, AuditLogRepository, PersonnelRepository};
use tracing::{error, info, warn};

use crate::config::AuthConfig;
use crate::error::LoginError;
use crate::password::{self, PasswordCheck};

/// Input for the login flow.
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
    /// Ignored for admin accounts.
    pub sgk_number: String,
}

/// Login service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct LoginService<A, P, L>
where
    A: AccountRepository,
    P: PersonnelRepository,
    L: AuditLogRepository,
{
    accounts: A,
    personnel: P,
    audit: L,
    config: AuthConfig,
}

impl<A, P, L> LoginService<A, P, L>
where
    A: AccountRepository,
    P: PersonnelRepository,
    L: AuditLogRepository,
{
    pub fn new(accounts: A, personnel: P, audit: L, config: AuthConfig) -> Self {
        Self {
            accounts,
            personnel,
            audit,
            config,
        }
    }

    /// Authenticate with username + password, and for `user` accounts
    /// the SGK number of the linked personnel record.
    ///
    /// Appends exactly one audit event, except when the account is not
    /// linked to personnel or the linked record is gone.
    pub async fn attempt_login(
        &self,
        input: LoginInput,
    ) -> Result<AuthenticatedAccount, LoginError> {
        // 1. Credentials. Unknown usernames, wrong passwords and unusable
        //    stored hashes all fail the same way, in the same time.
        let account = match self.accounts.get_by_username(&input.username).await {
            Ok(account) => Some(account),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };

        let check = password::check_password(
            &input.password,
            account.as_ref().map(|a| a.password_hash.as_str()),
            self.config.pepper.as_deref(),
        );

        let account = match (account, check) {
            (Some(account), PasswordCheck::Match) => account,
            (account, check) => {
                if let (Some(account), PasswordCheck::Unusable(reason)) = (&account, &check) {
                    error!(
                        account_id = %account.id,
                        %reason,
                        "Stored password hash is unusable"
                    );
                }
                info!(username = %input.username, "Login rejected: invalid credentials");
                self.record(CreateAuditEvent::login(
                    ANONYMOUS_ACTOR,
                    topics::FAILED_LOGIN,
                    details::attempted_username(&input.username),
                ))
                .await;
                return Err(LoginError::InvalidCredentials);
            }
        };

        // 2. Admins skip the second factor.
        if account.role == AccountRole::Admin {
            self.record(CreateAuditEvent::login(
                &account.username,
                topics::SYSTEM,
                details::ADMIN_LOGIN_SUCCESS,
            ))
            .await;
            info!(username = %account.username, "Admin login succeeded");
            return Ok(account.into());
        }

        // 3. Users must match the SGK number of their personnel record.
        let Some(personnel_id) = account.personnel_id else {
            warn!(username = %account.username, "Login refused: account has no personnel link");
            return Err(LoginError::UnlinkedAccount);
        };

        let personnel = match self.personnel.get_by_id(personnel_id).await {
            Ok(personnel) => personnel,
            Err(e) if e.is_not_found() => {
                warn!(
                    username = %account.username,
                    %personnel_id,
                    "Login refused: linked personnel record is missing"
                );
                return Err(LoginError::PersonnelRecordMissing);
            }
            Err(e) => return Err(e.into()),
        };

        if personnel.sgk_number != input.sgk_number {
            self.record(CreateAuditEvent::login(
                &account.username,
                topics::FAILED_LOGIN,
                details::SGK_MISMATCH,
            ))
            .await;
            info!(username = %account.username, "Login rejected: SGK mismatch");
            return Err(LoginError::SecondFactorMismatch);
        }

        self.record(CreateAuditEvent::login(
            &account.username,
            topics::SYSTEM,
            details::USER_LOGIN_SUCCESS,
        ))
        .await;
        info!(username = %account.username, "User login succeeded");

        Ok(account.into())
    }

    /// Append an audit event. Failures are logged and swallowed; they
    /// never change the login outcome.
    async fn record(&self, event: CreateAuditEvent) {
        let actor = event.actor.clone();
        let topic = event.topic.clone();
        if let Err(e) = self.audit.append(event).await {
            warn!(%actor, %topic, error = %e, "Failed to write audit event");
        }
    }
}
