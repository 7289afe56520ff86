//! Demo data for a fresh portal database.
//!
//! Creates one admin (`admin` / `1234`) and one personnel-linked user
//! (`ahmet` / `1234`, SGK `10909274686`), the credentials the login
//! screen advertises.

use cnk_core::error::PortalResult;
use cnk_core::models::account::{AccountRole, CreateAccount};
use cnk_core::models::personnel::CreatePersonnel;
use cnk_core::repository::{AccountRepository, PersonnelRepository};
use tracing::info;

pub const DEMO_ADMIN_USERNAME: &str = "admin";
pub const DEMO_USER_USERNAME: &str = "ahmet";
pub const DEMO_PASSWORD: &str = "1234";
pub const DEMO_SGK_NUMBER: &str = "10909274686";

/// Seed demo personnel and accounts if the account table is empty.
///
/// Returns `true` when data was inserted, `false` when accounts already
/// existed and nothing was touched.
pub async fn seed_demo_data<A, P>(accounts: &A, personnel: &P) -> PortalResult<bool>
where
    A: AccountRepository,
    P: PersonnelRepository,
{
    let _guard = accounts.lock_writes().await;

    if !accounts.list().await?.is_empty() {
        info!("Accounts already present, skipping demo seed");
        return Ok(false);
    }

    let ahmet = personnel
        .create(CreatePersonnel {
            full_name: "Ahmet Yılmaz".into(),
            sgk_number: DEMO_SGK_NUMBER.into(),
        })
        .await?;

    accounts
        .create(CreateAccount {
            username: DEMO_ADMIN_USERNAME.into(),
            password: DEMO_PASSWORD.into(),
            role: AccountRole::Admin,
            personnel_id: None,
        })
        .await?;

    accounts
        .create(CreateAccount {
            username: DEMO_USER_USERNAME.into(),
            password: DEMO_PASSWORD.into(),
            role: AccountRole::User,
            personnel_id: Some(ahmet.id),
        })
        .await?;

    info!(personnel_id = %ahmet.id, "Seeded demo accounts");

    Ok(true)
}
