//! CNK Portal — Process entry point.
//!
//! Loads configuration, connects the store, applies migrations,
//! optionally seeds demo data, and reports the state of the account
//! store.

mod config;

use cnk_auth::AccountAdminService;
use cnk_core::models::account::AccountRole;
use cnk_core::repository::AccountRepository;
use cnk_db::DbManager;
use cnk_db::repository::{SurrealAccountRepository, SurrealPersonnelRepository};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cnk=info".parse()?))
        .json()
        .init();

    tracing::info!("Starting CNK portal...");

    let config = ServerConfig::from_env()?;

    let manager = DbManager::connect(&config.db).await?;
    let db = manager.client().clone();
    cnk_db::run_migrations(&db).await?;

    let accounts = match &config.auth.pepper {
        Some(pepper) => SurrealAccountRepository::with_pepper(db.clone(), pepper.clone()),
        None => SurrealAccountRepository::new(db.clone()),
    };
    let personnel = SurrealPersonnelRepository::new(db);

    if config.seed_demo_data {
        cnk_db::seed_demo_data(&accounts, &personnel).await?;
    }

    let admins = accounts.count_by_role(AccountRole::Admin).await?;
    if admins == 0 {
        tracing::error!("No admin account exists; account administration is unreachable");
    }

    let admin = AccountAdminService::new(accounts, personnel);

    let account_count = admin.list_accounts().await?.len();
    let personnel_count = admin.list_personnel().await?.len();
    tracing::info!(
        accounts = account_count,
        personnel = personnel_count,
        admins,
        "CNK portal ready"
    );

    Ok(())
}
