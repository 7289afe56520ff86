//! Integration tests for demo data seeding.

use cnk_core::models::account::AccountRole;
use cnk_core::repository::{AccountRepository, PersonnelRepository};
use cnk_db::repository::{SurrealAccountRepository, SurrealPersonnelRepository};
use cnk_db::seed::{DEMO_ADMIN_USERNAME, DEMO_SGK_NUMBER, DEMO_USER_USERNAME};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn seeds_once_into_empty_store() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    cnk_db::run_migrations(&db).await.unwrap();

    let accounts = SurrealAccountRepository::new(db.clone());
    let personnel = SurrealPersonnelRepository::new(db);

    assert!(cnk_db::seed_demo_data(&accounts, &personnel).await.unwrap());
    assert!(!cnk_db::seed_demo_data(&accounts, &personnel).await.unwrap());

    let admin = accounts.get_by_username(DEMO_ADMIN_USERNAME).await.unwrap();
    assert_eq!(admin.role, AccountRole::Admin);
    assert_eq!(admin.personnel_id, None);

    let user = accounts.get_by_username(DEMO_USER_USERNAME).await.unwrap();
    assert_eq!(user.role, AccountRole::User);
    let linked = personnel
        .get_by_id(user.personnel_id.expect("demo user is linked"))
        .await
        .unwrap();
    assert_eq!(linked.sgk_number, DEMO_SGK_NUMBER);

    assert_eq!(accounts.list().await.unwrap().len(), 2);
    assert_eq!(personnel.list().await.unwrap().len(), 1);
}
