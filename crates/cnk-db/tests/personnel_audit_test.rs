//! Integration tests for the Personnel and Audit Log repositories.

use chrono::{Duration, Utc};
use cnk_core::models::audit::{AuditCategory, CreateAuditEvent, topics};
use cnk_core::models::personnel::CreatePersonnel;
use cnk_core::repository::{AuditLogFilter, AuditLogRepository, PersonnelRepository};
use cnk_db::repository::{SurrealAuditLogRepository, SurrealPersonnelRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    cnk_db::run_migrations(&db).await.unwrap();
    db
}

// -----------------------------------------------------------------------
// Personnel
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_personnel() {
    let repo = SurrealPersonnelRepository::new(setup().await);

    let created = repo
        .create(CreatePersonnel {
            full_name: "Ahmet Yılmaz".into(),
            sgk_number: "10909274686".into(),
        })
        .await
        .unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.sgk_number, "10909274686");
}

#[tokio::test]
async fn missing_personnel_is_not_found() {
    let repo = SurrealPersonnelRepository::new(setup().await);
    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn sgk_numbers_are_unique() {
    let repo = SurrealPersonnelRepository::new(setup().await);
    repo.create(CreatePersonnel {
        full_name: "Ahmet Yılmaz".into(),
        sgk_number: "10909274686".into(),
    })
    .await
    .unwrap();

    let duplicate = repo
        .create(CreatePersonnel {
            full_name: "Başka Biri".into(),
            sgk_number: "10909274686".into(),
        })
        .await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn personnel_list_is_ordered_by_name() {
    let repo = SurrealPersonnelRepository::new(setup().await);
    for (name, sgk) in [("Zeynep Kaya", "3"), ("Ahmet Yılmaz", "1"), ("Mehmet Demir", "2")] {
        repo.create(CreatePersonnel {
            full_name: name.into(),
            sgk_number: sgk.into(),
        })
        .await
        .unwrap();
    }

    let names: Vec<String> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.full_name)
        .collect();
    assert_eq!(names, vec!["Ahmet Yılmaz", "Mehmet Demir", "Zeynep Kaya"]);
}

// -----------------------------------------------------------------------
// Audit log
// -----------------------------------------------------------------------

#[tokio::test]
async fn append_assigns_id_and_timestamp() {
    let repo = SurrealAuditLogRepository::new(setup().await);
    let before = Utc::now() - Duration::seconds(1);

    let event = repo
        .append(CreateAuditEvent::login("admin", topics::SYSTEM, "Admin Login Success"))
        .await
        .unwrap();

    assert_eq!(event.actor, "admin");
    assert_eq!(event.category, AuditCategory::Login);
    assert_eq!(event.topic, "System");
    assert_eq!(event.detail, "Admin Login Success");
    assert!(event.timestamp >= before);
}

#[tokio::test]
async fn identical_events_are_not_deduplicated() {
    let repo = SurrealAuditLogRepository::new(setup().await);
    let event = CreateAuditEvent::login("Anonymous", topics::FAILED_LOGIN, "x");

    let first = repo.append(event.clone()).await.unwrap();
    let second = repo.append(event).await.unwrap();
    assert_ne!(first.id, second.id);

    let all = repo.list(AuditLogFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn list_filters_by_actor_and_time() {
    let repo = SurrealAuditLogRepository::new(setup().await);
    repo.append(CreateAuditEvent::login("admin", topics::SYSTEM, "a"))
        .await
        .unwrap();
    repo.append(CreateAuditEvent::login("ahmet", topics::SYSTEM, "b"))
        .await
        .unwrap();
    repo.append(CreateAuditEvent::login("admin", topics::FAILED_LOGIN, "c"))
        .await
        .unwrap();

    let admin_events = repo
        .list(AuditLogFilter {
            actor: Some("admin".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let details: Vec<&str> = admin_events.iter().map(|e| e.detail.as_str()).collect();
    assert_eq!(details, vec!["a", "c"]);

    let future = repo
        .list(AuditLogFilter {
            from: Some(Utc::now() + Duration::hours(1)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(future.is_empty());

    let logins = repo
        .list(AuditLogFilter {
            category: Some(AuditCategory::Login),
            to: Some(Utc::now() + Duration::hours(1)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(logins.len(), 3);
}
