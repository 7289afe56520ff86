//! SurrealDB implementation of [`AuditLogRepository`].
//!
//! The `audit_log` table denies update and delete at the schema level;
//! this repository only ever issues `CREATE` and `SELECT`.

use chrono::{DateTime, Utc};
use cnk_core::error::PortalResult;
use cnk_core::models::audit::{AuditEvent, CreateAuditEvent};
use cnk_core::repository::{AuditLogFilter, AuditLogRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    actor: String,
    category: String,
    topic: String,
    detail: String,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    actor: String,
    category: String,
    topic: String,
    detail: String,
    timestamp: DateTime<Utc>,
}

impl AuditRow {
    fn into_event(self, id: Uuid) -> Result<AuditEvent, DbError> {
        let category = self
            .category
            .parse()
            .map_err(|_| DbError::Corrupt(format!("unknown audit category: {}", self.category)))?;
        Ok(AuditEvent {
            id,
            actor: self.actor,
            category,
            topic: self.topic,
            detail: self.detail,
            timestamp: self.timestamp,
        })
    }
}

impl AuditRowWithId {
    fn try_into_event(self) -> Result<AuditEvent, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        AuditRow {
            actor: self.actor,
            category: self.category,
            topic: self.topic,
            detail: self.detail,
            timestamp: self.timestamp,
        }
        .into_event(id)
    }
}

/// SurrealDB implementation of the audit log.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, input: CreateAuditEvent) -> PortalResult<AuditEvent> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('audit_log', $id) SET \
                 actor = $actor, \
                 category = $category, \
                 topic = $topic, \
                 detail = $detail",
            )
            .bind(("id", id_str.clone()))
            .bind(("actor", input.actor))
            .bind(("category", input.category.as_str().to_string()))
            .bind(("topic", input.topic))
            .bind(("detail", input.detail))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        Ok(row.into_event(id)?)
    }

    async fn list(&self, filter: AuditLogFilter) -> PortalResult<Vec<AuditEvent>> {
        let mut conditions = Vec::new();
        if filter.actor.is_some() {
            conditions.push("actor = $actor");
        }
        if filter.category.is_some() {
            conditions.push("category = $category");
        }
        if filter.from.is_some() {
            conditions.push("timestamp >= $from");
        }
        if filter.to.is_some() {
            conditions.push("timestamp <= $to");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM audit_log \
             {where_clause} ORDER BY timestamp ASC"
        );

        let mut builder = self.db.query(&query);
        if let Some(actor) = filter.actor {
            builder = builder.bind(("actor", actor));
        }
        if let Some(category) = filter.category {
            builder = builder.bind(("category", category.as_str().to_string()));
        }
        if let Some(from) = filter.from {
            builder = builder.bind(("from", from));
        }
        if let Some(to) = filter.to {
            builder = builder.bind(("to", to));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;

        let events = rows
            .into_iter()
            .map(|row| row.try_into_event())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(events)
    }
}
