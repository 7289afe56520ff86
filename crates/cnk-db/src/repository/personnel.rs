//! SurrealDB implementation of [`PersonnelRepository`].

use chrono::{DateTime, Utc};
use cnk_core::error::PortalResult;
use cnk_core::models::personnel::{CreatePersonnel, Personnel};
use cnk_core::repository::PersonnelRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PersonnelRow {
    full_name: String,
    sgk_number: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PersonnelRowWithId {
    record_id: String,
    full_name: String,
    sgk_number: String,
    created_at: DateTime<Utc>,
}

fn row_to_personnel(row: PersonnelRow, id: Uuid) -> Personnel {
    Personnel {
        id,
        full_name: row.full_name,
        sgk_number: row.sgk_number,
        created_at: row.created_at,
    }
}

impl PersonnelRowWithId {
    fn try_into_personnel(self) -> Result<Personnel, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid UUID: {e}")))?;
        Ok(Personnel {
            id,
            full_name: self.full_name,
            sgk_number: self.sgk_number,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Personnel repository.
#[derive(Clone)]
pub struct SurrealPersonnelRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPersonnelRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PersonnelRepository for SurrealPersonnelRepository<C> {
    async fn create(&self, input: CreatePersonnel) -> PortalResult<Personnel> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('personnel', $id) SET \
                 full_name = $full_name, \
                 sgk_number = $sgk_number",
            )
            .bind(("id", id_str.clone()))
            .bind(("full_name", input.full_name))
            .bind(("sgk_number", input.sgk_number))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<PersonnelRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "personnel".into(),
            id: id_str,
        })?;

        Ok(row_to_personnel(row, id))
    }

    async fn get_by_id(&self, id: Uuid) -> PortalResult<Personnel> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('personnel', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PersonnelRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "personnel".into(),
            id: id_str,
        })?;

        Ok(row_to_personnel(row, id))
    }

    async fn list(&self) -> PortalResult<Vec<Personnel>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM personnel \
                 ORDER BY full_name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PersonnelRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_personnel())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
