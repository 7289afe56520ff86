//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "keep_last_admin",
        sql: SCHEMA_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Personnel (read-only for the auth procedures)
-- =======================================================================
DEFINE TABLE personnel SCHEMAFULL;
DEFINE FIELD full_name ON TABLE personnel TYPE string;
DEFINE FIELD sgk_number ON TABLE personnel TYPE string;
DEFINE FIELD created_at ON TABLE personnel TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_personnel_sgk_number ON TABLE personnel \
    COLUMNS sgk_number UNIQUE;

-- =======================================================================
-- Accounts
-- =======================================================================
DEFINE TABLE account SCHEMAFULL;
DEFINE FIELD username ON TABLE account TYPE string;
DEFINE FIELD password_hash ON TABLE account TYPE string;
DEFINE FIELD role ON TABLE account TYPE string \
    ASSERT $value IN ['admin', 'user'];
DEFINE FIELD personnel_id ON TABLE account TYPE option<string>;
DEFINE FIELD created_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_account_username ON TABLE account \
    COLUMNS username UNIQUE;
DEFINE INDEX idx_account_role ON TABLE account COLUMNS role;

-- =======================================================================
-- Audit Log (append-only, immutable)
-- =======================================================================
DEFINE TABLE audit_log SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD actor ON TABLE audit_log TYPE string;
DEFINE FIELD category ON TABLE audit_log TYPE string \
    ASSERT $value IN ['LOGIN', 'ACCOUNT'];
DEFINE FIELD topic ON TABLE audit_log TYPE string;
DEFINE FIELD detail ON TABLE audit_log TYPE string;
DEFINE FIELD timestamp ON TABLE audit_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_audit_time ON TABLE audit_log COLUMNS timestamp;
DEFINE INDEX idx_audit_actor ON TABLE audit_log COLUMNS actor;
";

// -----------------------------------------------------------------------
// Schema v2
// -----------------------------------------------------------------------

/// Error text thrown when a write would remove the last admin.
pub(crate) const LAST_ADMIN_SIGNAL: &str = "cnk:last_admin";

/// Runs inside the transaction of every write that takes the admin role
/// away from a record (delete or demotion). Each such write also touches
/// `admin_guard:lock`, so two of them racing on different accounts
/// conflict at commit and cannot both pass the count.
const SCHEMA_V2: &str = "\
DEFINE TABLE admin_guard SCHEMAFULL;
DEFINE FIELD touched_at ON TABLE admin_guard TYPE datetime \
    DEFAULT time::now();

DEFINE EVENT keep_last_admin ON TABLE account
    WHEN $event IN ['UPDATE', 'DELETE'] \
        AND $before.role = 'admin' AND $after.role != 'admin'
    THEN {
        UPSERT admin_guard:lock SET touched_at = time::now();
        LET $admins = (SELECT VALUE id FROM account WHERE role = 'admin');
        IF array::len($admins) = 0 {
            THROW 'cnk:last_admin';
        };
    };
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query(
            "CREATE _migration SET version = $version, \
             name = $name",
        )
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "Failed to record migration v{}: {}",
                migration.version, e,
            ))
        })?;

        info!(
            version = migration.version,
            "Migration applied successfully"
        );
    }

    Ok(())
}
