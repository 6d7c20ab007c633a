//! SQLite-backed credential directory
//!
//! An indexed alternative to the flat key-value array. Email uniqueness is
//! a `UNIQUE` constraint on `email_key`, the Unicode-lowercased email, so it
//! holds even if two writers race; inserts are single-row and atomic.

use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, ErrorCode, OpenFlags, Row};
use std::path::{Path, PathBuf};

use super::directory::CredentialDirectory;
use super::error::{AuthError, AuthResult};
use super::types::{email_key, IdentityRecord, Profile, Role};
use crate::storage::StorageError;

/// File name used inside the data directory
pub const DATABASE_FILE: &str = "directory.db";

/// Credential directory stored in an SQLite table
pub struct SqliteDirectory {
    conn: Connection,
    path: Option<PathBuf>,
}

fn db_err(e: rusqlite::Error) -> AuthError {
    AuthError::Storage(StorageError::Database(e))
}

fn is_email_conflict(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, Some(message)) => {
            err.code == ErrorCode::ConstraintViolation && message.contains("identities.email_key")
        }
        _ => false,
    }
}

impl SqliteDirectory {
    /// Create or open the directory database inside `data_dir`
    pub fn open(data_dir: &Path) -> AuthResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(StorageError::from)?;
        let path = data_dir.join(DATABASE_FILE);

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(db_err)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )
        .map_err(db_err)?;

        let directory = Self {
            conn,
            path: Some(path),
        };
        directory.create_schema()?;
        Ok(directory)
    }

    /// Directory that lives only as long as this value
    pub fn in_memory() -> AuthResult<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        let directory = Self { conn, path: None };
        directory.create_schema()?;
        Ok(directory)
    }

    fn create_schema(&self) -> AuthResult<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS identities (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    id TEXT NOT NULL UNIQUE,
                    email TEXT NOT NULL,
                    email_key TEXT NOT NULL UNIQUE,
                    name TEXT NOT NULL DEFAULT '',
                    role TEXT NOT NULL,
                    password_hash TEXT NOT NULL,
                    is_approved INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    profile TEXT NOT NULL DEFAULT '{}'
                );
                ",
            )
            .map_err(db_err)
    }

    /// Database file, `None` for in-memory directories
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<IdentityRecord> {
        let role: String = row.get(3)?;
        let role = role
            .parse::<Role>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?;

        let created_at: String = row.get(6)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

        let profile: String = row.get(7)?;
        let profile: Profile = serde_json::from_str(&profile)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

        Ok(IdentityRecord {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role,
            password_hash: row.get(4)?,
            is_approved: row.get(5)?,
            created_at,
            profile,
        })
    }

    fn insert_row(conn: &Connection, record: &IdentityRecord) -> AuthResult<()> {
        let profile =
            serde_json::to_string(&record.profile).map_err(StorageError::from)?;

        conn.execute(
            "INSERT INTO identities
                (id, email, email_key, name, role, password_hash, is_approved, created_at, profile)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                record.id,
                record.email.trim(),
                email_key(&record.email),
                record.name,
                record.role.as_str(),
                record.password_hash,
                record.is_approved,
                record.created_at.to_rfc3339(),
                profile,
            ],
        )
        .map_err(|e| {
            if is_email_conflict(&e) {
                AuthError::DuplicateEmail
            } else {
                db_err(e)
            }
        })?;

        Ok(())
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, email, name, role, password_hash, is_approved, created_at, profile FROM identities";

impl CredentialDirectory for SqliteDirectory {
    fn records(&self) -> AuthResult<Vec<IdentityRecord>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{} ORDER BY seq", SELECT_COLUMNS))
            .map_err(db_err)?;

        let rows = stmt.query_map([], Self::row_to_record).map_err(db_err)?;

        let mut records = Vec::new();
        for row in rows {
            match row {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "Skipping unreadable identity row"),
            }
        }
        Ok(records)
    }

    fn is_empty(&self) -> AuthResult<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM identities", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count == 0)
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<IdentityRecord>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{} WHERE email_key = ? LIMIT 1", SELECT_COLUMNS))
            .map_err(db_err)?;

        match stmt.query_row(params![email_key(email)], Self::row_to_record) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    fn insert(&self, record: IdentityRecord) -> AuthResult<()> {
        Self::insert_row(&self.conn, &record)
    }

    fn seed(&self, records: Vec<IdentityRecord>) -> AuthResult<()> {
        let tx = self.conn.unchecked_transaction().map_err(db_err)?;
        tx.execute("DELETE FROM identities", []).map_err(db_err)?;
        for record in &records {
            Self::insert_row(&tx, record)?;
        }
        tx.commit().map_err(db_err)
    }
}
