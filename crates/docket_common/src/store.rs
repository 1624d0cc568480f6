//! Case store: sqlite-backed document storage.
//!
//! Each case lives as one JSON document in the `doc` column; the
//! fields queries filter on (case_id, priority, status, category,
//! filing_date) are mirrored into columns on every write. Lookups key
//! on either the storage rowid or the business case_id, since
//! different operations arrive with different identifiers.
//!
//! Mutations are read-modify-write with no check-and-set; concurrent
//! writers to the same case are last-write-wins.

use crate::case::Case;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Default database location for a system install.
pub const DEFAULT_DB_PATH: &str = "/var/lib/docket/cases.db";

/// Identifier a lookup keys on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseKey {
    /// Storage-assigned rowid.
    StorageId(i64),
    /// Business case identifier (CASE-YYYYMMDD-xxxxxxxx).
    CaseId(String),
}

impl CaseKey {
    /// Interpret a path/query parameter: all-digit values address the
    /// storage id, anything else the business case_id.
    pub fn parse(raw: &str) -> CaseKey {
        match raw.parse::<i64>() {
            Ok(id) => CaseKey::StorageId(id),
            Err(_) => CaseKey::CaseId(raw.to_string()),
        }
    }
}

/// Filter for find_many, built up field by field.
#[derive(Debug, Clone, Default)]
pub struct CaseQuery {
    pub priority: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub filed_after: Option<DateTime<Utc>>,
}

impl CaseQuery {
    pub fn new() -> CaseQuery {
        CaseQuery::default()
    }

    pub fn priority(mut self, priority: &str) -> Self {
        self.priority = Some(priority.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn filed_after(mut self, cutoff: DateTime<Utc>) -> Self {
        self.filed_after = Some(cutoff);
        self
    }
}

/// Case store backed by sqlite.
pub struct CaseStore {
    conn: Arc<Mutex<Connection>>,
}

impl CaseStore {
    /// Open or create the store at the default system location.
    pub fn open_default() -> Result<Self> {
        Self::open(Path::new(DEFAULT_DB_PATH))
    }

    /// Open or create the store at a specific path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {:?}", path))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        debug!("Case store ready at {:?}", path);
        Ok(store)
    }

    /// Open an in-memory store (tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS cases (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                case_id TEXT NOT NULL UNIQUE,
                priority TEXT NOT NULL,
                status TEXT NOT NULL,
                category TEXT NOT NULL,
                filing_date TEXT,
                doc TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cases_status ON cases(status)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cases_priority ON cases(priority)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cases_filing_date ON cases(filing_date)",
            [],
        )?;

        Ok(())
    }

    /// Insert a new case, returning the storage-assigned id.
    pub fn insert(&self, case: &Case) -> Result<i64> {
        let conn = self.conn.lock().unwrap();

        let doc = serde_json::to_string(case).context("Failed to serialize case")?;
        conn.execute(
            r#"
            INSERT INTO cases (case_id, priority, status, category, filing_date, doc)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                &case.case_id,
                case.priority.as_str(),
                case.status.as_label(),
                &case.category,
                case.filing_date.map(|d| d.to_rfc3339()),
                &doc,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Look up a single case by storage id or case_id.
    pub fn find_one(&self, key: &CaseKey) -> Result<Option<Case>> {
        let conn = self.conn.lock().unwrap();

        let row: Option<(i64, String)> = match key {
            CaseKey::StorageId(id) => conn
                .query_row(
                    "SELECT id, doc FROM cases WHERE id = ?",
                    params![id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?,
            CaseKey::CaseId(case_id) => conn
                .query_row(
                    "SELECT id, doc FROM cases WHERE case_id = ?",
                    params![case_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?,
        };

        match row {
            Some((id, doc)) => {
                let mut case: Case =
                    serde_json::from_str(&doc).context("Failed to deserialize case")?;
                case.id = Some(id);
                Ok(Some(case))
            }
            None => Ok(None),
        }
    }

    /// Query cases with filters, in insertion order.
    pub fn find_many(&self, filter: &CaseQuery) -> Result<Vec<Case>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = String::from("SELECT id, doc FROM cases WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref priority) = filter.priority {
            sql.push_str(" AND priority = ?");
            params_vec.push(Box::new(priority.clone()));
        }

        if let Some(ref status) = filter.status {
            sql.push_str(" AND status = ?");
            params_vec.push(Box::new(status.clone()));
        }

        if let Some(ref category) = filter.category {
            sql.push_str(" AND category = ?");
            params_vec.push(Box::new(category.clone()));
        }

        if let Some(ref cutoff) = filter.filed_after {
            sql.push_str(" AND filing_date >= ?");
            params_vec.push(Box::new(cutoff.to_rfc3339()));
        }

        sql.push_str(" ORDER BY id ASC");

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut cases = Vec::new();
        for row in rows {
            let (id, doc) = row?;
            let mut case: Case =
                serde_json::from_str(&doc).context("Failed to deserialize case")?;
            case.id = Some(id);
            cases.push(case);
        }
        Ok(cases)
    }

    /// Overwrite the document for the case matching `key`. Returns the
    /// number of rows modified (0 means no such case).
    pub fn update_one(&self, key: &CaseKey, case: &Case) -> Result<usize> {
        let conn = self.conn.lock().unwrap();

        let doc = serde_json::to_string(case).context("Failed to serialize case")?;
        let modified = match key {
            CaseKey::StorageId(id) => conn.execute(
                r#"
                UPDATE cases SET priority = ?, status = ?, category = ?, filing_date = ?, doc = ?
                WHERE id = ?
                "#,
                params![
                    case.priority.as_str(),
                    case.status.as_label(),
                    &case.category,
                    case.filing_date.map(|d| d.to_rfc3339()),
                    &doc,
                    id,
                ],
            )?,
            CaseKey::CaseId(case_id) => conn.execute(
                r#"
                UPDATE cases SET priority = ?, status = ?, category = ?, filing_date = ?, doc = ?
                WHERE case_id = ?
                "#,
                params![
                    case.priority.as_str(),
                    case.status.as_label(),
                    &case.category,
                    case.filing_date.map(|d| d.to_rfc3339()),
                    &doc,
                    case_id,
                ],
            )?,
        };

        Ok(modified)
    }

    /// Total number of stored cases.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cases", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
