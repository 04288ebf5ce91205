mod schema;

use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::*;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("could not open database at {}: {reason}", .path.display())]
    Connection {
        path: PathBuf,
        reason: rusqlite::Error,
    },
    #[error("could not create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("query failed: {0}")]
    Sql(#[from] rusqlite::Error),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Table names, row count and latest rows, as reported by the `check` command.
#[derive(Debug, Clone, Default)]
pub(crate) struct Diagnostics {
    pub(crate) tables: Vec<String>,
    pub(crate) transaction_count: i64,
    pub(crate) recent: Vec<Transaction>,
}

/// Handle to the ledger database.
///
/// Holds only the location. Every operation opens its own connection and
/// closes it before returning, whether the operation succeeded or not.
#[derive(Debug, Clone)]
pub(crate) struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    pub(crate) fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            busy_timeout,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Create the database file if needed, apply migrations and seed the
    /// default categories.
    pub(crate) fn initialize(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(&self.path).map_err(|reason| Error::Connection {
            path: self.path.clone(),
            reason,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        migrate(&conn)?;
        seed_default_categories(&conn)?;
        tracing::debug!(path = %self.path.display(), "database initialized");
        Ok(())
    }

    /// Open a connection to an existing database.
    ///
    /// The file is never created here, so a missing or misconfigured path is
    /// reported as a connection error.
    fn connect(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags).map_err(|reason| {
            Error::Connection {
                path: self.path.clone(),
                reason,
            }
        })?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    fn with_connection<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let conn = self.connect()?;
        tracing::debug!(op, "connection opened");
        let result = f(&conn);
        if let Err((_, e)) = conn.close() {
            tracing::warn!(op, "failed to close connection cleanly: {e}");
        }
        result
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &NewTransaction) -> Result<i64> {
        self.with_connection("insert_transaction", |conn| {
            conn.execute(
                "INSERT INTO transactions (transaction_date, transaction_type, amount, category, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![txn.date, txn.kind, txn.amount, txn.category, txn.description],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Newest first, by date and then by creation time.
    pub(crate) fn list_transactions(
        &self,
        limit: u32,
        kind: Option<TransactionType>,
    ) -> Result<Vec<Transaction>> {
        self.with_connection("list_transactions", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, transaction_date, transaction_type, amount, category, description, created_at
                 FROM transactions
                 WHERE (?1 IS NULL OR transaction_type = ?1)
                 ORDER BY transaction_date DESC, created_at DESC, id DESC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![kind, limit], transaction_from_row)?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })
    }

    /// Exact match on all five user-supplied fields.
    pub(crate) fn is_duplicate(&self, txn: &NewTransaction) -> Result<bool> {
        self.with_connection("is_duplicate", |conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM transactions
                    WHERE transaction_date = ?1
                      AND transaction_type = ?2
                      AND amount = ?3
                      AND category = ?4
                      AND description = ?5
                 )",
                params![txn.date, txn.kind, txn.amount, txn.category, txn.description],
                |row| row.get(0),
            )?)
        })
    }

    pub(crate) fn expense_total(&self, month: YearMonth) -> Result<i64> {
        let (start, end) = month.bounds();
        self.with_connection("expense_total", |conn| {
            Ok(conn.query_row(
                "SELECT COALESCE(SUM(amount), 0) FROM transactions
                 WHERE transaction_type = ?1
                   AND transaction_date >= ?2 AND transaction_date < ?3",
                params![TransactionType::Expense, start, end],
                |row| row.get(0),
            )?)
        })
    }

    // ── Categories ────────────────────────────────────────────

    /// Categories of one type ordered by name, or all ordered by type (income first) then name.
    pub(crate) fn list_categories(&self, kind: Option<TransactionType>) -> Result<Vec<Category>> {
        self.with_connection("list_categories", |conn| {
            let mut stmt = conn.prepare(
                "SELECT name, type FROM categories
                 WHERE (?1 IS NULL OR type = ?1)
                 ORDER BY CASE type WHEN 'income' THEN 0 ELSE 1 END, name",
            )?;
            let rows = stmt.query_map(params![kind], |row| {
                Ok(Category::new(row.get::<_, String>(0)?, row.get(1)?))
            })?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })
    }

    // ── Analytics ─────────────────────────────────────────────

    pub(crate) fn monthly_aggregate(&self, month: YearMonth) -> Result<Vec<AggregateRow>> {
        let (start, end) = month.bounds();
        self.with_connection("monthly_aggregate", |conn| {
            let mut stmt = conn.prepare(
                "SELECT transaction_date, transaction_type, SUM(amount)
                 FROM transactions
                 WHERE transaction_date >= ?1 AND transaction_date < ?2
                 GROUP BY transaction_date, transaction_type
                 ORDER BY transaction_date, CASE transaction_type WHEN 'income' THEN 0 ELSE 1 END",
            )?;
            let rows = stmt.query_map(params![start, end], |row| {
                Ok(AggregateRow {
                    date: row.get(0)?,
                    kind: row.get(1)?,
                    total: row.get(2)?,
                })
            })?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })
    }

    pub(crate) fn category_breakdown(&self, month: YearMonth) -> Result<Vec<CategoryTotal>> {
        let (start, end) = month.bounds();
        self.with_connection("category_breakdown", |conn| {
            let mut stmt = conn.prepare(
                "SELECT category, transaction_type, SUM(amount) AS total
                 FROM transactions
                 WHERE transaction_date >= ?1 AND transaction_date < ?2
                 GROUP BY category, transaction_type
                 ORDER BY CASE transaction_type WHEN 'income' THEN 0 ELSE 1 END, total DESC, category",
            )?;
            let rows = stmt.query_map(params![start, end], |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    kind: row.get(1)?,
                    total: row.get(2)?,
                })
            })?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })
    }

    pub(crate) fn diagnostics(&self, recent: u32) -> Result<Diagnostics> {
        self.with_connection("diagnostics", |conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
            )?;
            let tables = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;

            let transaction_count =
                conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;

            let mut stmt = conn.prepare(
                "SELECT id, transaction_date, transaction_type, amount, category, description, created_at
                 FROM transactions
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1",
            )?;
            let recent = stmt
                .query_map(params![recent], transaction_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(Diagnostics {
                tables,
                transaction_count,
                recent,
            })
        })
    }
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        kind: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn migrate(conn: &Connection) -> Result<()> {
    let has_version_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !has_version_table {
        conn.execute_batch(schema::SCHEMA_V1)?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![schema::CURRENT_VERSION],
        )?;
        tracing::info!(version = schema::CURRENT_VERSION, "created database schema");
        return Ok(());
    }

    let current: i32 = conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
        row.get(0)
    })?;

    for &(from_version, sql) in schema::MIGRATIONS {
        if current <= from_version {
            tracing::info!(from_version, "applying migration");
            conn.execute_batch(sql)?;
        }
    }

    if current < schema::CURRENT_VERSION {
        conn.execute(
            "UPDATE schema_version SET version = ?1",
            params![schema::CURRENT_VERSION],
        )?;
    }

    Ok(())
}

fn seed_default_categories(conn: &Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    let defaults = schema::DEFAULT_INCOME_CATEGORIES
        .iter()
        .map(|name| (*name, TransactionType::Income))
        .chain(
            schema::DEFAULT_EXPENSE_CATEGORIES
                .iter()
                .map(|name| (*name, TransactionType::Expense)),
        );

    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt =
            tx.prepare("INSERT OR IGNORE INTO categories (name, type) VALUES (?1, ?2)")?;
        for (name, kind) in defaults {
            stmt.execute(params![name, kind])?;
        }
    }
    tx.commit()?;
    tracing::debug!("seeded default categories");
    Ok(())
}

#[cfg(test)]
mod tests;
