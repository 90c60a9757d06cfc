//! DuckDB implementation of the [`Database`] port

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use duckdb::types::ValueRef;
use duckdb::{Connection, ToSql};
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::ports::database::{Database, DbResult, DbRow, DbValue};

/// Check if an error message comes from a primary key / unique constraint
fn is_constraint_violation(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("constraint error")
        || lower.contains("duplicate key")
        || lower.contains("violates primary key")
        || lower.contains("violates unique")
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        let msg = err.to_string();
        if is_constraint_violation(&msg) {
            Error::Constraint(msg)
        } else {
            Error::Database(msg)
        }
    }
}

/// DuckDB-backed database handle
///
/// The connection is guarded by a mutex so the handle can be shared as
/// `Arc<dyn Database>` between repository adapters.
pub struct DuckDbDatabase {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbDatabase {
    /// Open (or create) a database file
    pub fn open(db_path: &Path) -> Result<Self> {
        // Extension autoloading stays off; nothing here needs extensions
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        debug!(path = %db_path.display(), "opened duckdb database");

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path.to_path_buf()),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    /// Backing file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::database("database connection lock poisoned"))
    }

    /// Convert a port value to a DuckDB parameter
    fn to_duckdb_param(value: &DbValue) -> Box<dyn ToSql> {
        match value {
            DbValue::Null => Box::new(None::<String>),
            DbValue::Integer(i) => Box::new(*i),
            DbValue::Real(f) => Box::new(*f),
            DbValue::Text(s) => Box::new(s.clone()),
            DbValue::Blob(b) => Box::new(b.clone()),
        }
    }

    fn get_column_value(row: &duckdb::Row, idx: usize) -> Result<DbValue> {
        let value = match row.get_ref(idx)? {
            ValueRef::Null => DbValue::Null,
            ValueRef::Boolean(b) => DbValue::Integer(b as i64),
            ValueRef::TinyInt(i) => DbValue::Integer(i as i64),
            ValueRef::SmallInt(i) => DbValue::Integer(i as i64),
            ValueRef::Int(i) => DbValue::Integer(i as i64),
            ValueRef::BigInt(i) => DbValue::Integer(i),
            ValueRef::HugeInt(i) => DbValue::Integer(i64::try_from(i).map_err(|_| {
                Error::malformed_row(format!("column {} HUGEINT out of range", idx))
            })?),
            ValueRef::UTinyInt(i) => DbValue::Integer(i as i64),
            ValueRef::USmallInt(i) => DbValue::Integer(i as i64),
            ValueRef::UInt(i) => DbValue::Integer(i as i64),
            ValueRef::UBigInt(i) => DbValue::Integer(i64::try_from(i).map_err(|_| {
                Error::malformed_row(format!("column {} UBIGINT out of range", idx))
            })?),
            ValueRef::Float(f) => DbValue::Real(f as f64),
            ValueRef::Double(f) => DbValue::Real(f),
            ValueRef::Decimal(d) => {
                let s = d.to_string();
                DbValue::Real(s.parse::<f64>().map_err(|_| {
                    Error::malformed_row(format!("column {} DECIMAL {} not representable", idx, s))
                })?)
            }
            ValueRef::Text(bytes) => DbValue::Text(String::from_utf8_lossy(bytes).to_string()),
            ValueRef::Blob(bytes) => DbValue::Blob(bytes.to_vec()),
            other => {
                return Err(Error::malformed_row(format!(
                    "column {} has unsupported type {:?}",
                    idx,
                    other.data_type()
                )))
            }
        };
        Ok(value)
    }

    fn collect_rows(rows: &mut duckdb::Rows<'_>) -> Result<DbResult> {
        let mut result: DbResult = Vec::new();
        let mut column_count = 0;

        while let Some(row) = rows.next()? {
            // Get column count from the first row
            if result.is_empty() {
                column_count = row.as_ref().column_count();
            }

            let mut values: DbRow = Vec::with_capacity(column_count);
            for i in 0..column_count {
                values.push(Self::get_column_value(row, i)?);
            }
            result.push(values);
        }

        Ok(result)
    }
}

impl Database for DuckDbDatabase {
    fn execute(&self, sql: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    fn query(&self, sql: &str) -> Result<DbResult> {
        self.query_with_params(sql, &[])
    }

    fn query_with_params(&self, sql: &str, params: &[DbValue]) -> Result<DbResult> {
        let conn = self.lock()?;

        let duckdb_params: Vec<Box<dyn ToSql>> =
            params.iter().map(Self::to_duckdb_param).collect();
        let param_refs: Vec<&dyn ToSql> = duckdb_params.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(param_refs.as_slice())?;
        Self::collect_rows(&mut rows)
    }

    fn execute_with_params(&self, sql: &str, params: &[DbValue]) -> Result<usize> {
        let conn = self.lock()?;

        let duckdb_params: Vec<Box<dyn ToSql>> =
            params.iter().map(Self::to_duckdb_param).collect();
        let param_refs: Vec<&dyn ToSql> = duckdb_params.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn.prepare(sql)?;
        let affected = stmt.execute(param_refs.as_slice())?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> DuckDbDatabase {
        DuckDbDatabase::open_in_memory().unwrap()
    }

    #[test]
    fn test_constraint_messages_are_detected() {
        assert!(is_constraint_violation(
            "Constraint Error: Duplicate key \"id: a1\" violates primary key constraint."
        ));
        assert!(!is_constraint_violation("Catalog Error: Table with name x does not exist!"));
    }

    #[test]
    fn test_round_trip_all_value_kinds() {
        let db = db();
        db.execute("CREATE TABLE t (i BIGINT, r DOUBLE, s TEXT, b BLOB, n TEXT)")
            .unwrap();

        let affected = db
            .execute_with_params(
                "INSERT INTO t VALUES (?, ?, ?, ?, ?)",
                &[
                    DbValue::Integer(7),
                    DbValue::Real(2.5),
                    DbValue::Text("hello".into()),
                    DbValue::Blob(vec![0, 1, 255]),
                    DbValue::Null,
                ],
            )
            .unwrap();
        assert_eq!(affected, 1);

        let rows = db.query("SELECT i, r, s, b, n FROM t").unwrap();
        assert_eq!(
            rows,
            vec![vec![
                DbValue::Integer(7),
                DbValue::Real(2.5),
                DbValue::Text("hello".into()),
                DbValue::Blob(vec![0, 1, 255]),
                DbValue::Null,
            ]]
        );
    }

    #[test]
    fn test_empty_query_returns_no_rows() {
        let db = db();
        db.execute("CREATE TABLE t (i BIGINT)").unwrap();
        assert!(db.query("SELECT i FROM t").unwrap().is_empty());
    }

    #[test]
    fn test_prepare_bind_execute() {
        let db = db();
        db.execute("CREATE TABLE t (k TEXT PRIMARY KEY, v BIGINT)").unwrap();

        let handle: &dyn Database = &db;
        handle
            .prepare("INSERT INTO t VALUES (?, ?)")
            .bind("a")
            .bind(1i64)
            .execute_update()
            .unwrap();

        let rows = handle
            .prepare("SELECT v FROM t WHERE k = ?")
            .bind("a")
            .execute()
            .unwrap();
        assert_eq!(rows, vec![vec![DbValue::Integer(1)]]);
    }

    #[test]
    fn test_duplicate_primary_key_is_constraint_error() {
        let db = db();
        db.execute("CREATE TABLE t (k TEXT PRIMARY KEY)").unwrap();
        db.execute_with_params("INSERT INTO t VALUES (?)", &["a".into()])
            .unwrap();

        let err = db
            .execute_with_params("INSERT INTO t VALUES (?)", &["a".into()])
            .unwrap_err();
        assert!(matches!(err, Error::Constraint(_)), "got {:?}", err);
    }

    #[test]
    fn test_delete_reports_affected_rows() {
        let db = db();
        db.execute("CREATE TABLE t (k TEXT)").unwrap();
        db.execute("INSERT INTO t VALUES ('a'), ('b')").unwrap();

        let removed = db
            .execute_with_params("DELETE FROM t WHERE k = ?", &["a".into()])
            .unwrap();
        assert_eq!(removed, 1);

        let removed = db
            .execute_with_params("DELETE FROM t WHERE k = ?", &["missing".into()])
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test.duckdb");
        let db = DuckDbDatabase::open(&path).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        db.execute("CREATE TABLE t (i BIGINT)").unwrap();
        assert!(path.exists());
    }
}
