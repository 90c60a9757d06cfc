//! Database port - minimal SQL execution capability
//!
//! Repository adapters talk to storage only through [`Database`]. The handle
//! is shared as `Arc<dyn Database>`; whoever wires the adapters owns it and
//! it must outlive every adapter holding a clone.
//!
//! Parameters are positional (`?` placeholders) and bound in order through
//! [`Statement::bind`].

use crate::domain::result::{Error, Result};

/// A single SQL value, independent of the storage engine
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

pub type DbRow = Vec<DbValue>;
pub type DbResult = Vec<DbRow>;

impl DbValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DbValue::Null)
    }

    fn type_name(&self) -> &'static str {
        match self {
            DbValue::Null => "NULL",
            DbValue::Integer(_) => "INTEGER",
            DbValue::Real(_) => "REAL",
            DbValue::Text(_) => "TEXT",
            DbValue::Blob(_) => "BLOB",
        }
    }
}

impl From<&str> for DbValue {
    fn from(value: &str) -> Self {
        DbValue::Text(value.to_string())
    }
}

impl From<String> for DbValue {
    fn from(value: String) -> Self {
        DbValue::Text(value)
    }
}

impl From<&String> for DbValue {
    fn from(value: &String) -> Self {
        DbValue::Text(value.clone())
    }
}

impl From<i64> for DbValue {
    fn from(value: i64) -> Self {
        DbValue::Integer(value)
    }
}

impl From<f64> for DbValue {
    fn from(value: f64) -> Self {
        DbValue::Real(value)
    }
}

impl From<Vec<u8>> for DbValue {
    fn from(value: Vec<u8>) -> Self {
        DbValue::Blob(value)
    }
}

impl From<&[u8]> for DbValue {
    fn from(value: &[u8]) -> Self {
        DbValue::Blob(value.to_vec())
    }
}

impl<T: Into<DbValue>> From<Option<T>> for DbValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DbValue::Null)
    }
}

/// SQL execution capability consumed by repository adapters
pub trait Database: Send + Sync {
    /// Execute one or more statements without parameters (DDL, bulk deletes)
    fn execute(&self, sql: &str) -> Result<()>;

    /// Run a parameterless query and collect all rows
    fn query(&self, sql: &str) -> Result<DbResult>;

    /// Run a query with positional parameters and collect all rows
    fn query_with_params(&self, sql: &str, params: &[DbValue]) -> Result<DbResult>;

    /// Run a write with positional parameters, returning the affected row count
    fn execute_with_params(&self, sql: &str, params: &[DbValue]) -> Result<usize>;
}

impl dyn Database + '_ {
    /// Start a prepared statement; bind parameters in placeholder order
    pub fn prepare(&self, sql: &str) -> Statement<'_> {
        Statement {
            db: self,
            sql: sql.to_string(),
            params: Vec::new(),
        }
    }
}

/// A statement with its bound parameters
pub struct Statement<'db> {
    db: &'db dyn Database,
    sql: String,
    params: Vec<DbValue>,
}

impl Statement<'_> {
    /// Bind the next positional parameter
    pub fn bind(mut self, value: impl Into<DbValue>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Execute as a query, returning all rows
    pub fn execute(&self) -> Result<DbResult> {
        self.db.query_with_params(&self.sql, &self.params)
    }

    /// Execute as a write, returning the affected row count
    pub fn execute_update(&self) -> Result<usize> {
        self.db.execute_with_params(&self.sql, &self.params)
    }
}

// Positional row readers used by the row->entity mappers. A missing column or
// a type mismatch means the SELECT and the mapper disagree, which is reported
// as `Error::MalformedRow` rather than treated as absent data.

fn column(row: &DbRow, idx: usize) -> Result<&DbValue> {
    row.get(idx).ok_or_else(|| {
        Error::malformed_row(format!(
            "expected at least {} columns, got {}",
            idx + 1,
            row.len()
        ))
    })
}

fn mismatch(idx: usize, expected: &str, found: &DbValue) -> Error {
    Error::malformed_row(format!(
        "column {} expected {}, found {}",
        idx,
        expected,
        found.type_name()
    ))
}

pub fn expect_columns(row: &DbRow, count: usize) -> Result<()> {
    if row.len() != count {
        return Err(Error::malformed_row(format!(
            "expected {} columns, got {}",
            count,
            row.len()
        )));
    }
    Ok(())
}

pub fn text(row: &DbRow, idx: usize) -> Result<String> {
    match column(row, idx)? {
        DbValue::Text(s) => Ok(s.clone()),
        other => Err(mismatch(idx, "TEXT", other)),
    }
}

pub fn optional_text(row: &DbRow, idx: usize) -> Result<Option<String>> {
    match column(row, idx)? {
        DbValue::Null => Ok(None),
        DbValue::Text(s) => Ok(Some(s.clone())),
        other => Err(mismatch(idx, "TEXT or NULL", other)),
    }
}

pub fn integer(row: &DbRow, idx: usize) -> Result<i64> {
    match column(row, idx)? {
        DbValue::Integer(i) => Ok(*i),
        other => Err(mismatch(idx, "INTEGER", other)),
    }
}

pub fn real(row: &DbRow, idx: usize) -> Result<f64> {
    match column(row, idx)? {
        DbValue::Real(f) => Ok(*f),
        DbValue::Integer(i) => Ok(*i as f64),
        other => Err(mismatch(idx, "REAL", other)),
    }
}

pub fn optional_blob(row: &DbRow, idx: usize) -> Result<Option<Vec<u8>>> {
    match column(row, idx)? {
        DbValue::Null => Ok(None),
        DbValue::Blob(b) => Ok(Some(b.clone())),
        other => Err(mismatch(idx, "BLOB or NULL", other)),
    }
}

/// Read a `SELECT COUNT(*)` style result
pub fn single_count(result: &DbResult) -> Result<i64> {
    let row = result
        .first()
        .ok_or_else(|| Error::malformed_row("count query returned no rows"))?;
    integer(row, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_conversion() {
        assert_eq!(DbValue::from(None::<String>), DbValue::Null);
        assert_eq!(
            DbValue::from(Some("x".to_string())),
            DbValue::Text("x".to_string())
        );
        assert_eq!(DbValue::from(Some(vec![1u8, 2])), DbValue::Blob(vec![1, 2]));
    }

    #[test]
    fn test_readers_accept_matching_types() {
        let row = vec![
            DbValue::Text("a1".into()),
            DbValue::Null,
            DbValue::Integer(42),
            DbValue::Real(1.5),
        ];
        assert_eq!(text(&row, 0).unwrap(), "a1");
        assert_eq!(optional_text(&row, 1).unwrap(), None);
        assert_eq!(optional_blob(&row, 1).unwrap(), None);
        assert_eq!(integer(&row, 2).unwrap(), 42);
        assert_eq!(real(&row, 3).unwrap(), 1.5);
        assert_eq!(real(&row, 2).unwrap(), 42.0);
    }

    #[test]
    fn test_type_mismatch_is_malformed_row() {
        let row = vec![DbValue::Integer(1)];
        let err = text(&row, 0).unwrap_err();
        assert!(matches!(err, Error::MalformedRow(_)));
        assert!(err.to_string().contains("expected TEXT, found INTEGER"));
    }

    #[test]
    fn test_missing_column_is_malformed_row() {
        let row = vec![DbValue::Text("a1".into())];
        assert!(matches!(integer(&row, 3), Err(Error::MalformedRow(_))));
        assert!(matches!(expect_columns(&row, 4), Err(Error::MalformedRow(_))));
        assert!(expect_columns(&row, 1).is_ok());
    }

    #[test]
    fn test_single_count_on_empty_result() {
        assert!(matches!(single_count(&Vec::new()), Err(Error::MalformedRow(_))));
        assert_eq!(single_count(&vec![vec![DbValue::Integer(7)]]).unwrap(), 7);
    }
}
