//! SQL implementation of [`UserRepository`]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::database::{expect_columns, integer, text, Database, DbRow};
use crate::ports::UserRepository;

const USER_COLUMNS: &str = "id, email, name, created_at";

pub struct SqlUserRepository {
    db: Arc<dyn Database>,
}

impl SqlUserRepository {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    pub fn initialize_schema(&self) -> Result<()> {
        self.db.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                created_at BIGINT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);",
        )?;
        debug!("user schema initialized");
        Ok(())
    }

    fn map_user(row: &DbRow) -> Result<User> {
        // 0: id, 1: email, 2: name, 3: created_at (epoch seconds)
        expect_columns(row, 4)?;
        let secs = integer(row, 3)?;
        let created_at = DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| Error::malformed_row(format!("created_at {} out of range", secs)))?;

        Ok(User {
            id: text(row, 0)?,
            email: text(row, 1)?,
            name: text(row, 2)?,
            created_at,
        })
    }

    fn find_one(&self, sql: &str, param: &str) -> Result<Option<User>> {
        let rows = self.db.prepare(sql).bind(param).execute()?;
        rows.first().map(Self::map_user).transpose()
    }
}

fn email_conflict(err: Error, email: &str) -> Error {
    match err {
        Error::Constraint(_) => Error::AlreadyExists(format!("user with email '{}'", email)),
        other => other,
    }
}

impl UserRepository for SqlUserRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.find_one(
            &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
            id,
        )
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.find_one(
            &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
            email,
        )
    }

    fn find_all(&self) -> Result<Vec<User>> {
        let rows = self.db.query(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id",
            USER_COLUMNS
        ))?;
        rows.iter().map(Self::map_user).collect()
    }

    fn save(&self, user: &User) -> Result<User> {
        // DuckDB cannot assign the UNIQUE email column in ON CONFLICT DO UPDATE,
        // so an existing row is updated first and a new one inserted otherwise.
        let updated = self
            .db
            .prepare("UPDATE users SET email = ?, name = ? WHERE id = ?")
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.id)
            .execute_update()
            .map_err(|e| email_conflict(e, &user.email))?;

        if updated == 0 {
            self.db
                .prepare(&format!(
                    "INSERT INTO users ({}) VALUES (?, ?, ?, ?)",
                    USER_COLUMNS
                ))
                .bind(&user.id)
                .bind(&user.email)
                .bind(&user.name)
                .bind(user.created_at.timestamp())
                .execute_update()
                .map_err(|e| email_conflict(e, &user.email))?;
            debug!(user_id = %user.id, "user inserted");
        } else {
            debug!(user_id = %user.id, "user updated");
        }

        self.find_by_id(&user.id)?
            .ok_or_else(|| Error::database(format!("user '{}' missing after save", user.id)))
    }

    fn remove(&self, id: &str) -> Result<bool> {
        let removed = self
            .db
            .prepare("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute_update()?;
        Ok(removed > 0)
    }
}
