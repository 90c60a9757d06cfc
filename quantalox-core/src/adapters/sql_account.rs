//! SQL implementation of [`AccountRepository`]

use std::sync::Arc;

use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountProperty};
use crate::ports::database::{
    expect_columns, integer, optional_blob, optional_text, single_count, text, Database, DbRow,
};
use crate::ports::AccountRepository;

const ACCOUNT_COLUMNS: &str = "id, name, password_hash, created_at";
const PROPERTY_COLUMNS: &str = "account_id, prop_key, prop_value, description";

pub struct SqlAccountRepository {
    db: Arc<dyn Database>,
}

impl SqlAccountRepository {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Create tables and indexes if they do not exist yet
    ///
    /// There is no foreign key from properties to accounts; `delete_account`
    /// removes properties itself before the account row.
    pub fn initialize_schema(&self) -> Result<()> {
        self.db.execute(
            "CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                password_hash BLOB,
                created_at BIGINT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS account_properties (
                account_id TEXT NOT NULL,
                prop_key TEXT NOT NULL,
                prop_value TEXT NOT NULL,
                description TEXT,
                PRIMARY KEY (account_id, prop_key)
            );
            CREATE INDEX IF NOT EXISTS idx_accounts_name ON accounts(name);",
        )?;
        debug!("account schema initialized");
        Ok(())
    }

    fn map_account(row: &DbRow) -> Result<Account> {
        // 0: id, 1: name, 2: password_hash, 3: created_at
        expect_columns(row, 4)?;
        Ok(Account {
            id: text(row, 0)?,
            name: text(row, 1)?,
            password_hash: optional_blob(row, 2)?,
            created_at: integer(row, 3)?,
        })
    }

    fn map_property(row: &DbRow) -> Result<AccountProperty> {
        // 0: account_id, 1: prop_key, 2: prop_value, 3: description
        expect_columns(row, 4)?;
        Ok(AccountProperty {
            account_id: text(row, 0)?,
            key: text(row, 1)?,
            value: text(row, 2)?,
            description: optional_text(row, 3)?,
        })
    }

    fn first_account(&self, sql: &str, param: &str) -> Result<Option<Account>> {
        let rows = self.db.prepare(sql).bind(param).execute()?;
        rows.first().map(Self::map_account).transpose()
    }

    fn probe(&self, sql: &str, param: &str) -> Result<bool> {
        let rows = self.db.prepare(sql).bind(param).execute()?;
        Ok(!rows.is_empty())
    }
}

/// Turn a storage constraint violation into a domain-level collision
fn conflict_as_already_exists(err: Error, what: String) -> Error {
    match err {
        Error::Constraint(_) => Error::AlreadyExists(what),
        other => other,
    }
}

impl AccountRepository for SqlAccountRepository {
    fn create_account(&self, account: &Account) -> Result<()> {
        self.db
            .prepare(&format!(
                "INSERT INTO accounts ({}) VALUES (?, ?, ?, ?)",
                ACCOUNT_COLUMNS
            ))
            .bind(&account.id)
            .bind(&account.name)
            .bind(account.password_hash.clone())
            .bind(account.created_at)
            .execute_update()
            .map_err(|e| {
                conflict_as_already_exists(
                    e,
                    format!("account with id '{}' or name '{}'", account.id, account.name),
                )
            })?;

        debug!(account_id = %account.id, "account created");
        Ok(())
    }

    fn get_account(&self, id: &str) -> Result<Option<Account>> {
        self.first_account(
            &format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS),
            id,
        )
    }

    fn get_account_by_name(&self, name: &str) -> Result<Option<Account>> {
        self.first_account(
            &format!("SELECT {} FROM accounts WHERE name = ?", ACCOUNT_COLUMNS),
            name,
        )
    }

    fn get_all_accounts(&self) -> Result<Vec<Account>> {
        let rows = self.db.query(&format!(
            "SELECT {} FROM accounts ORDER BY name",
            ACCOUNT_COLUMNS
        ))?;
        rows.iter().map(Self::map_account).collect()
    }

    fn update_account(&self, account: &Account) -> Result<()> {
        // created_at is fixed at creation and never rewritten
        let updated = self
            .db
            .prepare("UPDATE accounts SET name = ?, password_hash = ? WHERE id = ?")
            .bind(&account.name)
            .bind(account.password_hash.clone())
            .bind(&account.id)
            .execute_update()
            .map_err(|e| {
                conflict_as_already_exists(e, format!("account with name '{}'", account.name))
            })?;

        if updated == 0 {
            return Err(Error::not_found(format!("account '{}'", account.id)));
        }
        Ok(())
    }

    fn delete_account(&self, id: &str) -> Result<bool> {
        self.db
            .prepare("DELETE FROM account_properties WHERE account_id = ?")
            .bind(id)
            .execute_update()?;

        let removed = self
            .db
            .prepare("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute_update()?;

        debug!(account_id = %id, removed, "account delete");
        Ok(removed > 0)
    }

    fn account_exists(&self, id: &str) -> Result<bool> {
        self.probe("SELECT 1 FROM accounts WHERE id = ?", id)
    }

    fn account_exists_by_name(&self, name: &str) -> Result<bool> {
        self.probe("SELECT 1 FROM accounts WHERE name = ?", name)
    }

    fn set_property(
        &self,
        account_id: &str,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<()> {
        if !self.account_exists(account_id)? {
            return Err(Error::not_found(format!("account '{}'", account_id)));
        }

        self.db
            .prepare(&format!(
                "INSERT INTO account_properties ({}) VALUES (?, ?, ?, ?)
                 ON CONFLICT (account_id, prop_key) DO UPDATE SET
                    prop_value = EXCLUDED.prop_value,
                    description = EXCLUDED.description",
                PROPERTY_COLUMNS
            ))
            .bind(account_id)
            .bind(key)
            .bind(value)
            .bind(description)
            .execute_update()?;
        Ok(())
    }

    fn get_property(&self, account_id: &str, key: &str) -> Result<Option<AccountProperty>> {
        let rows = self
            .db
            .prepare(&format!(
                "SELECT {} FROM account_properties WHERE account_id = ? AND prop_key = ?",
                PROPERTY_COLUMNS
            ))
            .bind(account_id)
            .bind(key)
            .execute()?;
        rows.first().map(Self::map_property).transpose()
    }

    fn get_property_value(&self, account_id: &str, key: &str) -> Result<Option<String>> {
        let rows = self
            .db
            .prepare("SELECT prop_value FROM account_properties WHERE account_id = ? AND prop_key = ?")
            .bind(account_id)
            .bind(key)
            .execute()?;
        rows.first().map(|row| text(row, 0)).transpose()
    }

    fn get_properties(&self, account_id: &str) -> Result<Vec<AccountProperty>> {
        let rows = self
            .db
            .prepare(&format!(
                "SELECT {} FROM account_properties WHERE account_id = ? ORDER BY prop_key",
                PROPERTY_COLUMNS
            ))
            .bind(account_id)
            .execute()?;
        rows.iter().map(Self::map_property).collect()
    }

    fn get_properties_by_prefix(
        &self,
        account_id: &str,
        prefix: &str,
    ) -> Result<Vec<AccountProperty>> {
        // starts_with keeps '%' and '_' literal, unlike LIKE
        let rows = self
            .db
            .prepare(&format!(
                "SELECT {} FROM account_properties
                 WHERE account_id = ? AND starts_with(prop_key, ?)
                 ORDER BY prop_key",
                PROPERTY_COLUMNS
            ))
            .bind(account_id)
            .bind(prefix)
            .execute()?;
        rows.iter().map(Self::map_property).collect()
    }

    fn property_exists(&self, account_id: &str, key: &str) -> Result<bool> {
        let rows = self
            .db
            .prepare("SELECT 1 FROM account_properties WHERE account_id = ? AND prop_key = ?")
            .bind(account_id)
            .bind(key)
            .execute()?;
        Ok(!rows.is_empty())
    }

    fn remove_property(&self, account_id: &str, key: &str) -> Result<usize> {
        self.db
            .prepare("DELETE FROM account_properties WHERE account_id = ? AND prop_key = ?")
            .bind(account_id)
            .bind(key)
            .execute_update()
    }

    fn remove_properties_by_prefix(&self, account_id: &str, prefix: &str) -> Result<usize> {
        self.db
            .prepare(
                "DELETE FROM account_properties WHERE account_id = ? AND starts_with(prop_key, ?)",
            )
            .bind(account_id)
            .bind(prefix)
            .execute_update()
    }

    fn clear_properties(&self, account_id: &str) -> Result<usize> {
        self.db
            .prepare("DELETE FROM account_properties WHERE account_id = ?")
            .bind(account_id)
            .execute_update()
    }

    fn count_accounts(&self) -> Result<i64> {
        single_count(&self.db.query("SELECT COUNT(*) FROM accounts")?)
    }

    fn count_properties(&self, account_id: &str) -> Result<i64> {
        let rows = self
            .db
            .prepare("SELECT COUNT(*) FROM account_properties WHERE account_id = ?")
            .bind(account_id)
            .execute()?;
        single_count(&rows)
    }
}
