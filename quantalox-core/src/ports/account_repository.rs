//! Account repository port

use crate::domain::result::Result;
use crate::domain::{Account, AccountProperty};

/// Persistence-agnostic account and property storage, consumed by use cases
///
/// Lookups return `Ok(None)` / empty vectors for missing data; errors are
/// reserved for real failures.
pub trait AccountRepository: Send + Sync {
    // === Accounts ===

    /// Insert a new account; `Error::AlreadyExists` on id or name collision
    fn create_account(&self, account: &Account) -> Result<()>;

    fn get_account(&self, id: &str) -> Result<Option<Account>>;

    fn get_account_by_name(&self, name: &str) -> Result<Option<Account>>;

    fn get_all_accounts(&self) -> Result<Vec<Account>>;

    /// Replace the mutable fields (name, password hash) of an existing account
    ///
    /// `Error::NotFound` if no account has this id.
    fn update_account(&self, account: &Account) -> Result<()>;

    /// Delete an account and its properties; `Ok(false)` if nothing was there
    fn delete_account(&self, id: &str) -> Result<bool>;

    fn account_exists(&self, id: &str) -> Result<bool>;

    fn account_exists_by_name(&self, name: &str) -> Result<bool>;

    // === Properties ===

    /// Create or overwrite the property `(account_id, key)`
    fn set_property(
        &self,
        account_id: &str,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<()>;

    /// Same as [`AccountRepository::set_property`] for a whole property
    fn put_property(&self, property: &AccountProperty) -> Result<()> {
        self.set_property(
            &property.account_id,
            &property.key,
            &property.value,
            property.description.as_deref(),
        )
    }

    fn get_property(&self, account_id: &str, key: &str) -> Result<Option<AccountProperty>>;

    fn get_property_value(&self, account_id: &str, key: &str) -> Result<Option<String>>;

    fn get_properties(&self, account_id: &str) -> Result<Vec<AccountProperty>>;

    /// Properties whose key starts with `prefix` (exact, case-sensitive)
    fn get_properties_by_prefix(
        &self,
        account_id: &str,
        prefix: &str,
    ) -> Result<Vec<AccountProperty>>;

    fn property_exists(&self, account_id: &str, key: &str) -> Result<bool>;

    fn remove_property(&self, account_id: &str, key: &str) -> Result<usize>;

    fn remove_properties_by_prefix(&self, account_id: &str, prefix: &str) -> Result<usize>;

    fn clear_properties(&self, account_id: &str) -> Result<usize>;

    // === Counts ===

    fn count_accounts(&self) -> Result<i64>;

    fn count_properties(&self, account_id: &str) -> Result<i64>;
}
