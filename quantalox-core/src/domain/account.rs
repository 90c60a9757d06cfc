//! Account domain model

use serde::{Deserialize, Serialize};

/// A portfolio owner
///
/// `id` and `name` are each unique across all accounts. `created_at` is
/// Unix milliseconds and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Opaque hash bytes, never interpreted by the core
    #[serde(skip_serializing)]
    pub password_hash: Option<Vec<u8>>,
    pub created_at: i64,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            password_hash: None,
            created_at,
        }
    }

    pub fn with_password_hash(mut self, hash: Vec<u8>) -> Self {
        self.password_hash = Some(hash);
        self
    }
}

/// Open-ended key/value attribute of an account
///
/// Keys are grouped by prefix convention, e.g. `portfolio.currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProperty {
    pub account_id: String,
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AccountProperty {
    pub fn new(
        account_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            key: key.into(),
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
