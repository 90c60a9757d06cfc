//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
///
/// Parallel to [`crate::domain::Account`] but kept in its own table and
/// repository. `created_at` is persisted with second precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            created_at,
        }
    }
}
