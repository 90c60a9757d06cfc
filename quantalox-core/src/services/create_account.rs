//! Create account use case

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::result::Error;
use crate::domain::Account;
use crate::ports::AccountRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountRequest {
    pub id: String,
    pub name: String,
    pub password_hash: Option<Vec<u8>>,
    /// Unix milliseconds
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub id: String,
    pub name: String,
    pub created_at: i64,
}

#[derive(Error, Debug)]
pub enum CreateAccountError {
    /// The request breaks a business rule (empty field, duplicate id/name)
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Repository(#[from] Error),
}

/// Validates a request and persists the new account
pub struct CreateAccountInteractor {
    repository: Arc<dyn AccountRepository>,
}

impl CreateAccountInteractor {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(
        &self,
        request: CreateAccountRequest,
    ) -> Result<CreateAccountResponse, CreateAccountError> {
        if request.id.trim().is_empty() {
            return Err(CreateAccountError::Rejected(
                "Account ID cannot be empty".to_string(),
            ));
        }
        if request.name.trim().is_empty() {
            return Err(CreateAccountError::Rejected(
                "Account name cannot be empty".to_string(),
            ));
        }

        if self.repository.account_exists(&request.id)? {
            return Err(CreateAccountError::Rejected(
                "Account with this ID already exists".to_string(),
            ));
        }
        if self.repository.account_exists_by_name(&request.name)? {
            return Err(CreateAccountError::Rejected(
                "Account with this name already exists".to_string(),
            ));
        }

        let account = Account {
            id: request.id,
            name: request.name,
            password_hash: request.password_hash,
            created_at: request.created_at,
        };

        // Another writer can still win between the checks and the insert
        match self.repository.create_account(&account) {
            Ok(()) => {}
            Err(Error::AlreadyExists(what)) => {
                return Err(CreateAccountError::Rejected(format!(
                    "Account already exists: {}",
                    what
                )))
            }
            Err(e) => return Err(e.into()),
        }

        debug!(account_id = %account.id, "account created via use case");

        Ok(CreateAccountResponse {
            id: account.id,
            name: account.name,
            created_at: account.created_at,
        })
    }
}
