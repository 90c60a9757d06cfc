//! User repository port

use crate::domain::result::Result;
use crate::domain::User;

pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// All users, newest first
    fn find_all(&self) -> Result<Vec<User>>;

    /// Insert or update by id; `id` and `created_at` of an existing row are kept
    fn save(&self, user: &User) -> Result<User>;

    /// Returns whether a row was removed
    fn remove(&self, id: &str) -> Result<bool>;
}
