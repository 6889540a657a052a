//! User persistence trait

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::types::User;

/// User store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by ID
    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<User>>;

    /// Get a user by email
    ///
    /// # Arguments
    /// * `email` - normalized (lowercase) email address
    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    /// Save a user (new or update)
    async fn save(&self, user: &User) -> CoreResult<()>;
}
