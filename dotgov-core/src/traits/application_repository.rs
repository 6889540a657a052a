//! Application persistence trait

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::types::Application;

/// Domain request store.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Get all applications
    async fn find_all(&self) -> CoreResult<Vec<Application>>;

    /// Get an application by ID
    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<Application>>;

    /// Get the applications created by a user
    async fn find_by_creator(&self, creator: Uuid) -> CoreResult<Vec<Application>>;

    /// Save an application (new or update)
    async fn save(&self, application: &Application) -> CoreResult<()>;
}
