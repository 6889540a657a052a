//! Domain persistence trait

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::types::Domain;

/// Domain record store.
///
/// Names are stored normalized (lowercase), so name lookups are exact.
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// Get all domains
    async fn find_all(&self) -> CoreResult<Vec<Domain>>;

    /// Get a domain by ID
    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<Domain>>;

    /// Get a domain by its registered name
    ///
    /// # Arguments
    /// * `name` - normalized (lowercase) domain name
    async fn find_by_name(&self, name: &str) -> CoreResult<Option<Domain>>;

    /// Save a domain (new or update)
    async fn save(&self, domain: &Domain) -> CoreResult<()>;

    /// Remove a domain record entirely
    ///
    /// Lifecycle deletion keeps the record in `Deleted`; this is for
    /// un-materializing a domain when an approval is reverted.
    async fn delete(&self, id: Uuid) -> CoreResult<()>;
}
