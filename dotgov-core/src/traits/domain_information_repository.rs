//! Domain information persistence trait

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::types::DomainInformation;

/// Store for the one-per-domain organization record.
#[async_trait]
pub trait DomainInformationRepository: Send + Sync {
    /// Get all records
    async fn find_all(&self) -> CoreResult<Vec<DomainInformation>>;

    /// Get the record for a domain
    async fn find_by_domain(&self, domain_id: Uuid) -> CoreResult<Option<DomainInformation>>;

    /// Save a record (new or update)
    async fn save(&self, info: &DomainInformation) -> CoreResult<()>;

    /// Remove the record for a domain
    async fn delete_by_domain(&self, domain_id: Uuid) -> CoreResult<()>;
}
