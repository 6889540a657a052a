//! Platform-agnostic application bootstrap for the .gov registrar.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (port injection),
//! and `load_migration_files` (filesystem loader for legacy registrar exports).

use std::path::Path;
use std::sync::Arc;

use dotgov_core::error::{CoreError, CoreResult};
use dotgov_core::services::{
    ApplicationService, DomainService, InvitationService, MigrationService, ServiceContext,
};
use dotgov_core::traits::{
    AccessRepository, ApplicationRepository, DomainInformationRepository, DomainRepository,
    Notifier, RegistryClient, TransitionDomainRepository, UserRepository,
};
use dotgov_core::types::{InvitationSendReport, MigrationFiles, MigrationReport};

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs this
/// once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all injected ports)
    pub ctx: Arc<ServiceContext>,
    /// Domain lifecycle service
    pub domain_service: DomainService,
    /// Application review service
    pub application_service: ApplicationService,
    /// Login and invitation retrieval service
    pub invitation_service: InvitationService,
    /// Legacy registrar migration service
    pub migration_service: MigrationService,
}

impl AppState {
    /// Run the full legacy migration: load, transfer, then reconcile.
    ///
    /// This should be called before the portal is ready to serve requests.
    /// Rows that fail validation are skipped rather than aborting the run.
    pub async fn run_domain_migration(
        &self,
        files: &MigrationFiles,
    ) -> CoreResult<MigrationReport> {
        let report = self.migration_service.run(files).await?;
        log::info!("迁移完成：核对 {} 行过渡域名记录", report.total_rows);
        if report.missing_domains > 0 {
            log::warn!(
                "部分域名没有本地记录 ({} 个): {:?}",
                report.missing_domain_names.len(),
                report.missing_domain_names
            );
        }
        Ok(report)
    }

    /// Send invitation emails to the given migrated contacts.
    ///
    /// Delivery is tracked per staged row, so repeated runs only reach rows
    /// that have not been sent yet.
    pub async fn send_domain_invitations(
        &self,
        emails: &[String],
    ) -> CoreResult<InvitationSendReport> {
        let report = self.migration_service.send_invitations(emails).await?;
        log::info!("Found {} transition domains", report.found);
        if !report.failures.is_empty() {
            log::warn!(
                "Failed to deliver {} domain invitations: {:?}",
                report.failures.len(),
                report.failures
            );
        }
        Ok(report)
    }
}

/// Builder for constructing `AppState` with platform-specific ports.
///
/// # Required ports
/// - `registry_client` — how registry commands are issued
/// - `notifier` — how notification emails are delivered
/// - `domain_repository` — how domains are stored
/// - `domain_information_repository` — how organization records are stored
/// - `application_repository` — how applications are stored
/// - `user_repository` — how user accounts are stored
/// - `transition_domain_repository` — how migration staging rows are stored
/// - `access_repository` — how invitations and roles are stored
pub struct AppStateBuilder {
    registry_client: Option<Arc<dyn RegistryClient>>,
    notifier: Option<Arc<dyn Notifier>>,
    domain_repository: Option<Arc<dyn DomainRepository>>,
    domain_information_repository: Option<Arc<dyn DomainInformationRepository>>,
    application_repository: Option<Arc<dyn ApplicationRepository>>,
    user_repository: Option<Arc<dyn UserRepository>>,
    transition_domain_repository: Option<Arc<dyn TransitionDomainRepository>>,
    access_repository: Option<Arc<dyn AccessRepository>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry_client: None,
            notifier: None,
            domain_repository: None,
            domain_information_repository: None,
            application_repository: None,
            user_repository: None,
            transition_domain_repository: None,
            access_repository: None,
        }
    }

    #[must_use]
    pub fn registry_client(mut self, client: Arc<dyn RegistryClient>) -> Self {
        self.registry_client = Some(client);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn domain_repository(mut self, repo: Arc<dyn DomainRepository>) -> Self {
        self.domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn domain_information_repository(
        mut self,
        repo: Arc<dyn DomainInformationRepository>,
    ) -> Self {
        self.domain_information_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn application_repository(mut self, repo: Arc<dyn ApplicationRepository>) -> Self {
        self.application_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn user_repository(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn transition_domain_repository(
        mut self,
        repo: Arc<dyn TransitionDomainRepository>,
    ) -> Self {
        self.transition_domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn access_repository(mut self, repo: Arc<dyn AccessRepository>) -> Self {
        self.access_repository = Some(repo);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required ports are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let registry_client = self
            .registry_client
            .ok_or_else(|| CoreError::ValidationError("registry_client is required".to_string()))?;
        let notifier = self
            .notifier
            .ok_or_else(|| CoreError::ValidationError("notifier is required".to_string()))?;
        let domain_repository = self.domain_repository.ok_or_else(|| {
            CoreError::ValidationError("domain_repository is required".to_string())
        })?;
        let domain_information_repository = self.domain_information_repository.ok_or_else(|| {
            CoreError::ValidationError("domain_information_repository is required".to_string())
        })?;
        let application_repository = self.application_repository.ok_or_else(|| {
            CoreError::ValidationError("application_repository is required".to_string())
        })?;
        let user_repository = self
            .user_repository
            .ok_or_else(|| CoreError::ValidationError("user_repository is required".to_string()))?;
        let transition_domain_repository = self.transition_domain_repository.ok_or_else(|| {
            CoreError::ValidationError("transition_domain_repository is required".to_string())
        })?;
        let access_repository = self.access_repository.ok_or_else(|| {
            CoreError::ValidationError("access_repository is required".to_string())
        })?;

        let ctx = Arc::new(ServiceContext::new(
            registry_client,
            notifier,
            domain_repository,
            domain_information_repository,
            application_repository,
            user_repository,
            transition_domain_repository,
            access_repository,
        ));

        let domain_service = DomainService::new(Arc::clone(&ctx));
        let application_service = ApplicationService::new(Arc::clone(&ctx));
        let invitation_service = InvitationService::new(Arc::clone(&ctx));
        let migration_service = MigrationService::new(Arc::clone(&ctx));

        Ok(AppState {
            ctx,
            domain_service,
            application_service,
            invitation_service,
            migration_service,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the three legacy registrar export files from disk.
///
/// The exports use the escrow `a|b` line format: domain contacts
/// (`domain|contactId`), contacts (`contactId|email`), and domain statuses
/// (`domain|status`).
///
/// # Errors
/// Returns `CoreError::StorageError` if any file cannot be read.
pub fn load_migration_files(
    domain_contacts: &Path,
    contacts: &Path,
    domain_statuses: &Path,
) -> CoreResult<MigrationFiles> {
    Ok(MigrationFiles {
        domain_contacts: read_export(domain_contacts)?,
        contacts: read_export(contacts)?,
        domain_statuses: read_export(domain_statuses)?,
    })
}

fn read_export(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CoreError::StorageError(format!("Failed to read {}: {e}", path.display())))
}
