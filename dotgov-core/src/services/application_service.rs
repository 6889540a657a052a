//! Application review service
//!
//! Review operations share one shape: load the application and its creator,
//! refuse restricted creators, validate the status change against the
//! transition table, unwind a prior approval when leaving `approved`, apply
//! the side effects, commit, and only then notify. The ineligible override is
//! the single path that skips the creator check.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use dotgov_registry::{CreateDomainRequest, DomainName, RegistryError};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{
    Application, ApplicationStatus, Domain, DomainInformation, DomainState, Notification,
    NotificationKind, RejectionReason, User, UserDomainRole, UserStatus,
};

/// Application review service
pub struct ApplicationService {
    ctx: Arc<ServiceContext>,
}

impl ApplicationService {
    /// Creates an application service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    // ===== Requestor operations =====

    /// Start a draft request for a name.
    pub async fn create_draft(
        &self,
        creator: Uuid,
        requested_domain: DomainName,
        organization_name: impl Into<String>,
        purpose: impl Into<String>,
    ) -> CoreResult<Application> {
        let user = self.ctx.find_user(creator).await?;

        let mut application = Application::new(user.id, requested_domain);
        application.organization_name = Some(organization_name.into());
        application.purpose = Some(purpose.into());
        self.ctx.applications().save(&application).await?;

        log::info!(
            "Created draft application {} for {}",
            application.id,
            application.requested_domain
        );
        Ok(application)
    }

    /// Hand the request to the review team.
    ///
    /// The first submission (from `started` or `withdrawn`) re-checks the
    /// name's availability and sends the receipt email; returning from
    /// `in_review` does neither.
    pub async fn submit(&self, application_id: Uuid) -> CoreResult<Application> {
        let mut application = self.ctx.find_application(application_id).await?;
        let creator = self.ctx.find_user(application.creator).await?;
        require_unrestricted(&creator)?;
        check_transition(&application, ApplicationStatus::Submitted)?;

        // 1. Fresh availability check, first submission only
        let first_submission = matches!(
            application.status,
            ApplicationStatus::Started | ApplicationStatus::Withdrawn
        );
        if first_submission {
            let answers = self
                .ctx
                .registry()
                .check(std::slice::from_ref(&application.requested_domain))
                .await?;
            if !answers.first().is_some_and(|a| a.available) {
                return Err(CoreError::DomainUnavailable(
                    application.requested_domain.to_string(),
                ));
            }
            application.submitted_at = Some(Utc::now());
        }

        // 2. Commit, then acknowledge
        application.status = ApplicationStatus::Submitted;
        application.updated_at = Utc::now();
        self.ctx.applications().save(&application).await?;

        if first_submission {
            self.ctx
                .notify(
                    Notification::new(NotificationKind::SubmissionReceived, &creator.email)
                        .with_context(serde_json::json!({
                            "requested_domain": application.requested_domain.as_str(),
                        })),
                )
                .await;
        }

        log::info!(
            "Application {} for {} submitted",
            application.id,
            application.requested_domain
        );
        Ok(application)
    }

    /// Withdraw the request. It can be resubmitted later.
    pub async fn withdraw(&self, application_id: Uuid) -> CoreResult<Application> {
        let mut application = self.ctx.find_application(application_id).await?;
        let creator = self.ctx.find_user(application.creator).await?;
        require_unrestricted(&creator)?;
        check_transition(&application, ApplicationStatus::Withdrawn)?;

        application.status = ApplicationStatus::Withdrawn;
        application.updated_at = Utc::now();
        self.ctx.applications().save(&application).await?;

        self.ctx
            .notify(
                Notification::new(NotificationKind::ApplicationWithdrawn, &creator.email)
                    .with_context(serde_json::json!({
                        "requested_domain": application.requested_domain.as_str(),
                    })),
            )
            .await;

        log::info!("Application {} withdrawn", application.id);
        Ok(application)
    }

    // ===== Analyst operations =====

    /// Claim the request for review.
    pub async fn start_review(&self, application_id: Uuid) -> CoreResult<Application> {
        self.move_to(application_id, ApplicationStatus::InReview)
            .await
    }

    /// Send the request back to the requestor for fixes.
    pub async fn request_action(&self, application_id: Uuid) -> CoreResult<Application> {
        self.move_to(application_id, ApplicationStatus::ActionNeeded)
            .await
    }

    /// Approve the request, materializing its domain.
    ///
    /// A name nobody holds is registered and stored in `dns_needed`; an
    /// existing record is re-linked, registering it first when it was never
    /// provisioned. Approval data and a manager role for the requestor are
    /// created when absent, so a second approval of the same name adds
    /// nothing.
    pub async fn approve(&self, application_id: Uuid) -> CoreResult<Application> {
        let mut application = self.ctx.find_application(application_id).await?;
        let creator = self.ctx.find_user(application.creator).await?;
        require_unrestricted(&creator)?;
        check_transition(&application, ApplicationStatus::Approved)?;

        // 1. Find or create the domain, registering before the first save
        let domain = self.materialize_domain(&application, &creator).await?;

        // 2. Link and commit
        application.approved_domain = Some(domain.id);
        application.status = ApplicationStatus::Approved;
        application.updated_at = Utc::now();
        self.ctx.applications().save(&application).await?;

        self.ctx
            .notify(
                Notification::new(NotificationKind::ApplicationApproved, &creator.email)
                    .with_context(serde_json::json!({
                        "requested_domain": application.requested_domain.as_str(),
                    })),
            )
            .await;

        log::info!(
            "Application {} approved, domain {} is {}",
            application.id,
            domain.name,
            domain.state
        );
        Ok(application)
    }

    /// Reject the request with a recorded reason.
    pub async fn reject(
        &self,
        application_id: Uuid,
        reason: RejectionReason,
    ) -> CoreResult<Application> {
        let mut application = self.ctx.find_application(application_id).await?;
        let creator = self.ctx.find_user(application.creator).await?;
        require_unrestricted(&creator)?;
        check_transition(&application, ApplicationStatus::Rejected)?;
        self.revert_approved_domain(&mut application).await?;

        application.rejection_reason = Some(reason);
        application.status = ApplicationStatus::Rejected;
        application.updated_at = Utc::now();
        self.ctx.applications().save(&application).await?;

        self.ctx
            .notify(
                Notification::new(NotificationKind::ApplicationRejected, &creator.email)
                    .with_context(serde_json::json!({
                        "requested_domain": application.requested_domain.as_str(),
                        "reason": reason.to_string(),
                    })),
            )
            .await;

        log::info!("Application {} rejected: {reason}", application.id);
        Ok(application)
    }

    /// Mark the request ineligible and restrict its creator.
    ///
    /// A restricted creator can no longer move any of their applications.
    /// No notification goes out.
    pub async fn reject_with_prejudice(&self, application_id: Uuid) -> CoreResult<Application> {
        let mut application = self.ctx.find_application(application_id).await?;
        let mut creator = self.ctx.find_user(application.creator).await?;
        require_unrestricted(&creator)?;
        check_transition(&application, ApplicationStatus::Ineligible)?;
        self.revert_approved_domain(&mut application).await?;

        creator.status = UserStatus::Restricted;
        self.ctx.users().save(&creator).await?;

        application.status = ApplicationStatus::Ineligible;
        application.updated_at = Utc::now();
        self.ctx.applications().save(&application).await?;

        log::warn!(
            "Application {} marked ineligible, creator {} restricted",
            application.id,
            creator.username
        );
        Ok(application)
    }

    /// Reverse an ineligible finding.
    ///
    /// The privileged escape hatch: it alone ignores the restricted-creator
    /// check, lifts the restriction, and puts the request back in review.
    pub async fn override_ineligible(&self, application_id: Uuid) -> CoreResult<Application> {
        let mut application = self.ctx.find_application(application_id).await?;
        if application.status != ApplicationStatus::Ineligible {
            return Err(CoreError::InvalidStatusTransition {
                from: application.status.to_string(),
                to: ApplicationStatus::InReview.to_string(),
            });
        }

        let mut creator = self.ctx.find_user(application.creator).await?;
        creator.status = UserStatus::Active;
        self.ctx.users().save(&creator).await?;

        application.status = ApplicationStatus::InReview;
        application.updated_at = Utc::now();
        self.ctx.applications().save(&application).await?;

        log::info!(
            "Application {} returned to review, creator {} unrestricted",
            application.id,
            creator.username
        );
        Ok(application)
    }

    // ===== Shared steps =====

    /// A plain status change with the standard guards, no side effects.
    async fn move_to(
        &self,
        application_id: Uuid,
        target: ApplicationStatus,
    ) -> CoreResult<Application> {
        let mut application = self.ctx.find_application(application_id).await?;
        let creator = self.ctx.find_user(application.creator).await?;
        require_unrestricted(&creator)?;
        check_transition(&application, target)?;
        self.revert_approved_domain(&mut application).await?;

        application.status = target;
        application.updated_at = Utc::now();
        self.ctx.applications().save(&application).await?;

        log::info!("Application {} moved to {target}", application.id);
        Ok(application)
    }

    /// Find or create the domain an approval grants.
    async fn materialize_domain(
        &self,
        application: &Application,
        creator: &User,
    ) -> CoreResult<Domain> {
        let existing = self
            .ctx
            .domains()
            .find_by_name(application.requested_domain.as_str())
            .await?;

        let domain = match existing {
            Some(mut domain) => {
                if domain.state == DomainState::Unknown {
                    self.register(&mut domain).await?;
                    self.ctx.domains().save(&domain).await?;
                }
                domain
            }
            None => {
                let mut domain = Domain::new(application.requested_domain.clone());
                self.register(&mut domain).await?;
                self.ctx.domains().save(&domain).await?;
                domain
            }
        };

        if self
            .ctx
            .domain_information()
            .find_by_domain(domain.id)
            .await?
            .is_none()
        {
            let info = DomainInformation::new(
                domain.id,
                creator.id,
                application.organization_name.clone(),
            );
            self.ctx.domain_information().save(&info).await?;
        }
        if self
            .ctx
            .access()
            .find_role(creator.id, domain.id)
            .await?
            .is_none()
        {
            let role = UserDomainRole::manager(creator.id, domain.id);
            self.ctx.access().save_role(&role).await?;
        }

        Ok(domain)
    }

    /// Register the domain at the registry, adopting an existing object.
    async fn register(&self, domain: &mut Domain) -> CoreResult<()> {
        let request = CreateDomainRequest {
            name: domain.name.clone(),
            contacts: Vec::new(),
            nameservers: Vec::new(),
        };
        match self.ctx.registry().create_domain(&request).await {
            Ok(created) => {
                domain.registry_created_at = Some(created.created_at);
                domain.registry_synced_at = Some(Utc::now());
            }
            Err(RegistryError::ObjectExists { .. }) => {
                log::info!("Domain {} already registered, adopting it", domain.name);
            }
            Err(e) => return Err(e.into()),
        }
        domain.state = DomainState::DnsNeeded;
        domain.updated_at = Utc::now();
        Ok(())
    }

    /// Undo the domain a prior approval created, when leaving `approved`.
    ///
    /// Refuses while the domain is live; operators must take it down first.
    /// A domain that never reached the registry, or is already deleted there,
    /// is removed locally only.
    async fn revert_approved_domain(&self, application: &mut Application) -> CoreResult<()> {
        let Some(domain_id) = application.approved_domain else {
            return Ok(());
        };

        let Some(domain) = self.ctx.domains().find_by_id(domain_id).await? else {
            log::warn!(
                "Approved domain for application {} is gone, unlinking",
                application.id
            );
            application.approved_domain = None;
            return Ok(());
        };

        if domain.is_active() {
            return Err(CoreError::DomainAlreadyActive);
        }

        if !matches!(domain.state, DomainState::Unknown | DomainState::Deleted) {
            match self.ctx.registry().delete_domain(&domain.name).await {
                Ok(()) => {}
                Err(RegistryError::ObjectNotFound { .. }) => {
                    log::warn!("Domain {} was not at the registry", domain.name);
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.ctx.access().delete_roles_for_domain(domain.id).await?;
        self.ctx
            .domain_information()
            .delete_by_domain(domain.id)
            .await?;
        self.ctx.domains().delete(domain.id).await?;
        application.approved_domain = None;

        log::info!(
            "Removed provisional domain {} while leaving approval",
            domain.name
        );
        Ok(())
    }
}

fn require_unrestricted(creator: &User) -> CoreResult<()> {
    if creator.is_restricted() {
        return Err(CoreError::RestrictedCreator);
    }
    Ok(())
}

fn check_transition(application: &Application, target: ApplicationStatus) -> CoreResult<()> {
    if application.status.can_transition_to(target) {
        return Ok(());
    }
    Err(CoreError::InvalidStatusTransition {
        from: application.status.to_string(),
        to: target.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_application_service, RegistryCommand, TestHarness};
    use crate::traits::{
        AccessRepository, ApplicationRepository, DomainInformationRepository, DomainRepository,
        UserRepository,
    };

    fn name(s: &str) -> DomainName {
        DomainName::parse(s).unwrap()
    }

    async fn seed_user(h: &TestHarness) -> User {
        let user = User::new("mayor", "mayor@city.example");
        h.users.save(&user).await.unwrap();
        user
    }

    async fn draft(service: &ApplicationService, h: &TestHarness) -> (Application, User) {
        let user = seed_user(h).await;
        let application = service
            .create_draft(user.id, name("city.gov"), "City of Example", "Public services")
            .await
            .unwrap();
        (application, user)
    }

    async fn sent_kinds(h: &TestHarness) -> Vec<NotificationKind> {
        h.notifier.sent().await.iter().map(|n| n.kind).collect()
    }

    #[tokio::test]
    async fn draft_starts_in_started() {
        let (service, h) = create_test_application_service();
        let (application, user) = draft(&service, &h).await;

        assert_eq!(application.status, ApplicationStatus::Started);
        assert_eq!(application.creator, user.id);
        assert!(application.submitted_at.is_none());
        assert!(h.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn submit_checks_availability_and_sends_one_receipt() {
        let (service, h) = create_test_application_service();
        let (application, user) = draft(&service, &h).await;

        let submitted = service.submit(application.id).await.unwrap();

        assert_eq!(submitted.status, ApplicationStatus::Submitted);
        assert!(submitted.submitted_at.is_some());
        assert_eq!(
            h.registry.commands().await,
            vec![RegistryCommand::Check(vec!["city.gov".to_string()])]
        );
        let sent = h.notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::SubmissionReceived);
        assert_eq!(sent[0].to, user.email);
    }

    #[tokio::test]
    async fn submit_rejects_a_taken_name() {
        let (service, h) = create_test_application_service();
        let (application, _) = draft(&service, &h).await;
        h.registry.set_unavailable("city.gov").await;

        let err = service.submit(application.id).await.unwrap_err();
        assert!(matches!(err, CoreError::DomainUnavailable(_)));

        let stored = h
            .applications
            .find_by_id(application.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ApplicationStatus::Started);
        assert!(h.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn returning_from_review_skips_check_and_receipt() {
        let (service, h) = create_test_application_service();
        let (application, _) = draft(&service, &h).await;

        service.submit(application.id).await.unwrap();
        service.start_review(application.id).await.unwrap();
        let back = service.submit(application.id).await.unwrap();

        assert_eq!(back.status, ApplicationStatus::Submitted);
        // One check and one receipt, both from the first submission.
        assert_eq!(h.registry.commands().await.len(), 1);
        assert_eq!(
            sent_kinds(&h).await,
            vec![NotificationKind::SubmissionReceived]
        );
    }

    #[tokio::test]
    async fn resubmitting_after_withdrawal_rechecks() {
        let (service, h) = create_test_application_service();
        let (application, _) = draft(&service, &h).await;

        service.submit(application.id).await.unwrap();
        service.withdraw(application.id).await.unwrap();
        service.submit(application.id).await.unwrap();

        assert_eq!(h.registry.commands().await.len(), 2);
        assert_eq!(
            sent_kinds(&h).await,
            vec![
                NotificationKind::SubmissionReceived,
                NotificationKind::ApplicationWithdrawn,
                NotificationKind::SubmissionReceived,
            ]
        );
    }

    #[tokio::test]
    async fn restricted_creator_cannot_move_an_application() {
        let (service, h) = create_test_application_service();
        let (application, mut user) = draft(&service, &h).await;
        user.status = UserStatus::Restricted;
        h.users.save(&user).await.unwrap();

        let err = service.submit(application.id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "This action is not permitted for applications with a restricted creator."
        );
        assert!(h.registry.commands().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_transition_is_reported_in_words() {
        let (service, h) = create_test_application_service();
        let (application, _) = draft(&service, &h).await;

        let err = service.approve(application.id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Transition from 'started' to 'approved' is not allowed"
        );
    }

    #[tokio::test]
    async fn approval_materializes_the_domain() {
        let (service, h) = create_test_application_service();
        let (application, user) = draft(&service, &h).await;
        service.submit(application.id).await.unwrap();

        let approved = service.approve(application.id).await.unwrap();

        let domain = h
            .domains
            .find_by_name("city.gov")
            .await
            .unwrap()
            .expect("domain should exist");
        assert_eq!(domain.state, DomainState::DnsNeeded);
        assert_eq!(approved.approved_domain, Some(domain.id));
        assert_eq!(
            h.registry.commands().await,
            vec![
                RegistryCommand::Check(vec!["city.gov".to_string()]),
                RegistryCommand::Create("city.gov".to_string()),
            ]
        );

        let info = h
            .domain_information
            .find_by_domain(domain.id)
            .await
            .unwrap()
            .expect("approval data should exist");
        assert_eq!(info.creator, user.id);
        assert_eq!(info.organization_name.as_deref(), Some("City of Example"));
        assert!(h
            .access
            .find_role(user.id, domain.id)
            .await
            .unwrap()
            .is_some());
        assert_eq!(
            sent_kinds(&h).await,
            vec![
                NotificationKind::SubmissionReceived,
                NotificationKind::ApplicationApproved,
            ]
        );
    }

    #[tokio::test]
    async fn approval_adopts_a_registered_name() {
        let (service, h) = create_test_application_service();
        let (application, _) = draft(&service, &h).await;
        service.submit(application.id).await.unwrap();
        h.registry
            .set_create_error(Some(RegistryError::ObjectExists {
                name: "city.gov".to_string(),
            }))
            .await;

        service.approve(application.id).await.unwrap();

        let domain = h.domains.find_by_name("city.gov").await.unwrap().unwrap();
        assert_eq!(domain.state, DomainState::DnsNeeded);
    }

    #[tokio::test]
    async fn approval_relinks_an_existing_domain() {
        let (service, h) = create_test_application_service();
        let (application, _) = draft(&service, &h).await;
        service.submit(application.id).await.unwrap();

        let mut existing = Domain::new(name("city.gov"));
        existing.state = DomainState::Ready;
        h.domains.save(&existing).await.unwrap();

        let approved = service.approve(application.id).await.unwrap();

        assert_eq!(approved.approved_domain, Some(existing.id));
        let stored = h.domains.find_by_id(existing.id).await.unwrap().unwrap();
        assert_eq!(stored.state, DomainState::Ready);
        // Check from the submission; no create for a domain that already exists.
        assert_eq!(h.registry.commands().await.len(), 1);
    }

    #[tokio::test]
    async fn rejecting_an_approval_removes_the_domain() {
        let (service, h) = create_test_application_service();
        let (application, user) = draft(&service, &h).await;
        service.submit(application.id).await.unwrap();
        service.approve(application.id).await.unwrap();
        let domain_id = h
            .domains
            .find_by_name("city.gov")
            .await
            .unwrap()
            .unwrap()
            .id;

        let rejected = service
            .reject(application.id, RejectionReason::OrgNotEligible)
            .await
            .unwrap();

        assert_eq!(rejected.status, ApplicationStatus::Rejected);
        assert_eq!(rejected.approved_domain, None);
        assert_eq!(
            rejected.rejection_reason,
            Some(RejectionReason::OrgNotEligible)
        );
        assert!(h.domains.find_by_id(domain_id).await.unwrap().is_none());
        assert!(h
            .domain_information
            .find_by_domain(domain_id)
            .await
            .unwrap()
            .is_none());
        assert!(h
            .access
            .find_role(user.id, domain_id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            h.registry.commands().await,
            vec![
                RegistryCommand::Check(vec!["city.gov".to_string()]),
                RegistryCommand::Create("city.gov".to_string()),
                RegistryCommand::Delete("city.gov".to_string()),
            ]
        );
        assert_eq!(
            sent_kinds(&h).await,
            vec![
                NotificationKind::SubmissionReceived,
                NotificationKind::ApplicationApproved,
                NotificationKind::ApplicationRejected,
            ]
        );
    }

    #[tokio::test]
    async fn action_needed_after_approval_unwinds_the_domain() {
        let (service, h) = create_test_application_service();
        let (application, _) = draft(&service, &h).await;
        service.submit(application.id).await.unwrap();
        service.approve(application.id).await.unwrap();
        let domain_id = h
            .domains
            .find_by_name("city.gov")
            .await
            .unwrap()
            .unwrap()
            .id;

        let returned = service.request_action(application.id).await.unwrap();

        assert_eq!(returned.status, ApplicationStatus::ActionNeeded);
        assert_eq!(returned.approved_domain, None);
        assert!(h.domains.find_by_id(domain_id).await.unwrap().is_none());
        // Sending back for fixes is not announced by email.
        assert_eq!(
            sent_kinds(&h).await,
            vec![
                NotificationKind::SubmissionReceived,
                NotificationKind::ApplicationApproved,
            ]
        );
    }

    #[tokio::test]
    async fn leaving_approval_with_a_live_domain_is_blocked() {
        let (service, h) = create_test_application_service();
        let (application, _) = draft(&service, &h).await;
        service.submit(application.id).await.unwrap();
        service.approve(application.id).await.unwrap();

        // The domain went live in the meantime.
        let mut domain = h.domains.find_by_name("city.gov").await.unwrap().unwrap();
        domain.state = DomainState::Ready;
        h.domains.save(&domain).await.unwrap();

        let err = service
            .reject(application.id, RejectionReason::Other)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "This action is not permitted. The domain is already active."
        );

        let stored = h
            .applications
            .find_by_id(application.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ApplicationStatus::Approved);
        assert!(h.domains.find_by_id(domain.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn prejudice_restricts_the_creator_silently() {
        let (service, h) = create_test_application_service();
        let (application, user) = draft(&service, &h).await;
        service.submit(application.id).await.unwrap();

        let marked = service.reject_with_prejudice(application.id).await.unwrap();

        assert_eq!(marked.status, ApplicationStatus::Ineligible);
        let stored_user = h.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored_user.status, UserStatus::Restricted);
        // Only the submission receipt; ineligibility is not announced.
        assert_eq!(
            sent_kinds(&h).await,
            vec![NotificationKind::SubmissionReceived]
        );

        // Nothing moves out of ineligible through the normal table.
        let err = service.start_review(application.id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "This action is not permitted for applications with a restricted creator."
        );
    }

    #[tokio::test]
    async fn override_returns_the_application_to_review() {
        let (service, h) = create_test_application_service();
        let (application, user) = draft(&service, &h).await;
        service.submit(application.id).await.unwrap();
        service.reject_with_prejudice(application.id).await.unwrap();

        let restored = service.override_ineligible(application.id).await.unwrap();

        assert_eq!(restored.status, ApplicationStatus::InReview);
        let stored_user = h.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored_user.status, UserStatus::Active);

        // The application moves normally again.
        service.approve(application.id).await.unwrap();
    }

    #[tokio::test]
    async fn override_requires_an_ineligible_application() {
        let (service, h) = create_test_application_service();
        let (application, _) = draft(&service, &h).await;
        service.submit(application.id).await.unwrap();

        let err = service.override_ineligible(application.id).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Transition from 'submitted' to 'in review' is not allowed"
        );
    }
}
