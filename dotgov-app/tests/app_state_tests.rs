#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `AppStateBuilder` and the migration entry points.

use std::sync::Arc;

use dotgov_app::{load_migration_files, AppState, AppStateBuilder};
use dotgov_core::error::CoreError;
use dotgov_core::test_utils::{
    test_migration_files, MockAccessRepository, MockApplicationRepository,
    MockDomainInformationRepository, MockDomainRepository, MockNotifier, MockRegistryClient,
    MockTransitionDomainRepository, MockUserRepository, TEST_CONTACTS, TEST_DOMAIN_CONTACTS,
    TEST_DOMAIN_STATUSES,
};
use dotgov_core::traits::DomainRepository;

/// Injected mocks kept around for assertions.
struct MockPorts {
    registry: Arc<MockRegistryClient>,
    notifier: Arc<MockNotifier>,
    domains: Arc<MockDomainRepository>,
}

/// Helper to build `AppState` from mock ports.
fn build_app_state() -> (AppState, MockPorts) {
    let registry = Arc::new(MockRegistryClient::new());
    let notifier = Arc::new(MockNotifier::new());
    let domains = Arc::new(MockDomainRepository::new());

    let app_state = AppStateBuilder::new()
        .registry_client(registry.clone())
        .notifier(notifier.clone())
        .domain_repository(domains.clone())
        .domain_information_repository(Arc::new(MockDomainInformationRepository::new()))
        .application_repository(Arc::new(MockApplicationRepository::new()))
        .user_repository(Arc::new(MockUserRepository::new()))
        .transition_domain_repository(Arc::new(MockTransitionDomainRepository::new()))
        .access_repository(Arc::new(MockAccessRepository::new()))
        .build()
        .unwrap();

    (
        app_state,
        MockPorts {
            registry,
            notifier,
            domains,
        },
    )
}

// ===== AppStateBuilder Tests =====

#[tokio::test]
async fn builder_with_all_required_ports_succeeds() {
    let (app_state, _ports) = build_app_state();
    assert!(app_state.ctx.domains().find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn builder_missing_registry_client_fails() {
    let result = AppStateBuilder::new()
        .notifier(Arc::new(MockNotifier::new()))
        .domain_repository(Arc::new(MockDomainRepository::new()))
        .domain_information_repository(Arc::new(MockDomainInformationRepository::new()))
        .application_repository(Arc::new(MockApplicationRepository::new()))
        .user_repository(Arc::new(MockUserRepository::new()))
        .transition_domain_repository(Arc::new(MockTransitionDomainRepository::new()))
        .access_repository(Arc::new(MockAccessRepository::new()))
        .build();
    match result {
        Err(CoreError::ValidationError(msg)) => {
            assert_eq!(msg, "registry_client is required");
        }
        Err(other) => panic!("Expected ValidationError, got: {other:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[tokio::test]
async fn builder_missing_notifier_fails() {
    let result = AppStateBuilder::new()
        .registry_client(Arc::new(MockRegistryClient::new()))
        .domain_repository(Arc::new(MockDomainRepository::new()))
        .domain_information_repository(Arc::new(MockDomainInformationRepository::new()))
        .application_repository(Arc::new(MockApplicationRepository::new()))
        .user_repository(Arc::new(MockUserRepository::new()))
        .transition_domain_repository(Arc::new(MockTransitionDomainRepository::new()))
        .access_repository(Arc::new(MockAccessRepository::new()))
        .build();
    match result {
        Err(CoreError::ValidationError(msg)) => assert_eq!(msg, "notifier is required"),
        Err(other) => panic!("Expected ValidationError, got: {other:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[tokio::test]
async fn builder_reports_the_first_missing_port() {
    // Nothing injected at all: the registry client is checked first
    let result = AppStateBuilder::new().build();
    match result {
        Err(CoreError::ValidationError(msg)) => {
            assert_eq!(msg, "registry_client is required");
        }
        Err(other) => panic!("Expected ValidationError, got: {other:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

// ===== Export File Loading Tests =====

#[tokio::test]
async fn load_migration_files_reads_all_three_exports() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let domain_contacts = tmp.path().join("escrow_domain_contacts.daily.gov.txt");
    let contacts = tmp.path().join("escrow_contacts.daily.gov.txt");
    let statuses = tmp.path().join("escrow_domain_statuses.daily.gov.txt");
    std::fs::write(&domain_contacts, TEST_DOMAIN_CONTACTS).unwrap();
    std::fs::write(&contacts, TEST_CONTACTS).unwrap();
    std::fs::write(&statuses, TEST_DOMAIN_STATUSES).unwrap();

    let files = load_migration_files(&domain_contacts, &contacts, &statuses).unwrap();
    assert_eq!(files.domain_contacts, TEST_DOMAIN_CONTACTS);
    assert_eq!(files.contacts, TEST_CONTACTS);
    assert_eq!(files.domain_statuses, TEST_DOMAIN_STATUSES);
}

#[tokio::test]
async fn load_migration_files_missing_file_fails() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let missing = tmp.path().join("escrow_domain_contacts.daily.gov.txt");
    let contacts = tmp.path().join("escrow_contacts.daily.gov.txt");
    let statuses = tmp.path().join("escrow_domain_statuses.daily.gov.txt");
    std::fs::write(&contacts, TEST_CONTACTS).unwrap();
    std::fs::write(&statuses, TEST_DOMAIN_STATUSES).unwrap();

    let result = load_migration_files(&missing, &contacts, &statuses);
    match result {
        Err(CoreError::StorageError(msg)) => {
            assert!(msg.contains("escrow_domain_contacts.daily.gov.txt"));
        }
        Err(other) => panic!("Expected StorageError, got: {other:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

// ===== Migration Entry Point Tests =====

#[tokio::test]
async fn run_domain_migration_audits_every_staged_row() {
    let (app_state, ports) = build_app_state();

    let report = app_state
        .run_domain_migration(&test_migration_files())
        .await
        .unwrap();

    assert_eq!(report.total_rows, 8);
    assert_eq!(report.unique_domains, 4);
    assert_eq!(report.matched_domains, 4);
    assert_eq!(report.missing_domains, 0);
    assert_eq!(report.duplicate_domains, 0);
    assert_eq!(report.missing_informations, 8);
    assert_eq!(report.missing_invitations, 1);
    assert_eq!(report.rows_without_contact, 1);
    assert_eq!(
        report.unlinked_rows,
        vec![(String::new(), "anomaly.gov".to_string())]
    );

    // The migration trusts the legacy exports and never talks to the registry
    assert!(ports.registry.commands().await.is_empty());
    assert_eq!(ports.domains.find_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn send_domain_invitations_tracks_delivery_per_row() {
    let (app_state, ports) = build_app_state();
    app_state
        .run_domain_migration(&test_migration_files())
        .await
        .unwrap();

    let everyone: Vec<String> = TEST_CONTACTS
        .lines()
        .filter_map(|line| line.split('|').nth(1))
        .map(str::to_string)
        .collect();

    let report = app_state.send_domain_invitations(&everyone).await.unwrap();
    assert_eq!(report.found, 7);
    assert_eq!(report.sent, 7);
    assert_eq!(report.already_sent, 0);
    assert!(report.failures.is_empty());
    assert_eq!(ports.notifier.sent().await.len(), 7);

    // A second run must not reach anyone twice
    let repeat = app_state.send_domain_invitations(&everyone).await.unwrap();
    assert_eq!(repeat.found, 7);
    assert_eq!(repeat.sent, 0);
    assert_eq!(repeat.already_sent, 7);
    assert_eq!(ports.notifier.sent().await.len(), 7);
}

#[tokio::test]
async fn full_startup_sequence_from_export_files() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let domain_contacts = tmp.path().join("domain_contacts.txt");
    let contacts = tmp.path().join("contacts.txt");
    let statuses = tmp.path().join("domain_statuses.txt");
    std::fs::write(&domain_contacts, TEST_DOMAIN_CONTACTS).unwrap();
    std::fs::write(&contacts, TEST_CONTACTS).unwrap();
    std::fs::write(&statuses, TEST_DOMAIN_STATUSES).unwrap();

    let (app_state, ports) = build_app_state();
    let files = load_migration_files(&domain_contacts, &contacts, &statuses).unwrap();
    let audit = app_state.run_domain_migration(&files).await.unwrap();
    assert_eq!(audit.missing_domains, 0);

    let report = app_state
        .send_domain_invitations(&["Alice@DC.example".to_string()])
        .await
        .unwrap();
    assert_eq!(report.found, 1);
    assert_eq!(report.sent, 1);

    let sent = ports.notifier.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@dc.example");
}
