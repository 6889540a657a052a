//! Storage and dispatch abstraction trait definitions

mod access_repository;
mod application_repository;
mod domain_information_repository;
mod domain_repository;
mod notifier;
mod transition_domain_repository;
mod user_repository;

pub use access_repository::AccessRepository;
pub use application_repository::ApplicationRepository;
pub use domain_information_repository::DomainInformationRepository;
pub use domain_repository::DomainRepository;
pub use notifier::Notifier;
pub use transition_domain_repository::TransitionDomainRepository;
pub use user_repository::UserRepository;

// Re-export the registry client seam alongside the local ports
pub use dotgov_registry::RegistryClient;
