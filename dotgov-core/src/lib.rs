//! Dotgov Registrar Core Library
//!
//! Provides the core business logic of the .gov registrar portal, including:
//! - Domain lifecycle (Domain Service)
//! - Request review workflow (Application Service)
//! - Login and invitation retrieval (Invitation Service)
//! - Legacy registrar intake (Migration Service)
//!
//! This library is designed to be platform-independent, abstracting storage
//! and the registry connection through traits. Frontends inject their own
//! adapters via `ServiceContext`.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{
    AccessRepository, ApplicationRepository, DomainInformationRepository, DomainRepository,
    Notifier, RegistryClient, TransitionDomainRepository, UserRepository,
};
