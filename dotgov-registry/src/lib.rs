//! # dotgov-registry
//!
//! Registry client contract for the .gov registrar.
//!
//! This crate defines the narrow seam between the registrar's business core
//! and whichever registry backend is in use: the [`RegistryClient`] trait, the
//! wire-level command and response types, the validated [`DomainName`]
//! newtype, and the unified [`RegistryError`] taxonomy. It contains no
//! business rules and no storage.
//!
//! ## Checking availability
//!
//! ```rust,no_run
//! # use dotgov_registry::*;
//! # async fn example(registry: std::sync::Arc<dyn RegistryClient>) -> Result<()> {
//! let name = DomainName::parse("city.gov")?;
//! let answers = registry.check(std::slice::from_ref(&name)).await?;
//! for answer in &answers {
//!     println!("{}: available = {}", answer.name, answer.available);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Registering a domain
//!
//! ```rust,no_run
//! # use dotgov_registry::*;
//! # async fn example(registry: std::sync::Arc<dyn RegistryClient>) -> Result<()> {
//! let request = CreateDomainRequest {
//!     name: DomainName::parse("city.gov")?,
//!     contacts: vec![DomainContact {
//!         kind: ContactKind::Security,
//!         email: "security@city.example".to_string(),
//!     }],
//!     nameservers: vec![],
//! };
//! let created = registry.create_domain(&request).await?;
//! println!("registered at {}", created.created_at);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, RegistryError>`](RegistryError). The
//! error enum separates transient transport failures from semantic registry
//! answers:
//!
//! - [`RegistryError::Network`], [`RegistryError::Timeout`],
//!   [`RegistryError::RateLimited`] — transient, retryable, never a statement
//!   about the domain
//! - [`RegistryError::ObjectExists`] — the name is already registered (2302)
//! - [`RegistryError::ObjectNotFound`] — the name is not registered (2303)
//! - [`RegistryError::AuthorizationDenied`] — wrong registrar for the object (2201)
//!
//! Callers branch on [`RegistryError::is_retryable`] before touching local
//! state.

mod error;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{RegistryError, Result};

// Re-export core trait
pub use traits::RegistryClient;

// Re-export types
pub use types::{
    ContactKind, CreateDomainRequest, CreatedDomain, DomainAvailability, DomainChanges,
    DomainContact, DomainName, DomainNameError, Nameserver, RegistryDomainInfo, RegistryStatus,
};

// Re-export utils module
pub use utils::datetime;
