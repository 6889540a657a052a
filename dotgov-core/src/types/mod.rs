//! 类型定义模块

mod application;
mod domain;
mod invitation;
mod migration;
mod notification;
mod user;

pub use application::{Application, ApplicationStatus, RejectionReason};
pub use domain::{
    DeleteOutcome, Domain, DomainState, MIN_NAMESERVERS, REGISTRY_CACHE_TTL_SECS,
};
pub use invitation::{DomainInformation, DomainInvitation, InvitationStatus};
pub use migration::{
    InvitationSendReport, LoadReport, MigrationFiles, MigrationReport, TransferReport,
    TransitionDomain, TransitionStatus,
};
pub use notification::{Notification, NotificationKind};
pub use user::{DomainRole, User, UserDomainRole, UserStatus};

// Re-export registry 库的公共类型
pub use dotgov_registry::{
    ContactKind, CreateDomainRequest, CreatedDomain, DomainAvailability, DomainChanges,
    DomainContact, DomainName, DomainNameError, Nameserver, RegistryDomainInfo, RegistryStatus,
};
