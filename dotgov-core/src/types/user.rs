//! User and access types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account standing of a portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Normal standing.
    Active,
    /// Barred after an ineligible request; ordinary request actions are denied.
    Restricted,
}

/// A portal user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID
    pub id: Uuid,
    /// Login name
    pub username: String,
    /// Email address, normalized lowercase
    pub email: String,
    /// Account standing
    pub status: UserStatus,
    /// Record creation time
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates an active user. The email is normalized to lowercase so
    /// invitation matching stays case-insensitive.
    #[must_use]
    pub fn new(username: impl Into<String>, email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.trim().to_lowercase(),
            status: UserStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Whether ordinary request actions are denied for this user.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.status == UserStatus::Restricted
    }
}

/// Role a user holds on a domain.
///
/// Access is modeled as standalone link rows rather than user subtypes, so a
/// user can hold any number of roles and a domain any number of managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainRole {
    /// Full management of the domain.
    Manager,
}

/// Grant of a [`DomainRole`] to a user on a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDomainRole {
    /// Grant ID
    pub id: Uuid,
    /// Holder of the role
    pub user_id: Uuid,
    /// Domain the role applies to
    pub domain_id: Uuid,
    /// Granted role
    pub role: DomainRole,
    /// Record creation time
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

impl UserDomainRole {
    /// Grants the manager role.
    #[must_use]
    pub fn manager(user_id: Uuid, domain_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            domain_id,
            role: DomainRole::Manager,
            created_at: Utc::now(),
        }
    }
}
