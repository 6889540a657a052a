//! Invitation and per-domain record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an invitation is still waiting for its user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Waiting for a user with the invited email to log in.
    Invited,
    /// Consumed by a login; the role has been granted.
    Retrieved,
}

/// A standing invitation to manage a domain, keyed by email.
///
/// Created when access is granted to an address with no matching user yet.
/// The first login with that email consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInvitation {
    /// Invitation ID
    pub id: Uuid,
    /// Invited email, normalized lowercase
    pub email: String,
    /// Domain the invitation grants access to
    pub domain_id: Uuid,
    /// Domain name, denormalized for matching against staged legacy rows
    pub domain_name: String,
    /// Whether the invitation has been consumed
    pub status: InvitationStatus,
    /// Record creation time
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

impl DomainInvitation {
    /// Creates a pending invitation.
    #[must_use]
    pub fn new(email: &str, domain_id: Uuid, domain_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            domain_id,
            domain_name: domain_name.into(),
            status: InvitationStatus::Invited,
            created_at: Utc::now(),
        }
    }
}

/// Organization-level record attached to a materialized domain.
///
/// Exactly one per domain; created at approval or when the first invited user
/// logs in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInformation {
    /// Record ID
    pub id: Uuid,
    /// Domain the record belongs to
    pub domain_id: Uuid,
    /// User the record is attributed to
    pub creator: Uuid,
    /// Organization behind the domain, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// Record creation time
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

impl DomainInformation {
    /// Creates the record for a domain.
    #[must_use]
    pub fn new(domain_id: Uuid, creator: Uuid, organization_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain_id,
            creator,
            organization_name,
            created_at: Utc::now(),
        }
    }
}
