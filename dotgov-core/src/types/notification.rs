//! Outbound notification types

use serde::{Deserialize, Serialize};

/// The notifications the registrar sends.
///
/// Each kind maps to a fixed subject line and body template; the dispatcher
/// only needs the kind, the recipient, and a template context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    /// A request reached the review team for the first time.
    SubmissionReceived,
    /// A request was approved.
    ApplicationApproved,
    /// A request was rejected.
    ApplicationRejected,
    /// A request was withdrawn by its creator.
    ApplicationWithdrawn,
    /// An email address was invited to manage a domain.
    DomainInvitation,
}

impl NotificationKind {
    /// Subject line for the email.
    #[must_use]
    pub fn subject(&self) -> &'static str {
        match self {
            Self::SubmissionReceived => "We received your .gov domain request.",
            Self::ApplicationApproved => {
                "Congratulations! Your .gov domain request has been approved."
            }
            Self::ApplicationRejected => "Your .gov domain request has been rejected.",
            Self::ApplicationWithdrawn => {
                "Your .gov domain request has been withdrawn and will not be reviewed by our team."
            }
            Self::DomainInvitation => "You have been invited to manage a .gov domain.",
        }
    }

    /// Body template identifier.
    #[must_use]
    pub fn template(&self) -> &'static str {
        match self {
            Self::SubmissionReceived => "emails/submission_confirmation.txt",
            Self::ApplicationApproved => "emails/status_change_approved.txt",
            Self::ApplicationRejected => "emails/status_change_rejected.txt",
            Self::ApplicationWithdrawn => "emails/request_withdrawn.txt",
            Self::DomainInvitation => "emails/domain_invitation.txt",
        }
    }
}

/// A notification ready for dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// What happened
    pub kind: NotificationKind,
    /// Recipient email
    pub to: String,
    /// Template context (domain name, organization, etc.)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub context: serde_json::Value,
}

impl Notification {
    /// Creates a notification with an empty context.
    #[must_use]
    pub fn new(kind: NotificationKind, to: impl Into<String>) -> Self {
        Self {
            kind,
            to: to.into(),
            context: serde_json::Value::Null,
        }
    }

    /// Attaches a template context.
    #[must_use]
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}
