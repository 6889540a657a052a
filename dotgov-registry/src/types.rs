//! Wire-level types shared by every registry client implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============ Domain names ============

/// Maximum total length of a domain name, in octets.
const MAX_NAME_LENGTH: usize = 253;

/// Maximum length of a single label.
const MAX_LABEL_LENGTH: usize = 63;

/// Validation error for [`DomainName`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DomainNameError {
    /// The name is empty after trimming.
    #[error("Domain name is empty")]
    Empty,

    /// The name contains non-ASCII characters.
    #[error("Domain name '{name}' contains non-ASCII characters")]
    NotAscii { name: String },

    /// The name exceeds the maximum total length.
    #[error("Domain name is too long ({length} characters)")]
    TooLong { length: usize },

    /// A label is empty, too long, or contains an invalid character.
    #[error("Invalid label '{label}' in domain name")]
    InvalidLabel { label: String },

    /// The name does not end in `.gov`.
    #[error("Domain name '{name}' must end in .gov")]
    MissingGovSuffix { name: String },
}

/// A validated, normalized `.gov` domain name.
///
/// Construction normalizes the input (trim, lowercase, strip one trailing dot)
/// and enforces the registry's naming rules: ASCII only, at most 253 octets,
/// labels of 1–63 alphanumeric-or-hyphen characters that neither start nor end
/// with a hyphen, and a final `.gov` label preceded by at least one more label.
///
/// Deserialization goes through the same validation, so a `DomainName` held
/// anywhere in the system is known to be well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Parses and normalizes a domain name.
    pub fn parse(input: &str) -> std::result::Result<Self, DomainNameError> {
        let trimmed = input.trim().trim_end_matches('.');
        if trimmed.is_empty() {
            return Err(DomainNameError::Empty);
        }
        if !trimmed.is_ascii() {
            return Err(DomainNameError::NotAscii {
                name: trimmed.to_string(),
            });
        }

        let name = trimmed.to_ascii_lowercase();
        if name.len() > MAX_NAME_LENGTH {
            return Err(DomainNameError::TooLong { length: name.len() });
        }

        let labels: Vec<&str> = name.split('.').collect();
        for label in &labels {
            let valid_chars = label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
            if label.is_empty()
                || label.len() > MAX_LABEL_LENGTH
                || !valid_chars
                || label.starts_with('-')
                || label.ends_with('-')
            {
                return Err(DomainNameError::InvalidLabel {
                    label: (*label).to_string(),
                });
            }
        }

        if labels.len() < 2 || labels[labels.len() - 1] != "gov" {
            return Err(DomainNameError::MissingGovSuffix { name });
        }

        Ok(Self(name))
    }

    /// The normalized name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DomainName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DomainName {
    type Err = DomainNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DomainName {
    type Error = DomainNameError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DomainName> for String {
    fn from(name: DomainName) -> Self {
        name.0
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============ Registry statuses & contacts ============

/// Status flags a domain object can carry at the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistryStatus {
    /// No restrictions.
    Ok,
    /// Registered but not yet delegated (no usable nameservers).
    Inactive,
    /// Hold placed by the registrar; the domain does not resolve.
    ClientHold,
    /// Hold placed by the registry operator.
    ServerHold,
    /// Creation is pending.
    PendingCreate,
    /// Deletion is pending.
    PendingDelete,
}

/// Role a contact plays on a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Registrant,
    Administrative,
    Technical,
    Security,
}

/// A contact attached to a domain object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainContact {
    /// Contact role.
    pub kind: ContactKind,
    /// Contact email address.
    pub email: String,
}

/// A nameserver delegation, optionally with glue addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nameserver {
    /// Fully qualified host name.
    pub host: String,
    /// Glue addresses, required only for in-bailiwick hosts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<String>,
}

impl Nameserver {
    /// Creates a nameserver entry without glue addresses.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            addresses: Vec::new(),
        }
    }
}

// ============ Commands ============

/// Request to register a new domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDomainRequest {
    /// Domain to register.
    pub name: DomainName,
    /// Contacts to attach at creation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<DomainContact>,
    /// Initial nameserver delegations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<Nameserver>,
}

/// A set of changes to apply to a domain object.
///
/// Empty collections and `None` fields leave the corresponding aspect of the
/// object untouched, so a single update command can adjust statuses, contacts,
/// and delegations independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainChanges {
    /// Status flags to add.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_statuses: Vec<RegistryStatus>,
    /// Status flags to remove.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_statuses: Vec<RegistryStatus>,
    /// Replacement contact set, if contacts are changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_contacts: Option<Vec<DomainContact>>,
    /// Replacement delegation set, if nameservers are changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_nameservers: Option<Vec<Nameserver>>,
}

impl DomainChanges {
    /// Changes that add a single status flag.
    #[must_use]
    pub fn add_status(status: RegistryStatus) -> Self {
        Self {
            add_statuses: vec![status],
            ..Self::default()
        }
    }

    /// Changes that remove a single status flag.
    #[must_use]
    pub fn remove_status(status: RegistryStatus) -> Self {
        Self {
            remove_statuses: vec![status],
            ..Self::default()
        }
    }
}

// ============ Responses ============

/// Availability answer for a single name from a check command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAvailability {
    /// The name that was checked.
    pub name: DomainName,
    /// Whether the name can be registered.
    pub available: bool,
    /// Registry-supplied reason when unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response to a successful create command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDomain {
    /// The registered name.
    pub name: DomainName,
    /// Creation date recorded by the registry.
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

/// Full object state returned by an info command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryDomainInfo {
    /// The queried name.
    pub name: DomainName,
    /// Status flags currently on the object.
    #[serde(default)]
    pub statuses: Vec<RegistryStatus>,
    /// Creation date, when disclosed.
    #[serde(default, with = "crate::utils::datetime::option")]
    pub created_at: Option<DateTime<Utc>>,
    /// Expiration date, when disclosed.
    #[serde(default, with = "crate::utils::datetime::option")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Current delegations.
    #[serde(default)]
    pub nameservers: Vec<Nameserver>,
    /// Contacts attached to the object.
    #[serde(default)]
    pub contacts: Vec<DomainContact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_trailing_dot() {
        let name = DomainName::parse(" City.GOV. ").unwrap();
        assert_eq!(name.as_str(), "city.gov");
    }

    #[test]
    fn parse_accepts_nested_labels() {
        let name = DomainName::parse("water.anytown.gov").unwrap();
        assert_eq!(name.as_str(), "water.anytown.gov");
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(DomainName::parse("  "), Err(DomainNameError::Empty));
    }

    #[test]
    fn parse_rejects_non_gov() {
        assert!(matches!(
            DomainName::parse("city.com"),
            Err(DomainNameError::MissingGovSuffix { .. })
        ));
    }

    #[test]
    fn parse_rejects_bare_gov() {
        assert!(matches!(
            DomainName::parse("gov"),
            Err(DomainNameError::MissingGovSuffix { .. })
        ));
    }

    #[test]
    fn parse_rejects_hyphen_at_label_edge() {
        assert!(matches!(
            DomainName::parse("-city.gov"),
            Err(DomainNameError::InvalidLabel { .. })
        ));
        assert!(matches!(
            DomainName::parse("city-.gov"),
            Err(DomainNameError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn parse_rejects_invalid_characters() {
        assert!(matches!(
            DomainName::parse("city_hall.gov"),
            Err(DomainNameError::InvalidLabel { .. })
        ));
        assert!(matches!(
            DomainName::parse("stadt.göv"),
            Err(DomainNameError::NotAscii { .. })
        ));
    }

    #[test]
    fn parse_rejects_oversized_label() {
        let label = "a".repeat(64);
        assert!(matches!(
            DomainName::parse(&format!("{label}.gov")),
            Err(DomainNameError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn parse_rejects_empty_label() {
        assert!(matches!(
            DomainName::parse("city..gov"),
            Err(DomainNameError::InvalidLabel { .. })
        ));
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: DomainName = serde_json::from_str("\"Parks.GOV\"").unwrap();
        assert_eq!(ok.as_str(), "parks.gov");

        let bad = serde_json::from_str::<DomainName>("\"parks.com\"");
        assert!(bad.is_err());
    }

    #[test]
    fn registry_status_uses_epp_names() {
        let json = serde_json::to_string(&RegistryStatus::ClientHold).unwrap();
        assert_eq!(json, "\"clientHold\"");

        let back: RegistryStatus = serde_json::from_str("\"serverHold\"").unwrap();
        assert_eq!(back, RegistryStatus::ServerHold);
    }

    #[test]
    fn domain_changes_default_is_empty() {
        let changes = DomainChanges::default();
        assert!(changes.add_statuses.is_empty());
        assert!(changes.remove_statuses.is_empty());
        assert!(changes.set_contacts.is_none());
        assert!(changes.set_nameservers.is_none());
    }

    #[test]
    fn domain_changes_helpers_set_one_flag() {
        let add = DomainChanges::add_status(RegistryStatus::ClientHold);
        assert_eq!(add.add_statuses, vec![RegistryStatus::ClientHold]);
        assert!(add.remove_statuses.is_empty());

        let remove = DomainChanges::remove_status(RegistryStatus::ClientHold);
        assert_eq!(remove.remove_statuses, vec![RegistryStatus::ClientHold]);
    }
}
