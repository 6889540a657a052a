use serde::{Deserialize, Serialize};

/// Unified error type for all registry operations.
///
/// Variants carry the context needed to act on the failure: the domain name
/// for object-level errors, the offending parameter for policy errors, and the
/// raw registry result code where one was reported. All variants are
/// serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on
/// retry and carry no semantic meaning about the domain:
/// - [`Network`](Self::Network) — connectivity issues
/// - [`Timeout`](Self::Timeout) — the command timed out
/// - [`RateLimited`](Self::RateLimited) — command volume exceeded
///
/// Callers must never mutate local state in response to a transient error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RegistryError {
    /// A network-level error occurred (connection refused, broken session, etc.).
    ///
    /// This is a transient error.
    Network {
        /// Error details.
        detail: String,
    },

    /// The command timed out before the registry answered.
    ///
    /// This is a transient error.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The registry throttled the session (command volume exceeded).
    ///
    /// This is a transient error. The command should succeed after waiting.
    RateLimited {
        /// Suggested wait time in seconds before retrying, if reported.
        retry_after: Option<u64>,
    },

    /// The domain already exists at the registry (result code 2302).
    ObjectExists {
        /// Name of the conflicting domain.
        name: String,
    },

    /// The domain does not exist at the registry (result code 2303).
    ObjectNotFound {
        /// Name of the missing domain.
        name: String,
    },

    /// The registrar is not authorized for this object (result code 2201).
    AuthorizationDenied {
        /// Original message from the registry, if available.
        raw_message: Option<String>,
    },

    /// A command parameter violates registry policy (result code 2306).
    ParameterPolicy {
        /// Name of the offending parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The registry rejected the command (result code 2400 or similar).
    CommandFailed {
        /// Raw result code, if reported.
        code: Option<u16>,
        /// Error details.
        detail: String,
    },

    /// An unrecognized error from the registry.
    ///
    /// This is a catch-all for result codes not yet mapped to a specific variant.
    Unknown {
        /// Raw result code, if available.
        raw_code: Option<u16>,
        /// Raw error message.
        raw_message: String,
    },
}

impl RegistryError {
    /// Whether the failure is transient and the command may be retried as-is.
    ///
    /// Retryable errors say nothing about the domain; local state must not
    /// change in response to one.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// 是否为预期的语义结果（对象状态、授权、策略等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::ObjectExists { .. }
                | Self::ObjectNotFound { .. }
                | Self::AuthorizationDenied { .. }
                | Self::ParameterPolicy { .. }
        )
    }

    /// The registry result code associated with the error, when one applies.
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::ObjectExists { .. } => Some(2302),
            Self::ObjectNotFound { .. } => Some(2303),
            Self::AuthorizationDenied { .. } => Some(2201),
            Self::ParameterPolicy { .. } => Some(2306),
            Self::CommandFailed { code, .. } => code.or(Some(2400)),
            Self::Unknown { raw_code, .. } => *raw_code,
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimited { .. } => None,
        }
    }
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { detail } => {
                write!(f, "Network error: {detail}")
            }
            Self::Timeout { detail } => {
                write!(f, "Command timeout: {detail}")
            }
            Self::RateLimited { retry_after } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::ObjectExists { name } => {
                write!(f, "Domain '{name}' already exists")
            }
            Self::ObjectNotFound { name } => {
                write!(f, "Domain '{name}' does not exist")
            }
            Self::AuthorizationDenied { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Authorization error: {msg}")
                } else {
                    write!(f, "Authorization error")
                }
            }
            Self::ParameterPolicy { param, detail } => {
                write!(f, "Parameter '{param}' violates policy: {detail}")
            }
            Self::CommandFailed { code, detail } => {
                if let Some(code) = code {
                    write!(f, "Command failed ({code}): {detail}")
                } else {
                    write!(f, "Command failed: {detail}")
                }
            }
            Self::Unknown { raw_message, .. } => {
                write!(f, "{raw_message}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Malformed names surface as a policy error on the `name` parameter, so `?`
/// works in call sites that parse names on the way to the registry.
impl From<crate::types::DomainNameError> for RegistryError {
    fn from(err: crate::types::DomainNameError) -> Self {
        Self::ParameterPolicy {
            param: "name".to_string(),
            detail: err.to_string(),
        }
    }
}

/// Convenience type alias for `Result<T, RegistryError>`.
pub type Result<T> = std::result::Result<T, RegistryError>;
