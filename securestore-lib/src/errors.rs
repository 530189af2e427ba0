//! Error types for secure storage operations.
//!
//! Errors raised before dispatch (`InvalidArgument`, `InvalidEnumValue`) are
//! local. Everything the host reports is surfaced as `Remote` with the host's
//! message; the platform-specific cause (keychain denial, biometric failure,
//! corrupted storage) is opaque at this layer.

use crate::channel::StorageMethod;

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StorageErrorCode {
    /// Argument rejected before dispatch
    InvalidArgument = 1000,
    /// Unknown enumeration string
    InvalidEnumValue = 1001,
    /// Options could not be serialized or parsed
    Serialization = 2000,
    /// No reply before the deadline
    Timeout = 3000,
    /// Remote side reported a failure
    Remote = 4000,
    /// Reply shape did not match the operation
    UnexpectedReply = 4001,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Error type for secure storage operations.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// Argument rejected locally; nothing was dispatched.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Argument name
        field: &'static str,
        /// Reason for rejection
        reason: String,
    },

    /// String does not name a member of the enumeration.
    #[error("'{value}' is not a valid {kind}")]
    InvalidEnumValue {
        /// Enumeration name
        kind: &'static str,
        /// Offending string
        value: String,
    },

    /// Options serialization (or configuration parsing) failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The remote reply did not arrive in time.
    #[error("{method} timed out after {timeout_ms}ms")]
    Timeout {
        /// Operation that timed out
        method: StorageMethod,
        /// Deadline in milliseconds
        timeout_ms: u64,
    },

    /// The remote side reported a failure.
    #[error("{method} failed on host: {message}")]
    Remote {
        /// Operation that failed
        method: StorageMethod,
        /// Message reported by the host
        message: String,
    },

    /// The remote reply has the wrong shape for the operation.
    ///
    /// Only the JSON kind is kept; the reply may hold stored values.
    #[error("unexpected reply to {method}: got {found}")]
    UnexpectedReply {
        /// Operation that received the reply
        method: StorageMethod,
        /// Kind of the offending reply, and the entry key for `get_all`
        found: String,
    },

    /// Internal/unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> StorageErrorCode {
        match self {
            Self::InvalidArgument { .. } => StorageErrorCode::InvalidArgument,
            Self::InvalidEnumValue { .. } => StorageErrorCode::InvalidEnumValue,
            Self::Serialization(_) => StorageErrorCode::Serialization,
            Self::Timeout { .. } => StorageErrorCode::Timeout,
            Self::Remote { .. } => StorageErrorCode::Remote,
            Self::UnexpectedReply { .. } => StorageErrorCode::UnexpectedReply,
            Self::Internal(_) => StorageErrorCode::Internal,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if the caller may reasonably retry.
    ///
    /// Advisory only; this crate never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Remote { .. })
    }

    /// Returns true if the error was raised before anything was dispatched.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::InvalidEnumValue { .. } | Self::Serialization(_)
        )
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid enum value error.
    pub fn invalid_enum_value(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnumValue {
            kind,
            value: value.into(),
        }
    }

    pub(crate) fn unexpected_reply(method: StorageMethod, reply: &serde_json::Value) -> Self {
        Self::UnexpectedReply {
            method,
            found: json_kind(reply).to_string(),
        }
    }

    pub(crate) fn unexpected_entry(
        method: StorageMethod,
        key: &str,
        value: &serde_json::Value,
    ) -> Self {
        Self::UnexpectedReply {
            method,
            found: format!("{} for key '{}'", json_kind(value), key),
        }
    }
}

/// Article-prefixed name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
