//! Identity credential error types.
//!
//! This module defines the errors that can occur while building, decoding
//! and mutating federated credentials.

use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur during credential linking operations.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The linking request carries invalid input (e.g. an empty subject).
    #[error("Validation error: {message}")]
    Validation {
        /// Description of why the input is invalid.
        message: String,
    },

    /// The provider/subject pair is already linked to this identity.
    #[error("Provider already linked: {provider}:{subject}")]
    DuplicateLink {
        /// The provider connection name.
        provider: String,
        /// The provider-issued subject.
        subject: String,
    },

    /// No link exists for the provider/subject pair.
    #[error("Provider link not found: {provider}:{subject}")]
    LinkNotFound {
        /// The provider connection name.
        provider: String,
        /// The provider-issued subject.
        subject: String,
    },

    /// The credential record is of a different type than expected.
    #[error("Credential type mismatch: expected {expected}, got {actual}")]
    CredentialTypeMismatch {
        /// The expected credential type.
        expected: String,
        /// The actual credential type.
        actual: String,
    },

    /// The stored configuration payload cannot be decoded.
    #[error("Malformed credential configuration: {0}")]
    MalformedConfig(#[from] serde_json::Error),

    /// The credentials configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An internal invariant was violated. This is a defect, not bad input.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },
}

impl IdentityError {
    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new `DuplicateLink` error.
    #[must_use]
    pub fn duplicate_link(provider: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::DuplicateLink {
            provider: provider.into(),
            subject: subject.into(),
        }
    }

    /// Creates a new `LinkNotFound` error.
    #[must_use]
    pub fn link_not_found(provider: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::LinkNotFound {
            provider: provider.into(),
            subject: subject.into(),
        }
    }

    /// Creates a new `CredentialTypeMismatch` error.
    #[must_use]
    pub fn type_mismatch(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::CredentialTypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the caller should reject the request and surface
    /// the error to the user.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::DuplicateLink { .. }
                | Self::LinkNotFound { .. }
                | Self::CredentialTypeMismatch { .. }
        )
    }

    /// Returns `true` if this is a server-side failure.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedConfig(_) | Self::Configuration { .. } | Self::Internal { .. }
        )
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::DuplicateLink { .. } => ErrorCategory::Linking,
            Self::LinkNotFound { .. } => ErrorCategory::Linking,
            Self::CredentialTypeMismatch { .. } => ErrorCategory::Data,
            Self::MalformedConfig(_) => ErrorCategory::Data,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<ConfigError> for IdentityError {
    fn from(err: ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}

/// Categories of identity errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Invalid linking input.
    Validation,
    /// Conflicts or misses against the existing linked-provider set.
    Linking,
    /// Stored credential data that cannot be interpreted.
    Data,
    /// Configuration errors.
    Configuration,
    /// Invariant violations.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Linking => write!(f, "linking"),
            Self::Data => write!(f, "data"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
