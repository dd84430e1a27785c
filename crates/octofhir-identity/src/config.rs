//! OIDC credential linking configuration.
//!
//! Deployment policy applied by [`OidcLinker`](crate::oidc::OidcLinker) on
//! top of the pure credential operations.

use serde::{Deserialize, Serialize};

use crate::oidc::CANONICAL_ID_DELIMITER;

/// OIDC credential linking configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [oidc]
/// allowed_providers = ["google", "github", "okta-acme"]
/// max_linked_providers = 8
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OidcCredentialsConfig {
    /// Provider connection names that may be linked.
    /// An empty list allows any provider.
    pub allowed_providers: Vec<String>,

    /// Maximum number of provider links per identity.
    pub max_linked_providers: usize,
}

impl Default for OidcCredentialsConfig {
    fn default() -> Self {
        Self {
            allowed_providers: Vec::new(),
            max_linked_providers: 16,
        }
    }
}

/// Top-level file layout with an `[oidc]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    oidc: OidcCredentialsConfig,
}

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// The configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl OidcCredentialsConfig {
    /// Parses the `[oidc]` table of a TOML document and validates it.
    ///
    /// A document without an `[oidc]` table yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::InvalidValue` if validation fails.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)?;
        file.oidc.validate()?;
        Ok(file.oidc)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `max_linked_providers` is zero
    /// - an allowed provider name is empty
    /// - an allowed provider name contains the canonical identifier delimiter
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_linked_providers == 0 {
            return Err(ConfigError::InvalidValue(
                "max_linked_providers must be > 0".to_string(),
            ));
        }

        for provider in &self.allowed_providers {
            if provider.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "allowed_providers cannot contain an empty name".to_string(),
                ));
            }

            // "a:b" + "c" and "a" + "b:c" would share an identifier.
            if provider.contains(CANONICAL_ID_DELIMITER) {
                return Err(ConfigError::InvalidValue(format!(
                    "Invalid provider name: '{}'. Must not contain '{}'",
                    provider, CANONICAL_ID_DELIMITER
                )));
            }
        }

        Ok(())
    }

    /// Returns `true` if `provider` may be linked.
    #[must_use]
    pub fn is_provider_allowed(&self, provider: &str) -> bool {
        self.allowed_providers.is_empty() || self.allowed_providers.iter().any(|p| p == provider)
    }
}
