//! Policy-aware entry point for the account-linking workflow.
//!
//! [`OidcLinker`] checks the deployment policy from
//! [`OidcCredentialsConfig`] before delegating to the credential operations in
//! [`builder`](super::builder) and [`linking`](super::linking).
//!
//! # Example
//!
//! ```
//! use octofhir_identity::config::OidcCredentialsConfig;
//! use octofhir_identity::oidc::{OidcLinker, ProviderTokens};
//!
//! let config = OidcCredentialsConfig {
//!     allowed_providers: vec!["google".to_string(), "github".to_string()],
//!     ..Default::default()
//! };
//! let linker = OidcLinker::new(config)?;
//!
//! let mut credential = linker.new_credential(
//!     ProviderTokens::new("idt", "acc", "ref"),
//!     "google",
//!     "u-1",
//!     None,
//! )?;
//! linker.link_provider(&mut credential, ProviderTokens::default(), "github", "gh-7", None)?;
//!
//! assert!(linker
//!     .link_provider(&mut credential, ProviderTokens::default(), "okta", "o-1", None)
//!     .is_err());
//! # Ok::<(), octofhir_identity::IdentityError>(())
//! ```

use super::builder::new_oidc_credential;
use super::credentials::OidcCredentials;
use super::linking;
use super::provider::{ProviderLink, ProviderTokens};
use crate::config::OidcCredentialsConfig;
use crate::credential::Credential;
use crate::{IdentityError, IdentityResult};

/// Applies linking policy to `oidc` credential operations.
#[derive(Debug, Clone)]
pub struct OidcLinker {
    config: OidcCredentialsConfig,
}

impl OidcLinker {
    /// Creates a linker from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Configuration` if the configuration is invalid.
    pub fn new(config: OidcCredentialsConfig) -> IdentityResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &OidcCredentialsConfig {
        &self.config
    }

    fn check_provider(&self, provider: &str) -> IdentityResult<()> {
        if !self.config.is_provider_allowed(provider) {
            tracing::warn!(provider = %provider, "Rejected link for disallowed provider");
            return Err(IdentityError::validation(format!(
                "provider '{}' is not allowed",
                provider
            )));
        }
        Ok(())
    }

    /// Creates a new `oidc` credential for a first-time link.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Validation` for a disallowed provider or an
    /// empty provider/subject.
    pub fn new_credential(
        &self,
        tokens: ProviderTokens,
        provider: &str,
        subject: &str,
        organization: Option<&str>,
    ) -> IdentityResult<Credential> {
        self.check_provider(provider)?;
        new_oidc_credential(tokens, provider, subject, organization)
    }

    /// Links an additional provider to an existing credential.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Validation` for a disallowed provider or when
    /// the identity already has `max_linked_providers` links, plus the errors
    /// of [`linking::link_additional_provider`]. An already linked pair is
    /// reported as `IdentityError::DuplicateLink` even at the limit.
    pub fn link_provider(
        &self,
        credential: &mut Credential,
        tokens: ProviderTokens,
        provider: &str,
        subject: &str,
        organization: Option<&str>,
    ) -> IdentityResult<()> {
        self.check_provider(provider)?;

        let creds = OidcCredentials::from_credential(credential)?;
        if creds.find(provider, subject).is_some() {
            return Err(IdentityError::duplicate_link(provider, subject));
        }

        let linked = creds.len();
        if linked >= self.config.max_linked_providers {
            tracing::warn!(
                provider = %provider,
                linked,
                max = self.config.max_linked_providers,
                "Rejected link: provider limit reached"
            );
            return Err(IdentityError::validation(format!(
                "identity already has the maximum of {} linked providers",
                self.config.max_linked_providers
            )));
        }

        linking::link_additional_provider(credential, tokens, provider, subject, organization)
    }

    /// Stores refreshed tokens for an existing link.
    ///
    /// Refreshes are not subject to the provider allow-list so that links made
    /// before a policy change keep working.
    ///
    /// # Errors
    ///
    /// See [`linking::refresh_provider_tokens`].
    pub fn refresh_tokens(
        &self,
        credential: &mut Credential,
        provider: &str,
        subject: &str,
        tokens: ProviderTokens,
    ) -> IdentityResult<()> {
        linking::refresh_provider_tokens(credential, provider, subject, tokens)
    }

    /// Removes a provider link.
    ///
    /// # Errors
    ///
    /// See [`linking::unlink_provider`].
    pub fn unlink_provider(
        &self,
        credential: &mut Credential,
        provider: &str,
        subject: &str,
    ) -> IdentityResult<ProviderLink> {
        linking::unlink_provider(credential, provider, subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linker(allowed: &[&str], max: usize) -> OidcLinker {
        OidcLinker::new(OidcCredentialsConfig {
            allowed_providers: allowed.iter().map(|p| p.to_string()).collect(),
            max_linked_providers: max,
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = OidcLinker::new(OidcCredentialsConfig {
            max_linked_providers: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, IdentityError::Configuration { .. }));
    }

    #[test]
    fn test_new_credential_disallowed_provider() {
        let linker = linker(&["google"], 4);
        let err = linker
            .new_credential(ProviderTokens::default(), "github", "u-1", None)
            .unwrap_err();
        assert!(matches!(err, IdentityError::Validation { .. }));
        assert!(err.to_string().contains("github"));
    }

    #[test]
    fn test_new_credential_allowed_provider() {
        let linker = linker(&["google"], 4);
        let credential = linker
            .new_credential(ProviderTokens::default(), "google", "u-1", None)
            .unwrap();
        assert!(credential.has_identifier("google:u-1"));
    }

    #[test]
    fn test_link_provider_limit() {
        let linker = linker(&[], 2);
        let mut credential = linker
            .new_credential(ProviderTokens::default(), "google", "u-1", None)
            .unwrap();
        linker
            .link_provider(&mut credential, ProviderTokens::default(), "github", "u-2", None)
            .unwrap();

        let before = credential.clone();
        let err = linker
            .link_provider(&mut credential, ProviderTokens::default(), "okta", "u-3", None)
            .unwrap_err();
        assert!(matches!(err, IdentityError::Validation { .. }));
        assert_eq!(credential, before);
    }

    #[test]
    fn test_link_provider_duplicate_at_limit() {
        let linker = linker(&[], 1);
        let mut credential = linker
            .new_credential(ProviderTokens::default(), "google", "u-1", None)
            .unwrap();

        let err = linker
            .link_provider(&mut credential, ProviderTokens::default(), "google", "u-1", None)
            .unwrap_err();
        assert!(matches!(err, IdentityError::DuplicateLink { .. }));

        let err = linker
            .link_provider(&mut credential, ProviderTokens::default(), "github", "u-2", None)
            .unwrap_err();
        assert!(matches!(err, IdentityError::Validation { .. }));
    }

    #[test]
    fn test_refresh_and_unlink() {
        let linker = linker(&[], 4);
        let mut credential = linker
            .new_credential(ProviderTokens::new("i", "a", "r"), "google", "u-1", None)
            .unwrap();

        linker
            .refresh_tokens(
                &mut credential,
                "google",
                "u-1",
                ProviderTokens::new("i2", "a2", "r2"),
            )
            .unwrap();
        let creds = OidcCredentials::from_credential(&credential).unwrap();
        assert_eq!(creds.providers()[0].current_access_token(), "a2");
        assert_eq!(creds.providers()[0].initial_access_token(), "a");

        let removed = linker.unlink_provider(&mut credential, "google", "u-1").unwrap();
        assert_eq!(removed.subject(), "u-1");
        assert!(credential.identifiers.is_empty());
    }
}
