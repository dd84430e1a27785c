//! Provider link types.
//!
//! A [`ProviderLink`] connects a local identity to one account at an external
//! OpenID Connect provider and carries the tokens obtained from it.
//!
//! Tokens captured when the link is created are kept as the *initial* tokens
//! and can never be changed afterwards. The *current* tokens start out equal
//! to the initial ones and are replaced on every refresh via
//! [`ProviderLink::rotate_tokens`].
//!
//! # Example
//!
//! ```
//! use octofhir_identity::oidc::{ProviderLink, ProviderTokens};
//!
//! let mut link = ProviderLink::new(
//!     "google",
//!     "abc123",
//!     ProviderTokens::new("id-1", "access-1", "refresh-1"),
//!     None,
//! )?;
//! link.rotate_tokens(ProviderTokens::new("id-2", "access-2", "refresh-2"));
//!
//! assert_eq!(link.initial_access_token(), "access-1");
//! assert_eq!(link.current_access_token(), "access-2");
//! # Ok::<(), octofhir_identity::IdentityError>(())
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use super::canonical::canonical_id;
use crate::{IdentityError, IdentityResult};

/// Token triple returned by an OIDC token exchange or refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderTokens {
    /// The ID token.
    pub id_token: String,
    /// The access token.
    pub access_token: String,
    /// The refresh token (may be empty if the provider issued none).
    pub refresh_token: String,
}

impl ProviderTokens {
    /// Creates a token triple.
    #[must_use]
    pub fn new(
        id_token: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            id_token: id_token.into(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Rejects empty `provider`/`subject` values in stored payloads.
fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(D::Error::custom("provider and subject must not be empty"));
    }
    Ok(value)
}

/// Treats an empty organization the same as a missing one.
fn deserialize_organization<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|org| !org.is_empty()))
}

/// One external provider account linked to a local identity.
///
/// Serializes to the persisted payload shape:
///
/// ```json
/// {
///   "subject": "abc123",
///   "provider": "google",
///   "initial_id_token": "...",
///   "initial_access_token": "...",
///   "initial_refresh_token": "...",
///   "current_id_token": "...",
///   "current_access_token": "...",
///   "current_refresh_token": "...",
///   "organization": "org-x"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderLink {
    #[serde(deserialize_with = "deserialize_non_empty")]
    subject: String,
    #[serde(deserialize_with = "deserialize_non_empty")]
    provider: String,

    #[serde(default)]
    initial_id_token: String,
    #[serde(default)]
    initial_access_token: String,
    #[serde(default)]
    initial_refresh_token: String,

    #[serde(default)]
    current_id_token: String,
    #[serde(default)]
    current_access_token: String,
    #[serde(default)]
    current_refresh_token: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_organization"
    )]
    organization: Option<String>,
}

impl ProviderLink {
    /// Creates a new link from a fresh token exchange.
    ///
    /// Initial and current tokens are both set to `tokens`. An empty
    /// `organization` is stored as absent.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Validation` if `provider` or `subject` is empty.
    pub fn new(
        provider: impl Into<String>,
        subject: impl Into<String>,
        tokens: ProviderTokens,
        organization: Option<String>,
    ) -> IdentityResult<Self> {
        let provider = provider.into();
        let subject = subject.into();

        if provider.is_empty() {
            return Err(IdentityError::validation(
                "received empty provider in oidc credentials",
            ));
        }
        if subject.is_empty() {
            return Err(IdentityError::validation(
                "received empty subject in oidc credentials",
            ));
        }

        let ProviderTokens {
            id_token,
            access_token,
            refresh_token,
        } = tokens;

        Ok(Self {
            subject,
            provider,
            initial_id_token: id_token.clone(),
            initial_access_token: access_token.clone(),
            initial_refresh_token: refresh_token.clone(),
            current_id_token: id_token,
            current_access_token: access_token,
            current_refresh_token: refresh_token,
            organization: organization.filter(|org| !org.is_empty()),
        })
    }

    /// Replaces the current tokens after a successful refresh.
    ///
    /// Initial tokens are left untouched.
    pub fn rotate_tokens(&mut self, tokens: ProviderTokens) {
        self.current_id_token = tokens.id_token;
        self.current_access_token = tokens.access_token;
        self.current_refresh_token = tokens.refresh_token;
    }

    /// Checks if this link matches the given provider and subject.
    #[must_use]
    pub fn matches(&self, provider: &str, subject: &str) -> bool {
        self.provider == provider && self.subject == subject
    }

    /// Returns the store-wide identifier of this link.
    #[must_use]
    pub fn canonical_id(&self) -> String {
        canonical_id(&self.provider, &self.subject)
    }

    /// The provider-issued subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The provider connection name.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// The enterprise-SSO organization, if any.
    #[must_use]
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    #[must_use]
    pub fn initial_id_token(&self) -> &str {
        &self.initial_id_token
    }

    #[must_use]
    pub fn initial_access_token(&self) -> &str {
        &self.initial_access_token
    }

    #[must_use]
    pub fn initial_refresh_token(&self) -> &str {
        &self.initial_refresh_token
    }

    #[must_use]
    pub fn current_id_token(&self) -> &str {
        &self.current_id_token
    }

    #[must_use]
    pub fn current_access_token(&self) -> &str {
        &self.current_access_token
    }

    #[must_use]
    pub fn current_refresh_token(&self) -> &str {
        &self.current_refresh_token
    }

    /// Returns a copy of the tokens captured when the link was created.
    #[must_use]
    pub fn initial_tokens(&self) -> ProviderTokens {
        ProviderTokens::new(
            &self.initial_id_token,
            &self.initial_access_token,
            &self.initial_refresh_token,
        )
    }

    /// Returns a copy of the latest known tokens.
    #[must_use]
    pub fn current_tokens(&self) -> ProviderTokens {
        ProviderTokens::new(
            &self.current_id_token,
            &self.current_access_token,
            &self.current_refresh_token,
        )
    }
}
