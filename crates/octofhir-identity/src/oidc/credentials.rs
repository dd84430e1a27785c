//! Linked-provider set stored in an `oidc` credential.

use serde::{Deserialize, Serialize};

use super::provider::{ProviderLink, ProviderTokens};
use crate::credential::{Credential, CredentialType};
use crate::{IdentityError, IdentityResult};

/// Configuration payload of an `oidc` credential.
///
/// Holds every external provider account linked to one identity, in the
/// order they were linked. Links are only added through
/// [`link_provider`](Self::link_provider), so a `(provider, subject)` pair
/// appears at most once unless a stored payload already holds duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcCredentials {
    #[serde(default)]
    providers: Vec<ProviderLink>,
}

impl OidcCredentials {
    /// Creates a set holding a single link.
    #[must_use]
    pub fn with_link(link: ProviderLink) -> Self {
        Self {
            providers: vec![link],
        }
    }

    /// Linked providers in link order.
    #[must_use]
    pub fn providers(&self) -> &[ProviderLink] {
        &self.providers
    }

    /// Returns the number of linked providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if no provider is linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Finds the index of the link for `provider` and `subject`.
    ///
    /// If the set holds duplicates, the first one in link order wins.
    #[must_use]
    pub fn find(&self, provider: &str, subject: &str) -> Option<usize> {
        self.providers
            .iter()
            .position(|p| p.matches(provider, subject))
    }

    /// Returns the link for `provider` and `subject`.
    #[must_use]
    pub fn get(&self, provider: &str, subject: &str) -> Option<&ProviderLink> {
        self.find(provider, subject).map(|k| &self.providers[k])
    }

    /// Returns the first non-empty organization in link order.
    ///
    /// There is no precedence between organization-scoped links; the earliest
    /// one wins.
    #[must_use]
    pub fn organization(&self) -> Option<&str> {
        self.providers.iter().find_map(|p| p.organization())
    }

    /// Returns the canonical identifiers of all links in link order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.providers.iter().map(ProviderLink::canonical_id).collect()
    }

    /// Appends a new link and returns its index.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::DuplicateLink` if the provider/subject pair is
    /// already linked.
    pub fn link_provider(&mut self, link: ProviderLink) -> IdentityResult<usize> {
        if self.find(link.provider(), link.subject()).is_some() {
            return Err(IdentityError::duplicate_link(link.provider(), link.subject()));
        }
        self.providers.push(link);
        Ok(self.providers.len() - 1)
    }

    /// Replaces the current tokens of an existing link.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::LinkNotFound` if no link matches.
    pub fn rotate_tokens(
        &mut self,
        provider: &str,
        subject: &str,
        tokens: ProviderTokens,
    ) -> IdentityResult<()> {
        let k = self
            .find(provider, subject)
            .ok_or_else(|| IdentityError::link_not_found(provider, subject))?;
        self.providers[k].rotate_tokens(tokens);
        Ok(())
    }

    /// Removes a link and returns it.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::LinkNotFound` if no link matches.
    pub fn unlink_provider(&mut self, provider: &str, subject: &str) -> IdentityResult<ProviderLink> {
        let k = self
            .find(provider, subject)
            .ok_or_else(|| IdentityError::link_not_found(provider, subject))?;
        Ok(self.providers.remove(k))
    }

    /// Serializes the set into a credential configuration payload.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Internal` if serialization fails. The payload
    /// shape is fixed, so this indicates a defect rather than bad input.
    pub fn encode(&self) -> IdentityResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            tracing::error!(error = %e, "Unable to encode oidc credentials to JSON");
            IdentityError::internal(format!("unable to encode oidc credentials to JSON: {e}"))
        })
    }

    /// Decodes a credential configuration payload.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::MalformedConfig` if the payload does not have
    /// the expected shape.
    pub fn decode(config: &[u8]) -> IdentityResult<Self> {
        Ok(serde_json::from_slice(config)?)
    }

    /// Decodes the linked-provider set of an `oidc` credential.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::CredentialTypeMismatch` for other credential
    /// types and `IdentityError::MalformedConfig` for undecodable payloads.
    pub fn from_credential(credential: &Credential) -> IdentityResult<Self> {
        if credential.credential_type != CredentialType::Oidc {
            return Err(IdentityError::type_mismatch(
                CredentialType::Oidc,
                credential.credential_type,
            ));
        }
        credential.decode_config()
    }
}
