//! Construction of new `oidc` credentials.

use super::canonical::canonical_id;
use super::credentials::OidcCredentials;
use super::provider::{ProviderLink, ProviderTokens};
use crate::IdentityResult;
use crate::credential::{Credential, CredentialType};

/// Creates an `oidc` credential from a fresh OIDC linking event.
///
/// The credential holds exactly one provider link whose initial and current
/// tokens are both `tokens`, and is identified by
/// [`canonical_id(provider, subject)`](canonical_id).
///
/// # Errors
///
/// Returns `IdentityError::Validation` if `provider` or `subject` is empty,
/// and `IdentityError::Internal` if the payload cannot be encoded.
///
/// # Example
///
/// ```
/// use octofhir_identity::oidc::{OidcCredentials, ProviderTokens, new_oidc_credential};
///
/// let credential = new_oidc_credential(
///     ProviderTokens::new("idt", "acc", "ref"),
///     "google",
///     "u-1",
///     None,
/// )?;
/// assert!(credential.has_identifier("google:u-1"));
///
/// let creds = OidcCredentials::from_credential(&credential)?;
/// assert_eq!(creds.providers()[0].current_access_token(), "acc");
/// # Ok::<(), octofhir_identity::IdentityError>(())
/// ```
pub fn new_oidc_credential(
    tokens: ProviderTokens,
    provider: &str,
    subject: &str,
    organization: Option<&str>,
) -> IdentityResult<Credential> {
    let link = ProviderLink::new(provider, subject, tokens, organization.map(str::to_string))?;
    let config = OidcCredentials::with_link(link).encode()?;
    let identifier = canonical_id(provider, subject);

    tracing::debug!(
        provider = %provider,
        identifier = %identifier,
        "Created oidc credential"
    );

    Ok(Credential::new(CredentialType::Oidc, [identifier], config))
}
