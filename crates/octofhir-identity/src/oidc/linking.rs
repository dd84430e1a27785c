//! Linking operations on stored `oidc` credentials.
//!
//! These are the entry points for the account-linking workflow once an
//! identity already owns an `oidc` credential:
//!
//! 1. **Link** - attach another provider account to the same identity
//! 2. **Refresh** - replace the current tokens of an existing link
//! 3. **Unlink** - detach a provider account
//!
//! Each operation decodes the payload, applies the change and writes back both
//! the payload and the identifier set. On error the credential is left as it
//! was. Callers must serialize concurrent updates to the same identity.

use super::canonical::canonical_id;
use super::credentials::OidcCredentials;
use super::provider::{ProviderLink, ProviderTokens};
use crate::IdentityResult;
use crate::credential::Credential;

/// Decodes, mutates and re-encodes the linked-provider set of `credential`.
fn update<T>(
    credential: &mut Credential,
    f: impl FnOnce(&mut OidcCredentials) -> IdentityResult<T>,
) -> IdentityResult<T> {
    let mut creds = OidcCredentials::from_credential(credential)?;
    let out = f(&mut creds)?;
    let config = creds.encode()?;

    credential.config = config;
    credential.identifiers = creds.identifiers().into_iter().collect();
    Ok(out)
}

/// Links an additional provider account to an existing `oidc` credential.
///
/// The new link's canonical identifier is added to the credential's
/// identifier set.
///
/// # Errors
///
/// - `IdentityError::Validation` if `provider` or `subject` is empty
/// - `IdentityError::DuplicateLink` if the pair is already linked
/// - `IdentityError::CredentialTypeMismatch` / `MalformedConfig` for a
///   credential that is not a readable `oidc` credential
pub fn link_additional_provider(
    credential: &mut Credential,
    tokens: ProviderTokens,
    provider: &str,
    subject: &str,
    organization: Option<&str>,
) -> IdentityResult<()> {
    let link = ProviderLink::new(provider, subject, tokens, organization.map(str::to_string))?;
    let identifier = link.canonical_id();

    update(credential, |creds| creds.link_provider(link))?;

    tracing::debug!(provider = %provider, identifier = %identifier, "Linked oidc provider");
    Ok(())
}

/// Stores refreshed tokens for an existing link.
///
/// # Errors
///
/// Returns `IdentityError::LinkNotFound` if the credential has no link for
/// the pair.
pub fn refresh_provider_tokens(
    credential: &mut Credential,
    provider: &str,
    subject: &str,
    tokens: ProviderTokens,
) -> IdentityResult<()> {
    update(credential, |creds| creds.rotate_tokens(provider, subject, tokens))?;

    tracing::debug!(
        provider = %provider,
        identifier = %canonical_id(provider, subject),
        "Rotated oidc provider tokens"
    );
    Ok(())
}

/// Removes a provider link and its identifier from the credential.
///
/// Returns the removed link. Unlinking the last provider leaves an empty
/// credential; whether that is allowed is up to the identity store.
///
/// # Errors
///
/// Returns `IdentityError::LinkNotFound` if the credential has no link for
/// the pair.
pub fn unlink_provider(
    credential: &mut Credential,
    provider: &str,
    subject: &str,
) -> IdentityResult<ProviderLink> {
    let removed = update(credential, |creds| creds.unlink_provider(provider, subject))?;

    tracing::debug!(
        provider = %provider,
        identifier = %removed.canonical_id(),
        "Unlinked oidc provider"
    );
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdentityError;
    use crate::credential::CredentialType;
    use crate::oidc::new_oidc_credential;

    fn credential() -> Credential {
        new_oidc_credential(ProviderTokens::new("idt", "acc", "ref"), "google", "u-1", None)
            .unwrap()
    }

    #[test]
    fn test_link_additional_provider() {
        let mut credential = credential();
        link_additional_provider(
            &mut credential,
            ProviderTokens::new("i2", "a2", "r2"),
            "okta",
            "u-9",
            Some("org-x"),
        )
        .unwrap();

        assert!(credential.has_identifier("google:u-1"));
        assert!(credential.has_identifier("okta:u-9"));
        assert_eq!(credential.identifiers.len(), 2);

        let creds = OidcCredentials::from_credential(&credential).unwrap();
        assert_eq!(creds.find("okta", "u-9"), Some(1));
        assert_eq!(creds.organization(), Some("org-x"));
    }

    #[test]
    fn test_link_additional_provider_duplicate_leaves_credential_untouched() {
        let mut credential = credential();
        let before = credential.clone();

        let err = link_additional_provider(
            &mut credential,
            ProviderTokens::default(),
            "google",
            "u-1",
            None,
        )
        .unwrap_err();

        assert!(matches!(err, IdentityError::DuplicateLink { .. }));
        assert_eq!(credential, before);
    }

    #[test]
    fn test_link_additional_provider_validates_input() {
        let mut credential = credential();
        let err =
            link_additional_provider(&mut credential, ProviderTokens::default(), "okta", "", None)
                .unwrap_err();
        assert!(matches!(err, IdentityError::Validation { .. }));
    }

    #[test]
    fn test_refresh_provider_tokens() {
        let mut credential = credential();
        refresh_provider_tokens(
            &mut credential,
            "google",
            "u-1",
            ProviderTokens::new("i2", "a2", "r2"),
        )
        .unwrap();

        let creds = OidcCredentials::from_credential(&credential).unwrap();
        let link = &creds.providers()[0];
        assert_eq!(link.initial_access_token(), "acc");
        assert_eq!(link.current_access_token(), "a2");
        assert_eq!(link.current_refresh_token(), "r2");
        assert!(credential.has_identifier("google:u-1"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_refresh_logs_identifier() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut credential = credential();
        tracing::subscriber::with_default(subscriber, || {
            refresh_provider_tokens(
                &mut credential,
                "google",
                "u-1",
                ProviderTokens::new("i2", "a2", "r2"),
            )
            .unwrap();
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Rotated oidc provider tokens"));
        assert!(output.contains("identifier=google:u-1"));
        assert!(!output.contains("a2"));
    }

    #[test]
    fn test_refresh_unknown_link() {
        let mut credential = credential();
        let err = refresh_provider_tokens(
            &mut credential,
            "github",
            "u-1",
            ProviderTokens::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IdentityError::LinkNotFound { .. }));
    }

    #[test]
    fn test_unlink_provider() {
        let mut credential = credential();
        link_additional_provider(
            &mut credential,
            ProviderTokens::default(),
            "github",
            "gh-1",
            None,
        )
        .unwrap();

        let removed = unlink_provider(&mut credential, "google", "u-1").unwrap();
        assert_eq!(removed.canonical_id(), "google:u-1");
        assert!(!credential.has_identifier("google:u-1"));
        assert!(credential.has_identifier("github:gh-1"));

        let creds = OidcCredentials::from_credential(&credential).unwrap();
        assert_eq!(creds.len(), 1);
    }

    #[test]
    fn test_refresh_rejects_stored_link_without_provider() {
        let mut credential = Credential::new(
            CredentialType::Oidc,
            vec![":".to_string()],
            br#"{"providers": [{"provider": "", "subject": ""}]}"#.to_vec(),
        );
        let before = credential.clone();

        let err =
            refresh_provider_tokens(&mut credential, "", "", ProviderTokens::default()).unwrap_err();
        assert!(matches!(err, IdentityError::MalformedConfig(_)));
        assert_eq!(credential, before);
    }

    #[test]
    fn test_operations_reject_other_credential_types() {
        let mut credential = Credential::new(
            CredentialType::Password,
            vec!["user@example.com".to_string()],
            b"{}".to_vec(),
        );
        let err = unlink_provider(&mut credential, "google", "u-1").unwrap_err();
        assert!(matches!(err, IdentityError::CredentialTypeMismatch { .. }));
    }
}
