//! Generic identity credential record.
//!
//! A [`Credential`] is owned by the identity aggregate and persisted by the
//! identity store. Each credential type stores its own settings as an opaque
//! JSON payload in [`Credential::config`]; this crate produces the payload for
//! the `oidc` type.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::IdentityResult;

/// Serializes the opaque payload as embedded JSON rather than a byte array.
mod embedded_json {
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::value::RawValue;

    pub fn serialize<S>(config: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let raw: &RawValue = serde_json::from_slice(config).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)
            .map_err(|e| D::Error::custom(format!("config must be JSON: {e}")))?;
        Ok(raw.get().as_bytes().to_vec())
    }
}

/// Credential type tag.
///
/// Only `oidc` payloads are produced by this crate; the other tags exist so
/// records of any type can be read and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    Password,
    /// Federated OpenID Connect credential.
    Oidc,
    Totp,
    Webauthn,
    Passkey,
    LookupSecret,
    Code,
}

impl CredentialType {
    /// Returns the tag as stored by the identity store.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Oidc => "oidc",
            Self::Totp => "totp",
            Self::Webauthn => "webauthn",
            Self::Passkey => "passkey",
            Self::LookupSecret => "lookup_secret",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credential attached to an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The credential type.
    #[serde(rename = "type")]
    pub credential_type: CredentialType,

    /// External-facing identifiers. The identity store guarantees that no two
    /// identities claim the same identifier.
    pub identifiers: BTreeSet<String>,

    /// Type-specific configuration payload (JSON bytes). Persisted as an
    /// embedded JSON document.
    #[serde(with = "embedded_json")]
    pub config: Vec<u8>,
}

impl Credential {
    /// Creates a credential record.
    #[must_use]
    pub fn new(
        credential_type: CredentialType,
        identifiers: impl IntoIterator<Item = String>,
        config: Vec<u8>,
    ) -> Self {
        Self {
            credential_type,
            identifiers: identifiers.into_iter().collect(),
            config,
        }
    }

    /// Returns `true` if the credential is addressable by `identifier`.
    #[must_use]
    pub fn has_identifier(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    /// Decodes the configuration payload.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::MalformedConfig` if the payload is not valid
    /// JSON for `T`.
    pub fn decode_config<T: DeserializeOwned>(&self) -> IdentityResult<T> {
        Ok(serde_json::from_slice(&self.config)?)
    }
}
