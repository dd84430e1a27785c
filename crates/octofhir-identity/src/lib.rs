//! # octofhir-identity
//!
//! Federated credential linking for OctoFHIR identities.
//!
//! An identity can be linked to one or more accounts at external OpenID
//! Connect providers. This crate defines how those links are represented,
//! identified across the identity store, serialized into a credential record,
//! and kept current as provider tokens are refreshed.
//!
//! ## Modules
//!
//! - [`credential`] - Generic credential record produced for the identity store
//! - [`oidc`] - Provider links, canonical identifiers and linking operations
//! - [`config`] - Linking policy configuration
//! - [`error`] - Error types

pub mod config;
pub mod credential;
pub mod error;
pub mod oidc;

pub use config::{ConfigError, OidcCredentialsConfig};
pub use credential::{Credential, CredentialType};
pub use error::{ErrorCategory, IdentityError};
pub use oidc::{
    OidcCredentials, OidcLinker, ProviderLink, ProviderTokens, canonical_id, new_oidc_credential,
};

/// Type alias for identity credential results.
pub type IdentityResult<T> = Result<T, IdentityError>;
