//! Federated OpenID Connect credentials.
//!
//! This module links a local identity to accounts at external OIDC providers:
//!
//! - Canonical identifiers (`provider:subject`) for store-wide lookup
//! - Provider links carrying initial and current tokens
//! - The linked-provider set stored as the `oidc` credential payload
//! - Credential construction and link/refresh/unlink operations
//! - Policy enforcement through [`OidcLinker`]
//!
//! Token exchange, token validation and persistence happen elsewhere; every
//! operation here is a synchronous transformation of in-memory values.

pub mod builder;
pub mod canonical;
pub mod credentials;
pub mod linker;
pub mod linking;
pub mod provider;

pub use builder::new_oidc_credential;
pub use canonical::{CANONICAL_ID_DELIMITER, canonical_id, parse_canonical_id};
pub use credentials::OidcCredentials;
pub use linker::OidcLinker;
pub use linking::{link_additional_provider, refresh_provider_tokens, unlink_provider};
pub use provider::{ProviderLink, ProviderTokens};
