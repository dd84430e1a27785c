//! Canonical identifiers for provider links.

/// Delimiter between provider and subject in a canonical identifier.
pub const CANONICAL_ID_DELIMITER: char = ':';

/// Derives the store-wide identifier of a provider link.
///
/// The result is `provider:subject`. Neither part is escaped, so a provider
/// name containing the delimiter can collide with another pair; configured
/// provider names are rejected by
/// [`OidcCredentialsConfig::validate`](crate::config::OidcCredentialsConfig::validate)
/// for that reason.
#[must_use]
pub fn canonical_id(provider: &str, subject: &str) -> String {
    format!("{provider}{CANONICAL_ID_DELIMITER}{subject}")
}

/// Splits a canonical identifier into `(provider, subject)` at the first
/// delimiter.
///
/// Returns `None` when the delimiter is missing.
#[must_use]
pub fn parse_canonical_id(id: &str) -> Option<(&str, &str)> {
    id.split_once(CANONICAL_ID_DELIMITER)
}
