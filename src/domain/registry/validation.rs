//! Registry argument validation

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

/// Aliases may only contain alphanumerics, underscores and hyphens
static ALIAS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// `v<N>` is reserved by the registry for version references
static RESERVED_VERSION_ALIAS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[vV]\d+$").unwrap());

/// Registry validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryValidationError {
    /// A required identifier is empty
    Empty { field: &'static str },
    /// Version is not a positive integer
    InvalidVersion { value: String },
    /// Alias contains characters the registry rejects
    InvalidAliasFormat { alias: String },
    /// Alias collides with a name the registry reserves
    ReservedAlias { alias: String },
}

impl fmt::Display for RegistryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} must not be empty", field),
            Self::InvalidVersion { value } => {
                write!(f, "Invalid version '{}': must be a positive integer", value)
            }
            Self::InvalidAliasFormat { alias } => write!(
                f,
                "Invalid alias '{}': only letters, digits, '_' and '-' are allowed",
                alias
            ),
            Self::ReservedAlias { alias } => {
                write!(f, "Alias '{}' is reserved by the registry", alias)
            }
        }
    }
}

impl std::error::Error for RegistryValidationError {}

impl From<RegistryValidationError> for DomainError {
    fn from(error: RegistryValidationError) -> Self {
        DomainError::invalid_argument(error.to_string())
    }
}

/// Validate that an identifier is present
pub fn validate_identifier(field: &'static str, value: &str) -> Result<(), RegistryValidationError> {
    if value.trim().is_empty() {
        return Err(RegistryValidationError::Empty { field });
    }

    Ok(())
}

/// Parse a version identifier into its integer form
pub fn parse_version(value: &str) -> Result<u64, RegistryValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(RegistryValidationError::Empty { field: "version" });
    }

    match trimmed.parse::<u64>() {
        Ok(version) if version > 0 => Ok(version),
        _ => Err(RegistryValidationError::InvalidVersion {
            value: value.to_string(),
        }),
    }
}

/// Validate an alias name
pub fn validate_alias(alias: &str) -> Result<(), RegistryValidationError> {
    validate_identifier("alias", alias)?;

    if !ALIAS_PATTERN.is_match(alias) {
        return Err(RegistryValidationError::InvalidAliasFormat {
            alias: alias.to_string(),
        });
    }

    if alias.eq_ignore_ascii_case("latest") || RESERVED_VERSION_ALIAS.is_match(alias) {
        return Err(RegistryValidationError::ReservedAlias {
            alias: alias.to_string(),
        });
    }

    Ok(())
}
