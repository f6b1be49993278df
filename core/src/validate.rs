//! Option key and command definition validation.
//!
//! Catches structural problems (keys without a dash, multi-character short
//! keys, duplicate spellings) before they reach an
//! [`OptionSpec`](crate::OptionSpec), where they would silently never match.
//!
//! # Examples
//!
//! ```
//! use getopt_canon_core::*;
//!
//! let cmd = CommandOptions::new("ls")
//!     .with_option(OptionDecl::flag(Some("-a"), Some("--all")));
//! assert!(validate_command_options(&cmd).is_empty());
//!
//! // Invalid: short option missing its leading dash
//! let bad = CommandOptions::new("ls").with_option(OptionDecl::flag(Some("a"), None));
//! assert!(!validate_command_options(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandOptions, OptionDecl};

/// Option definition errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Key does not start with a dash.
    #[error("option key must start with '-': {0}")]
    MissingDash(String),
    /// Single-dash key that is not exactly one character after the dash.
    #[error("invalid short option format: {0}")]
    InvalidShortOption(String),
    /// Double-dash key with no name, or with an `=` in the name.
    #[error("invalid long option format: {0}")]
    InvalidLongOption(String),
    /// An option declaration has no spelling at all.
    #[error("option must define at least one name")]
    MissingOptionName,
    /// Two declarations share a spelling.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),
    /// Malformed getopt(1) short optstring or long option list.
    #[error("invalid optstring {input:?}: {reason}")]
    InvalidOptstring {
        /// The offending input
        input: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Checks that `key` is a well-formed option token.
///
/// Short keys are a dash and one character other than `-`; long keys are
/// `--` followed by a non-empty name without `=`.
///
/// # Examples
///
/// ```
/// use getopt_canon_core::{ValidationError, validate_option_key};
///
/// assert!(validate_option_key("-v").is_ok());
/// assert!(validate_option_key("--verbose").is_ok());
/// assert_eq!(
///     validate_option_key("-vv"),
///     Err(ValidationError::InvalidShortOption("-vv".into()))
/// );
/// ```
pub fn validate_option_key(key: &str) -> Result<(), ValidationError> {
    if let Some(name) = key.strip_prefix("--") {
        if name.is_empty() || name.contains('=') {
            return Err(ValidationError::InvalidLongOption(key.to_string()));
        }
        return Ok(());
    }

    let Some(rest) = key.strip_prefix('-') else {
        return Err(ValidationError::MissingDash(key.to_string()));
    };

    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '-' => Ok(()),
        _ => Err(ValidationError::InvalidShortOption(key.to_string())),
    }
}

/// Validates a host command's option definitions.
///
/// Checks for an empty command name, declarations without names, malformed
/// keys, and spellings used by more than one declaration.
pub fn validate_command_options(command: &CommandOptions) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if command.command.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_options(&command.options));
    errors
}

fn validate_options(options: &[OptionDecl]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for option in options {
        if option.names().next().is_none() {
            errors.push(ValidationError::MissingOptionName);
            continue;
        }

        for name in option.names() {
            if let Err(err) = validate_option_key(name) {
                errors.push(err);
                continue;
            }
            if !seen.insert(name) {
                errors.push(ValidationError::DuplicateOption(name.to_string()));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;

    #[test]
    fn test_key_shapes() {
        assert!(validate_option_key("-x").is_ok());
        assert!(validate_option_key("-é").is_ok());
        assert!(validate_option_key("--dry-run").is_ok());

        assert!(matches!(
            validate_option_key("x"),
            Err(ValidationError::MissingDash(_))
        ));
        assert!(matches!(
            validate_option_key("-"),
            Err(ValidationError::InvalidShortOption(_))
        ));
        assert!(matches!(
            validate_option_key("--"),
            Err(ValidationError::InvalidLongOption(_))
        ));
        assert!(matches!(
            validate_option_key("--out=x"),
            Err(ValidationError::InvalidLongOption(_))
        ));
    }

    #[test]
    fn test_empty_command_name() {
        let cmd = CommandOptions::new("  ");
        assert_eq!(
            validate_command_options(&cmd),
            vec![ValidationError::EmptyCommandName]
        );
    }

    #[test]
    fn test_duplicate_across_declarations() {
        let cmd = CommandOptions::new("grep")
            .with_option(OptionDecl::flag(Some("-i"), Some("--ignore-case")))
            .with_option(OptionDecl::with_value(
                Some("-i"),
                Some("--include"),
                ValueKind::Single,
            ));

        assert_eq!(
            validate_command_options(&cmd),
            vec![ValidationError::DuplicateOption("-i".into())]
        );
    }

    #[test]
    fn test_nameless_declaration() {
        let cmd = CommandOptions::new("grep").with_option(OptionDecl::flag(None, None));
        assert_eq!(
            validate_command_options(&cmd),
            vec![ValidationError::MissingOptionName]
        );
    }
}
