//! getopt(1)-style option declarations.
//!
//! Short options are declared as an optstring such as `"ab:c::"`, long
//! options as a comma-separated list such as `"verbose,output:,color::"`.
//! One colon marks a required argument, two colons an optional one.
//!
//! A leading `+` on the optstring requests POSIX scanning, a leading `-`
//! keeps operands in place, and a `:` after that prefix asks for quiet
//! operation (warnings suppressed).
//!
//! # Examples
//!
//! ```
//! use getopt_canon_core::{Arity, ScanOrdering, parse_longopts, parse_optstring};
//!
//! let short = parse_optstring("+vo:").unwrap();
//! assert_eq!(short.ordering, ScanOrdering::RequireOrder);
//! assert_eq!(
//!     short.options,
//!     vec![("-v".to_string(), Arity::NoArgument), ("-o".to_string(), Arity::RequiredArgument)]
//! );
//!
//! let long = parse_longopts("verbose, color::").unwrap();
//! assert_eq!(long[1], ("--color".to_string(), Arity::OptionalArgument));
//! ```

use crate::{Arity, ValidationError};

/// Operand handling requested by an optstring prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrdering {
    /// No prefix: operands move after the options.
    #[default]
    Permute,
    /// `+` prefix: the first operand ends option scanning.
    RequireOrder,
    /// `-` prefix: operands stay where they are.
    ReturnInOrder,
}

/// A parsed short-option optstring.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Optstring {
    /// Ordering prefix
    pub ordering: ScanOrdering,
    /// Whether warnings should be suppressed
    pub quiet: bool,
    /// `(key, arity)` pairs in declaration order
    pub options: Vec<(String, Arity)>,
}

/// Parses a short-option optstring.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidOptstring`] for characters that cannot
/// be options (`:`, `-`, whitespace), including a third colon after an
/// option.
pub fn parse_optstring(input: &str) -> Result<Optstring, ValidationError> {
    let mut rest = input;
    let mut ordering = ScanOrdering::Permute;
    if let Some(stripped) = rest.strip_prefix('+') {
        ordering = ScanOrdering::RequireOrder;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('-') {
        ordering = ScanOrdering::ReturnInOrder;
        rest = stripped;
    }

    let quiet = match rest.strip_prefix(':') {
        Some(stripped) => {
            rest = stripped;
            true
        }
        None => false,
    };

    let mut options = Vec::new();
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' || c == '-' || c.is_whitespace() {
            return Err(invalid(input, format!("{c:?} cannot be an option character")));
        }

        let arity = if chars.next_if_eq(&':').is_none() {
            Arity::NoArgument
        } else if chars.next_if_eq(&':').is_none() {
            Arity::RequiredArgument
        } else {
            Arity::OptionalArgument
        };
        options.push((format!("-{c}"), arity));
    }

    Ok(Optstring {
        ordering,
        quiet,
        options,
    })
}

/// Parses a comma- or whitespace-separated long option list.
///
/// Names may be given with or without their leading `--`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidOptstring`] for an empty name or a name
/// containing `=` or `:`.
pub fn parse_longopts(input: &str) -> Result<Vec<(String, Arity)>, ValidationError> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (name, arity) = if let Some(name) = item.strip_suffix("::") {
                (name, Arity::OptionalArgument)
            } else if let Some(name) = item.strip_suffix(':') {
                (name, Arity::RequiredArgument)
            } else {
                (item, Arity::NoArgument)
            };
            let name = name.strip_prefix("--").unwrap_or(name);

            if name.is_empty() || name.contains(['=', ':']) {
                return Err(invalid(input, format!("invalid long option {item:?}")));
            }
            Ok((format!("--{name}"), arity))
        })
        .collect()
}

fn invalid(input: &str, reason: String) -> ValidationError {
    ValidationError::InvalidOptstring {
        input: input.to_string(),
        reason,
    }
}
