//! Non-fatal warnings raised while reordering, and the sinks receiving them.
//!
//! The reorderer never fails on malformed input. Each problem is handed to a
//! [`Diagnostics`] sink as a [`Diagnostic`] and scanning continues; the
//! embedding tool decides whether a warning is worth failing over.

use thiserror::Error;
use tracing::warn;

/// A malformed-input condition found while scanning.
///
/// `Display` follows the wording of GNU getopt.
///
/// # Examples
///
/// ```
/// use getopt_canon_core::Diagnostic;
///
/// let d = Diagnostic::AmbiguousOption {
///     option: "--ver".into(),
///     candidates: vec!["--verbose".into(), "--version".into()],
/// };
/// assert_eq!(
///     d.to_string(),
///     "option '--ver' is ambiguous; possibilities: '--verbose' '--version'"
/// );
/// assert_eq!(Diagnostic::InvalidOption('q').to_string(), "invalid option -- 'q'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Long option matching no registered key.
    #[error("unrecognized option '{0}'")]
    UnrecognizedOption(String),
    /// Character of a short cluster with no registered `-<c>` key.
    #[error("invalid option -- '{0}'")]
    InvalidOption(char),
    /// Long option abbreviation matching several keys.
    #[error("option '{option}' is ambiguous; possibilities:{}", quote_all(.candidates))]
    AmbiguousOption {
        /// The token as given
        option: String,
        /// Matching keys in lexical order
        candidates: Vec<String>,
    },
    /// `--name=value` given for an option that takes no value.
    #[error("option '{0}' doesn't allow an argument")]
    OptionDoesNotAllowArgument(String),
    /// Input ended while an option still waited for its value.
    #[error("option requires an argument -- '{0}'")]
    OptionRequiresArgument(String),
}

fn quote_all(candidates: &[String]) -> String {
    candidates.iter().map(|c| format!(" '{c}'")).collect()
}

/// Receiver of [`Diagnostic`]s, called synchronously during a parse.
pub trait Diagnostics {
    /// Handles one warning.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Forwards warnings as `tracing` events at WARN level.
#[derive(Debug, Clone)]
pub struct TracingDiagnostics {
    prog: String,
}

impl TracingDiagnostics {
    /// Creates a sink prefixing every message with `prog`.
    pub fn new(prog: impl Into<String>) -> Self {
        Self { prog: prog.into() }
    }
}

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}: {diagnostic}", self.prog);
    }
}

/// Drops every warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreDiagnostics;

impl Diagnostics for IgnoreDiagnostics {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Diagnostic::UnrecognizedOption("--nope".into()).to_string(),
            "unrecognized option '--nope'"
        );
        assert_eq!(
            Diagnostic::OptionDoesNotAllowArgument("--verbose".into()).to_string(),
            "option '--verbose' doesn't allow an argument"
        );
        assert_eq!(
            Diagnostic::OptionRequiresArgument("-o".into()).to_string(),
            "option requires an argument -- '-o'"
        );
    }

    #[test]
    fn test_vec_sink_through_mut_ref() {
        fn emit(sink: &mut impl Diagnostics) {
            sink.report(Diagnostic::InvalidOption('x'));
        }

        let mut collected: Vec<Diagnostic> = Vec::new();
        emit(&mut &mut collected);
        assert_eq!(collected, vec![Diagnostic::InvalidOption('x')]);
    }
}
