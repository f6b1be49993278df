//! Rewrites an argument vector into GNU getopt canonical order.
//!
//! Tokens are scanned left to right. Recognized options, with their values,
//! go to a leading list; operands are set aside and appended once the input
//! is exhausted. Scanning never fails: malformed input is reported to a
//! [`Diagnostics`] sink and passed through as given.

use tracing::debug;

use crate::config::ReorderConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::spec::{LongMatch, OptionSpec};
use crate::validate::ValidationError;
use crate::{Arity, CommandOptions};

/// Result of [`Reorderer::reorder`]: the reordered tokens plus every warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reordering {
    /// Tokens in canonical order
    pub args: Vec<String>,
    /// Warnings in the order they were raised
    pub diagnostics: Vec<Diagnostic>,
}

impl Reordering {
    /// Returns `true` if no warnings were raised.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Scanning,
    /// The previous token was an option still waiting for its value.
    ConsumingRequiredValue,
    /// `--` or, in POSIX mode, the first operand has been seen.
    PastTerminator,
}

#[derive(Debug, Default)]
struct ParseState {
    recognized: Vec<String>,
    deferred: Vec<String>,
    state: State,
}

/// Argument vector reorderer.
///
/// Owns its [`OptionSpec`]; parsing borrows it shared and
/// [`refresh`](Reorderer::refresh) exclusively, so the table cannot change
/// under a running parse. POSIX mode is resolved once, at construction.
///
/// # Examples
///
/// ```
/// use getopt_canon_core::{Arity, OptionSpec, Reorderer};
///
/// let spec = OptionSpec::from_entries([
///     ("--verbose", Arity::NoArgument),
///     ("-o", Arity::RequiredArgument),
/// ])
/// .unwrap();
/// let reorderer = Reorderer::new(spec).posix(false);
///
/// let result = reorderer.reorder(["file.txt", "--verb", "-o", "out.txt"]);
/// assert_eq!(result.args, vec!["--verbose", "-o", "out.txt", "file.txt"]);
/// assert!(result.is_clean());
/// ```
#[derive(Debug, Clone)]
pub struct Reorderer {
    spec: OptionSpec,
    prog: String,
    posix: bool,
    permute: bool,
    abbreviate: bool,
}

impl Reorderer {
    /// Creates a reorderer with the default configuration.
    pub fn new(spec: OptionSpec) -> Self {
        Self::with_config(spec, &ReorderConfig::default())
    }

    /// Creates a reorderer, resolving POSIX mode from `config` now.
    pub fn with_config(spec: OptionSpec, config: &ReorderConfig) -> Self {
        let reorderer = Self {
            spec,
            prog: config.program_name(),
            posix: config.posix.resolve(),
            permute: config.permute,
            abbreviate: config.abbreviate,
        };
        debug!(
            prog = %reorderer.prog,
            posix = reorderer.posix,
            permute = reorderer.permute,
            abbreviate = reorderer.abbreviate,
            options = reorderer.spec.len(),
            "Configured reorderer"
        );
        reorderer
    }

    /// Sets POSIX mode explicitly.
    pub fn posix(mut self, posix: bool) -> Self {
        self.posix = posix;
        self
    }

    /// Enables or disables operand permutation.
    pub fn permute(mut self, permute: bool) -> Self {
        self.permute = permute;
        self
    }

    /// Enables or disables long option abbreviation.
    pub fn abbreviate(mut self, abbreviate: bool) -> Self {
        self.abbreviate = abbreviate;
        self
    }

    /// Sets the program name.
    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.prog = prog.into();
        self
    }

    /// The option table.
    pub fn spec(&self) -> &OptionSpec {
        &self.spec
    }

    /// Program name for warning prefixes.
    pub fn program_name(&self) -> &str {
        &self.prog
    }

    /// Whether the first operand ends option scanning.
    pub fn is_posix(&self) -> bool {
        self.posix
    }

    /// Replaces the option table between parses.
    ///
    /// On error the previous table is kept.
    pub fn refresh<I, K>(&mut self, entries: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (K, Arity)>,
        K: Into<String>,
    {
        self.spec.refresh(entries)
    }

    /// Replaces the option table from a host command's definitions.
    pub fn refresh_from_command(&mut self, command: &CommandOptions) -> Result<(), ValidationError> {
        self.spec.refresh_from_command(command)
    }

    /// Reorders `args`, collecting warnings into the result.
    pub fn reorder<I, S>(&self, args: I) -> Reordering
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut diagnostics = Vec::new();
        let args = self.parse(args, &mut diagnostics);
        Reordering { args, diagnostics }
    }

    /// Reorders the process arguments, program name excluded.
    pub fn parse_env<D>(&self, diagnostics: &mut D) -> Vec<String>
    where
        D: Diagnostics + ?Sized,
    {
        let args = std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned());
        self.parse(args, diagnostics)
    }

    /// Reorders `args`, reporting warnings to `diagnostics`.
    ///
    /// The result holds the recognized options (with their values, long
    /// abbreviations expanded) followed by the operands.
    pub fn parse<I, S, D>(&self, args: I, diagnostics: &mut D) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        D: Diagnostics + ?Sized,
    {
        let mut parse = ParseState::default();

        for token in args {
            let token = token.into();
            parse.state = match parse.state {
                State::PastTerminator => {
                    parse.deferred.push(token);
                    State::PastTerminator
                }
                State::ConsumingRequiredValue => {
                    parse.recognized.push(token);
                    State::Scanning
                }
                State::Scanning => self.scan(token, &mut parse, diagnostics),
            };
        }

        if parse.state == State::ConsumingRequiredValue {
            if let Some(option) = parse.recognized.last() {
                diagnostics.report(Diagnostic::OptionRequiresArgument(option.clone()));
            }
        }

        debug!(
            recognized = parse.recognized.len(),
            deferred = parse.deferred.len(),
            "Reordered arguments"
        );

        let ParseState {
            mut recognized,
            deferred,
            ..
        } = parse;
        recognized.extend(deferred);
        recognized
    }

    fn scan<D>(&self, token: String, parse: &mut ParseState, diagnostics: &mut D) -> State
    where
        D: Diagnostics + ?Sized,
    {
        if token == "--" {
            parse.recognized.push(token);
            State::PastTerminator
        } else if token.starts_with("--") {
            self.scan_long(token, parse, diagnostics)
        } else if token.starts_with('-') && token != "-" {
            self.scan_short(token, parse, diagnostics)
        } else {
            self.scan_operand(token, parse)
        }
    }

    fn scan_long<D>(&self, token: String, parse: &mut ParseState, diagnostics: &mut D) -> State
    where
        D: Diagnostics + ?Sized,
    {
        let (name, value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token.as_str(), None),
        };

        match self.spec.resolve_long(name, self.abbreviate) {
            LongMatch::Unrecognized => {
                diagnostics.report(Diagnostic::UnrecognizedOption(token.clone()));
                parse.recognized.push(token);
                State::Scanning
            }
            LongMatch::Ambiguous(candidates) => {
                diagnostics.report(Diagnostic::AmbiguousOption {
                    option: token.clone(),
                    candidates: candidates.into_iter().map(String::from).collect(),
                });
                parse.recognized.push(token);
                State::Scanning
            }
            LongMatch::Resolved {
                name: resolved,
                arity,
            } => {
                if resolved != name {
                    debug!(abbreviation = name, resolved, "Expanded long option");
                }
                match value {
                    Some(value) => {
                        if arity == Arity::NoArgument {
                            diagnostics
                                .report(Diagnostic::OptionDoesNotAllowArgument(resolved.to_string()));
                        }
                        parse.recognized.push(format!("{resolved}={value}"));
                        State::Scanning
                    }
                    None => {
                        parse.recognized.push(resolved.to_string());
                        if arity == Arity::RequiredArgument {
                            State::ConsumingRequiredValue
                        } else {
                            State::Scanning
                        }
                    }
                }
            }
        }
    }

    fn scan_short<D>(&self, token: String, parse: &mut ParseState, diagnostics: &mut D) -> State
    where
        D: Diagnostics + ?Sized,
    {
        let mut next = State::Scanning;
        let mut cluster = token[1..].chars().peekable();

        while let Some(c) = cluster.next() {
            let arity = self.spec.short(c).unwrap_or_else(|| {
                diagnostics.report(Diagnostic::InvalidOption(c));
                Arity::NoArgument
            });
            let last = cluster.peek().is_none();

            if !last && arity.takes_argument() {
                // The rest of the cluster is this option's value.
                break;
            }
            if last && arity == Arity::RequiredArgument {
                next = State::ConsumingRequiredValue;
            }
        }

        parse.recognized.push(token);
        next
    }

    fn scan_operand(&self, token: String, parse: &mut ParseState) -> State {
        if self.posix {
            parse.deferred.push(token);
            State::PastTerminator
        } else if self.permute {
            parse.deferred.push(token);
            State::Scanning
        } else {
            parse.recognized.push(token);
            State::Scanning
        }
    }
}
