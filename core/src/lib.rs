//! GNU getopt-style argument vector reordering.
//!
//! This crate rewrites a raw command line into canonical order: recognized
//! options (with their values) first, operands after, without ever failing
//! on malformed input.
//!
//! - [`OptionSpec`] — the option table, mapping `-v` / `--verbose` style keys
//!   to an [`Arity`], with unique-prefix completion for long options.
//! - [`Reorderer`] — the token-scanning state machine, honoring POSIX mode,
//!   operand permutation and the `--` terminator.
//! - [`Diagnostics`] — the sink receiving [`Diagnostic`] warnings
//!   (unrecognized, invalid, ambiguous options and misplaced values).
//! - [`CommandOptions`] — host command option definitions, convertible to an
//!   [`OptionSpec`] with [`OptionSpec::from_command`].
//! - [`parse_optstring`] / [`parse_longopts`] — getopt(1)-style declarations.
//!
//! # Example
//!
//! ```
//! use getopt_canon_core::*;
//!
//! let cmd = CommandOptions::new("mytool")
//!     .with_option(OptionDecl::flag(Some("-v"), Some("--verbose")))
//!     .with_option(OptionDecl::with_value(Some("-o"), Some("--output"), ValueKind::Single));
//!
//! let config = ReorderConfig {
//!     posix: PosixMode::Off,
//!     ..Default::default()
//! };
//! let reorderer = Reorderer::with_config(OptionSpec::from_command(&cmd).unwrap(), &config);
//!
//! let mut warnings: Vec<Diagnostic> = Vec::new();
//! let args = reorderer.parse(["in.txt", "-vo", "out.txt", "--bogus"], &mut warnings);
//!
//! assert_eq!(args, vec!["-vo", "out.txt", "--bogus", "in.txt"]);
//! assert_eq!(warnings, vec![Diagnostic::UnrecognizedOption("--bogus".into())]);
//! ```

mod config;
mod diagnostics;
mod error;
mod optstring;
mod reorder;
mod spec;
mod types;
mod validate;

pub use config::{POSIXLY_CORRECT, PosixMode, ReorderConfig, default_program_name};
pub use diagnostics::{Diagnostic, Diagnostics, IgnoreDiagnostics, TracingDiagnostics};
pub use error::{Error, Result};
pub use optstring::{Optstring, ScanOrdering, parse_longopts, parse_optstring};
pub use reorder::{Reorderer, Reordering};
pub use spec::{LongMatch, OptionSpec};
pub use types::*;
pub use validate::{ValidationError, validate_command_options, validate_option_key};
