//! Option arity and host command option definitions.
//!
//! [`Arity`] is what the reorderer works with. [`OptionDecl`] and
//! [`CommandOptions`] model the option definitions of a host command; they
//! serialize with [`serde`] so they can be kept in JSON or YAML files and
//! turned into an [`OptionSpec`](crate::OptionSpec) with
//! [`OptionSpec::from_command`](crate::OptionSpec::from_command).

use serde::{Deserialize, Serialize};

/// How many values an option consumes from the argument stream.
///
/// # Examples
///
/// ```
/// use getopt_canon_core::Arity;
///
/// assert!(!Arity::NoArgument.takes_argument());
/// assert!(Arity::RequiredArgument.takes_argument());
/// assert!(Arity::OptionalArgument.takes_argument());
/// assert_eq!(Arity::default(), Arity::NoArgument);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Never consumes a value.
    #[default]
    NoArgument,
    /// Takes an attached value or the immediately following token.
    RequiredArgument,
    /// Takes an attached value only; never the following token.
    OptionalArgument,
}

impl Arity {
    /// Returns `true` unless this is [`Arity::NoArgument`].
    pub fn takes_argument(self) -> bool {
        self != Arity::NoArgument
    }
}

/// Kind of value a declared option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Flag option without a value (the default).
    #[default]
    None,
    /// Exactly one value.
    Single,
    /// A value that may be left out.
    Optional,
    /// Several values.
    Multiple,
}

impl From<ValueKind> for Arity {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::None => Arity::NoArgument,
            ValueKind::Single => Arity::RequiredArgument,
            // Multi-value options only ever see an attached value.
            ValueKind::Optional | ValueKind::Multiple => Arity::OptionalArgument,
        }
    }
}

/// Declaration of one option of a host command.
///
/// An option has an optional short form (e.g. `-v`), an optional long form
/// (e.g. `--verbose`), any number of extra aliases, and a [`ValueKind`].
///
/// # Examples
///
/// ```
/// use getopt_canon_core::{Arity, OptionDecl, ValueKind};
///
/// let verbose = OptionDecl::flag(Some("-v"), Some("--verbose"))
///     .with_description("Enable verbose output");
/// assert_eq!(verbose.canonical_name(), "--verbose");
/// assert_eq!(verbose.arity(), Arity::NoArgument);
///
/// let output = OptionDecl::with_value(Some("-o"), Some("--output"), ValueKind::Single);
/// assert_eq!(output.arity(), Arity::RequiredArgument);
/// assert_eq!(output.names().collect::<Vec<_>>(), vec!["-o", "--output"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Short form (e.g. "-o")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    /// Long form (e.g. "--output")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    /// Additional spellings, short or long
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// What kind of value the option accepts
    #[serde(default)]
    pub value: ValueKind,
    /// Help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionDecl {
    /// Creates a flag option (no value).
    pub fn flag(short: Option<&str>, long: Option<&str>) -> Self {
        Self::with_value(short, long, ValueKind::None)
    }

    /// Creates an option accepting a value of the given kind.
    pub fn with_value(short: Option<&str>, long: Option<&str>, value: ValueKind) -> Self {
        Self {
            short: short.map(String::from),
            long: long.map(String::from),
            aliases: Vec::new(),
            value,
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an alias spelling.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Arity every spelling of this option maps to.
    pub fn arity(&self) -> Arity {
        self.value.into()
    }

    /// All spellings: short, long, then aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.short
            .as_deref()
            .into_iter()
            .chain(self.long.as_deref())
            .chain(self.aliases.iter().map(String::as_str))
    }

    /// Returns the canonical name (long form preferred, falls back to short).
    pub fn canonical_name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .or(self.aliases.first().map(String::as_str))
            .unwrap_or("unknown")
    }

    /// Checks if `s` is one of this option's spellings.
    pub fn matches(&self, s: &str) -> bool {
        self.names().any(|name| name == s)
    }
}

/// Option definitions of a host command.
///
/// # Examples
///
/// ```
/// use getopt_canon_core::{CommandOptions, OptionDecl, ValueKind};
///
/// let mut tar = CommandOptions::new("tar");
/// tar.options.push(OptionDecl::flag(Some("-v"), Some("--verbose")));
/// tar.options.push(OptionDecl::with_value(Some("-f"), Some("--file"), ValueKind::Single));
///
/// assert!(tar.find_option("-f").is_some());
/// assert!(tar.find_option("--gzip").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOptions {
    /// Command name (e.g. "tar")
    pub command: String,
    /// Short description of the command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared options
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

impl CommandOptions {
    /// Creates an empty definition for `command`.
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            ..Default::default()
        }
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionDecl) -> Self {
        self.options.push(option);
        self
    }

    /// Finds an option by any of its spellings.
    pub fn find_option(&self, name: &str) -> Option<&OptionDecl> {
        self.options.iter().find(|o| o.matches(name))
    }
}
