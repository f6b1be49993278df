//! The option table consulted while reordering.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::validate::{ValidationError, validate_command_options, validate_option_key};
use crate::{Arity, CommandOptions};

/// Outcome of resolving a long option name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LongMatch<'a> {
    /// Exactly one registered key matched.
    Resolved {
        /// The full registered key (e.g. `--verbose` for `--verb`)
        name: &'a str,
        /// Its arity
        arity: Arity,
    },
    /// No registered key matched.
    Unrecognized,
    /// Several keys share the abbreviation; listed in lexical order.
    Ambiguous(Vec<&'a str>),
}

/// Mapping from option token (with its dashes) to [`Arity`].
///
/// Keys are validated on insertion: short keys are `-` plus one character,
/// long keys are `--` plus a name. Short keys are only ever matched exactly;
/// long keys additionally support unique-prefix completion through
/// [`resolve_long`](OptionSpec::resolve_long).
///
/// # Examples
///
/// ```
/// use getopt_canon_core::{Arity, LongMatch, OptionSpec};
///
/// let spec = OptionSpec::from_entries([
///     ("-o", Arity::RequiredArgument),
///     ("--verbose", Arity::NoArgument),
///     ("--version", Arity::NoArgument),
/// ])
/// .unwrap();
///
/// assert_eq!(spec.short('o'), Some(Arity::RequiredArgument));
/// assert_eq!(
///     spec.resolve_long("--ver", true),
///     LongMatch::Ambiguous(vec!["--verbose", "--version"])
/// );
/// assert_eq!(
///     spec.resolve_long("--verb", true),
///     LongMatch::Resolved { name: "--verbose", arity: Arity::NoArgument }
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSpec {
    entries: BTreeMap<String, Arity>,
}

impl OptionSpec {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(key, arity)` pairs.
    ///
    /// # Errors
    ///
    /// Returns the first malformed key as a [`ValidationError`].
    pub fn from_entries<I, K>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, Arity)>,
        K: Into<String>,
    {
        let mut spec = Self::new();
        for (key, arity) in entries {
            spec.insert(key, arity)?;
        }
        Ok(spec)
    }

    /// Builds a table from a host command's option definitions.
    ///
    /// Every spelling of a declaration (short, long, aliases) maps to the
    /// declaration's arity: flags to [`Arity::NoArgument`], single-value
    /// options to [`Arity::RequiredArgument`], optional and multi-value
    /// options to [`Arity::OptionalArgument`].
    ///
    /// # Errors
    ///
    /// Returns the first problem reported by
    /// [`validate_command_options`](crate::validate_command_options).
    ///
    /// # Examples
    ///
    /// ```
    /// use getopt_canon_core::*;
    ///
    /// let cmd = CommandOptions::new("tar")
    ///     .with_option(OptionDecl::flag(Some("-v"), Some("--verbose")))
    ///     .with_option(OptionDecl::with_value(Some("-f"), Some("--file"), ValueKind::Single));
    ///
    /// let spec = OptionSpec::from_command(&cmd).unwrap();
    /// assert_eq!(spec.len(), 4);
    /// assert_eq!(spec.lookup("--file"), Some(Arity::RequiredArgument));
    /// ```
    pub fn from_command(command: &CommandOptions) -> Result<Self, ValidationError> {
        if let Some(err) = validate_command_options(command).into_iter().next() {
            return Err(err);
        }

        let entries = command
            .options
            .iter()
            .flat_map(|option| option.names().map(move |name| (name, option.arity())));
        Self::from_entries(entries)
    }

    /// Adds or replaces one key, returning the previous arity.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `key` is not a well-formed option
    /// token; the table is left unchanged.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        arity: Arity,
    ) -> Result<Option<Arity>, ValidationError> {
        let key = key.into();
        validate_option_key(&key)?;
        Ok(self.entries.insert(key, arity))
    }

    /// Replaces the whole table.
    ///
    /// The new contents are validated before anything is touched, so on
    /// error the previous contents remain intact.
    pub fn refresh<I, K>(&mut self, entries: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (K, Arity)>,
        K: Into<String>,
    {
        *self = Self::from_entries(entries)?;
        Ok(())
    }

    /// Replaces the whole table with a host command's option definitions.
    pub fn refresh_from_command(&mut self, command: &CommandOptions) -> Result<(), ValidationError> {
        *self = Self::from_command(command)?;
        Ok(())
    }

    /// Exact lookup of any key.
    pub fn lookup(&self, key: &str) -> Option<Arity> {
        self.entries.get(key).copied()
    }

    /// Exact lookup of the short option `-<c>`.
    pub fn short(&self, c: char) -> Option<Arity> {
        let mut key = String::with_capacity(1 + c.len_utf8());
        key.push('-');
        key.push(c);
        self.lookup(&key)
    }

    /// Resolves a long option name (including its `--`, without `=value`).
    ///
    /// An exact key always wins. Otherwise, when `abbreviate` is set, every
    /// long key having `name` as a prefix is a candidate; a single candidate
    /// resolves, several are ambiguous. With `abbreviate` unset only exact
    /// keys resolve. The bare name `--` never resolves.
    pub fn resolve_long(&self, name: &str, abbreviate: bool) -> LongMatch<'_> {
        if name.len() <= 2 || !name.starts_with("--") {
            return LongMatch::Unrecognized;
        }

        if let Some((key, arity)) = self.entries.get_key_value(name) {
            return LongMatch::Resolved {
                name: key,
                arity: *arity,
            };
        }
        if !abbreviate {
            return LongMatch::Unrecognized;
        }

        // Keys sharing a prefix are contiguous in lexical order.
        let mut candidates = self
            .entries
            .range::<str, _>((Bound::Included(name), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(name));

        match (candidates.next(), candidates.next()) {
            (None, _) => LongMatch::Unrecognized,
            (Some((key, arity)), None) => LongMatch::Resolved {
                name: key,
                arity: *arity,
            },
            (Some((first, _)), Some((second, _))) => {
                let mut names = vec![first.as_str(), second.as_str()];
                names.extend(candidates.map(|(key, _)| key.as_str()));
                LongMatch::Ambiguous(names)
            }
        }
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, arity)` in lexical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Arity)> {
        self.entries.iter().map(|(key, arity)| (key.as_str(), *arity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OptionDecl, ValueKind};

    fn sample() -> OptionSpec {
        OptionSpec::from_entries([
            ("-v", Arity::NoArgument),
            ("-o", Arity::RequiredArgument),
            ("--verbose", Arity::NoArgument),
            ("--version", Arity::NoArgument),
            ("--output", Arity::RequiredArgument),
            ("--color", Arity::OptionalArgument),
            ("--col", Arity::NoArgument),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_long_match_beats_prefixes() {
        let spec = sample();
        assert_eq!(
            spec.resolve_long("--col", true),
            LongMatch::Resolved {
                name: "--col",
                arity: Arity::NoArgument
            }
        );
    }

    #[test]
    fn test_unique_prefix_resolves() {
        let spec = sample();
        assert_eq!(
            spec.resolve_long("--out", true),
            LongMatch::Resolved {
                name: "--output",
                arity: Arity::RequiredArgument
            }
        );
        assert_eq!(
            spec.resolve_long("--colo", true),
            LongMatch::Resolved {
                name: "--color",
                arity: Arity::OptionalArgument
            }
        );
    }

    #[test]
    fn test_ambiguous_prefix_lists_candidates_in_order() {
        let spec = sample();
        assert_eq!(
            spec.resolve_long("--ver", true),
            LongMatch::Ambiguous(vec!["--verbose", "--version"])
        );
        assert_eq!(
            spec.resolve_long("--vers", true),
            LongMatch::Ambiguous(vec!["--verbose", "--version"])
        );
    }

    #[test]
    fn test_prefix_of_one_key_only_resolves() {
        // "--verb" is not a prefix of "--version".
        let spec = sample();
        assert_eq!(
            spec.resolve_long("--verb", true),
            LongMatch::Resolved {
                name: "--verbose",
                arity: Arity::NoArgument
            }
        );
        assert_eq!(
            spec.resolve_long("--versi", true),
            LongMatch::Resolved {
                name: "--version",
                arity: Arity::NoArgument
            }
        );
    }

    #[test]
    fn test_no_abbreviation_requires_exact_key() {
        let spec = sample();
        assert_eq!(spec.resolve_long("--out", false), LongMatch::Unrecognized);
        assert_eq!(
            spec.resolve_long("--output", false),
            LongMatch::Resolved {
                name: "--output",
                arity: Arity::RequiredArgument
            }
        );
    }

    #[test]
    fn test_bare_double_dash_never_resolves() {
        assert_eq!(sample().resolve_long("--", true), LongMatch::Unrecognized);
        assert_eq!(sample().resolve_long("--zzz", true), LongMatch::Unrecognized);
    }

    #[test]
    fn test_short_lookup_is_exact() {
        let spec = sample();
        assert_eq!(spec.short('o'), Some(Arity::RequiredArgument));
        assert_eq!(spec.short('x'), None);
        // Long keys are never reachable through a short lookup.
        assert_eq!(spec.short('-'), None);
    }

    #[test]
    fn test_insert_rejects_malformed_keys() {
        let mut spec = OptionSpec::new();
        assert!(spec.insert("verbose", Arity::NoArgument).is_err());
        assert!(spec.insert("-ab", Arity::NoArgument).is_err());
        assert!(spec.is_empty());
        assert_eq!(spec.insert("-a", Arity::NoArgument), Ok(None));
        assert_eq!(
            spec.insert("-a", Arity::RequiredArgument),
            Ok(Some(Arity::NoArgument))
        );
    }

    #[test]
    fn test_refresh_replaces_everything() {
        let mut spec = sample();
        spec.refresh([("--all", Arity::NoArgument)]).unwrap();
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.iter().collect::<Vec<_>>(), vec![("--all", Arity::NoArgument)]);
        assert_eq!(spec.lookup("--verbose"), None);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_contents() {
        let mut spec = sample();
        let before = spec.clone();
        let result = spec.refresh([("--all", Arity::NoArgument), ("bad", Arity::NoArgument)]);
        assert!(result.is_err());
        assert_eq!(spec, before);
    }

    #[test]
    fn test_from_command_maps_every_spelling() {
        let cmd = CommandOptions::new("sort")
            .with_option(OptionDecl::flag(Some("-r"), Some("--reverse")))
            .with_option(
                OptionDecl::with_value(Some("-k"), Some("--key"), ValueKind::Single)
                    .with_alias("--sort-key"),
            )
            .with_option(OptionDecl::with_value(None, Some("--files0-from"), ValueKind::Multiple));

        let spec = OptionSpec::from_command(&cmd).unwrap();
        assert_eq!(spec.lookup("-r"), Some(Arity::NoArgument));
        assert_eq!(spec.lookup("--sort-key"), Some(Arity::RequiredArgument));
        assert_eq!(spec.lookup("--files0-from"), Some(Arity::OptionalArgument));
        assert_eq!(spec.len(), 6);
    }

    #[test]
    fn test_from_command_rejects_duplicates() {
        let cmd = CommandOptions::new("sort")
            .with_option(OptionDecl::flag(Some("-r"), None))
            .with_option(OptionDecl::flag(Some("-r"), Some("--random")));
        assert_eq!(
            OptionSpec::from_command(&cmd),
            Err(ValidationError::DuplicateOption("-r".into()))
        );
    }
}
