//! Reorderer configuration and file loading.
//!
//! [`ReorderConfig`] and [`CommandOptions`] can be kept in YAML or JSON files;
//! the format is picked from the file extension (`.json` is JSON, anything
//! else is YAML).
//!
//! # Example YAML
//!
//! ```yaml
//! prog: tar
//! posix: infer
//! permute: true
//! abbreviate: true
//! ```

use std::ffi::OsStr;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CommandOptions;
use crate::error::Result;
use crate::optstring::ScanOrdering;

/// Environment variable that switches POSIX mode on when mode is
/// [`PosixMode::Infer`].
pub const POSIXLY_CORRECT: &str = "POSIXLY_CORRECT";

/// Whether the first operand ends option scanning.
///
/// # Examples
///
/// ```
/// use getopt_canon_core::PosixMode;
///
/// assert!(PosixMode::On.resolve_with(false));
/// assert!(!PosixMode::Off.resolve_with(true));
/// assert!(PosixMode::Infer.resolve_with(true));
/// assert!(!PosixMode::Infer.resolve_with(false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PosixMode {
    /// Always stop at the first operand.
    On,
    /// Never stop at the first operand.
    Off,
    /// On if [`POSIXLY_CORRECT`] is set in the environment (the default).
    #[default]
    Infer,
}

impl PosixMode {
    /// Resolves the mode, reading the environment for [`PosixMode::Infer`].
    pub fn resolve(self) -> bool {
        let present = match self {
            PosixMode::Infer => std::env::var_os(POSIXLY_CORRECT).is_some(),
            PosixMode::On | PosixMode::Off => false,
        };
        let posix = self.resolve_with(present);
        debug!(mode = ?self, posix, "Resolved POSIX mode");
        posix
    }

    /// Resolves the mode given whether the environment signal is present.
    pub fn resolve_with(self, env_present: bool) -> bool {
        match self {
            PosixMode::On => true,
            PosixMode::Off => false,
            PosixMode::Infer => env_present,
        }
    }
}

/// Settings for a [`Reorderer`](crate::Reorderer).
///
/// # Examples
///
/// ```
/// use getopt_canon_core::{PosixMode, ReorderConfig};
///
/// let config: ReorderConfig = serde_yaml::from_str("posix: on\npermute: false\n").unwrap();
/// assert_eq!(config.posix, PosixMode::On);
/// assert!(!config.permute);
/// assert!(config.abbreviate);
/// assert_eq!(config.prog, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    /// Program name used to prefix warnings (default: executable base name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prog: Option<String>,
    /// POSIX mode selection.
    pub posix: PosixMode,
    /// Move operands after the options (ignored in POSIX mode).
    pub permute: bool,
    /// Accept unique abbreviations of long options.
    #[serde(alias = "deabbreviate")]
    pub abbreviate: bool,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            prog: None,
            posix: PosixMode::Infer,
            permute: true,
            abbreviate: true,
        }
    }
}

impl ReorderConfig {
    /// Loads configuration from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::Error::IoError) if the file cannot be read,
    /// or a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_document(path.as_ref())
    }

    /// Saves the configuration, format chosen by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_document(path.as_ref(), self)
    }

    /// Program name for warning prefixes.
    pub fn program_name(&self) -> String {
        self.prog.clone().unwrap_or_else(default_program_name)
    }

    /// Applies the ordering selected by a getopt(1) optstring prefix.
    pub fn apply_ordering(&mut self, ordering: ScanOrdering) {
        match ordering {
            ScanOrdering::Permute => {}
            ScanOrdering::RequireOrder => self.posix = PosixMode::On,
            ScanOrdering::ReturnInOrder => self.permute = false,
        }
    }
}

impl CommandOptions {
    /// Loads option definitions from a YAML or JSON file.
    ///
    /// The definitions are not validated here; that happens when they are
    /// turned into an [`OptionSpec`](crate::OptionSpec).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_document(path.as_ref())
    }

    /// Saves option definitions, format chosen by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_document(path.as_ref(), self)
    }
}

/// Base name of the running executable, as found in the first process
/// argument.
pub fn default_program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "getopt".to_string())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let value = if is_json(path) {
        serde_json::from_reader(reader)?
    } else {
        serde_yaml::from_reader(reader)?
    };
    Ok(value)
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    if is_json(path) {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_yaml::to_writer(writer, value)?;
    }
    Ok(())
}
