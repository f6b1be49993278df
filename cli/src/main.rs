use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use getopt_canon_core::{
    CommandOptions, Diagnostic, Diagnostics, OptionSpec, PosixMode, ReorderConfig, Reorderer,
    TracingDiagnostics, parse_longopts, parse_optstring,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for the reordered arguments.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// One argument per line.
    Lines,
    /// NUL-terminated arguments.
    Nul,
    /// A JSON array of strings.
    Json,
    /// Single-quoted words for shell `eval`, like getopt(1).
    Shell,
}

#[derive(Debug, Parser)]
#[command(name = "canonargs", version)]
#[command(about = "Reorder command-line arguments into GNU getopt canonical order")]
struct Cli {
    /// YAML or JSON file with the command's option definitions.
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
    /// Short options as a getopt(1) optstring (e.g. "vo:c::").
    #[arg(short, long, value_name = "OPTSTRING", allow_hyphen_values = true)]
    short: Option<String>,
    /// Comma-separated long options (e.g. "verbose,output:,color::"). Repeatable.
    #[arg(short, long, value_name = "LONGOPTS")]
    long: Vec<String>,
    /// YAML or JSON reorderer configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Stop option scanning at the first operand.
    #[arg(long, conflicts_with = "no_posix")]
    posix: bool,
    /// Ignore POSIXLY_CORRECT and keep scanning past operands.
    #[arg(long)]
    no_posix: bool,
    /// Keep operands in place instead of moving them after the options.
    #[arg(long)]
    no_permute: bool,
    /// Require exact long option names (no abbreviations).
    #[arg(long)]
    exact: bool,
    /// Program name used to prefix warnings.
    #[arg(short, long, value_name = "PROG")]
    name: Option<String>,
    /// Output format.
    #[arg(long, default_value = "lines")]
    format: OutputFormat,
    /// Exit with an error if any warning was reported.
    #[arg(long)]
    strict: bool,
    /// Suppress warnings.
    #[arg(short, long)]
    quiet: bool,
    /// Send warnings through the log instead of printing them.
    #[arg(long)]
    log_warnings: bool,
    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Arguments to reorder.
    #[arg(last = true)]
    args: Vec<String>,
}

/// Counts warnings and forwards them to stderr or the log.
struct WarningSink {
    prog: String,
    quiet: bool,
    log: Option<TracingDiagnostics>,
    count: usize,
}

impl Diagnostics for WarningSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.count += 1;
        if self.quiet {
            return;
        }
        match self.log.as_mut() {
            Some(log) => log.report(diagnostic),
            None => eprintln!("{}: {diagnostic}", self.prog),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let (reorderer, quiet) = build_reorderer(&cli)?;

    let prog = reorderer.program_name().to_string();
    let mut sink = WarningSink {
        log: cli.log_warnings.then(|| TracingDiagnostics::new(prog.clone())),
        prog,
        quiet: quiet || cli.quiet,
        count: 0,
    };

    let args = reorderer.parse(cli.args, &mut sink);
    let rendered = render(&args, cli.format)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| format!("Failed to write output: {err}"))?;

    if cli.strict && sink.count > 0 {
        return Err(format!("{} warning(s) reported", sink.count));
    }
    Ok(())
}

/// Builds the reorderer from definition files and flags.
///
/// Returns whether the optstring asked for quiet operation alongside it.
/// Flags override the configuration file.
fn build_reorderer(cli: &Cli) -> Result<(Reorderer, bool), String> {
    let mut config = match &cli.config {
        Some(path) => ReorderConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ReorderConfig::default(),
    };

    let mut spec = match &cli.options {
        Some(path) => {
            let command = CommandOptions::load(path)
                .map_err(|err| format!("Failed to load options '{}': {err}", path.display()))?;
            if config.prog.is_none() {
                config.prog = Some(command.command.clone());
            }
            OptionSpec::from_command(&command)
                .map_err(|err| format!("Invalid options in '{}': {err}", path.display()))?
        }
        None => OptionSpec::new(),
    };

    let mut quiet = false;
    if let Some(short) = &cli.short {
        let optstring = parse_optstring(short).map_err(|err| err.to_string())?;
        config.apply_ordering(optstring.ordering);
        quiet = optstring.quiet;
        for (key, arity) in optstring.options {
            spec.insert(key, arity).map_err(|err| err.to_string())?;
        }
    }
    for long in &cli.long {
        for (key, arity) in parse_longopts(long).map_err(|err| err.to_string())? {
            spec.insert(key, arity).map_err(|err| err.to_string())?;
        }
    }

    if cli.posix {
        config.posix = PosixMode::On;
    } else if cli.no_posix {
        config.posix = PosixMode::Off;
    }
    if cli.no_permute {
        config.permute = false;
    }
    if cli.exact {
        config.abbreviate = false;
    }
    if let Some(name) = &cli.name {
        config.prog = Some(name.clone());
    }

    debug!(options = spec.len(), ?config, "Loaded option table");
    Ok((Reorderer::with_config(spec, &config), quiet))
}

fn render(args: &[String], format: OutputFormat) -> Result<String, String> {
    let rendered = match format {
        OutputFormat::Lines => args.iter().map(|arg| format!("{arg}\n")).collect(),
        OutputFormat::Nul => args.iter().map(|arg| format!("{arg}\0")).collect(),
        OutputFormat::Json => {
            let mut json = serde_json::to_string(args)
                .map_err(|err| format!("JSON serialization failed: {err}"))?;
            json.push('\n');
            json
        }
        OutputFormat::Shell => {
            let mut line: String = args.iter().map(|arg| format!(" {}", shell_quote(arg))).collect();
            line.push('\n');
            line
        }
    };
    Ok(rendered)
}

fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("plain"), "'plain'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_render_formats() {
        let args = vec!["-v".to_string(), "a b".to_string()];
        assert_eq!(render(&args, OutputFormat::Lines).unwrap(), "-v\na b\n");
        assert_eq!(render(&args, OutputFormat::Nul).unwrap(), "-v\0a b\0");
        assert_eq!(render(&args, OutputFormat::Json).unwrap(), "[\"-v\",\"a b\"]\n");
        assert_eq!(render(&args, OutputFormat::Shell).unwrap(), " '-v' 'a b'\n");
    }

    #[test]
    fn test_flags_override_optstring_ordering() {
        let cli = Cli::parse_from(["canonargs", "-s", "+:v", "--no-posix", "-n", "demo"]);
        let (reorderer, quiet) = build_reorderer(&cli).unwrap();
        assert!(!reorderer.is_posix());
        assert!(quiet);
        assert_eq!(reorderer.program_name(), "demo");
        assert_eq!(reorderer.spec().len(), 1);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
