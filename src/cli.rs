//! `ts-catalog` command line interface.

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use clap::{
    Args,
    Parser,
    Subcommand,
};
use thiserror::Error;

use crate::catalog::{
    Catalog,
    CatalogError,
    CoverageReport,
};
use crate::config::{
    CONFIG_FILE_NAME,
    CatalogSettings,
    ConfigError,
};
use crate::discovery::{
    DiscoveryError,
    find_translation_files,
};
use crate::input::parse_ts;

/// Inspect Qt Linguist translation catalogs
#[derive(Debug, Parser)]
#[command(name = "ts-catalog")]
#[command(about = "Resolve strings and report coverage of Qt Linguist (.ts) catalogs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Workspace root directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub workspace_root: PathBuf,

    /// Active locale, overrides the configuration file (e.g. zh_CN)
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Translation resource to load; repeatable, disables discovery
    #[arg(long = "file", global = true)]
    pub files: Vec<PathBuf>,

    /// Log loading details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a source string to its display text
    Resolve(ResolveArgs),
    /// List contexts
    Contexts,
    /// Report translated and untranslated messages per context
    Coverage(CoverageArgs),
    /// Load the catalog and report whether it is valid
    Check,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Context name, `""` for the global context
    pub context: String,
    /// Source string as written in the code
    pub source: String,
    /// Values for %1, %2, …
    pub args: Vec<String>,
    /// Disambiguation comment
    #[arg(long)]
    pub comment: Option<String>,
    /// Count for numerus messages (%n)
    #[arg(long, allow_negative_numbers = true)]
    pub count: Option<i64>,
}

#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("No translation files found under {}", .0.display())]
    NoResources(PathBuf),

    #[error("Could not determine the locale. Pass --locale or set \"locale\" in {CONFIG_FILE_NAME}")]
    UnknownLocale,

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Run `cli`, writing command output to `out`.
///
/// # Errors
/// Configuration, discovery or loading failures, and output errors.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let catalog = open_catalog(cli)?;

    match &cli.command {
        Command::Resolve(args) => {
            let values: Vec<&str> = args.args.iter().map(String::as_str).collect();
            let text = match (&args.comment, args.count) {
                (Some(comment), Some(count)) => catalog.resolve_plural_disambiguated(
                    &args.context,
                    &args.source,
                    comment,
                    count,
                    &values,
                ),
                (None, Some(count)) => {
                    catalog.resolve_plural(&args.context, &args.source, count, &values)
                }
                (Some(comment), None) => {
                    catalog.resolve_disambiguated(&args.context, &args.source, comment, &values)
                }
                (None, None) => catalog.resolve(&args.context, &args.source, &values),
            };
            writeln!(out, "{text}")?;
        }
        Command::Contexts => {
            for context in catalog.list_contexts() {
                writeln!(out, "{context}")?;
            }
        }
        Command::Coverage(args) => {
            let report = catalog.coverage();
            if args.json {
                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            } else {
                write_coverage(out, &report)?;
            }
        }
        Command::Check => {
            writeln!(
                out,
                "ok: {} messages in {} contexts ({})",
                catalog.len(),
                catalog.list_contexts().len(),
                catalog.locale()
            )?;
        }
    }

    Ok(())
}

/// Resolve settings and resources, then load the catalog.
fn open_catalog(cli: &Cli) -> Result<Catalog, CliError> {
    let settings = CatalogSettings::load(&cli.workspace_root, cli.locale.as_deref())?;

    let files = if cli.files.is_empty() {
        find_translation_files(&cli.workspace_root, &settings)?
    } else {
        cli.files.clone()
    };
    if files.is_empty() {
        return Err(CliError::NoResources(cli.workspace_root.clone()));
    }

    let locale = match settings.locale {
        Some(locale) => locale,
        None => detect_locale(&files)?.ok_or(CliError::UnknownLocale)?,
    };
    tracing::debug!(%locale, files = files.len(), "Opening translation catalog");

    Ok(Catalog::load_with_policy(&files, &locale, settings.duplicate_keys)?)
}

/// `language` of the first resource that declares one.
fn detect_locale(files: &[PathBuf]) -> Result<Option<String>, CatalogError> {
    for path in files {
        let text = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.clone(), source })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        if let Some(language) = parse_ts(text, Path::new(path))?.language {
            tracing::debug!(path = %path.display(), %language, "Detected locale");
            return Ok(Some(language));
        }
    }
    Ok(None)
}

/// Human readable coverage table.
fn write_coverage(out: &mut impl Write, report: &CoverageReport) -> std::io::Result<()> {
    writeln!(
        out,
        "{}: {}% ({}/{} finished)",
        report.locale,
        report.percent(),
        report.finished(),
        report.total()
    )?;

    let width = report.contexts.iter().map(|context| context.context.len()).max().unwrap_or(0);
    for context in &report.contexts {
        let name = if context.context.is_empty() { "<global>" } else { &context.context };
        write!(
            out,
            "  {name:<width$}  {:>3}%  {}/{}",
            context.percent(),
            context.finished,
            context.total
        )?;
        if context.vanished > 0 {
            write!(out, "  ({} vanished)", context.vanished)?;
        }
        writeln!(out)?;
        for source in &context.untranslated {
            writeln!(out, "    - {source}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_parse_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "ts-catalog",
            "--locale",
            "zh_CN",
            "resolve",
            "dialogs",
            "File %1 already exists. Overwrite?",
            "test.vsqx",
        ])
        .unwrap();

        assert_eq!(cli.locale.as_deref(), Some("zh_CN"));
        let Command::Resolve(args) = cli.command else {
            unreachable!("parsed a different subcommand");
        };
        assert_eq!(args.context, "dialogs");
        assert_eq!(args.args, vec!["test.vsqx".to_string()]);
        assert_eq!(args.count, None);
    }

    #[rstest]
    fn test_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ts-catalog",
            "coverage",
            "--json",
            "--file",
            "a.ts",
            "--file",
            "b.ts",
            "-C",
            "workspace",
        ])
        .unwrap();

        assert_eq!(cli.files, vec![PathBuf::from("a.ts"), PathBuf::from("b.ts")]);
        assert_eq!(cli.workspace_root, PathBuf::from("workspace"));
        assert!(matches!(cli.command, Command::Coverage(CoverageArgs { json: true })));
    }

    #[rstest]
    fn test_parse_negative_count() {
        let cli =
            Cli::try_parse_from(["ts-catalog", "resolve", "c", "%n item(s)", "--count", "-2"])
                .unwrap();

        let Command::Resolve(args) = cli.command else {
            unreachable!("parsed a different subcommand");
        };
        assert_eq!(args.count, Some(-2));
    }

    #[rstest]
    fn test_parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["ts-catalog"]).is_err());
    }
}
