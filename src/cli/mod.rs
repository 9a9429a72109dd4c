//! CLI command definitions and handlers

mod batch;
mod evaluate;
mod init;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docscore::config::{load_config_file, load_project_config, EvaluatorConfig};
use docscore::reporters::OutputFormat;
use docscore::DocEvaluator;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Parse and validate a score threshold (0.0-1.0)
fn parse_threshold(s: &str) -> Result<f64, String> {
    let t: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(0.0..=1.0).contains(&t) {
        Err("threshold must be between 0.0 and 1.0".to_string())
    } else {
        Ok(t)
    }
}

/// docscore - Score generated documentation against the code it describes
#[derive(Parser, Debug)]
#[command(name = "docscore")]
#[command(
    version,
    about = "Score generated source-code documentation for completeness, clarity, and accuracy",
    after_help = "\
Examples:
  docscore evaluate src/app.py docs/app.md                 Score one file
  docscore evaluate src/app.py docs/app.md -r ref/app.md   Score accuracy against a reference
  docscore batch src/ docs/ --format json -o scores.json   Score a whole project
  docscore batch src/ docs/ --fail-under 0.7               Exit code 1 below 70/100 (CI mode)
  docscore init                                            Write an example docscore.toml"
)]
pub struct Cli {
    /// Config file (default: docscore.toml or .docscorerc.json in the current directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Output format: text, json, markdown (or md)
    #[arg(long, short = 'f', global = true, value_parser = ["text", "json", "markdown", "md"])]
    pub format: Option<String>,

    /// Output file path (default: stdout)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<PathBuf>,

    /// Enable semantic similarity scoring (requires an embedding backend)
    #[arg(long, global = true)]
    pub semantic: bool,

    /// Embedding model for semantic scoring
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// API key for the embedding backend
    #[arg(long, global = true, env = "DOCSCORE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Exit with code 1 if the aggregate score is below this (0.0-1.0)
    #[arg(long, global = true, value_parser = parse_threshold)]
    pub fail_under: Option<f64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one documentation file against its source file
    Evaluate {
        /// Source code file
        source: PathBuf,

        /// Generated documentation file
        doc: PathBuf,

        /// Reference documentation to measure accuracy against
        #[arg(long, short = 'r')]
        reference: Option<PathBuf>,

        /// Source language (default: detected from the file extension)
        #[arg(long, short = 'l')]
        language: Option<String>,
    },

    /// Score every documented source file in a project
    #[command(after_help = "\
Each source file SRC_DIR/path/name.ext is paired with DOCS_DIR/path/name.md,
and with REFERENCE_DIR/path/name.md when --reference-dir is given.")]
    Batch {
        /// Source tree root
        source_dir: PathBuf,

        /// Documentation tree root
        docs_dir: PathBuf,

        /// Reference documentation tree root
        #[arg(long)]
        reference_dir: Option<PathBuf>,

        /// Additional directory names to skip
        #[arg(long, short = 'e')]
        exclude: Vec<String>,
    },

    /// Write an example docscore.toml config file
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing docscore.toml
        #[arg(long)]
        force: bool,
    },
}

/// Settings shared by the scoring commands after config and flags are merged
pub(crate) struct RunSettings {
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub fail_under: Option<f64>,
}

pub fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { path, force } = &cli.command {
        return init::run(path, *force);
    }

    let config = resolve_config(&cli)?;
    let settings = RunSettings {
        format: OutputFormat::from_str(
            cli.format
                .as_deref()
                .or(config.defaults.format.as_deref())
                .unwrap_or("text"),
        )?,
        output: cli.output.clone(),
        fail_under: cli.fail_under.or(config.defaults.fail_under),
    };
    let evaluator = DocEvaluator::new(config)?;

    match cli.command {
        Commands::Evaluate {
            source,
            doc,
            reference,
            language,
        } => evaluate::run(
            &evaluator,
            &source,
            &doc,
            reference.as_deref(),
            language.as_deref(),
            &settings,
        ),
        Commands::Batch {
            source_dir,
            docs_dir,
            reference_dir,
            exclude,
        } => batch::run(&evaluator, source_dir, docs_dir, reference_dir, exclude, &settings),
        // Handled before the evaluator is built
        Commands::Init { .. } => Ok(()),
    }
}

/// Load the config file and apply command-line overrides
fn resolve_config(cli: &Cli) -> Result<EvaluatorConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            load_project_config(&cwd)
        }
    };

    if cli.semantic {
        config.semantic.enabled = true;
    }
    if let Some(model) = &cli.model {
        config.semantic.model = Some(model.clone());
    }
    if let Some(key) = &cli.api_key {
        config.credential = Some(key.clone());
    }
    debug!("Resolved config: {:?}", config.weights);
    Ok(config)
}

/// Write rendered output to the requested file, or stdout
pub(crate) fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Exit with code 1 when the score is under the threshold
pub(crate) fn check_fail_threshold(fail_under: Option<f64>, score: f64) {
    if let Some(threshold) = fail_under {
        if score < threshold {
            eprintln!(
                "Failing: score {:.3} is below --fail-under={}",
                score, threshold
            );
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("0.7"), Ok(0.7));
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("abc").is_err());
    }

    #[test]
    fn test_cli_parses_evaluate() {
        let cli = Cli::try_parse_from([
            "docscore", "evaluate", "a.py", "a.md", "-r", "ref.md", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.format.as_deref(), Some("json"));
        match cli.command {
            Commands::Evaluate { reference, .. } => {
                assert_eq!(reference, Some(PathBuf::from("ref.md")))
            }
            _ => panic!("expected evaluate"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["docscore", "--format", "sarif", "init"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "docscore",
            "--semantic",
            "--model",
            "custom-embed",
            "--api-key",
            "sk-test",
            "batch",
            "src",
            "docs",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert!(config.semantic.enabled);
        assert_eq!(config.semantic.model.as_deref(), Some("custom-embed"));
        assert_eq!(config.credential.as_deref(), Some("sk-test"));
    }
}
