//! Batch command - score a whole documentation tree

use super::{check_fail_threshold, emit, RunSettings};
use anyhow::Result;
use docscore::batch::{evaluate_project, BatchOptions};
use docscore::reporters::{self, OutputFormat};
use docscore::DocEvaluator;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

pub fn run(
    evaluator: &DocEvaluator,
    source_dir: PathBuf,
    docs_dir: PathBuf,
    reference_dir: Option<PathBuf>,
    exclude: Vec<String>,
    settings: &RunSettings,
) -> Result<()> {
    let mut options = BatchOptions::new(source_dir, docs_dir);
    options.reference_root = reference_dir;
    options.exclude = exclude;

    // Progress only for interactive text output
    let progress = (settings.format == OutputFormat::Text && settings.output.is_none())
        .then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(create_bar_style());
            bar.set_message("Evaluating documentation...");
            bar
        });

    let summary = evaluate_project(evaluator, &options, progress.as_ref())?;
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let rendered = reporters::report_batch(&summary, settings.format)?;
    emit(&rendered, settings.output.as_deref())?;

    check_fail_threshold(settings.fail_under, summary.averages.aggregate);
    Ok(())
}

/// Create bar progress style
fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ")
}
