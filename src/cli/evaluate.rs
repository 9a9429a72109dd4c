//! Evaluate command - score one source/documentation pair

use super::{check_fail_threshold, emit, RunSettings};
use anyhow::{Context, Result};
use docscore::extract::Language;
use docscore::{reporters, DocEvaluator, EvalError};
use std::path::Path;
use tracing::info;

pub fn run(
    evaluator: &DocEvaluator,
    source: &Path,
    doc: &Path,
    reference: Option<&Path>,
    language: Option<&str>,
    settings: &RunSettings,
) -> Result<()> {
    let language = language.map(parse_language).transpose()?;

    let report = evaluator
        .evaluate_files(source, doc, reference, language)
        .with_context(|| format!("Failed to evaluate {}", source.display()))?;
    info!(
        "Evaluated {} (aggregate {:.3}, grade {})",
        source.display(),
        report.aggregate,
        report.grade
    );

    let rendered = reporters::report(&report, settings.format)?;
    emit(&rendered, settings.output.as_deref())?;

    check_fail_threshold(settings.fail_under, report.aggregate);
    Ok(())
}

fn parse_language(name: &str) -> Result<Language, EvalError> {
    let lang = Language::from_name(name);
    if lang.is_known() {
        Ok(lang)
    } else {
        Err(EvalError::Input(format!(
            "Unknown language '{}'. Supported: {}",
            name,
            Language::KNOWN
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}
