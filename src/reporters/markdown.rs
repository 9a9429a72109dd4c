//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Suitable for pull request comments and documentation dashboards.

use crate::models::{AccuracyOutcome, BatchSummary, EvaluationReport, FileEvaluation};
use anyhow::Result;
use chrono::Local;

/// Maximum undocumented elements listed per file
const MAX_MISSING_SHOWN: usize = 20;

/// Render a single evaluation as GitHub-flavored Markdown
pub fn render(report: &EvaluationReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(&report.grade, report.aggregate));
    md.push('\n');

    md.push_str(&render_scores(report));
    md.push('\n');

    md.push_str(&render_missing(&report.completeness_detail.missing));
    md.push('\n');

    if !report.warnings.is_empty() {
        md.push_str("## Warnings\n\n");
        for w in &report.warnings {
            md.push_str(&format!("- {}\n", w));
        }
        md.push('\n');
    }

    md.push_str(&render_footer());
    Ok(md)
}

/// Render a batch summary as GitHub-flavored Markdown
pub fn render_batch(summary: &BatchSummary) -> Result<String> {
    let mut md = String::new();
    let avg = &summary.averages;

    md.push_str(&render_header(&summary.grade, avg.aggregate));
    md.push('\n');

    md.push_str(&format!(
        r#"## Summary

| Metric | Value |
|--------|-------|
| **Files Evaluated** | {} |
| **Missing Documentation** | {} |
| **Completeness** | {:.1}/100 |
| **Clarity** | {:.1}/100 |
| **Accuracy** | {} |
"#,
        summary.files.len(),
        summary.missing_docs.len(),
        avg.completeness * 100.0,
        avg.clarity * 100.0,
        avg.accuracy
            .map(|a| format!("{:.1}/100", a * 100.0))
            .unwrap_or_else(|| "n/a".to_string()),
    ));
    md.push('\n');

    md.push_str(&render_file_table(&summary.files));
    md.push('\n');

    if !summary.missing_docs.is_empty() {
        md.push_str(&format!(
            "## Missing Documentation ({})\n\n",
            summary.missing_docs.len()
        ));
        for path in &summary.missing_docs {
            md.push_str(&format!("- `{}`\n", path));
        }
        md.push('\n');
    }

    if !summary.failed.is_empty() {
        md.push_str("## Failed\n\n");
        for msg in &summary.failed {
            md.push_str(&format!("- {}\n", msg));
        }
        md.push('\n');
    }

    md.push_str(&render_footer());
    Ok(md)
}

fn render_header(grade: &str, aggregate: f64) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        r#"# Documentation Evaluation Report

**Grade: {}** | **Score: {:.1}/100**

Generated: {}
"#,
        grade,
        aggregate * 100.0,
        timestamp
    )
}

fn render_scores(report: &EvaluationReport) -> String {
    let accuracy = match &report.accuracy_detail {
        AccuracyOutcome::Measured(b) => format!(
            "{:.1}/100 | {}",
            b.score * 100.0,
            score_indicator(b.score)
        ),
        AccuracyOutcome::NotComputable { .. } => "n/a | ➖ Not computable".to_string(),
    };

    let mut md = format!(
        r#"## Scores

| Category | Score | Status |
|----------|-------|--------|
| Completeness | {:.1}/100 | {} |
| Clarity | {:.1}/100 | {} |
| Accuracy | {} |
"#,
        report.completeness * 100.0,
        score_indicator(report.completeness),
        report.clarity * 100.0,
        score_indicator(report.clarity),
        accuracy
    );
    if report.aggregate_partial {
        md.push_str("\n*Aggregate computed from completeness and clarity only.*\n");
    }
    md
}

fn render_missing(missing: &[String]) -> String {
    let mut md = String::from("## Undocumented Elements\n\n");
    if missing.is_empty() {
        md.push_str("✅ Every extracted element is mentioned.\n");
        return md;
    }
    for name in missing.iter().take(MAX_MISSING_SHOWN) {
        md.push_str(&format!("- `{}`\n", name));
    }
    let hidden = missing.len().saturating_sub(MAX_MISSING_SHOWN);
    if hidden > 0 {
        md.push_str(&format!("\n*...and {} more*\n", hidden));
    }
    md
}

fn render_file_table(files: &[FileEvaluation]) -> String {
    let mut md = String::from(
        "## Files\n\n| File | Grade | Score | Completeness | Clarity | Accuracy |\n|------|-------|-------|--------------|---------|----------|\n",
    );
    for f in files {
        let r = &f.report;
        md.push_str(&format!(
            "| `{}` | {} | {:.1} | {:.1} | {:.1} | {} |\n",
            f.source_path,
            r.grade,
            r.aggregate * 100.0,
            r.completeness * 100.0,
            r.clarity * 100.0,
            r.accuracy
                .map(|a| format!("{:.1}", a * 100.0))
                .unwrap_or_else(|| "n/a".to_string())
        ));
    }
    md
}

fn render_footer() -> String {
    "---\n\n*Generated by docscore*\n".to_string()
}

fn score_indicator(score: f64) -> &'static str {
    if score >= 0.8 {
        "✅ Good"
    } else if score >= 0.6 {
        "⚠️ Fair"
    } else {
        "❌ Poor"
    }
}
