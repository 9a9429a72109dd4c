//! Text (terminal) reporter with colors and formatting

use crate::models::{AccuracyBasis, AccuracyOutcome, BatchSummary, EvaluationReport};
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A" => "\x1b[32m", // Green
        "B" => "\x1b[92m", // Light green
        "C" => "\x1b[33m", // Yellow
        "D" => "\x1b[91m", // Light red
        "F" => "\x1b[31m", // Red
        _ => "\x1b[0m",
    }
}

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Maximum missing elements listed before eliding
const MAX_MISSING_SHOWN: usize = 10;

/// Render a single evaluation as formatted terminal output
pub fn render(report: &EvaluationReport) -> Result<String> {
    let mut out = String::new();

    let grade_c = grade_color(&report.grade);
    out.push_str(&format!("\n{BOLD}Documentation Evaluation{RESET}"));
    if let Some(lang) = report.language {
        out.push_str(&format!("  {DIM}({}){RESET}", lang));
    }
    out.push('\n');
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{:.1}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}",
        report.aggregate * 100.0,
        report.grade
    ));
    if report.aggregate_partial {
        out.push_str(&format!("  {DIM}(partial){RESET}"));
    }
    out.push_str("\n\n");

    out.push_str(&format!("{BOLD}SCORES{RESET}\n"));
    out.push_str(&format!(
        "  Completeness: {}  {DIM}{}/{} elements{RESET}\n",
        format_score(report.completeness),
        report.completeness_detail.matched.len(),
        report.completeness_detail.total
    ));
    out.push_str(&format!(
        "  Clarity:      {}  {DIM}{} sentences, {:.1} words/sentence{RESET}\n",
        format_score(report.clarity),
        report.clarity_detail.sentences,
        report.clarity_detail.avg_sentence_length
    ));
    out.push_str(&format!(
        "  Accuracy:     {}\n\n",
        format_accuracy(&report.accuracy_detail)
    ));

    let missing = &report.completeness_detail.missing;
    if !missing.is_empty() {
        out.push_str(&format!(
            "{BOLD}UNDOCUMENTED{RESET} ({} elements)\n",
            missing.len()
        ));
        for name in missing.iter().take(MAX_MISSING_SHOWN) {
            out.push_str(&format!("  - {}\n", name));
        }
        let remaining = missing.len().saturating_sub(MAX_MISSING_SHOWN);
        if remaining > 0 {
            out.push_str(&format!("  {DIM}...and {} more{RESET}\n", remaining));
        }
        out.push('\n');
    }

    for warning in &report.warnings {
        out.push_str(&format!("\x1b[33mwarning:{RESET} {}\n", warning));
    }

    Ok(out)
}

/// Render a batch summary as formatted terminal output
pub fn render_batch(summary: &BatchSummary) -> Result<String> {
    let mut out = String::new();
    let avg = &summary.averages;

    let grade_c = grade_color(&summary.grade);
    out.push_str(&format!("\n{BOLD}Documentation Evaluation{RESET}  {DIM}{}{RESET}\n", summary.source_root));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{:.1}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}  ",
        avg.aggregate * 100.0,
        summary.grade
    ));
    out.push_str(&format!(
        "Files: {}  Undocumented: {}\n\n",
        summary.files.len(),
        summary.missing_docs.len()
    ));

    out.push_str(&format!("{BOLD}AVERAGES{RESET}\n"));
    out.push_str(&format!(
        "  Completeness: {}  Clarity: {}  Accuracy: {}\n\n",
        format_score(avg.completeness),
        format_score(avg.clarity),
        avg.accuracy
            .map(format_score)
            .unwrap_or_else(|| format!("{DIM}n/a{RESET}"))
    ));

    if !summary.files.is_empty() {
        out.push_str(&format!(
            "{DIM}  GRADE  SCORE  COMPL  CLAR   ACC    FILE{RESET}\n"
        ));
        out.push_str(&format!(
            "{DIM}  ─────────────────────────────────────────────────────────────{RESET}\n"
        ));

        // Worst first
        let mut files: Vec<_> = summary.files.iter().collect();
        files.sort_by(|a, b| a.report.aggregate.total_cmp(&b.report.aggregate));

        for file in files {
            let r = &file.report;
            let acc = r
                .accuracy
                .map(|a| format!("{:>5.0}", a * 100.0))
                .unwrap_or_else(|| "  n/a".to_string());
            out.push_str(&format!(
                "  {}{:^5}{RESET}  {:>5.0}  {:>5.0}  {:>5.0}  {}  {}\n",
                grade_color(&r.grade),
                r.grade,
                r.aggregate * 100.0,
                r.completeness * 100.0,
                r.clarity * 100.0,
                acc,
                file.source_path
            ));
        }
        out.push('\n');
    }

    if !summary.missing_docs.is_empty() {
        out.push_str(&format!("{BOLD}MISSING DOCUMENTATION{RESET}\n"));
        for path in &summary.missing_docs {
            out.push_str(&format!("  - {}\n", path));
        }
        out.push('\n');
    }

    if !summary.failed.is_empty() {
        out.push_str(&format!("{BOLD}FAILED{RESET}\n"));
        for msg in &summary.failed {
            out.push_str(&format!("  \x1b[31m✗{RESET} {}\n", msg));
        }
        out.push('\n');
    }

    Ok(out)
}

fn format_accuracy(outcome: &AccuracyOutcome) -> String {
    match outcome {
        AccuracyOutcome::Measured(b) => {
            let basis = match b.basis {
                AccuracyBasis::Reference => "vs reference",
                AccuracyBasis::SourceConsistency => "vs source",
            };
            let mut s = format!("{}  {DIM}{}", format_score(b.score), basis);
            if b.degraded {
                s.push_str(", n-gram only");
            }
            s.push_str(RESET);
            s
        }
        AccuracyOutcome::NotComputable { .. } => format!("{DIM}not computable{RESET}"),
    }
}

fn format_score(score: f64) -> String {
    let pct = score * 100.0;
    let color = if pct >= 80.0 {
        "\x1b[32m"
    } else if pct >= 60.0 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    };
    format!("{color}{:>3.0}{RESET}", pct)
}
