//! Project-wide evaluation
//!
//! Walks a source tree, pairs each supported source file `rel/x.ext` with
//! `<docs>/rel/x.md` (and optionally `<refs>/rel/x.md`), and evaluates the
//! pairs in parallel. Evaluations share nothing but the read-only evaluator.

use crate::evaluator::DocEvaluator;
use crate::extract::Language;
use crate::models::{grade_from_score, BatchAverages, BatchSummary, FileEvaluation};
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directories never descended into
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    "node_modules",
    "venv",
    "__pycache__",
    "dist",
    "build",
];

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub source_root: PathBuf,
    pub docs_root: PathBuf,
    pub reference_root: Option<PathBuf>,
    /// Extra directory names to skip, on top of [`DEFAULT_EXCLUDES`]
    pub exclude: Vec<String>,
    /// Extension of documentation files (default: "md")
    pub doc_extension: String,
}

impl BatchOptions {
    pub fn new(source_root: impl Into<PathBuf>, docs_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            docs_root: docs_root.into(),
            reference_root: None,
            exclude: Vec::new(),
            doc_extension: "md".to_string(),
        }
    }
}

/// Documentation path for a source file relative to the source root
pub fn doc_path_for(relative: &Path, docs_root: &Path, extension: &str) -> PathBuf {
    docs_root.join(relative).with_extension(extension)
}

/// Collect supported source files under `root`, sorted.
///
/// Respects `.gitignore`, skips hidden entries, [`DEFAULT_EXCLUDES`],
/// `exclude`, and any path under `skip` (used to keep an in-tree docs
/// directory out of the source set).
pub fn collect_source_files(root: &Path, exclude: &[String], skip: &[PathBuf]) -> Vec<PathBuf> {
    let excluded: Vec<String> = DEFAULT_EXCLUDES
        .iter()
        .map(|s| s.to_string())
        .chain(exclude.iter().cloned())
        .collect();
    let skip = skip.to_vec();

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .filter_entry(move |entry| {
            let name = entry.file_name().to_string_lossy();
            if entry.file_type().map_or(false, |t| t.is_dir()) && excluded.iter().any(|e| *e == name) {
                return false;
            }
            !skip.iter().any(|s| entry.path().starts_with(s))
        })
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| Language::from_path(e.path()).is_known())
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

enum Pairing {
    Evaluated(FileEvaluation),
    MissingDoc(String),
    Failed(String),
}

/// Evaluate every source/documentation pair under the configured roots.
pub fn evaluate_project(
    evaluator: &DocEvaluator,
    options: &BatchOptions,
    progress: Option<&ProgressBar>,
) -> Result<BatchSummary> {
    let source_root = options
        .source_root
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", options.source_root.display()))?;
    let docs_root = options
        .docs_root
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", options.docs_root.display()))?;
    let reference_root = options
        .reference_root
        .as_ref()
        .map(|r| {
            r.canonicalize()
                .with_context(|| format!("Path does not exist: {}", r.display()))
        })
        .transpose()?;

    let mut skip = vec![docs_root.clone()];
    skip.extend(reference_root.iter().cloned());

    let files = collect_source_files(&source_root, &options.exclude, &skip);
    info!("Found {} source files under {}", files.len(), source_root.display());
    if let Some(pb) = progress {
        pb.set_length(files.len() as u64);
    }

    let results: Vec<Pairing> = files
        .par_iter()
        .map(|path| {
            let result = evaluate_one(
                evaluator,
                path,
                &source_root,
                &docs_root,
                reference_root.as_deref(),
                &options.doc_extension,
            );
            if let Some(pb) = progress {
                pb.inc(1);
            }
            result
        })
        .collect();

    let mut evaluated = Vec::new();
    let mut missing_docs = Vec::new();
    let mut failed = Vec::new();
    for r in results {
        match r {
            Pairing::Evaluated(e) => evaluated.push(e),
            Pairing::MissingDoc(p) => missing_docs.push(p),
            Pairing::Failed(msg) => failed.push(msg),
        }
    }

    let averages = BatchAverages::from_files(&evaluated);
    info!(
        "Evaluated {} files ({} without docs, {} failed)",
        evaluated.len(),
        missing_docs.len(),
        failed.len()
    );

    Ok(BatchSummary {
        source_root: source_root.display().to_string(),
        docs_root: docs_root.display().to_string(),
        evaluated_at: chrono::Utc::now(),
        grade: grade_from_score(averages.aggregate),
        files: evaluated,
        missing_docs,
        failed,
        averages,
    })
}

fn evaluate_one(
    evaluator: &DocEvaluator,
    path: &Path,
    source_root: &Path,
    docs_root: &Path,
    reference_root: Option<&Path>,
    doc_extension: &str,
) -> Pairing {
    let relative = path.strip_prefix(source_root).unwrap_or(path);
    let rel_display = relative.display().to_string();

    let doc_path = doc_path_for(relative, docs_root, doc_extension);
    if !doc_path.is_file() {
        debug!("No documentation for {} (expected {})", rel_display, doc_path.display());
        return Pairing::MissingDoc(rel_display);
    }

    let reference_path = reference_root
        .map(|root| doc_path_for(relative, root, doc_extension))
        .filter(|p| p.is_file());

    match evaluator.evaluate_files(path, &doc_path, reference_path.as_deref(), None) {
        Ok(report) => Pairing::Evaluated(FileEvaluation {
            source_path: rel_display,
            doc_path: doc_path.display().to_string(),
            reference_path: reference_path.map(|p| p.display().to_string()),
            report,
        }),
        Err(e) => {
            warn!("Failed to evaluate {}: {:#}", rel_display, e);
            Pairing::Failed(format!("{}: {:#}", rel_display, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_doc_path_for() {
        assert_eq!(
            doc_path_for(Path::new("pkg/util.py"), Path::new("/docs"), "md"),
            PathBuf::from("/docs/pkg/util.md")
        );
    }

    #[test]
    fn test_collect_skips_excluded_and_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("a.py"), "def a(): pass\n");
        write(&root.join("pkg/b.rs"), "fn b() {}\n");
        write(&root.join("notes.txt"), "text\n");
        write(&root.join("node_modules/dep/index.js"), "function dep() {}\n");
        write(&root.join("generated/c.py"), "def c(): pass\n");
        write(&root.join("docs/a.py"), "def not_source(): pass\n");

        let files = collect_source_files(
            root,
            &["generated".to_string()],
            &[root.join("docs")],
        );
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(rel, vec![PathBuf::from("a.py"), PathBuf::from("pkg/b.rs")]);
    }

    #[test]
    fn test_evaluate_project() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let docs = dir.path().join("docs");
        let refs = dir.path().join("refs");
        write(&src.join("app.py"), "def start():\n    pass\n\ndef stop():\n    pass\n");
        write(&src.join("lib/util.js"), "function helper() {}\n");
        write(&src.join("orphan.go"), "func Orphan() {}\n");
        write(&docs.join("app.md"), "Call start to begin. Call stop to end.");
        write(&docs.join("lib/util.md"), "Nothing useful here.");
        write(&refs.join("app.md"), "Call start to begin. Call stop to end.");

        let mut options = BatchOptions::new(&src, &docs);
        options.reference_root = Some(refs);
        let summary = evaluate_project(&DocEvaluator::default(), &options, None).unwrap();

        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.missing_docs, vec!["orphan.go".to_string()]);
        assert!(summary.failed.is_empty());

        let app = summary
            .files
            .iter()
            .find(|f| f.source_path == "app.py")
            .unwrap();
        assert_eq!(app.report.completeness, 1.0);
        assert_eq!(app.report.accuracy, Some(1.0));
        assert!(app.reference_path.is_some());

        let util = summary
            .files
            .iter()
            .find(|f| f.source_path.ends_with("util.js"))
            .unwrap();
        assert_eq!(util.report.completeness, 0.0);
        assert_eq!(util.report.accuracy, None);

        assert!((summary.averages.completeness - 0.5).abs() < 1e-12);
        assert_eq!(summary.averages.accuracy, Some(1.0));
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = BatchOptions::new(dir.path().join("nope"), dir.path());
        assert!(evaluate_project(&DocEvaluator::default(), &options, None).is_err());
    }
}
