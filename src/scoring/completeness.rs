//! Mention coverage of extracted code elements

use crate::extract::{extract_elements, Language};
use crate::models::{clamp_score, CompletenessDetail};

/// Fraction of declared elements whose name appears (case-insensitively)
/// somewhere in the documentation. A source with no elements is vacuously
/// complete.
pub fn evaluate_completeness(source: &str, documentation: &str) -> f64 {
    completeness_detail(source, documentation, None).0
}

/// Completeness score plus the matched and missing names.
pub fn completeness_detail(
    source: &str,
    documentation: &str,
    language: Option<Language>,
) -> (f64, CompletenessDetail) {
    let elements = extract_elements(source, language);
    if elements.is_empty() {
        return (1.0, CompletenessDetail::default());
    }

    let doc_lower = documentation.to_lowercase();
    let (matched, missing): (Vec<String>, Vec<String>) = elements
        .into_iter()
        .partition(|name| doc_lower.contains(&name.to_lowercase()));

    let total = matched.len() + missing.len();
    let score = clamp_score(matched.len() as f64 / total as f64);

    (
        score,
        CompletenessDetail {
            total,
            matched,
            missing,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_elements_is_complete() {
        assert_eq!(evaluate_completeness("x = 1\nprint(x)\n", ""), 1.0);
        assert_eq!(evaluate_completeness("", "anything"), 1.0);
    }

    #[test]
    fn test_half_documented() {
        let source = "def foo(): pass\ndef bar(): pass";
        assert_eq!(evaluate_completeness(source, "This module defines foo."), 0.5);
    }

    #[test]
    fn test_case_insensitive() {
        let source = "class HttpClient:\n    def send(self):\n        pass\n";
        assert_eq!(
            evaluate_completeness(source, "The HTTPCLIENT class can SEND requests."),
            1.0
        );
    }

    #[test]
    fn test_prose_in_docstrings_and_comments_is_not_an_element() {
        let source = "class Server:\n    \"\"\"This class handles requests.\"\"\"\n    def run(self):\n        # Save the record to disk\n        pass\n";
        assert_eq!(evaluate_completeness(source, "Server exposes run()."), 1.0);
    }

    #[test]
    fn test_undocumented() {
        assert_eq!(evaluate_completeness("def foo(): pass", "Nothing here."), 0.0);
    }

    #[test]
    fn test_detail_lists_names() {
        let source = "def load(): pass\ndef save(): pass\ndef close(): pass";
        let (score, detail) =
            completeness_detail(source, "Use load() then save().", Some(Language::Python));
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(detail.total, 3);
        assert_eq!(detail.matched, vec!["load", "save"]);
        assert_eq!(detail.missing, vec!["close"]);
    }
}
