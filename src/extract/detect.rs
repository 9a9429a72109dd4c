//! Content-based language detection
//!
//! Used when no language hint is available. Each language has a few
//! weighted lexical signals, mostly line-anchored declaration and import
//! forms, so prose in comments and docstrings rarely counts. The language
//! with the highest total wins; no signal at all means `Unknown`.

use super::language::Language;
use regex::Regex;
use std::sync::OnceLock;

/// Matches of one signal beyond this count add nothing
const MAX_HITS_PER_SIGNAL: usize = 5;

struct Signal {
    weight: usize,
    regex: Regex,
}

fn signal(weight: usize, pattern: &str) -> Signal {
    Signal {
        weight,
        regex: Regex::new(pattern).expect("valid regex"),
    }
}

static SIGNALS: OnceLock<Vec<(Language, Vec<Signal>)>> = OnceLock::new();

/// Ordered table; on a tie the earlier language wins
fn signal_table() -> &'static [(Language, Vec<Signal>)] {
    SIGNALS.get_or_init(build_signals)
}

fn build_signals() -> Vec<(Language, Vec<Signal>)> {
    let js_signals = || {
        vec![
            signal(2, r"\bfunction\b[ \t]*\*?[ \t]*[\w$]*[ \t]*\("),
            signal(1, r"(?m)^[ \t]*(?:export[ \t]+)?(?:const|let|var)[ \t]+[\w$]+[ \t]*="),
            signal(1, r"=>"),
            signal(
                2,
                r#"(?m)^[ \t]*(?:import[ \t][^\n]*[ \t]from[ \t]+['"]|module\.exports\b|export[ \t]+(?:default|const|function|class)\b)|\brequire\(['"]"#,
            ),
        ]
    };

    let c_signals = || {
        vec![
            signal(2, r#"(?m)^[ \t]*#[ \t]*include[ \t]*[<"]"#),
            signal(1, r"(?m)^[ \t]*#[ \t]*define[ \t]"),
            signal(
                2,
                r"(?m)^(?:static[ \t]+)?(?:inline[ \t]+)?(?:const[ \t]+)?(?:unsigned[ \t]+)?(?:void|int|char|long|float|double|size_t|bool|struct[ \t]+\w+)[ \t\*]+\w+[ \t]*\([^;{)]*\)[ \t]*\{?[ \t]*$",
            ),
        ]
    };

    let mut typescript = js_signals();
    typescript.extend([
        signal(
            3,
            r"(?m)^[ \t]*(?:export[ \t]+)?(?:declare[ \t]+)?(?:interface[ \t]+\w+|type[ \t]+\w+[ \t]*(?:<[^>\n]*>)?[ \t]*=)",
        ),
        signal(
            2,
            r"\w[ \t]*\??:[ \t]*(?:string|number|boolean|void|any|unknown|never)\b",
        ),
    ]);

    let mut cpp = c_signals();
    cpp.extend([
        signal(3, r"\bstd::(?:\w+<|cout\b|cerr\b|endl\b)"),
        signal(3, r"(?m)^[ \t]*template[ \t]*<"),
        signal(
            3,
            r"(?m)^[ \t]*#[ \t]*include[ \t]*<(?:iostream|vector|string|memory|map|algorithm)>",
        ),
        signal(3, r"(?m)^[ \t]*(?:public|private|protected):[ \t]*$"),
        signal(2, r"\bnullptr\b"),
        signal(2, r"(?m)^[ \t]*namespace[ \t]+\w+[ \t]*\{"),
    ]);

    vec![
        (
            Language::Python,
            vec![
                signal(
                    3,
                    r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+\w+[ \t]*\([^)]*\)[^:\n]*:",
                ),
                signal(2, r"(?m)^[ \t]*class[ \t]+\w+[^\n{;]*:[ \t]*$"),
                signal(
                    1,
                    r"(?m)^(?:from[ \t]+[\w.]+[ \t]+import\b|import[ \t]+[\w.]+(?:[ \t]+as[ \t]+\w+)?[ \t]*$)",
                ),
            ],
        ),
        (Language::JavaScript, js_signals()),
        (Language::TypeScript, typescript),
        (
            Language::Rust,
            vec![
                signal(
                    3,
                    r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?(?:const[ \t]+)?(?:async[ \t]+)?(?:unsafe[ \t]+)?fn[ \t]+\w+",
                ),
                signal(
                    2,
                    r"(?m)^[ \t]*(?:impl\b|use[ \t]+[\w:]+::|(?:pub[ \t]+)?mod[ \t]+\w+[ \t]*[;{]|#\[)",
                ),
                signal(1, r"\blet[ \t]+mut\b|&mut\b"),
            ],
        ),
        (
            Language::Go,
            vec![
                signal(3, r"(?m)^package[ \t]+\w+[ \t]*$"),
                signal(2, r"(?m)^func[ \t]+(?:\([^)]*\)[ \t]*)?\w+[ \t]*\("),
                signal(1, r":="),
            ],
        ),
        (
            Language::Java,
            vec![
                signal(3, r"(?m)^package[ \t]+[\w.]+;"),
                signal(2, r"(?m)^import[ \t]+(?:static[ \t]+)?[\w.]+(?:\.\*)?;"),
                signal(
                    2,
                    r"(?m)^[ \t]*(?:@\w+[ \t]+)*(?:public|private|protected)[ \t]+(?:(?:static|final|abstract)[ \t]+)*(?:void|class|interface|enum|int|long|boolean|String)\b",
                ),
                signal(2, r"\bSystem\.out\."),
            ],
        ),
        (
            Language::CSharp,
            vec![
                signal(3, r"(?m)^[ \t]*using[ \t]+(?:static[ \t]+)?[\w.]+[ \t]*;"),
                signal(2, r"(?m)^[ \t]*namespace[ \t]+[\w.]+"),
                signal(2, r"\{[ \t]*get;"),
                signal(
                    2,
                    r"(?m)^[ \t]*(?:public|private|protected|internal)[ \t]+(?:(?:static|async|override|virtual)[ \t]+)*(?:void|string|Task)\b",
                ),
            ],
        ),
        (
            Language::Kotlin,
            vec![
                signal(
                    3,
                    r"(?m)^[ \t]*(?:(?:private|public|internal|protected|override|suspend|inline|open|operator)[ \t]+)*fun[ \t]+",
                ),
                signal(1, r"(?m)^[ \t]*(?:val|var)[ \t]+\w+[ \t]*[:=]"),
                signal(2, r"(?m)^package[ \t]+\w+(?:\.\w+)+[ \t]*$"),
            ],
        ),
        (Language::C, c_signals()),
        (Language::Cpp, cpp),
        (
            Language::Ruby,
            vec![
                signal(
                    3,
                    r"(?m)^[ \t]*def[ \t]+(?:self\.)?\w+[?!=]?[ \t]*(?:\([^)\n]*\))?[ \t]*$",
                ),
                signal(1, r"(?m)^[ \t]*end[ \t]*$"),
                signal(2, r#"(?m)^[ \t]*require(?:_relative)?[ \t]+['"]"#),
                signal(
                    2,
                    r"(?m)^[ \t]*(?:module[ \t]+[A-Z]\w*|attr_(?:reader|writer|accessor)\b)",
                ),
            ],
        ),
        (
            Language::Php,
            vec![
                signal(10, r"<\?php"),
                signal(3, r"\$this->"),
                signal(1, r"\$\w+[ \t]*="),
            ],
        ),
        (
            Language::Swift,
            vec![
                signal(
                    3,
                    r"(?m)^[ \t]*import[ \t]+(?:Foundation|UIKit|SwiftUI|Combine|XCTest)\b",
                ),
                signal(
                    3,
                    r"(?m)^[ \t]*(?:(?:public|private|fileprivate|internal|open|static|override|@\w+)[ \t]+)*func[ \t]+\w+[ \t]*(?:<[^>\n]*>)?\([^)]*\)[ \t]*(?:(?:throws|async)[ \t]*)*->",
                ),
                signal(2, r"(?m)^[ \t]*(?:guard|if)[ \t]+let[ \t]"),
                signal(3, r"(?m)^[ \t]*(?:protocol|extension)[ \t]+\w+[^\n{]*\{"),
                signal(1, r"(?m)^[ \t]*(?:let|var)[ \t]+\w+[ \t]*:[ \t]*[A-Z]"),
            ],
        ),
    ]
}

/// Weighted signal total for one language
fn score(source: &str, signals: &[Signal]) -> usize {
    signals
        .iter()
        .map(|s| s.weight * s.regex.find_iter(source).take(MAX_HITS_PER_SIGNAL).count())
        .sum()
}

/// Best-guess language of `source`, or `Unknown` when nothing looks like code.
pub fn detect_language(source: &str) -> Language {
    let mut best = (Language::Unknown, 0);
    for (lang, signals) in signal_table() {
        let total = score(source, signals);
        if total > best.1 {
            best = (*lang, total);
        }
    }
    best.0
}
