//! Per-language declaration patterns
//!
//! Each language maps to an ordered list of [`PatternRule`]s. Every rule has
//! exactly one capture group holding the declared identifier. Adding a
//! language means adding an entry here; scoring code never changes.

use super::language::Language;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// What a rule declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Function,
    Class,
    Method,
}

/// One lexical declaration pattern
#[derive(Debug)]
pub struct PatternRule {
    pub kind: ElementKind,
    pub regex: Regex,
}

impl PatternRule {
    fn new(kind: ElementKind, pattern: &str) -> Self {
        Self {
            kind,
            regex: Regex::new(pattern).expect("valid regex"),
        }
    }
}

/// Control-flow keywords that method-shaped patterns can capture by accident
const RESERVED: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "new", "else", "do", "try", "match",
    "sizeof", "typeof", "delete", "throw", "super", "this", "function", "await", "using",
    "lock", "foreach", "synchronized",
];

pub(crate) fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

static RULES: OnceLock<HashMap<Language, Vec<PatternRule>>> = OnceLock::new();

/// The rule table, compiled once per process
pub fn rule_table() -> &'static HashMap<Language, Vec<PatternRule>> {
    RULES.get_or_init(build_rules)
}

/// Rules for a single language (empty for `Unknown`)
pub fn rules_for(language: Language) -> &'static [PatternRule] {
    rule_table()
        .get(&language)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn build_rules() -> HashMap<Language, Vec<PatternRule>> {
    use ElementKind::{Class, Function, Method};

    let js_like = || {
        vec![
            PatternRule::new(Function, r"\bfunction\s*\*?\s*([A-Za-z_$][\w$]*)\s*\("),
            PatternRule::new(
                Function,
                r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|[A-Za-z_$][\w$]*\s*=>)",
            ),
            PatternRule::new(
                Class,
                r"(?m)^[ \t]*(?:export[ \t]+)?(?:default[ \t]+)?(?:declare[ \t]+)?(?:abstract[ \t]+)?class[ \t]+([A-Za-z_$][\w$]*)",
            ),
            PatternRule::new(
                Class,
                r"(?m)^[ \t]*(?:export[ \t]+)?(?:declare[ \t]+)?interface[ \t]+([A-Za-z_$][\w$]*)",
            ),
            PatternRule::new(
                Method,
                r"(?m)^[ \t]+(?:(?:public|private|protected|static|async|readonly|override|get|set)\s+)*([A-Za-z_$][\w$]*)\s*\([^)]*\)\s*(?::\s*[^{;=]+)?\{",
            ),
        ]
    };

    let jvm_like = |extra_modifiers: &str| {
        vec![
            PatternRule::new(
                Class,
                r"(?m)^[ \t]*(?:@\w+(?:\([^)\n]*\))?[ \t]+)*(?:(?:public|private|protected|internal|static|final|abstract|sealed|partial|readonly|unsafe|new|strictfp)[ \t]+)*(?:class|interface|enum|record|struct)[ \t]+([A-Za-z_]\w*)",
            ),
            PatternRule::new(
                Method,
                &format!(
                    r"(?m)^[ \t]*(?:(?:public|private|protected|static|final|abstract|synchronized|native|virtual|override|async|sealed|internal|extern|unsafe{})\s+)+[\w<>\[\],.?]+(?:\s*<[^>]*>)?\s+([A-Za-z_]\w*)\s*\(",
                    extra_modifiers
                ),
            ),
        ]
    };

    let c_like = || {
        vec![
            PatternRule::new(
                Function,
                r"(?m)^[A-Za-z_][\w\s\*&:<>,]*?[\s\*&]([A-Za-z_]\w*)\s*\([^;{)]*\)\s*(?:const\s*)?\{",
            ),
            PatternRule::new(
                Class,
                r"(?m)^[ \t]*(?:typedef[ \t]+)?(?:template[ \t]*<[^>\n]*>[ \t]*)?(?:class|struct)[ \t]+([A-Za-z_]\w*)[ \t]*(?::[^{;]*)?\s*\{",
            ),
            PatternRule::new(
                Method,
                r"(?m)^[ \t]*[\w\s\*&<>,]*?\b[A-Za-z_]\w*::([A-Za-z_~]\w*)\s*\([^;{)]*\)\s*(?:const\s*)?\{",
            ),
        ]
    };

    let mut rules = HashMap::new();

    rules.insert(
        Language::Python,
        vec![
            PatternRule::new(Function, r"(?m)^(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\("),
            PatternRule::new(Method, r"(?m)^[ \t]+(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\("),
            PatternRule::new(Class, r"(?m)^[ \t]*class\s+([A-Za-z_]\w*)"),
        ],
    );
    rules.insert(Language::JavaScript, js_like());
    rules.insert(Language::TypeScript, js_like());
    rules.insert(
        Language::Rust,
        vec![
            PatternRule::new(
                Function,
                r#"(?m)^(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+"[^"]*"\s+)?fn\s+([A-Za-z_]\w*)"#,
            ),
            PatternRule::new(
                Method,
                r#"(?m)^[ \t]+(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?fn\s+([A-Za-z_]\w*)"#,
            ),
            PatternRule::new(
                Class,
                r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?(?:unsafe[ \t]+)?(?:struct|enum|trait|union)[ \t]+([A-Za-z_]\w*)",
            ),
        ],
    );
    rules.insert(
        Language::Go,
        vec![
            PatternRule::new(Function, r"(?m)^func\s+([A-Za-z_]\w*)\s*[\[(]"),
            PatternRule::new(Method, r"(?m)^func\s*\([^)]*\)\s*([A-Za-z_]\w*)\s*\("),
            PatternRule::new(
                Class,
                r"(?m)^[ \t]*type[ \t]+([A-Za-z_]\w*)[ \t]+(?:struct|interface)\b",
            ),
        ],
    );
    rules.insert(Language::Java, jvm_like(""));
    rules.insert(Language::CSharp, jvm_like("|partial|new"));
    rules.insert(
        Language::Kotlin,
        vec![
            PatternRule::new(
                Function,
                r"\bfun\s+(?:<[^>]*>\s*)?(?:[\w.]+\.)?([A-Za-z_]\w*)\s*\(",
            ),
            PatternRule::new(
                Class,
                r"(?m)^[ \t]*(?:@\w+[ \t]+)*(?:(?:public|private|protected|internal|open|abstract|sealed|data|enum|annotation|inner|value|companion|fun)[ \t]+)*(?:class|interface|object)[ \t]+([A-Za-z_]\w*)",
            ),
        ],
    );
    rules.insert(Language::C, c_like());
    rules.insert(Language::Cpp, c_like());
    rules.insert(
        Language::Ruby,
        vec![
            PatternRule::new(Function, r"(?m)^def\s+(?:self\.)?([A-Za-z_]\w*[?!]?)"),
            PatternRule::new(Method, r"(?m)^[ \t]+def\s+(?:self\.)?([A-Za-z_]\w*[?!]?)"),
            PatternRule::new(Class, r"(?m)^[ \t]*(?:class|module)\s+([A-Z]\w*)"),
        ],
    );
    rules.insert(
        Language::Php,
        vec![
            PatternRule::new(Function, r"\bfunction\s+&?\s*([A-Za-z_]\w*)\s*\("),
            PatternRule::new(
                Class,
                r"(?m)^[ \t]*(?:(?:abstract|final|readonly)[ \t]+)*(?:class|interface|trait)[ \t]+([A-Za-z_]\w*)",
            ),
        ],
    );
    rules.insert(
        Language::Swift,
        vec![
            PatternRule::new(Function, r"\bfunc\s+([A-Za-z_]\w*)\s*[<(]"),
            PatternRule::new(
                Class,
                r"(?m)^[ \t]*(?:@\w+[ \t]+)*(?:(?:public|private|fileprivate|internal|open|final|indirect)[ \t]+)*(?:class|struct|protocol|enum|extension|actor)[ \t]+([A-Za-z_]\w*)",
            ),
        ],
    );

    rules
}
