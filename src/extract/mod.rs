//! Lexical code element extraction
//!
//! Finds declared function, class, and method names with per-language regex
//! rules. No parsing, no scoping: every syntactic match yields one name and
//! duplicates collapse. Malformed or partial code never fails, it just
//! yields fewer names.

mod detect;
mod language;
mod rules;

pub use detect::detect_language;
pub use language::Language;
pub use rules::{rule_table, rules_for, ElementKind, PatternRule};

use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, trace};

/// Extract the set of declared element names from `source`.
///
/// Only one language's rules ever run. With a hint that is the hinted
/// language; without one it is whatever [`detect_language`] picks.
/// `Language::Unknown` yields an empty set.
pub fn extract_elements(source: &str, language: Option<Language>) -> BTreeSet<String> {
    let lang = language.unwrap_or_else(|| {
        let detected = detect_language(source);
        debug!("No language hint, detected {}", detected);
        detected
    });

    let mut names = BTreeSet::new();
    collect(source, lang, &mut names);
    names
}

/// Extract elements using the language implied by `path`'s extension.
pub fn extract_elements_for_path(source: &str, path: &Path) -> BTreeSet<String> {
    extract_elements(source, Some(Language::from_path(path)))
}

fn collect(source: &str, language: Language, names: &mut BTreeSet<String>) {
    for rule in rules_for(language) {
        for caps in rule.regex.captures_iter(source) {
            let Some(m) = caps.get(1) else { continue };
            let name = m.as_str();
            if rules::is_reserved(name) {
                continue;
            }
            trace!("{:?} {} ({})", rule.kind, name, language);
            names.insert(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_python_functions_classes_methods() {
        let src = r#"
class Parser(Base):
    def parse(self, text):
        pass

    async def fetch(self):
        pass

def main():
    Parser().parse("x")
"#;
        let names = extract_elements(src, Some(Language::Python));
        assert_eq!(names, set(&["Parser", "fetch", "main", "parse"]));
    }

    #[test]
    fn test_no_hint_detects_language() {
        let names = extract_elements("def foo(): pass\ndef bar(): pass", None);
        assert_eq!(names, set(&["bar", "foo"]));
    }

    #[test]
    fn test_no_hint_ignores_python_docstrings_and_comments() {
        let src = "class Server:\n    \"\"\"This class handles requests.\"\"\"\n    def run(self):\n        # Save the record to disk\n        pass\n";
        assert_eq!(extract_elements(src, None), set(&["Server", "run"]));
        assert_eq!(
            extract_elements(src, None),
            extract_elements(src, Some(Language::Python))
        );
    }

    #[test]
    fn test_no_hint_ignores_javascript_comments() {
        let src = r#"
// This class is an interface to the cache; the union of all entries.
/**
 * A struct of settings. The record is kept as an object.
 */
function loadConfig(path) {
  // extension points live elsewhere
  return require('./config');
}
"#;
        assert_eq!(extract_elements(src, None), set(&["loadConfig"]));
    }

    #[test]
    fn test_no_hint_ignores_go_comments() {
        let src = "package main\n\n// Server is the class of thing that handles a record.\n// The interface to it is an enum of options.\ntype Server struct {}\n\nfunc NewServer() *Server {\n\treturn &Server{}\n}\n";
        assert_eq!(extract_elements(src, None), set(&["NewServer", "Server"]));
    }

    #[test]
    fn test_no_hint_prose_is_empty() {
        let names = extract_elements("This class handles the record of a struct.", None);
        assert!(names.is_empty());
    }

    #[test]
    fn test_hinted_rules_skip_prose_in_comments() {
        let src = "/// The class of errors an enum record can hold.\npub struct Cache {}\n";
        assert_eq!(extract_elements(src, Some(Language::Rust)), set(&["Cache"]));
        let src = "// This class is an interface to the record store.\npublic class Store {\n}\n";
        assert_eq!(extract_elements(src, Some(Language::Java)), set(&["Store"]));
    }

    #[test]
    fn test_unknown_language_is_empty() {
        let names = extract_elements("def foo(): pass", Some(Language::Unknown));
        assert!(names.is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let src = "def run():\n    pass\n\ndef run():\n    pass\n";
        assert_eq!(extract_elements(src, Some(Language::Python)), set(&["run"]));
    }

    #[test]
    fn test_javascript() {
        let src = r#"
function loadConfig(path) { return {}; }
const render = (props) => props.children;
export class Widget extends Base {
  constructor(opts) {
    super(opts);
  }
  async draw(ctx) {
    if (ctx) {
      return;
    }
  }
}
"#;
        let names = extract_elements(src, Some(Language::JavaScript));
        assert_eq!(
            names,
            set(&["Widget", "constructor", "draw", "loadConfig", "render"])
        );
    }

    #[test]
    fn test_rust() {
        let src = r#"
pub struct Cache { items: Vec<u8> }

impl Cache {
    pub fn new() -> Self { Self { items: vec![] } }
    fn evict(&mut self) {}
}

pub(crate) async fn warm_up() {}
"#;
        let names = extract_elements(src, Some(Language::Rust));
        assert_eq!(names, set(&["Cache", "evict", "new", "warm_up"]));
    }

    #[test]
    fn test_go() {
        let src = "type Server struct {}\n\nfunc (s *Server) Start() error {\n\treturn nil\n}\n\nfunc NewServer() *Server {\n\treturn &Server{}\n}\n";
        let names = extract_elements(src, Some(Language::Go));
        assert_eq!(names, set(&["NewServer", "Server", "Start"]));
    }

    #[test]
    fn test_java() {
        let src = r#"
public class OrderService {
    private final Repo repo;

    public Order findOrder(long id) {
        if (id < 0) {
            throw new IllegalArgumentException();
        }
        return repo.get(id);
    }

    static List<Order> all() { return null; }
}
"#;
        let names = extract_elements(src, Some(Language::Java));
        assert_eq!(names, set(&["OrderService", "all", "findOrder"]));
    }

    #[test]
    fn test_c() {
        let src = "struct node {\n  int v;\n};\n\nstatic int add(int a, int b) {\n  return a + b;\n}\n\nint main(void) {\n  return add(1, 2);\n}\n";
        let names = extract_elements(src, Some(Language::C));
        assert_eq!(names, set(&["add", "main", "node"]));
    }

    #[test]
    fn test_malformed_code_does_not_fail() {
        let names = extract_elements("def (((\nclass\n}{fn", None);
        assert!(names.is_empty());
    }

    #[test]
    fn test_extract_for_path() {
        let names = extract_elements_for_path("def helper():\n    pass\n", Path::new("a/b.py"));
        assert_eq!(names, set(&["helper"]));
        let names = extract_elements_for_path("def helper():\n    pass\n", Path::new("notes.txt"));
        assert!(names.is_empty());
    }
}
