//! Sentence and word segmentation for documentation text
//!
//! Rule-based, no trained model. Sentences end at runs of `.`, `!`, `?`
//! followed by whitespace or end of text, and at blank lines (Markdown
//! paragraphs, headings, list blocks). A small abbreviation list keeps
//! `e.g.` and friends from splitting a sentence.

use regex::Regex;
use std::sync::OnceLock;

const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "etc", "vs", "mr", "mrs", "ms", "dr", "prof", "cf", "fig", "approx",
];

static WORD_RE: OnceLock<Regex> = OnceLock::new();
static PARAGRAPH_RE: OnceLock<Regex> = OnceLock::new();

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}_]+(?:'[\p{L}]+)*").expect("valid regex"))
}

fn paragraph_re() -> &'static Regex {
    PARAGRAPH_RE.get_or_init(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"))
}

/// Word tokens: runs of letters, digits, and underscores. Punctuation is not
/// a word.
pub fn tokenize_words(text: &str) -> Vec<&str> {
    word_re().find_iter(text).map(|m| m.as_str()).collect()
}

/// Number of word tokens in `text`
pub fn word_count(text: &str) -> usize {
    word_re().find_iter(text).count()
}

/// Split `text` into sentences. Fragments without any word are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    for paragraph in paragraph_re().split(text) {
        split_paragraph(paragraph, &mut sentences);
    }
    sentences
}

fn split_paragraph<'a>(paragraph: &'a str, out: &mut Vec<&'a str>) {
    let bytes = paragraph.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !matches!(bytes[i], b'.' | b'!' | b'?') {
            i += 1;
            continue;
        }

        let term_start = i;
        while i < bytes.len() && matches!(bytes[i], b'.' | b'!' | b'?') {
            i += 1;
        }
        // Closing quotes and brackets belong to the sentence they end
        while i < bytes.len() && matches!(bytes[i], b'"' | b'\'' | b')' | b']') {
            i += 1;
        }

        let at_boundary = i >= bytes.len() || bytes[i].is_ascii_whitespace();
        if !at_boundary {
            continue;
        }

        let single_period = i - term_start == 1 && bytes[term_start] == b'.';
        if single_period && is_abbreviation(&paragraph[start..term_start]) {
            continue;
        }

        push_sentence(&paragraph[start..i], out);
        start = i;
    }

    push_sentence(&paragraph[start..], out);
}

fn is_abbreviation(before: &str) -> bool {
    let last = before
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("")
        .to_lowercase();
    ABBREVIATIONS.contains(&last.as_str())
}

fn push_sentence<'a>(fragment: &'a str, out: &mut Vec<&'a str>) {
    let trimmed = fragment.trim();
    if word_re().is_match(trimmed) {
        out.push(trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_sentences() {
        assert_eq!(
            split_sentences("Do X. Do Y. Do Z."),
            vec!["Do X.", "Do Y.", "Do Z."]
        );
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\n ... !!").is_empty());
        assert!(tokenize_words("... --- !!").is_empty());
    }

    #[test]
    fn test_question_and_exclamation() {
        assert_eq!(
            split_sentences("Is it safe? Yes! It is."),
            vec!["Is it safe?", "Yes!", "It is."]
        );
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let s = split_sentences("Accepts a path, e.g. a file name. Returns a handle.");
        assert_eq!(s.len(), 2);
        assert_eq!(s[0], "Accepts a path, e.g. a file name.");
    }

    #[test]
    fn test_decimals_and_dotted_names() {
        let s = split_sentences("Version 1.5 calls os.path.join internally. Done.");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_blank_lines_split() {
        let s = split_sentences("# Overview\n\nLoads the config\n\n- item one\n- item two");
        assert_eq!(s.len(), 3);
        assert_eq!(s[0], "# Overview");
    }

    #[test]
    fn test_unterminated_tail_is_a_sentence() {
        assert_eq!(split_sentences("First. Second"), vec!["First.", "Second"]);
    }

    #[test]
    fn test_word_tokens() {
        assert_eq!(
            tokenize_words("The parse_config() helper doesn't panic."),
            vec!["The", "parse_config", "helper", "doesn't", "panic"]
        );
        assert_eq!(word_count("one, two; three"), 3);
    }

    #[test]
    fn test_punctuation_is_not_counted() {
        assert_eq!(word_count("Hello, world!"), 2);
        assert_eq!(tokenize_words("a, b. (c) -- d?!"), vec!["a", "b", "c", "d"]);
        assert_eq!(word_count(", . ; : ! ? ( ) -- ..."), 0);
    }
}
