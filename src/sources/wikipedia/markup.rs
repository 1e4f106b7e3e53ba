//! Wiki/HTML markup removal.
use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref REF: Regex = Regex::new(r"(?s)<ref\b[^>]*/>|<ref\b[^>]*>.*?</ref>").unwrap();
    // innermost templates only, nested ones are removed by repeating the replacement
    static ref TEMPLATE: Regex = Regex::new(r"\{\{[^{}]*\}\}").unwrap();
    static ref WIKILINK: Regex = Regex::new(r"\[\[(?:[^\]]*\|)?([^\]|]*)\]\]").unwrap();
    static ref EXTLINK: Regex =
        Regex::new(r"\[(?:https?|ftp)://[^\s\]]+(?:\s+([^\]]*))?\]").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref QUOTES: Regex = Regex::new(r"'{2,}").unwrap();
    static ref HEADING_MARKS: Regex = Regex::new(r"(?m)^[ \t]*=+[ \t]*(.*?)[ \t]*=+[ \t]*$").unwrap();
    static ref SPACES: Regex = Regex::new(r"[ \t]{2,}").unwrap();
    static ref HEADING: Regex =
        Regex::new(r"^\s*(?:={2,}.*={2,}|Section::::.*|<h[1-6]\b.*)\s*$").unwrap();
}

/// Maximum template nesting depth that gets removed.
const MAX_TEMPLATE_DEPTH: usize = 16;

/// Returns `true` if `line` is a section heading.
pub fn is_heading(line: &str) -> bool {
    HEADING.is_match(line)
}

/// Decode the HTML entities found in extracted Wikipedia text.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    // &amp; last, so that "&amp;lt;" gives "&lt;" rather than "<"
    Cow::Owned(
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'")
            .replace("&amp;", "&"),
    )
}

/// Remove wiki and HTML markup, keeping the readable text.
///
/// Links keep their label, templates, references, comments and tags are removed.
pub fn strip(text: &str) -> String {
    let text = COMMENT.replace_all(text, "");
    let text = REF.replace_all(&text, "");

    let mut text = text.into_owned();
    for _ in 0..MAX_TEMPLATE_DEPTH {
        if !TEMPLATE.is_match(&text) {
            break;
        }
        text = TEMPLATE.replace_all(&text, "").into_owned();
    }

    let text = WIKILINK.replace_all(&text, "$1");
    let text = EXTLINK.replace_all(&text, "$1");
    let text = TAG.replace_all(&text, "");
    let text = QUOTES.replace_all(&text, "");
    let text = HEADING_MARKS.replace_all(&text, "$1");
    // decoded last: escaped brackets are text, not markup
    let text = decode_entities(&text);
    let text = SPACES.replace_all(&text, " ");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links() {
        assert_eq!(
            strip("The [[Eiffel Tower|tower]] is in [[Paris]]."),
            "The tower is in Paris."
        );
        assert_eq!(strip("[[File:a.jpg|thumb|A caption]]"), "A caption");
        assert_eq!(
            strip("See [https://example.org the site] or [https://example.org]."),
            "See the site or ."
        );
    }

    #[test]
    fn templates_and_refs() {
        assert_eq!(
            strip("Paris{{citation needed|date={{now}}}} is big.<ref name=\"a\">Source</ref>"),
            "Paris is big."
        );
        assert_eq!(strip("Rome<ref name=\"b\"/> too."), "Rome too.");
        assert_eq!(strip("a <!-- hidden --> b"), "a b");
    }

    #[test]
    fn tags_quotes_entities() {
        assert_eq!(
            strip("'''Bold''' and ''italic'' &amp; <b>tags</b>"),
            "Bold and italic & tags"
        );
        assert_eq!(strip("a&nbsp;&nbsp;&lt;b&gt;"), "a <b>");
        assert_eq!(strip("x &lt; y &gt; z"), "x < y > z");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn headings() {
        assert_eq!(strip("== History ==\nText."), "History\nText.");
        assert!(is_heading("== History =="));
        assert!(is_heading("Section::::History."));
        assert!(is_heading("<h2>History</h2>"));
        assert!(!is_heading("History is = fun"));
        assert!(!is_heading("a == b == c d"));
    }

    #[test]
    fn plain_text_is_unchanged() {
        let text = "Nothing to strip here.";
        assert_eq!(strip(text), text);
    }
}
