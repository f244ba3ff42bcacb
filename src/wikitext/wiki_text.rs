//! `WikiText`: an immutable markup string that knows how to find its links.
//!
//! Template parameters, table cells, list items and section bodies are all
//! stored as `WikiText` so callers can pull links out of any of them.
//!
//! Also home to the small standalone-value helpers `is_template` and
//! `get_text`.

use crate::wikitext::nested::find_nested;
use crate::wikitext::types::links::Link;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;

pub const TEMPLATE_START: &str = "{{";
pub const TEMPLATE_END: &str = "}}";

/// Markup string value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WikiText(String);

impl WikiText {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// Join `lines` with `\n`.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        Self(lines.into_iter().join("\n"))
    }

    /// A new value with `line` appended on its own line. Appending to an
    /// empty value yields just `line`.
    pub fn with_line(&self, line: &str) -> Self {
        if self.0.is_empty() {
            Self::new(line)
        } else {
            Self(format!("{}\n{}", self.0, line))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Links found anywhere in the text, in order.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        Link::find_all(&self.0)
    }

    /// Plain-text rendering of this value, see [`get_text`].
    pub fn text(&self) -> Option<String> {
        get_text(&self.0)
    }
}

impl Deref for WikiText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WikiText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WikiText {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WikiText {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for WikiText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WikiText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// True when `s` is a single template call and nothing else.
pub fn is_template(s: &str) -> bool {
    s.len() >= TEMPLATE_START.len() + TEMPLATE_END.len()
        && s.starts_with(TEMPLATE_START)
        && s.ends_with(TEMPLATE_END)
        && s.rfind(TEMPLATE_START) == Some(0)
}

/// Best-effort plain text of a standalone value.
///
/// - a lone link gives its display text
/// - a lone template gives everything after its name (empty if it has no
///   parameters)
/// - anything else is returned trimmed
///
/// Returns `None` for blank input.
pub fn get_text(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if Link::is_link(s) {
        return Link::parse(s).and_then(|link| link.text());
    }
    if is_template(s) {
        let body = &s[TEMPLATE_START.len()..s.len() - TEMPLATE_END.len()];
        let text = match find_nested(body, "|") {
            Some(pos) => &body[pos + 1..],
            None => "",
        };
        return Some(text.to_owned());
    }
    Some(s.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_lines() {
        let wt = WikiText::from_lines(["a", "b", "c"]);
        assert_eq!(wt, "a\nb\nc");
        assert_eq!(WikiText::from_lines(Vec::<String>::new()), "");
    }

    #[test]
    fn with_line_does_not_mutate() {
        let wt = WikiText::new("first");
        let longer = wt.with_line("second");
        assert_eq!(wt, "first");
        assert_eq!(longer, "first\nsecond");
        assert_eq!(WikiText::default().with_line("x"), "x");
    }

    #[test]
    fn finds_links() {
        let wt = WikiText::new("see [[A]] and [[B|bee]]");
        let texts: Vec<String> = wt.links().filter_map(|l| l.text()).collect();
        assert_eq!(texts, vec!["A", "bee"]);
    }

    #[test]
    fn template_detection() {
        assert!(is_template("{{Coord|52|21|N}}"));
        assert!(!is_template("{{a}} {{b}}"));
        assert!(!is_template("text"));
    }

    #[test]
    fn plain_text_of_values() {
        assert_eq!(get_text("  [[Warsaw|capital]] ").as_deref(), Some("capital"));
        assert_eq!(get_text("{{lang|pl}}").as_deref(), Some("pl"));
        assert_eq!(get_text("{{flag}}").as_deref(), Some(""));
        assert_eq!(get_text(" 1047 km ").as_deref(), Some("1047 km"));
        assert_eq!(get_text("   "), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&WikiText::new("x")).unwrap();
        assert_eq!(json, "\"x\"");
    }
}
