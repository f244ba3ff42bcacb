/*!
Internal wiki links: `[[title#anchor|label]]`.

All three segments are optional. `Link::is_link` tells a string that is
exactly one link apart from text that merely contains links; the latter are
found with `Link::find_all`.
*/

use lazy_regex::{Lazy, Regex, lazy_regex};
use serde::Serialize;
use std::fmt;

pub const WIKI_LINK_START: &str = "[[";
pub const WIKI_LINK_END: &str = "]]";

static WIKI_LINK: Lazy<Regex> =
    lazy_regex!(r"\[\[(?P<title>[^#|\]]+)?(?:#(?P<anchor>[^|\]]+))?(?:\|(?P<label>[^\]]+))?\]\]");

/// Link node. Built only by parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub title: Option<String>,
    pub anchor: Option<String>,
    pub label: Option<String>,
}

impl Link {
    /// True when `s` is a single link and nothing else: it opens with `[[`,
    /// closes with `]]` and has no second `[[`.
    pub fn is_link(s: &str) -> bool {
        s.len() >= WIKI_LINK_START.len() + WIKI_LINK_END.len()
            && s.starts_with(WIKI_LINK_START)
            && s.ends_with(WIKI_LINK_END)
            && s.rfind(WIKI_LINK_START) == Some(0)
    }

    /// Parse the link at the very start of `s`.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = WIKI_LINK.captures(s)?;
        if caps.get(0)?.start() != 0 {
            return None;
        }
        Some(Self::from_captures(&caps))
    }

    /// Every link occurrence in `text`, in order.
    pub fn find_all(text: &str) -> impl Iterator<Item = Link> + '_ {
        WIKI_LINK
            .captures_iter(text)
            .map(|caps| Self::from_captures(&caps))
    }

    /// Segments are kept exactly as written, surrounding spaces included.
    fn from_captures(caps: &regex::Captures<'_>) -> Self {
        let segment = |name: &str| caps.name(name).map(|m| m.as_str().to_owned());
        Self {
            title: segment("title"),
            anchor: segment("anchor"),
            label: segment("label"),
        }
    }

    /// `title#anchor`, or just `title` when there is no anchor.
    pub fn target(&self) -> Option<String> {
        match (&self.title, &self.anchor) {
            (title, Some(anchor)) => Some(format!(
                "{}#{}",
                title.as_deref().unwrap_or_default(),
                anchor
            )),
            (title, None) => title.clone(),
        }
    }

    /// Display text: the label if present, the target otherwise.
    pub fn text(&self) -> Option<String> {
        self.label.clone().or_else(|| self.target())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target().unwrap_or_default();
        match &self.label {
            Some(label) => write!(f, "[[{}|{}]]", target, label),
            None => write!(f, "[[{}]]", target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_link() {
        let link = Link::parse("[[Page#Section|Label]]").expect("should parse");
        assert_eq!(link.title.as_deref(), Some("Page"));
        assert_eq!(link.anchor.as_deref(), Some("Section"));
        assert_eq!(link.label.as_deref(), Some("Label"));
        assert_eq!(link.target().as_deref(), Some("Page#Section"));
        assert_eq!(link.text().as_deref(), Some("Label"));
    }

    #[test]
    fn title_only() {
        let link = Link::parse("[[Page Name]]").expect("should parse");
        assert_eq!(link.anchor, None);
        assert_eq!(link.label, None);
        assert_eq!(link.target().as_deref(), Some("Page Name"));
        assert_eq!(link.text().as_deref(), Some("Page Name"));
    }

    #[test]
    fn title_and_label() {
        let link = Link::parse("[[Vistula|Wisła]]").expect("should parse");
        assert_eq!(link.target().as_deref(), Some("Vistula"));
        assert_eq!(link.text().as_deref(), Some("Wisła"));
    }

    #[test]
    fn anchor_only() {
        let link = Link::parse("[[#History]]").expect("should parse");
        assert_eq!(link.title, None);
        assert_eq!(link.target().as_deref(), Some("#History"));
    }

    #[test]
    fn is_link_rejects_trailing_text() {
        assert!(Link::is_link("[[a]]"));
        assert!(!Link::is_link("[[a]] text"));
        assert!(!Link::is_link("[[a]] and [[b]]"));
        assert!(!Link::is_link("plain"));
        assert!(!Link::is_link("[[]"));
    }

    #[test]
    fn parse_requires_link_at_start() {
        assert!(Link::parse("see [[a]]").is_none());
    }

    #[test]
    fn find_all_in_text() {
        let text = "The [[Vistula]] flows into the [[Baltic Sea|Baltic]].\n[[Category:Rivers]]";
        let links: Vec<Link> = Link::find_all(text).collect();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].title.as_deref(), Some("Vistula"));
        assert_eq!(links[1].text().as_deref(), Some("Baltic"));
        assert_eq!(links[2].title.as_deref(), Some("Category:Rivers"));
    }

    #[test]
    fn segments_are_not_trimmed() {
        let link = Link::parse("[[a| b]]").unwrap();
        assert_eq!(link.title.as_deref(), Some("a"));
        assert_eq!(link.label.as_deref(), Some(" b"));
        let spaced = Link::parse("[[ Page # Top ]]").unwrap();
        assert_eq!(spaced.title.as_deref(), Some(" Page "));
        assert_eq!(spaced.anchor.as_deref(), Some(" Top "));
    }

    #[test]
    fn display_reconstructs_wikitext() {
        let link = Link::parse("[[Page|Label]]").unwrap();
        assert_eq!(link.to_string(), "[[Page|Label]]");
    }
}
