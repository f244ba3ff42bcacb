//! Section tree: splits a page on `== Title ==` header lines.
//!
//! The builder keeps one open frame per header level on a stack, seeded with
//! the unnamed root frame (level 0). A header closes every open frame at its
//! level or deeper, attaching each closed section to its parent, then opens
//! its own frame. The root frame is never closed by a header, so a page
//! always parses into a single root section whose children are the
//! top-level headed sections.
//!
//! Templates, tables and lists of a section are computed from its full
//! content (own text plus descendants) on first access and kept.

use crate::wikitext::enums::QueryType;
use crate::wikitext::errors::{Result, WtError};
use crate::wikitext::line_source::{LineSource, LineSourceOptions};
use crate::wikitext::types::links::Link;
use crate::wikitext::types::lists::List;
use crate::wikitext::types::table::Table;
use crate::wikitext::types::templates::Template;
use crate::wikitext::wiki_text::WikiText;
use lazy_regex::regex_captures;
use serde::Serialize;
use std::fmt::Write;
use std::sync::OnceLock;

pub const MAX_HEADER_LEVEL: usize = 6;
pub const INFOBOX: &str = "infobox";

const SECTION_LINES: LineSourceOptions = LineSourceOptions::new(false, true);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub level: usize,
    pub title: String,
}

impl Header {
    /// Parse a header line. The level is the number of `=` present on both
    /// sides (at most 6); surplus `=` on the longer side stay in the title.
    pub fn parse(line: &str) -> Option<Self> {
        let (_, pre, _, post) = regex_captures!(r"^(={1,6})(.+?)(={1,6})\s*$", line)?;
        let level = pre.len().min(post.len()).min(MAX_HEADER_LEVEL);
        let line = line.trim_end();
        let title = line.get(level..line.len() - level)?.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            level,
            title: title.to_owned(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub header: Option<Header>,
    /// Text between this section's header and its first child header.
    pub own_content: WikiText,
    /// Header line, own text and every descendant, in document order.
    #[serde(skip)]
    pub content: WikiText,
    pub sections: Vec<Section>,
    #[serde(skip)]
    templates: OnceLock<Vec<Template>>,
    #[serde(skip)]
    tables: OnceLock<Vec<Table>>,
    #[serde(skip)]
    lists: OnceLock<Vec<List>>,
}

/// An open section while the tree is being built.
struct Frame {
    header: Option<Header>,
    /// Raw lines, starting with the header line for headed sections.
    lines: Vec<String>,
    children: Vec<Section>,
}

impl Frame {
    fn root() -> Self {
        Self {
            header: None,
            lines: Vec::new(),
            children: Vec::new(),
        }
    }

    fn open(header: Header, line: String) -> Self {
        Self {
            header: Some(header),
            lines: vec![line],
            children: Vec::new(),
        }
    }

    fn level(&self) -> usize {
        self.header.as_ref().map_or(0, |h| h.level)
    }

    fn finish(self) -> Section {
        let body_start = usize::from(self.header.is_some());
        let own_content = WikiText::from_lines(&self.lines[body_start..]);
        let content = WikiText::from_lines(
            self.lines
                .iter()
                .map(String::as_str)
                .chain(self.children.iter().map(|c| c.content.as_str())),
        );
        Section {
            header: self.header,
            own_content,
            content,
            sections: self.children,
            templates: OnceLock::new(),
            tables: OnceLock::new(),
            lists: OnceLock::new(),
        }
    }
}

/// Close the innermost frame and attach it to its parent.
fn close_frame(stack: &mut Vec<Frame>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(frame) = stack.pop() {
        let section = frame.finish();
        log::trace!(
            "section {:?} closed with {} children",
            section.title(),
            section.sections.len()
        );
        if let Some(parent) = stack.last_mut() {
            parent.children.push(section);
        }
    }
}

impl Section {
    /// Build the section tree of `wikitext`, returning the root section.
    pub fn parse(wikitext: &str) -> Section {
        let mut stack = vec![Frame::root()];

        for line in LineSource::new(wikitext, SECTION_LINES) {
            match Header::parse(&line) {
                Some(header) => {
                    while stack.len() > 1 && stack.last().is_some_and(|f| f.level() >= header.level)
                    {
                        close_frame(&mut stack);
                    }
                    stack.push(Frame::open(header, line));
                }
                None => {
                    if let Some(frame) = stack.last_mut() {
                        frame.lines.push(line);
                    }
                }
            }
        }

        while stack.len() > 1 {
            close_frame(&mut stack);
        }
        let root = stack.pop().unwrap_or_else(Frame::root).finish();
        log::debug!("parsed {} top-level sections", root.sections.len());
        root
    }

    pub fn title(&self) -> Option<&str> {
        self.header.as_ref().map(|h| h.title.as_str())
    }

    pub fn level(&self) -> usize {
        self.header.as_ref().map_or(0, |h| h.level)
    }

    pub fn templates(&self) -> &[Template] {
        self.templates
            .get_or_init(|| Template::find_all(&self.content))
    }

    pub fn tables(&self) -> &[Table] {
        self.tables.get_or_init(|| Table::find_all(&self.content))
    }

    pub fn lists(&self) -> &[List] {
        self.lists.get_or_init(|| List::find_all(&self.content))
    }

    /// Links anywhere in the full content.
    pub fn links(&self) -> Vec<Link> {
        self.content.links().collect()
    }

    /// Templates whose name matches `name` according to `query`.
    pub fn find_templates(&self, name: &str, query: QueryType) -> Vec<&Template> {
        self.templates()
            .iter()
            .filter(|t| query.matches(&t.name, name))
            .collect()
    }

    /// First template named exactly `name` (case-insensitive).
    pub fn get_template(&self, name: &str) -> Result<&Template> {
        self.templates()
            .iter()
            .find(|t| QueryType::Exact.matches(&t.name, name))
            .ok_or_else(|| WtError::not_found(format!("Template '{}' not found", name)))
    }

    /// First template whose name contains "infobox".
    pub fn infobox(&self) -> Option<&Template> {
        self.templates()
            .iter()
            .find(|t| QueryType::Contains.matches(&t.name, INFOBOX))
    }

    /// This section and all its descendants, depth first.
    pub fn walk(&self) -> Vec<&Section> {
        let mut out = vec![self];
        for child in &self.sections {
            out.extend(child.walk());
        }
        out
    }

    /// First section (self included) whose title equals `title`.
    pub fn find_section(&self, title: &str) -> Option<&Section> {
        self.walk()
            .into_iter()
            .find(|s| s.title().is_some_and(|t| t.eq_ignore_ascii_case(title.trim())))
    }

    /// Indented outline, one line per headed section.
    pub fn tree(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        if let Some(header) = &self.header {
            let _ = writeln!(out, "{}{} (level {})", "   ".repeat(depth), header.title, header.level);
        }
        let depth = if self.header.is_some() { depth + 1 } else { depth };
        for child in &self.sections {
            child.write_tree(out, depth);
        }
    }
}
