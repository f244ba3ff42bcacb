//! Enums used by the wikitext module.
//!
//! - `QueryType` - strategies for matching template names.
//! - `ListKind` - ordered / unordered / description lists.
//! - `ItemKind` - plain item, term or definition inside a list.
//! - `CellKind` - header (`!`) or data (`|`) table cell.
//!
//! The marker-driven enums map straight from the wikitext marker character
//! via `from_marker`, which returns `None` for anything that is not a marker.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Strategy used when searching for templates by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// Exact (case-insensitive) match.
    Exact,
    /// Prefix match (case-insensitive).
    StartsWith,
    /// Substring match (case-insensitive).
    Contains,
}

impl QueryType {
    /// Check `candidate` against `query` using this strategy. Both sides are
    /// trimmed and lowercased first.
    pub fn matches(&self, candidate: &str, query: &str) -> bool {
        let cand = candidate.trim().to_lowercase();
        let query = query.trim().to_lowercase();
        match self {
            QueryType::Exact => cand == query,
            QueryType::StartsWith => cand.starts_with(&query),
            QueryType::Contains => cand.contains(&query),
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::Exact => write!(f, "Exact"),
            QueryType::StartsWith => write!(f, "StartsWith"),
            QueryType::Contains => write!(f, "Contains"),
        }
    }
}

impl FromStr for QueryType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" | "eq" | "e" => Ok(QueryType::Exact),
            "startswith" | "start" | "prefix" | "s" => Ok(QueryType::StartsWith),
            "contains" | "contain" | "substr" | "c" => Ok(QueryType::Contains),
            other => Err(format!("unknown QueryType '{}'", other)),
        }
    }
}

/// The kind of list a marker character opens.
///
/// - `#` ordered (numbered)
/// - `*` unordered (bulleted)
/// - `;` / `:` description (terms and definitions share one list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
    Description,
}

impl ListKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '#' => Some(ListKind::Ordered),
            '*' => Some(ListKind::Unordered),
            ';' | ':' => Some(ListKind::Description),
            _ => None,
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Ordered => write!(f, "Ordered"),
            ListKind::Unordered => write!(f, "Unordered"),
            ListKind::Description => write!(f, "Description"),
        }
    }
}

/// The kind of entry a list line produces, chosen by its last marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// `#` or `*`
    Item,
    /// `;`
    Term,
    /// `:`
    Definition,
}

impl ItemKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '#' | '*' => Some(ItemKind::Item),
            ';' => Some(ItemKind::Term),
            ':' => Some(ItemKind::Definition),
            _ => None,
        }
    }
}

/// Table cell flavour, tagged by the marker that introduced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// `!` / `!!`
    Header,
    /// `|` / `||`
    Data,
}

impl CellKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '!' => Some(CellKind::Header),
            '|' => Some(CellKind::Data),
            _ => None,
        }
    }

    /// Separator between cells packed on one line.
    pub fn separator(&self) -> &'static str {
        match self {
            CellKind::Header => "!!",
            CellKind::Data => "||",
        }
    }
}
