//! Wikitext module root
//!
//! Declares and re-exports the submodules that make up the parser:
//! - `line_source` - pushback line reader every parser consumes
//! - `nested` - separator search that skips `[[...]]` / `{{...}}` spans
//! - `wiki_text` - the `WikiText` string value
//! - `types` - links, templates, tables, lists and the section tree

pub mod enums;
pub mod errors;
pub mod line_source;
pub mod nested;
pub mod types;
pub mod wiki_text;

pub use enums::{CellKind, ItemKind, ListKind, QueryType};
pub use errors::{Result, WtError};
pub use line_source::{LineSource, LineSourceOptions};
pub use types::links::Link;
pub use types::lists::{List, ListEntry, ListItem};
pub use types::sections::{Header, Section};
pub use types::table::{Attributes, Cell, Row, Table};
pub use types::templates::Template;
pub use wiki_text::{WikiText, get_text, is_template};
