//! Lenient MediaWiki wikitext parser.
//!
//! Turns an article body into a tree of sections and lets callers pull out
//! templates, tables, lists and links from any part of that tree.

pub mod wikitext;

pub use wikitext::{Section, WikiText};
