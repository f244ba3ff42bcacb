//! Structured node types and their line-oriented parsers.

pub mod links;
pub mod lists;
pub mod sections;
pub mod table;
pub mod templates;
