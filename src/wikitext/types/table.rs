/*!
Table parsing: `{| ... |}`.

Each physical line is one of:
- `{|attrs` table start
- `|+caption` caption
- `|-attrs` row separator
- `!a!!b` header cells
- `|a||b` data cells
- `|}` table end

A cell may start with an attribute block ended by a lone `|`, e.g.
`style="color:red" | content`. Cells gather into the current row until a row
separator or the table end flushes it.

Cells are single-line only and nested tables are not tracked: a `{|` inside
an open table starts over with a fresh table.
*/

use crate::wikitext::enums::CellKind;
use crate::wikitext::line_source::{LineSource, LineSourceOptions};
use crate::wikitext::nested::{find_lone, split_nested};
use crate::wikitext::wiki_text::WikiText;
use lazy_regex::{Lazy, Regex, lazy_regex};
use serde::Serialize;
use std::collections::BTreeMap;

pub const TABLE_START: &str = "{|";
pub const TABLE_CAPTION: &str = "|+";
pub const TABLE_ROW: &str = "|-";
pub const TABLE_END: &str = "|}";
pub const TABLE_CELL: char = '|';

const TABLE_LINES: LineSourceOptions = LineSourceOptions::new(true, true);

static ATTRIBUTE: Lazy<Regex> = lazy_regex!(
    r#"(?P<key>[^\s="']+)\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\s"']+))"#
);

/// HTML-style attributes on a table, row or cell.
pub type Attributes = BTreeMap<String, String>;

/// Parse `key=value`, `key="quoted value"` and `key='quoted value'` pairs.
/// Anything that does not look like an attribute is skipped.
pub fn parse_attributes(s: &str) -> Attributes {
    ATTRIBUTE
        .captures_iter(s)
        .filter_map(|caps| {
            let key = caps.name("key")?.as_str();
            let value = caps
                .name("dq")
                .or_else(|| caps.name("sq"))
                .or_else(|| caps.name("bare"))?
                .as_str();
            Some((key.to_owned(), value.to_owned()))
        })
        .collect()
}

/// Split a cell into its attribute block (if any) and trimmed content.
fn split_cell(cell: &str) -> (Attributes, &str) {
    match find_lone(cell, TABLE_CELL as u8) {
        Some(pos) => (parse_attributes(&cell[..pos]), cell[pos + 1..].trim()),
        None => (Attributes::new(), cell.trim()),
    }
}

/// A header or data cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub kind: CellKind,
    pub content: WikiText,
    pub attributes: Attributes,
}

impl Cell {
    fn parse(kind: CellKind, cell: &str) -> Self {
        let (attributes, content) = split_cell(cell);
        Self {
            kind,
            content: WikiText::new(content),
            attributes,
        }
    }

    pub fn is_header(&self) -> bool {
        self.kind == CellKind::Header
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub attributes: Attributes,
}

impl Row {
    fn with_attributes(attributes: Attributes) -> Self {
        Self {
            cells: Vec::new(),
            attributes,
        }
    }

    /// Cell contents as plain strings.
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.content.as_str()).collect()
    }

    pub fn is_header(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(Cell::is_header)
    }
}

/// Table node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub attributes: Attributes,
    pub caption: Option<WikiText>,
    pub rows: Vec<Row>,
}

impl Table {
    fn with_attributes(attributes: Attributes) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// The first row made only of header cells.
    pub fn header(&self) -> Option<&Row> {
        self.rows.iter().find(|r| r.is_header())
    }

    /// Rows that are not pure header rows.
    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.is_header())
    }

    fn flush_row(&mut self, row: &mut Row) {
        if !row.cells.is_empty() {
            self.rows.push(std::mem::take(row));
        }
    }

    /// Every table in `wikitext`. A table still open at the end of the
    /// input is returned as far as it got.
    pub fn find_all(wikitext: &str) -> Vec<Table> {
        let mut found = Vec::new();
        let mut table: Option<Table> = None;
        let mut row = Row::default();

        for line in LineSource::new(wikitext, TABLE_LINES) {
            if let Some(attrs) = line.strip_prefix(TABLE_START) {
                if table.is_some() {
                    log::debug!("nested table start, dropping the outer table");
                }
                table = Some(Table::with_attributes(parse_attributes(attrs)));
                row = Row::default();
                continue;
            }
            let Some(current) = table.as_mut() else {
                continue;
            };

            if line.starts_with(TABLE_END) {
                current.flush_row(&mut row);
                if let Some(done) = table.take() {
                    log::trace!("table closed with {} rows", done.rows.len());
                    found.push(done);
                }
            } else if let Some(caption) = line.strip_prefix(TABLE_CAPTION) {
                let (_, content) = split_cell(caption);
                current.caption = Some(WikiText::new(content));
            } else if let Some(attrs) = line.strip_prefix(TABLE_ROW) {
                current.flush_row(&mut row);
                row = Row::with_attributes(parse_attributes(attrs));
            } else if let Some(kind) = line.chars().next().and_then(CellKind::from_marker) {
                push_cells(&mut row, kind, &line[1..]);
            }
        }

        if let Some(mut open) = table {
            log::debug!("table not closed before end of input, keeping partial table");
            open.flush_row(&mut row);
            found.push(open);
        }
        found
    }
}

fn push_cells(row: &mut Row, kind: CellKind, cells: &str) {
    row.cells.extend(
        split_nested(cells, kind.separator())
            .into_iter()
            .map(|cell| Cell::parse(kind, cell)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_table() {
        let text = "{|\n|+Caption\n!H1!!H2\n|-\n|c1||c2\n|}";
        let tables = Table::find_all(text);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.caption.as_ref().map(|c| c.as_str()), Some("Caption"));
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0].texts(), vec!["H1", "H2"]);
        assert!(t.rows[0].is_header());
        assert_eq!(t.rows[1].texts(), vec!["c1", "c2"]);
        assert!(!t.rows[1].cells[0].is_header());
        assert_eq!(t.header().map(|r| r.texts()), Some(vec!["H1", "H2"]));
        assert_eq!(t.data_rows().count(), 1);
    }

    #[test]
    fn table_row_and_cell_attributes() {
        let text = r#"{| class="wikitable sortable" width=100%
|- style="color:red"
| data-sort-value="3" | {{Difficulty|3}} || plain
|}"#;
        let t = &Table::find_all(text)[0];
        assert_eq!(t.attributes.get("class").map(String::as_str), Some("wikitable sortable"));
        assert_eq!(t.attributes.get("width").map(String::as_str), Some("100%"));
        let row = &t.rows[0];
        assert_eq!(row.attributes.get("style").map(String::as_str), Some("color:red"));
        assert_eq!(row.cells.len(), 2);
        assert_eq!(row.cells[0].content, "{{Difficulty|3}}");
        assert_eq!(
            row.cells[0].attributes.get("data-sort-value").map(String::as_str),
            Some("3")
        );
        assert_eq!(row.cells[1].content, "plain");
        assert!(row.cells[1].attributes.is_empty());
    }

    #[test]
    fn pipes_inside_links_are_content() {
        let t = &Table::find_all("{|\n|[[Ring 0|R0]]||[[a|b]] text\n|}")[0];
        assert_eq!(t.rows[0].texts(), vec!["[[Ring 0|R0]]", "[[a|b]] text"]);
        assert!(t.rows[0].cells[0].attributes.is_empty());
    }

    #[test]
    fn header_cell_with_attributes() {
        let t = &Table::find_all("{|\n! colspan=\"4\" | Mini Tower List\n|}")[0];
        let cell = &t.rows[0].cells[0];
        assert!(cell.is_header());
        assert_eq!(cell.content, "Mini Tower List");
        assert_eq!(cell.attributes.get("colspan").map(String::as_str), Some("4"));
    }

    #[test]
    fn one_cell_per_line_rows() {
        let text = "{|\n!A\n!B\n|-\n|1\n|2\n|-\n|3\n|4\n|}";
        let t = &Table::find_all(text)[0];
        let rows: Vec<Vec<&str>> = t.rows.iter().map(|r| r.texts()).collect();
        assert_eq!(rows, vec![vec!["A", "B"], vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn unterminated_table_is_kept() {
        let t = Table::find_all("{|\n|a||b");
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].rows[0].texts(), vec!["a", "b"]);
    }

    #[test]
    fn text_outside_tables_is_ignored() {
        let text = "intro | not a cell\n{|\n|x\n|}\n|also not a cell";
        let tables = Table::find_all(text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 1);
    }

    #[test]
    fn malformed_attributes_do_not_fail() {
        assert!(parse_attributes("class=\"unterminated").is_empty());
        let attrs = parse_attributes("align=left junk style='a b'");
        assert_eq!(attrs.get("align").map(String::as_str), Some("left"));
        assert_eq!(attrs.get("style").map(String::as_str), Some("a b"));
        assert_eq!(attrs.len(), 2);
    }
}
