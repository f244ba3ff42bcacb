//! List parsing: lines prefixed with `#`, `*`, `;` and `:`.
//!
//! The marker prefix of a line gives both the nesting depth (its length)
//! and, per depth, the kind of list open there. A stack keeps one open list
//! per depth. When a line's prefix disagrees with the stack, the excess or
//! mismatched lists are closed and attached to their parent; a line with no
//! prefix closes everything.
//!
//! `; term : definition` on one line is split, the definition being pushed
//! back as its own line.

use crate::wikitext::enums::{ItemKind, ListKind};
use crate::wikitext::line_source::{LineSource, LineSourceOptions};
use crate::wikitext::nested::find_nested;
use crate::wikitext::wiki_text::WikiText;
use lazy_regex::{Lazy, Regex, lazy_regex};
use serde::Serialize;

pub const DEFINITION_TAG: &str = ":";

const LIST_LINES: LineSourceOptions = LineSourceOptions::new(false, true);

static LIST_ITEM: Lazy<Regex> = lazy_regex!(r"^(?P<prefix>[#*:;]+) *(?P<content>.*?)\s*$");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub kind: ItemKind,
    pub content: WikiText,
}

/// One element of a list: an item or a nested list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ListEntry {
    Item(ListItem),
    List(List),
}

impl ListEntry {
    pub fn as_item(&self) -> Option<&ListItem> {
        match self {
            ListEntry::Item(item) => Some(item),
            ListEntry::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            ListEntry::List(list) => Some(list),
            ListEntry::Item(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub kind: ListKind,
    pub entries: Vec<ListEntry>,
}

impl List {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Direct items, skipping nested lists.
    pub fn items(&self) -> impl Iterator<Item = &ListItem> {
        self.entries.iter().filter_map(ListEntry::as_item)
    }

    /// Direct nested lists.
    pub fn sublists(&self) -> impl Iterator<Item = &List> {
        self.entries.iter().filter_map(ListEntry::as_list)
    }

    /// Every top-level list in `wikitext`, in document order.
    ///
    /// This includes lists that sit inside table cells or template values
    /// when they start a line.
    pub fn find_all(wikitext: &str) -> Vec<List> {
        let mut found = Vec::new();
        let mut stack: Vec<List> = Vec::new();
        let mut lines = LineSource::new(wikitext, LIST_LINES);

        while let Some(line) = lines.next() {
            let Some(caps) = LIST_ITEM.captures(&line) else {
                close_all(&mut stack, &mut found);
                continue;
            };
            let prefix = caps.name("prefix").map_or("", |m| m.as_str());
            let mut content = caps.name("content").map_or("", |m| m.as_str());

            let kinds: Vec<ListKind> = prefix.chars().filter_map(ListKind::from_marker).collect();
            for (depth, kind) in kinds.iter().enumerate() {
                if stack.get(depth).is_some_and(|open| open.kind != *kind) {
                    while stack.len() > depth {
                        close_top(&mut stack, &mut found);
                    }
                }
                if stack.len() <= depth {
                    stack.push(List::new(*kind));
                }
            }
            while stack.len() > kinds.len() {
                close_top(&mut stack, &mut found);
            }

            let Some(kind) = prefix.chars().last().and_then(ItemKind::from_marker) else {
                continue;
            };
            if kind == ItemKind::Term
                && let Some(pos) = find_nested(content, DEFINITION_TAG).filter(|&pos| pos > 0)
            {
                let parents = &prefix[..prefix.len() - 1];
                lines.push([format!("{}{}", parents, &content[pos..])]);
                content = content[..pos].trim();
            }

            if let Some(list) = stack.last_mut() {
                list.entries.push(ListEntry::Item(ListItem {
                    kind,
                    content: WikiText::new(content),
                }));
            }
        }

        close_all(&mut stack, &mut found);
        found
    }
}

/// Pop the innermost open list and attach it to its parent, or hand it out
/// as a finished top-level list.
fn close_top(stack: &mut Vec<List>, found: &mut Vec<List>) {
    let Some(list) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.entries.push(ListEntry::List(list)),
        None => {
            log::trace!("{} list closed with {} entries", list.kind, list.entries.len());
            found.push(list);
        }
    }
}

fn close_all(stack: &mut Vec<List>, found: &mut Vec<List>) {
    while !stack.is_empty() {
        close_top(stack, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(list: &List) -> Vec<&str> {
        list.items().map(|i| i.content.as_str()).collect()
    }

    #[test]
    fn nested_unordered() {
        let lists = List::find_all("* a\n** b\n* c");
        assert_eq!(lists.len(), 1);
        let list = &lists[0];
        assert_eq!(list.kind, ListKind::Unordered);
        assert_eq!(texts(list), vec!["a", "c"]);
        assert_eq!(list.entries.len(), 3);
        let nested = list.entries[1].as_list().expect("nested list after first item");
        assert_eq!(nested.kind, ListKind::Unordered);
        assert_eq!(texts(nested), vec!["b"]);
    }

    #[test]
    fn ordered_inside_unordered() {
        let lists = List::find_all("* a\n*# one\n*# two\n* b");
        let nested = lists[0].sublists().next().unwrap();
        assert_eq!(nested.kind, ListKind::Ordered);
        assert_eq!(texts(nested), vec!["one", "two"]);
    }

    #[test]
    fn kind_change_starts_new_list() {
        let lists = List::find_all("# a\n# b\n* c");
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].kind, ListKind::Ordered);
        assert_eq!(texts(&lists[0]), vec!["a", "b"]);
        assert_eq!(lists[1].kind, ListKind::Unordered);
    }

    #[test]
    fn non_list_line_closes_everything() {
        let lists = List::find_all("* a\n** b\nparagraph\n* c");
        assert_eq!(lists.len(), 2);
        assert_eq!(texts(&lists[1]), vec!["c"]);
        assert_eq!(List::find_all("* a\n\n* b").len(), 2);
    }

    #[test]
    fn deep_jump_opens_intermediate_lists() {
        let lists = List::find_all("*** deep");
        assert_eq!(lists.len(), 1);
        let level2 = lists[0].sublists().next().unwrap();
        let level3 = level2.sublists().next().unwrap();
        assert_eq!(texts(level3), vec!["deep"]);
        assert_eq!(lists[0].items().count(), 0);
    }

    #[test]
    fn description_list_terms_and_definitions() {
        let lists = List::find_all("; Term\n: Definition one\n: Definition two");
        assert_eq!(lists.len(), 1);
        let kinds: Vec<ItemKind> = lists[0].items().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![ItemKind::Term, ItemKind::Definition, ItemKind::Definition]);
        assert_eq!(lists[0].kind, ListKind::Description);
    }

    #[test]
    fn term_and_definition_on_one_line() {
        let lists = List::find_all("; Length : 1047 km");
        assert_eq!(lists.len(), 1);
        let items: Vec<&ListItem> = lists[0].items().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, ItemKind::Term);
        assert_eq!(items[0].content, "Length");
        assert_eq!(items[1].kind, ItemKind::Definition);
        assert_eq!(items[1].content, "1047 km");
    }

    #[test]
    fn term_colon_inside_link_is_not_a_split() {
        let lists = List::find_all("; [[Category:Rivers]]");
        let items: Vec<&ListItem> = lists[0].items().collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "[[Category:Rivers]]");
    }

    #[test]
    fn nested_term_split_keeps_depth() {
        let lists = List::find_all("* a\n*; t : d");
        let nested = lists[0].sublists().next().unwrap();
        assert_eq!(nested.kind, ListKind::Description);
        assert_eq!(texts(nested), vec!["t", "d"]);
    }

    #[test]
    fn items_keep_their_links() {
        let lists = List::find_all("* [[Kraków]] on the [[Vistula|river]]");
        let item = lists[0].items().next().unwrap();
        assert_eq!(item.content.links().count(), 2);
    }
}
