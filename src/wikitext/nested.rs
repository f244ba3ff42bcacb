//! Nesting-aware scanning helpers.
//!
//! Wikitext separators (`|`, `||`, `!!`, `:`) only count when they sit
//! outside every `[[...]]` link and `{{...}}` template. The helpers here walk
//! a string while tracking both nesting depths and only report positions at
//! depth zero. Every marker is ASCII, so all returned offsets are valid char
//! boundaries.

/// Iterator over byte offsets that are outside any `[[...]]` / `{{...}}`
/// span. Offsets covered by the bracket markers themselves are skipped.
struct TopLevel<'a> {
    bytes: &'a [u8],
    pos: usize,
    links: usize,
    templates: usize,
}

impl<'a> TopLevel<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
            links: 0,
            templates: 0,
        }
    }
}

impl Iterator for TopLevel<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.pos < self.bytes.len() {
            let rest = &self.bytes[self.pos..];
            let at = self.pos;
            if rest.starts_with(b"[[") {
                self.links += 1;
                self.pos += 2;
            } else if rest.starts_with(b"]]") {
                self.links = self.links.saturating_sub(1);
                self.pos += 2;
            } else if rest.starts_with(b"{{") {
                self.templates += 1;
                self.pos += 2;
            } else if rest.starts_with(b"}}") {
                self.templates = self.templates.saturating_sub(1);
                self.pos += 2;
            } else {
                self.pos += 1;
                if self.links == 0 && self.templates == 0 {
                    return Some(at);
                }
            }
        }
        None
    }
}

/// Split `s` on every top-level occurrence of `sep`.
///
/// Always returns at least one element; an empty input yields `[""]`.
pub fn split_nested<'a>(s: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    if sep.is_empty() {
        parts.push(s);
        return parts;
    }
    let sep_bytes = sep.as_bytes();
    let mut start = 0usize;
    for pos in TopLevel::new(s) {
        if pos < start {
            continue;
        }
        if s.as_bytes()[pos..].starts_with(sep_bytes) {
            parts.push(&s[start..pos]);
            start = pos + sep_bytes.len();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Byte offset of the first top-level occurrence of `pat`.
pub fn find_nested(s: &str, pat: &str) -> Option<usize> {
    if pat.is_empty() {
        return None;
    }
    TopLevel::new(s).find(|&pos| s.as_bytes()[pos..].starts_with(pat.as_bytes()))
}

/// Byte offset of the first top-level `ch` that is not doubled, i.e. not
/// directly preceded or followed by another `ch`.
pub fn find_lone(s: &str, ch: u8) -> Option<usize> {
    let bytes = s.as_bytes();
    TopLevel::new(s).find(|&pos| {
        bytes[pos] == ch
            && (pos == 0 || bytes[pos - 1] != ch)
            && bytes.get(pos + 1).is_none_or(|&b| b != ch)
    })
}

/// Byte offset of the `}}` that closes an already-open template, i.e. the
/// first `}}` not balanced by a preceding `{{` in `s`.
pub fn find_closer(s: &str) -> Option<usize> {
    scan_closer(s, &mut 0)
}

/// Like [`find_closer`], but starts with `depth` inner templates already
/// open and leaves the updated count in `depth`. Feeding the lines of a call
/// one after another through the same counter finds the call's own closer
/// even when an inner template spans several lines.
pub fn scan_closer(s: &str, depth: &mut usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(b"{{") {
            *depth += 1;
            i += 2;
        } else if rest.starts_with(b"}}") {
            if *depth == 0 {
                return Some(i);
            }
            *depth -= 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    None
}
