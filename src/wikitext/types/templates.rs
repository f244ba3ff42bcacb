//! Template call parsing: `{{Name|positional|name=value|...}}`.
//!
//! Calls are recognised line by line. A call opens on a line starting with
//! `{{` and stays open until a top-level `}}` is seen. While open:
//! - a line starting with `|` carries one or more new parameters,
//! - any other line continues the value of the last parameter written.
//!
//! Inner `{{` left open at the end of a line are counted across lines. While
//! that count is above zero every line, `|` or not, belongs to the inner
//! template and continues the last parameter, and its `}}` does not close
//! the outer call.
//!
//! Parameters are split on top-level `|` only, so links and nested templates
//! inside a value stay whole. Whatever follows a closer on the same line is
//! pushed back and parsed as fresh lines. Calls still open at the end of the
//! input are dropped.

use crate::wikitext::errors::{Result, WtError};
use crate::wikitext::line_source::{LineSource, LineSourceOptions};
use crate::wikitext::nested::{find_nested, scan_closer, split_nested};
use crate::wikitext::wiki_text::{TEMPLATE_END, TEMPLATE_START, WikiText};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const PARAMETER_SEPARATOR: &str = "|";
pub const PARAMETER_ASSIGN: &str = "=";

const TEMPLATE_LINES: LineSourceOptions = LineSourceOptions::new(true, false);

/// Which parameter a continuation line should extend.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LastParam {
    Named(String),
    /// 1-based position in `numbered_params`.
    Numbered(usize),
}

/// Template node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    pub name: String,
    pub named_params: BTreeMap<String, WikiText>,
    pub numbered_params: Vec<WikiText>,
    #[serde(skip)]
    last_param: Option<LastParam>,
}

impl Template {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            named_params: BTreeMap::new(),
            numbered_params: Vec::new(),
            last_param: None,
        }
    }

    /// Build from the inside of a call (`Name|params`, braces removed).
    fn from_call(body: &str) -> Self {
        match find_nested(body, PARAMETER_SEPARATOR) {
            Some(pos) => {
                let mut template = Template::new(body[..pos].trim());
                template.parse_params(&body[pos + 1..]);
                template
            }
            None => Template::new(body.trim()),
        }
    }

    fn parse_params(&mut self, params: &str) {
        for param in split_nested(params, PARAMETER_SEPARATOR) {
            match find_nested(param, PARAMETER_ASSIGN) {
                Some(pos) => {
                    let name = param[..pos].trim();
                    let value = param[pos + 1..].trim();
                    if value.is_empty() {
                        continue;
                    }
                    self.named_params
                        .insert(name.to_owned(), WikiText::new(value));
                    self.last_param = Some(LastParam::Named(name.to_owned()));
                }
                None => {
                    self.numbered_params.push(WikiText::new(param.trim()));
                    self.last_param = Some(LastParam::Numbered(self.numbered_params.len()));
                }
            }
        }
    }

    /// Continue the last written parameter with `line`. Without a previous
    /// parameter the line is ignored.
    fn append_to_last_param(&mut self, line: &str) {
        let slot = match &self.last_param {
            Some(LastParam::Named(name)) => self.named_params.get_mut(name),
            Some(LastParam::Numbered(pos)) => self.numbered_params.get_mut(pos - 1),
            None => None,
        };
        match slot {
            Some(value) => *value = value.with_line(line),
            None => log::trace!("template '{}': dropping stray line {:?}", self.name, line),
        }
    }

    /// Named parameter by exact key.
    pub fn get(&self, name: &str) -> Option<&WikiText> {
        self.named_params.get(name)
    }

    /// Named parameter by exact key, or `NotFound`.
    pub fn named(&self, name: &str) -> Result<&WikiText> {
        self.get(name).ok_or_else(|| {
            WtError::not_found(format!(
                "Named parameter '{}' not found in template '{}'",
                name, self.name
            ))
        })
    }

    /// Parameter at 1-based position `pos`. An explicit `pos=value` named
    /// parameter wins over the positional one.
    pub fn param(&self, pos: usize) -> Result<&WikiText> {
        if let Some(value) = self.named_params.get(&pos.to_string()) {
            return Ok(value);
        }
        pos.checked_sub(1)
            .and_then(|idx| self.numbered_params.get(idx))
            .ok_or_else(|| WtError::index_oob(pos, self.numbered_params.len()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named_params.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.named_params.keys().map(String::as_str)
    }

    /// First complete call found in `wikitext`.
    pub fn parse(wikitext: &str) -> Option<Self> {
        Self::find_all(wikitext).into_iter().next()
    }

    /// Every complete call in `wikitext`, in the order their closers appear.
    pub fn find_all(wikitext: &str) -> Vec<Template> {
        let mut found = Vec::new();
        let mut lines = LineSource::new(wikitext, TEMPLATE_LINES);
        let mut current: Option<Template> = None;
        // Inner `{{` of the open call not yet closed.
        let mut depth = 0usize;

        while let Some(line) = lines.next() {
            match current.take() {
                None => {
                    let Some(body) = line.strip_prefix(TEMPLATE_START) else {
                        continue;
                    };
                    depth = 0;
                    match scan_closer(body, &mut depth) {
                        Some(end) => {
                            push_remainder(&mut lines, &body[end + TEMPLATE_END.len()..]);
                            let template = Template::from_call(&body[..end]);
                            log::trace!("template '{}' (single line)", template.name);
                            found.push(template);
                        }
                        None => {
                            let template = Template::from_call(body);
                            log::trace!("template '{}' opened", template.name);
                            current = Some(template);
                        }
                    }
                }
                Some(mut template) => {
                    let inside_inner = depth > 0;
                    let closer = scan_closer(&line, &mut depth);
                    let part = match closer {
                        Some(end) => {
                            push_remainder(&mut lines, &line[end + TEMPLATE_END.len()..]);
                            line[..end].trim()
                        }
                        None => line.as_str(),
                    };
                    if inside_inner {
                        template.append_to_last_param(part);
                    } else if let Some(params) = part.strip_prefix(PARAMETER_SEPARATOR) {
                        template.parse_params(params);
                    } else if !part.is_empty() {
                        template.append_to_last_param(part);
                    }
                    if closer.is_some() {
                        log::trace!("template '{}' closed", template.name);
                        found.push(template);
                    } else {
                        current = Some(template);
                    }
                }
            }
        }

        if let Some(template) = current {
            log::debug!("discarding unterminated template '{}'", template.name);
        }
        found
    }
}

/// Push back what follows a closer. A later call on the same line is split
/// off so it is seen at the start of its own line.
fn push_remainder(lines: &mut LineSource, rest: &str) {
    match rest.find(TEMPLATE_START) {
        Some(pos) if pos > 0 => lines.push([&rest[..pos], &rest[pos..]]),
        _ => lines.push([rest]),
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TEMPLATE_START, self.name)?;
        for value in &self.numbered_params {
            write!(f, "{}{}", PARAMETER_SEPARATOR, value)?;
        }
        for (name, value) in &self.named_params {
            write!(f, "{}{}{}{}", PARAMETER_SEPARATOR, name, PARAMETER_ASSIGN, value)?;
        }
        write!(f, "{}", TEMPLATE_END)
    }
}
