//! Pushback-capable line reader shared by every parser.
//!
//! Lines come out in document order. A parser that reads too far on one
//! physical line can hand the leftover back with [`LineSource::push`] and it
//! will be read again before anything else.

use std::collections::VecDeque;

/// How a [`LineSource`] post-processes the lines it yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSourceOptions {
    /// Trim surrounding whitespace from every yielded line.
    pub strip: bool,
    /// Yield blank lines (after stripping). When false they are skipped.
    pub keep_empty: bool,
}

impl Default for LineSourceOptions {
    fn default() -> Self {
        Self {
            strip: false,
            keep_empty: true,
        }
    }
}

impl LineSourceOptions {
    pub const fn new(strip: bool, keep_empty: bool) -> Self {
        Self { strip, keep_empty }
    }
}

/// Owned queue of pending lines.
#[derive(Debug, Clone, Default)]
pub struct LineSource {
    lines: VecDeque<String>,
    options: LineSourceOptions,
}

impl LineSource {
    pub fn new(text: &str, options: LineSourceOptions) -> Self {
        Self {
            lines: text.lines().map(str::to_owned).collect(),
            options,
        }
    }

    /// Put `lines` back at the front of the queue. The first line given is
    /// the first one read next.
    pub fn push<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        I::IntoIter: DoubleEndedIterator,
        S: Into<String>,
    {
        for line in lines.into_iter().rev() {
            self.lines.push_front(line.into());
        }
    }
}

impl Iterator for LineSource {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(line) = self.lines.pop_front() {
            let line = if self.options.strip {
                line.trim().to_owned()
            } else {
                line
            };
            if !self.options.keep_empty && line.is_empty() {
                continue;
            }
            return Some(line);
        }
        None
    }
}
