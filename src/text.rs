//! Whitespace-separated integer scanning shared by the store and pattern formats.

use crate::error::{BamError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Token cursor over a text file that remembers which line each token came from.
pub(crate) struct Tokens<'a> {
    path: PathBuf,
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    current: Option<(usize, std::str::SplitWhitespace<'a>)>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(path: &Path, text: &'a str) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: text.lines().enumerate(),
            current: None,
            last_line: 0,
        }
    }

    /// Current 1-based line number (the line of the last token handed out).
    pub(crate) fn line(&self) -> usize {
        self.last_line
    }

    pub(crate) fn error(&self, reason: impl Into<String>) -> BamError {
        BamError::format(&self.path, self.last_line, reason)
    }

    /// Next token, crossing line boundaries.
    pub(crate) fn next_token(&mut self) -> Option<&'a str> {
        loop {
            if let Some((line_no, words)) = self.current.as_mut() {
                if let Some(word) = words.next() {
                    self.last_line = *line_no;
                    return Some(word);
                }
            }
            let (idx, line) = self.lines.next()?;
            self.current = Some((idx + 1, line.split_whitespace()));
        }
    }

    /// Parse the next token as `T`, naming `what` in the error.
    pub(crate) fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self
            .next_token()
            .ok_or_else(|| self.error(format!("unexpected end of file, expected {}", what)))?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid {} '{}'", what, token)))
    }
}
