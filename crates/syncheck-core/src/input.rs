//! Line ingestion and count-prefixed block framing.
//!
//! The stream is one phase-count line followed by, per phase, a synonym block
//! and a query block. Each block is a count line and that many records. A
//! single [`Cursor`] is threaded through every phase by `&mut`.

use crate::error::{Result, SyncheckError};

/// The full input stream split into lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLines {
    lines: Vec<String>,
}

impl InputLines {
    /// Split raw text on `\r\n`, `\r` or `\n`. A trailing terminator adds no
    /// record.
    pub fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let Some(end) = rest.find(['\r', '\n']) else {
                lines.push(rest.to_owned());
                break;
            };
            lines.push(rest[..end].to_owned());
            let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
            rest = &rest[end + terminator..];
        }
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }
}

/// 0-based read position into [`InputLines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(usize);

impl Cursor {
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    pub fn position(self) -> usize {
        self.0
    }

    /// 1-based line number of the line under the cursor.
    pub fn line_no(self) -> usize {
        self.0 + 1
    }

    fn advance(&mut self, by: usize) {
        self.0 += by;
    }
}

/// A run of record lines that followed one count line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// 1-based line number of the first record (one past the count line).
    pub first_line: usize,
    pub lines: &'a [String],
}

impl<'a> Block<'a> {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Records paired with their 1-based line numbers.
    pub fn numbered(self) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        let first = self.first_line;
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| (first + i, line.as_str()))
    }
}

/// The two blocks that make up one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub synonyms: Block<'a>,
    pub queries: Block<'a>,
}

/// Parse the count line under `cursor` without moving it.
pub fn read_count(lines: &InputLines, cursor: Cursor) -> Result<usize> {
    let line = cursor.line_no();
    let raw = lines
        .get(cursor.position())
        .ok_or(SyncheckError::EmptyOrMissingCount { line })?;

    if raw.trim().is_empty() {
        return Err(SyncheckError::EmptyOrMissingCount { line });
    }

    let malformed = || SyncheckError::MalformedCount {
        line,
        value: raw.to_string(),
    };
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    // All digits, so the only failure left is overflow.
    raw.parse().map_err(|_| malformed())
}

/// Read one count-prefixed block and move the cursor past it.
pub fn read_block<'a>(lines: &'a InputLines, cursor: &mut Cursor) -> Result<Block<'a>> {
    let count = read_count(lines, *cursor)?;
    let start = cursor.position() + 1;
    let available = lines.len().saturating_sub(start);
    if count > available {
        return Err(SyncheckError::TruncatedBlock {
            line: cursor.line_no(),
            expected: count,
            available,
        });
    }

    let block = Block {
        first_line: start + 1,
        lines: &lines.as_slice()[start..start + count],
    };
    cursor.advance(count + 1);
    Ok(block)
}

/// Read the synonym block and then the query block of one phase.
pub fn split_frame<'a>(lines: &'a InputLines, cursor: &mut Cursor) -> Result<Frame<'a>> {
    let synonyms = read_block(lines, cursor)?;
    let queries = read_block(lines, cursor)?;
    Ok(Frame { synonyms, queries })
}

/// Read the phase count from the first line. Returns the cursor positioned on
/// the first phase's synonym count.
pub fn read_phase_count(lines: &InputLines) -> Result<(usize, Cursor)> {
    let mut cursor = Cursor::default();
    let phases = read_count(lines, cursor)?;
    cursor.advance(1);
    Ok((phases, cursor))
}
