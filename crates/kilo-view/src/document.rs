//! Document — the lines being viewed.
//!
//! A `Document` is an ordered list of [`Line`]s in file order. Lines are raw
//! bytes, not `String`s: the viewer draws whatever the file contains and
//! measures columns in bytes, so invalid UTF-8 is not an error here.
//!
//! # Design choices
//!
//! - **Read-only after load.** Nothing in the viewer edits text; the line
//!   count is fixed once the document exists.
//!
//! - **Line endings are stripped on load.** Every trailing `\n` and `\r` is
//!   removed from each line, so `"text\r\n"` and `"text\n"` both store
//!   `"text"`. Nothing records which style the file used.
//!
//! - **No size limit.** The whole file is loaded into memory.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::LineSourceError;

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// One line of text without its line terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8>,
}

impl Line {
    /// Create a line, stripping any trailing `\r` / `\n` bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let mut bytes = bytes.into();
        while matches!(bytes.last(), Some(b'\n' | b'\r')) {
            bytes.pop();
        }
        Self { bytes }
    }

    /// The line's bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for an empty line.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The bytes visible in a window `width` wide starting at byte `start`.
    ///
    /// Empty when `start` is at or past the end of the line.
    #[must_use]
    pub fn window(&self, start: usize, width: usize) -> &[u8] {
        let from = start.min(self.bytes.len());
        let to = from + width.min(self.bytes.len() - from);
        &self.bytes[from..to]
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The ordered lines of the viewed file.
#[derive(Debug, Clone, Default)]
pub struct Document {
    lines: Vec<Line>,
    path: Option<PathBuf>,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// An empty document, shown with the welcome banner.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            path: None,
        }
    }

    /// Build a document from lines in order.
    ///
    /// Each line has its trailing `\r` / `\n` bytes stripped.
    #[must_use]
    pub fn load<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        Self {
            lines: lines.into_iter().map(Line::new).collect(),
            path: None,
        }
    }

    /// Read lines from `reader`, splitting on `\n`.
    ///
    /// A final line without a terminator is still a line; an empty input
    /// is an empty document.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying reader.
    pub fn read_from(mut reader: impl BufRead) -> io::Result<Self> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            lines.push(Line::new(buf.as_slice()));
        }
        Ok(Self { lines, path: None })
    }

    /// Load a file from disk.
    ///
    /// # Errors
    ///
    /// [`LineSourceError::Open`] if the file can't be opened,
    /// [`LineSourceError::Read`] if reading it fails.
    pub fn open(path: &Path) -> Result<Self, LineSourceError> {
        let file = File::open(path).map_err(|source| LineSourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut doc =
            Self::read_from(BufReader::new(file)).map_err(|source| LineSourceError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        doc.path = Some(path.to_path_buf());

        tracing::info!(path = %path.display(), lines = doc.line_count(), "document loaded");
        Ok(doc)
    }

    // -- Access ---------------------------------------------------------------

    /// Number of lines.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// True when there are no lines at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// A line by 0-indexed row, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    /// Length in bytes of a line, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn line_length(&self, row: usize) -> Option<usize> {
        self.line(row).map(Line::len)
    }

    /// All lines in order.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The file this document was loaded from, if any.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
