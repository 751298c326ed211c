//! Cursor position.
//!
//! All coordinates are **0-indexed**. Row 0 is the first line, column 0 is the
//! first byte. Columns count bytes, matching how the renderer slices lines.
//!
//! `row` may equal the document's line count: the cursor can rest on the
//! line just past the end of the file. That row is never drawn as text.
//! `col` has no upper bound tied to the line under the cursor.

use std::fmt;

/// A cursor position in the document: (row, column), both 0-indexed.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// The origin, row 0 column 0.
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for humans (and log lines).
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}
