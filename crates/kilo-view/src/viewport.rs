//! Viewport — which part of the document is on screen.
//!
//! The viewport is a [`ScrollOffset`]: the document row shown on the first
//! screen line and the byte column shown in the first screen column. It is
//! derived, never set by input handling. Before every frame
//! [`recompute`] moves it by the smallest amount that brings the cursor
//! back into the window:
//!
//! ```text
//!            col ──▶
//!   row   ┌───────────────────────────┐
//!    │    │ document                  │
//!    ▼    │    ┌──────────────┐       │
//!         │    │ screen rows  │       │  offset.row ≤ cursor.row < offset.row + rows
//!         │    │ × cols    ▮  │       │  offset.col ≤ cursor.col < offset.col + cols
//!         │    └──────────────┘       │
//!         └───────────────────────────┘
//! ```

use kilo_term::terminal::Size;

use crate::position::Position;

/// Top-left corner of the visible window, in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOffset {
    /// First visible document row.
    pub row: usize,
    /// First visible byte column.
    pub col: usize,
}

impl ScrollOffset {
    /// Create an offset.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether `cursor` falls inside the window this offset shows on a
    /// screen of `size`.
    #[must_use]
    pub const fn shows(self, cursor: Position, size: Size) -> bool {
        cursor.row >= self.row
            && cursor.row < self.row + size.rows()
            && cursor.col >= self.col
            && cursor.col < self.col + size.cols()
    }
}

/// Scroll just enough to keep `cursor` visible.
///
/// Each axis is handled on its own: if the cursor is above (left of) the
/// window the window starts at the cursor; if it is below (right of) the
/// window the window ends at the cursor. Otherwise `prior` is kept, so
/// calling this again with the same inputs is a no-op.
///
/// A zero screen dimension leaves that axis untouched.
#[must_use]
pub const fn recompute(cursor: Position, size: Size, prior: ScrollOffset) -> ScrollOffset {
    ScrollOffset {
        row: scroll_axis(cursor.row, size.rows(), prior.row),
        col: scroll_axis(cursor.col, size.cols(), prior.col),
    }
}

const fn scroll_axis(pos: usize, extent: usize, offset: usize) -> usize {
    if extent == 0 {
        offset
    } else if pos < offset {
        pos
    } else if pos >= offset + extent {
        pos - extent + 1
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn size(rows: u16, cols: u16) -> Size {
        Size { cols, rows }
    }

    // ── Vertical ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_already_visible_keeps_offset() {
        let prior = ScrollOffset::new(5, 0);
        let next = recompute(Position::new(10, 0), size(20, 80), prior);
        assert_eq!(next, prior);
    }

    #[test]
    fn scroll_down_reveals_cursor_at_bottom() {
        // 100-line document, cursor at row 50, 20 screen rows.
        let next = recompute(Position::new(50, 0), size(20, 80), ScrollOffset::default());
        assert_eq!(next.row, 31);
    }

    #[test]
    fn scroll_up_reveals_cursor_at_top() {
        let next = recompute(Position::new(3, 0), size(20, 80), ScrollOffset::new(40, 0));
        assert_eq!(next.row, 3);
    }

    #[test]
    fn last_visible_row_does_not_scroll() {
        let next = recompute(Position::new(19, 0), size(20, 80), ScrollOffset::default());
        assert_eq!(next.row, 0);
        let next = recompute(Position::new(20, 0), size(20, 80), ScrollOffset::default());
        assert_eq!(next.row, 1);
    }

    // ── Horizontal ────────────────────────────────────────────────────────

    #[test]
    fn scroll_right_for_long_line() {
        let next = recompute(Position::new(0, 100), size(24, 80), ScrollOffset::default());
        assert_eq!(next.col, 21);
    }

    #[test]
    fn scroll_left_when_cursor_before() {
        let next = recompute(Position::new(0, 5), size(24, 80), ScrollOffset::new(0, 30));
        assert_eq!(next.col, 5);
    }

    #[test]
    fn axes_are_independent() {
        let next = recompute(Position::new(30, 90), size(24, 80), ScrollOffset::default());
        assert_eq!(next, ScrollOffset::new(7, 11));
    }

    // ── Edge geometry ─────────────────────────────────────────────────────

    #[test]
    fn one_by_one_screen_tracks_cursor_exactly() {
        let next = recompute(Position::new(7, 9), size(1, 1), ScrollOffset::default());
        assert_eq!(next, ScrollOffset::new(7, 9));
    }

    #[test]
    fn zero_size_leaves_offset() {
        let prior = ScrollOffset::new(4, 2);
        assert_eq!(recompute(Position::new(50, 50), size(0, 0), prior), prior);
    }

    // ── Properties ────────────────────────────────────────────────────────

    #[test]
    fn recompute_always_shows_cursor() {
        let priors = [0, 1, 7, 31, 99, 500];
        for rows in [1u16, 2, 5, 20, 24] {
            for cols in [1u16, 3, 40, 80] {
                for crow in [0usize, 1, 19, 20, 50, 100] {
                    for ccol in [0usize, 1, 79, 80, 200] {
                        for &pr in &priors {
                            for &pc in &priors {
                                let cursor = Position::new(crow, ccol);
                                let s = size(rows, cols);
                                let next = recompute(cursor, s, ScrollOffset::new(pr, pc));
                                assert!(next.shows(cursor, s), "{cursor:?} {s:?} {next:?}");
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn recompute_is_a_fixed_point() {
        for crow in [0usize, 12, 50, 99] {
            for ccol in [0usize, 79, 80, 150] {
                let cursor = Position::new(crow, ccol);
                let s = size(20, 80);
                let once = recompute(cursor, s, ScrollOffset::new(60, 3));
                let twice = recompute(cursor, s, once);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn shows_is_half_open() {
        let s = size(10, 10);
        let off = ScrollOffset::new(5, 5);
        assert!(off.shows(Position::new(5, 5), s));
        assert!(off.shows(Position::new(14, 14), s));
        assert!(!off.shows(Position::new(15, 5), s));
        assert!(!off.shows(Position::new(5, 4), s));
    }
}
