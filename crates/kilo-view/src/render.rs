//! Frame rendering — the bridge from document to terminal bytes.
//!
//! [`render_frame`] writes one complete screen update into a writer (in
//! practice a [`FrameBuffer`](kilo_term::output::FrameBuffer) that is then
//! flushed in a single write). The layout of a frame:
//!
//! ```text
//! ESC[?25l ESC[H                       hide cursor, go home
//! line text  ESC[K \r\n                 one per screen row ...
//! ~          ESC[K \r\n                 ... rows past the end get a tilde
//! ~          ESC[K                      (no line break after the last row)
//! ESC[<r>;<c>H ESC[?25h                place and show the cursor
//! ```
//!
//! Erasing to end-of-line after each row instead of clearing the whole
//! screen up front means a frame never shows a blank screen in between.

use std::io::{self, Write};

use kilo_term::ansi;
use kilo_term::terminal::Size;

use crate::document::Document;
use crate::position::Position;
use crate::viewport::ScrollOffset;

/// Version shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Marker drawn on rows past the end of the document.
const FILLER: &[u8] = b"~";

/// The banner shown in the middle of the screen when there is no document.
#[must_use]
pub fn welcome_message() -> String {
    format!("Kilo editor -- version {VERSION}")
}

/// Render a whole frame.
///
/// `offset` should already have been brought up to date with
/// [`recompute`](crate::viewport::recompute) for `cursor` and `size`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn render_frame(
    out: &mut impl Write,
    doc: &Document,
    cursor: Position,
    offset: ScrollOffset,
    size: Size,
) -> io::Result<()> {
    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;

    draw_rows(out, doc, offset, size)?;

    ansi::cursor_to(
        out,
        cursor.row.saturating_sub(offset.row),
        cursor.col.saturating_sub(offset.col),
    )?;
    ansi::cursor_show(out)
}

/// Draw every screen row.
fn draw_rows(
    out: &mut impl Write,
    doc: &Document,
    offset: ScrollOffset,
    size: Size,
) -> io::Result<()> {
    let rows = size.rows();
    let cols = size.cols();

    for y in 0..rows {
        match doc.line(y + offset.row) {
            Some(line) => out.write_all(line.window(offset.col, cols))?,
            None if doc.is_empty() && y == rows / 2 => draw_welcome(out, cols)?,
            None => out.write_all(FILLER)?,
        }

        ansi::erase_line(out)?;
        if y + 1 < rows {
            out.write_all(b"\r\n")?;
        }
    }
    Ok(())
}

/// Draw the welcome banner centered in `cols` columns.
///
/// The banner is cut to the screen width. When there is room to the left,
/// the first padding cell keeps the filler tilde so the column of tildes
/// stays unbroken.
fn draw_welcome(out: &mut impl Write, cols: usize) -> io::Result<()> {
    let message = welcome_message();
    let shown = &message.as_bytes()[..message.len().min(cols)];

    let mut padding = (cols - shown.len()) / 2;
    if padding > 0 {
        out.write_all(FILLER)?;
        padding -= 1;
    }
    for _ in 0..padding {
        out.write_all(b" ")?;
    }
    out.write_all(shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::recompute;
    use pretty_assertions::assert_eq;

    const fn size(rows: u16, cols: u16) -> Size {
        Size { cols, rows }
    }

    fn frame(doc: &Document, cursor: Position, offset: ScrollOffset, s: Size) -> String {
        let mut out = Vec::new();
        render_frame(&mut out, doc, cursor, offset, s).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Split the row area of a frame into its visible row texts.
    fn rows_of(frame: &str) -> Vec<String> {
        let body = frame
            .strip_prefix("\x1b[?25l\x1b[H")
            .expect("frame starts with hide + home");
        let end = body.rfind("\x1b[K").expect("frame has rows") + "\x1b[K".len();
        body[..end]
            .split("\r\n")
            .map(|r| r.strip_suffix("\x1b[K").expect("row ends with erase").to_string())
            .collect()
    }

    fn tail_of(frame: &str) -> &str {
        let end = frame.rfind("\x1b[K").unwrap() + "\x1b[K".len();
        &frame[end..]
    }

    // ── Welcome banner ────────────────────────────────────────────────────

    #[test]
    fn welcome_mentions_version() {
        assert_eq!(welcome_message(), "Kilo editor -- version 0.0.1");
    }

    #[test]
    fn empty_document_24x80_shows_banner_on_row_12() {
        let doc = Document::new();
        let rows = rows_of(&frame(&doc, Position::ZERO, ScrollOffset::default(), size(24, 80)));

        assert_eq!(rows.len(), 24);
        let banner = welcome_message();
        let padding = (80 - banner.len()) / 2;
        let expected = format!("~{}{banner}", " ".repeat(padding - 1));
        assert_eq!(rows[12], expected);

        for (y, row) in rows.iter().enumerate() {
            if y != 12 {
                assert_eq!(row, "~", "row {y}");
            }
        }
    }

    #[test]
    fn banner_truncated_to_narrow_screen() {
        let doc = Document::new();
        let rows = rows_of(&frame(&doc, Position::ZERO, ScrollOffset::default(), size(3, 10)));
        assert_eq!(rows[1], "Kilo edito");
    }

    #[test]
    fn banner_with_single_padding_cell_is_just_tilde() {
        let width = u16::try_from(welcome_message().len() + 2).unwrap();
        let doc = Document::new();
        let rows = rows_of(&frame(&doc, Position::ZERO, ScrollOffset::default(), size(2, width)));
        assert_eq!(rows[1], format!("~{}", welcome_message()));
    }

    #[test]
    fn no_banner_when_document_has_lines() {
        let doc = Document::load(["only line"]);
        let rows = rows_of(&frame(&doc, Position::ZERO, ScrollOffset::default(), size(24, 80)));
        assert_eq!(rows[0], "only line");
        assert!(rows[1..].iter().all(|r| r == "~"));
    }

    // ── Text rows ─────────────────────────────────────────────────────────

    #[test]
    fn exact_frame_bytes_small_document() {
        let doc = Document::load(["ab", "cd"]);
        let f = frame(&doc, Position::new(1, 1), ScrollOffset::default(), size(3, 5));
        assert_eq!(
            f,
            "\x1b[?25l\x1b[H\
             ab\x1b[K\r\n\
             cd\x1b[K\r\n\
             ~\x1b[K\
             \x1b[2;2H\x1b[?25h"
        );
    }

    #[test]
    fn long_lines_clamped_to_width() {
        let doc = Document::load(["0123456789abcdef"]);
        let rows = rows_of(&frame(&doc, Position::ZERO, ScrollOffset::default(), size(1, 10)));
        assert_eq!(rows, vec!["0123456789".to_string()]);
    }

    #[test]
    fn horizontal_offset_slices_lines() {
        let doc = Document::load(["0123456789", "ab"]);
        let rows = rows_of(&frame(&doc, Position::new(0, 6), ScrollOffset::new(0, 4), size(2, 3)));
        // The short line is entirely left of the window.
        assert_eq!(rows, vec!["456".to_string(), String::new()]);
    }

    #[test]
    fn vertical_offset_selects_rows() {
        let doc = Document::load((0..100).map(|i| format!("line {i}")));
        let cursor = Position::new(50, 0);
        let offset = recompute(cursor, size(20, 80), ScrollOffset::default());
        let f = frame(&doc, cursor, offset, size(20, 80));
        let rows = rows_of(&f);

        assert_eq!(offset.row, 31);
        assert_eq!(rows[0], "line 31");
        assert_eq!(rows[19], "line 50");
        assert_eq!(tail_of(&f), "\x1b[20;1H\x1b[?25h");
    }

    #[test]
    fn rows_past_end_after_scrolling_are_tildes() {
        let doc = Document::load(["a", "b", "c"]);
        let cursor = Position::new(3, 0);
        let rows = rows_of(&frame(&doc, cursor, ScrollOffset::new(2, 0), size(4, 10)));
        assert_eq!(rows, vec!["c", "~", "~", "~"]);
    }

    #[test]
    fn last_row_has_no_line_break() {
        let doc = Document::load(["x"]);
        let f = frame(&doc, Position::ZERO, ScrollOffset::default(), size(5, 10));
        assert_eq!(f.matches("\r\n").count(), 4);
        assert_eq!(f.matches("\x1b[K").count(), 5);
    }

    // ── Cursor placement ──────────────────────────────────────────────────

    #[test]
    fn cursor_is_placed_relative_to_offset() {
        let doc = Document::load(["x"; 50]);
        let f = frame(&doc, Position::new(12, 30), ScrollOffset::new(10, 25), size(20, 40));
        assert_eq!(tail_of(&f), "\x1b[3;6H\x1b[?25h");
    }

    #[test]
    fn cursor_on_row_past_end_of_document() {
        let doc = Document::load(["one", "two"]);
        let f = frame(&doc, Position::new(2, 0), ScrollOffset::default(), size(10, 10));
        assert_eq!(tail_of(&f), "\x1b[3;1H\x1b[?25h");
    }

    #[test]
    fn frame_brackets_with_hide_and_show() {
        let f = frame(&Document::new(), Position::ZERO, ScrollOffset::default(), size(4, 20));
        assert!(f.starts_with("\x1b[?25l\x1b[H"));
        assert!(f.ends_with("\x1b[?25h"));
    }
}
