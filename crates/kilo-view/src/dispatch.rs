//! Key dispatch — turning keys into cursor moves.
//!
//! The viewer has a single mode. Every key either moves the cursor, quits,
//! or is ignored:
//!
//! | Key               | Effect                                               |
//! |-------------------|------------------------------------------------------|
//! | ←                 | column − 1, stops at 0                               |
//! | →                 | column + 1, **not** limited by the line length       |
//! | ↑                 | row − 1, stops at 0                                  |
//! | ↓                 | row + 1, stops at `line_count` (one past the end)    |
//! | Page Up / Down    | ↑ / ↓ repeated once per screen row                   |
//! | Home              | column 0                                             |
//! | End               | last screen column, **not** the end of the line      |
//! | Ctrl-Q            | quit                                                 |
//!
//! Right and End deliberately ignore the length of the line under the
//! cursor; the cursor can sit in empty space past the text.

use kilo_term::event_loop::Action;
use kilo_term::input::{KeyCode, KeyEvent};
use kilo_term::terminal::Size;

use crate::document::Document;
use crate::position::Position;

/// The key that quits the viewer.
pub const QUIT_KEY: KeyEvent = KeyEvent::ctrl(b'q');

/// A single-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Move the cursor one step, staying within `0..=line_count` rows and
/// non-negative columns.
pub const fn move_cursor(cursor: &mut Position, dir: Direction, line_count: usize) {
    match dir {
        Direction::Left => {
            if cursor.col > 0 {
                cursor.col -= 1;
            }
        }
        Direction::Right => cursor.col += 1,
        Direction::Up => {
            if cursor.row > 0 {
                cursor.row -= 1;
            }
        }
        Direction::Down => {
            if cursor.row < line_count {
                cursor.row += 1;
            }
        }
    }
}

/// Apply one key to the cursor viewing `doc` on a screen of `size`.
///
/// Returns [`Action::Quit`] for [`QUIT_KEY`], otherwise
/// [`Action::Continue`].
pub fn dispatch(key: KeyEvent, cursor: &mut Position, doc: &Document, size: Size) -> Action {
    if key == QUIT_KEY {
        return Action::Quit;
    }

    let line_count = doc.line_count();

    match key.code {
        KeyCode::Left => move_cursor(cursor, Direction::Left, line_count),
        KeyCode::Right => move_cursor(cursor, Direction::Right, line_count),
        KeyCode::Up => move_cursor(cursor, Direction::Up, line_count),
        KeyCode::Down => move_cursor(cursor, Direction::Down, line_count),
        KeyCode::PageUp | KeyCode::PageDown => {
            let dir = if key.code == KeyCode::PageUp {
                Direction::Up
            } else {
                Direction::Down
            };
            for _ in 0..size.rows() {
                move_cursor(cursor, dir, line_count);
            }
        }
        KeyCode::Home => cursor.col = 0,
        KeyCode::End => cursor.col = size.cols().saturating_sub(1),
        KeyCode::Delete | KeyCode::Escape | KeyCode::Char(_) => {}
    }

    Action::Continue
}
