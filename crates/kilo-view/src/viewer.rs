//! Viewer — the application state driven by the event loop.
//!
//! A [`Viewer`] owns the document, the cursor and the scroll offset. It is
//! the [`App`] the terminal event loop paints and feeds keys to; it never
//! touches the terminal itself.

use std::io;

use kilo_term::event_loop::{Action, App};
use kilo_term::input::KeyEvent;
use kilo_term::output::FrameBuffer;
use kilo_term::terminal::Size;

use crate::dispatch::dispatch;
use crate::document::Document;
use crate::position::Position;
use crate::render::render_frame;
use crate::viewport::{self, ScrollOffset};

/// Read-only view of one document.
#[derive(Debug, Default)]
pub struct Viewer {
    document: Document,
    cursor: Position,
    offset: ScrollOffset,
}

impl Viewer {
    /// Start viewing `document` with the cursor at the origin.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document,
            cursor: Position::ZERO,
            offset: ScrollOffset::default(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    /// The scroll offset used by the most recent frame.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> ScrollOffset {
        self.offset
    }
}

impl App for Viewer {
    fn paint(&mut self, frame: &mut FrameBuffer, size: Size) -> io::Result<()> {
        self.offset = viewport::recompute(self.cursor, size, self.offset);
        render_frame(frame, &self.document, self.cursor, self.offset, size)
    }

    fn on_key(&mut self, key: KeyEvent, size: Size) -> Action {
        let action = dispatch(key, &mut self.cursor, &self.document, size);
        tracing::trace!(?key, cursor = ?self.cursor, "key handled");
        action
    }
}
