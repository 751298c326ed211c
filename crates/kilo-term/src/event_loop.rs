// SPDX-License-Identifier: MIT
//
// Event loop — the heartbeat of the viewer.
//
// One thread, one loop, strictly ordered:
//
//   paint → flush (one write) → read a key (blocks ≤ 100 ms per byte) → dispatch
//
// There is no background reader and no tick: the only suspension point is
// the bounded byte read inside the decoder. When the read times out between
// keys the decoder simply tries again. Nothing is repainted until a key
// has actually been handled, so an idle viewer writes nothing.
//
// Quitting is an explicit action from the application. The loop clears the
// screen, homes the cursor and returns without painting again; raw mode is
// released when the `EventLoop` (and its `RawMode` guard) is dropped.

use std::io::Write;

use crate::ansi;
use crate::error::TerminalError;
use crate::input::{Decoder, KeyEvent};
use crate::output::{FrameBuffer, TtyWriter};
use crate::reader::{ByteSource, StdinSource};
use crate::terminal::{self, RawMode, Size};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// The loop calls [`paint`](App::paint) once per frame, then
/// [`on_key`](App::on_key) once per decoded key.
pub trait App {
    /// Compose one complete frame into `frame`.
    ///
    /// Everything the terminal should show, including the final cursor
    /// placement, goes into this buffer; the loop writes it in one piece.
    ///
    /// # Errors
    ///
    /// Only if writing into the buffer fails, which a `Vec` never does.
    fn paint(&mut self, frame: &mut FrameBuffer, size: Size) -> std::io::Result<()>;

    /// Handle one decoded key.
    ///
    /// Return [`Action::Quit`] to exit the event loop.
    fn on_key(&mut self, key: KeyEvent, size: Size) -> Action;
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Run the render/read/dispatch loop over an arbitrary source and sink.
///
/// Returns `Ok(())` once the app asks to quit, after emitting the
/// screen-clear and cursor-home sequences.
///
/// # Errors
///
/// [`TerminalError::Write`] if a frame can't be written,
/// [`TerminalError::Read`] if the source fails.
pub fn drive<A: App + ?Sized>(
    app: &mut A,
    src: &mut impl ByteSource,
    out: &mut impl Write,
    size: Size,
) -> Result<(), TerminalError> {
    let mut decoder = Decoder::new();
    let mut frame = FrameBuffer::new();

    loop {
        app.paint(&mut frame, size).map_err(TerminalError::Write)?;
        frame.flush_to(out).map_err(TerminalError::Write)?;

        let key = decoder.read_key(src)?;
        if app.on_key(key, size) == Action::Quit {
            tracing::info!("quit requested");
            frame.clear();
            ansi::reset_screen(&mut frame).map_err(TerminalError::Write)?;
            frame.flush_to(out).map_err(TerminalError::Write)?;
            return Ok(());
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The viewer's terminal session: raw mode plus the measured screen.
///
/// Creating it switches the terminal to raw mode; dropping it restores
/// the original attributes, whichever way [`run`](Self::run) ended.
pub struct EventLoop {
    raw: RawMode,
    size: Size,
    src: StdinSource,
    out: TtyWriter,
}

impl EventLoop {
    /// Enter raw mode and measure the screen.
    ///
    /// # Errors
    ///
    /// Any [`TerminalError`] from entering raw mode or sizing the screen.
    /// Raw mode is already released again when this returns an error.
    pub fn new() -> Result<Self, TerminalError> {
        let raw = RawMode::enter()?;
        let mut src = StdinSource::new();
        let mut out = TtyWriter::new();
        let size = terminal::query_geometry(&mut src, &mut out)?;

        Ok(Self {
            raw,
            size,
            src,
            out,
        })
    }

    /// Screen size measured at startup.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Run `app` until it quits, then restore the terminal.
    ///
    /// # Errors
    ///
    /// Any [`TerminalError`] from the loop, or from restoring the original
    /// terminal attributes (which is fatal: the terminal would otherwise be
    /// left unusable).
    pub fn run<A: App + ?Sized>(mut self, app: &mut A) -> Result<(), TerminalError> {
        drive(app, &mut self.src, &mut self.out, self.size)?;
        self.raw.exit()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::reader::ReplaySource;
    use pretty_assertions::assert_eq;
    use std::io;

    /// Records keys and paints a numbered marker per frame.
    struct Recorder {
        frames: usize,
        keys: Vec<KeyEvent>,
    }

    impl Recorder {
        const fn new() -> Self {
            Self {
                frames: 0,
                keys: Vec::new(),
            }
        }
    }

    impl App for Recorder {
        fn paint(&mut self, frame: &mut FrameBuffer, _size: Size) -> io::Result<()> {
            self.frames += 1;
            write!(frame, "<frame {}>", self.frames)
        }

        fn on_key(&mut self, key: KeyEvent, _size: Size) -> Action {
            self.keys.push(key);
            if key.is_ctrl(b'q') {
                Action::Quit
            } else {
                Action::Continue
            }
        }
    }

    /// Sink counting separate write calls.
    #[derive(Default)]
    struct Sink {
        writes: Vec<Vec<u8>>,
    }

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    const SIZE: Size = Size { cols: 80, rows: 24 };

    #[test]
    fn quit_clears_screen_and_stops_painting() {
        let mut app = Recorder::new();
        let mut src = ReplaySource::new(b"a\x1b[B\x11");
        let mut out = Sink::default();

        drive(&mut app, &mut src, &mut out, SIZE).unwrap();

        // One frame before each key; none after quit.
        assert_eq!(app.frames, 3);
        assert_eq!(
            app.keys,
            vec![
                KeyEvent::plain(KeyCode::Char(b'a')),
                KeyEvent::plain(KeyCode::Down),
                KeyEvent::ctrl(b'q'),
            ]
        );
        assert_eq!(out.writes.len(), 4);
        assert_eq!(out.writes[0], b"<frame 1>");
        assert_eq!(out.writes[2], b"<frame 3>");
        assert_eq!(out.writes[3], b"\x1b[2J\x1b[H");
    }

    #[test]
    fn each_frame_is_exactly_one_write() {
        let mut app = Recorder::new();
        let mut src = ReplaySource::new(b"xyz\x11");
        let mut out = Sink::default();

        drive(&mut app, &mut src, &mut out, SIZE).unwrap();

        let frames: Vec<_> = out.writes.iter().filter(|w| w.starts_with(b"<frame")).collect();
        assert_eq!(frames.len(), app.frames);
    }

    #[test]
    fn timeouts_do_not_repaint() {
        let mut app = Recorder::new();
        let mut src = ReplaySource::from_reads([None, None, Some(b'j'), None, Some(0x11)]);
        let mut out = Sink::default();

        drive(&mut app, &mut src, &mut out, SIZE).unwrap();
        assert_eq!(app.frames, 2);
    }

    #[test]
    fn source_failure_propagates() {
        let mut app = Recorder::new();
        let mut src = ReplaySource::new(b"a");
        let mut out = Sink::default();

        let err = drive(&mut app, &mut src, &mut out, SIZE).unwrap_err();
        assert!(matches!(err, TerminalError::Read(_)));
        assert_eq!(app.frames, 2);
    }

    #[test]
    fn write_failure_propagates() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut app = Recorder::new();
        let mut src = ReplaySource::new(b"\x11");
        let err = drive(&mut app, &mut src, &mut Broken, SIZE).unwrap_err();
        assert!(matches!(err, TerminalError::Write(_)));
        assert!(app.keys.is_empty());
    }

    #[test]
    fn event_loop_new_outside_tty_is_an_error() {
        if !terminal::is_tty() {
            assert!(EventLoop::new().is_err());
        }
    }
}
