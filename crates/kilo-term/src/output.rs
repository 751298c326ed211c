// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Output buffering.
//
// Two components work together to keep every frame atomic:
//
//   FrameBuffer — accumulates all bytes of one screen update in memory so
//   the entire frame can be handed to the terminal in a single write. The
//   terminal never sees half a frame, so there is no visible tearing
//   between the cursor-hide at the top and the cursor-show at the end.
//
//   TtyWriter — an unbuffered writer straight onto the stdout descriptor.
//   Rust's `io::stdout()` is line-buffered and would split a frame at every
//   `\n`; going to the fd directly keeps one flush equal to one `write(2)`.

use std::io::{self, Write};

// ─── FrameBuffer ─────────────────────────────────────────────────────────────

/// A byte buffer that accumulates one frame for a single `write()` syscall.
///
/// Instead of dozens of small writes per frame (cursor moves, line text,
/// erase-line sequences), everything goes into this buffer first. A single
/// [`flush_to`](Self::flush_to) at frame end writes it all at once.
///
/// Default capacity: 16 KB, enough for most frames without reallocation.
pub struct FrameBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl FrameBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write the accumulated frame to `w` in one `write_all` and clear.
    ///
    /// An empty buffer performs no write at all.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer is left intact
    /// in that case so the caller can inspect what was pending.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for FrameBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing via flush_to().
        Ok(())
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── TtyWriter ───────────────────────────────────────────────────────────────

/// Unbuffered writer on the stdout file descriptor.
///
/// Each `write` is exactly one `write(2)`. `EINTR` is surfaced as
/// [`io::ErrorKind::Interrupted`], which `write_all` already retries.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtyWriter;

impl TtyWriter {
    /// Create a writer on stdout.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl Write for TtyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                buf.as_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        // Negative means failure, with the cause in errno.
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(not(unix))]
impl Write for TtyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut out = io::stdout().lock();
        out.write_all(buf)?;
        out.flush()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi;

    /// Sink that records every `write` call separately.
    #[derive(Default)]
    struct CountingSink {
        writes: Vec<Vec<u8>>,
        flushes: usize,
    }

    impl Write for CountingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn new_is_empty_with_capacity() {
        let buf = FrameBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert!(buf.buf.capacity() >= DEFAULT_CAPACITY);
    }

    #[test]
    fn append_and_write_accumulate_in_order() {
        let mut buf = FrameBuffer::new();
        buf.append(b"~");
        ansi::erase_line(&mut buf).unwrap();
        buf.append(b"\r\n");
        assert_eq!(buf.as_bytes(), b"~\x1b[K\r\n");
    }

    #[test]
    fn flush_to_is_a_single_write() {
        let mut buf = FrameBuffer::new();
        ansi::cursor_hide(&mut buf).unwrap();
        ansi::cursor_home(&mut buf).unwrap();
        for _ in 0..50 {
            buf.append(b"~");
            ansi::erase_line(&mut buf).unwrap();
            buf.append(b"\r\n");
        }
        ansi::cursor_show(&mut buf).unwrap();
        let expected = buf.as_bytes().to_vec();

        let mut sink = CountingSink::default();
        buf.flush_to(&mut sink).unwrap();

        assert_eq!(sink.writes.len(), 1);
        assert_eq!(sink.writes[0], expected);
        assert_eq!(sink.flushes, 1);
        assert!(buf.is_empty());
    }

    #[test]
    fn flush_empty_writes_nothing() {
        let mut buf = FrameBuffer::new();
        let mut sink = CountingSink::default();
        buf.flush_to(&mut sink).unwrap();
        assert!(sink.writes.is_empty());
        assert_eq!(sink.flushes, 0);
    }

    #[test]
    fn failed_flush_keeps_contents() {
        let mut buf = FrameBuffer::new();
        buf.append(b"frame");
        assert!(buf.flush_to(&mut BrokenSink).is_err());
        assert_eq!(buf.as_bytes(), b"frame");
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = FrameBuffer::new();
        buf.append(&[b'x'; 100]);
        let cap = buf.buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.buf.capacity(), cap);
    }

    #[test]
    fn write_trait_flush_is_noop() {
        let mut buf = FrameBuffer::new();
        buf.write_all(b"abc").unwrap();
        buf.flush().unwrap();
        assert_eq!(buf.as_bytes(), b"abc");
    }

    #[test]
    fn tty_writer_empty_write_does_not_panic() {
        let mut w = TtyWriter::new();
        let _ = w.write(b"");
    }
}
