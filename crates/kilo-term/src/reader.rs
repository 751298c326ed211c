// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources — where the key decoder gets its input.
//
// In raw mode the terminal is configured with VMIN=0 / VTIME=1: a `read()`
// on stdin returns as soon as one byte is available, or after 100 ms with
// zero bytes. That empty read is the polling heartbeat of the viewer, not
// an error, so the source reports it as `Ok(None)`.
//
// Everything runs on the one control thread. There is no background reader:
// the order "render, then read" is part of the program's correctness.

use std::collections::VecDeque;
use std::io;

/// A blocking-with-timeout source of single input bytes.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(None)` when the read timed out with nothing available.
    ///
    /// # Errors
    ///
    /// Returns an error only for genuine I/O failures.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── Stdin ───────────────────────────────────────────────────────────────────

/// Reads stdin one byte per `read(2)`, honoring the raw-mode timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl StdinSource {
    /// Create a source on the stdin descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                // Cygwin and some BSDs report the VTIME expiry as EAGAIN;
                // a signal landing mid-read is just as harmless.
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

// ─── Replay ──────────────────────────────────────────────────────────────────

/// A scripted source that replays a fixed sequence of reads.
///
/// Each entry is one `read_byte` result: `Some(b)` delivers a byte,
/// `None` simulates a timeout. Once the script runs out every further read
/// fails with [`io::ErrorKind::UnexpectedEof`], so a caller that would
/// otherwise poll forever terminates instead.
///
/// Useful for driving the decoder and the event loop without a terminal.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    reads: VecDeque<Option<u8>>,
}

impl ReplaySource {
    /// Replay `bytes` back to back, with no timeouts in between.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            reads: bytes.iter().copied().map(Some).collect(),
        }
    }

    /// Replay an explicit script of bytes and timeouts.
    #[must_use]
    pub fn from_reads(reads: impl IntoIterator<Item = Option<u8>>) -> Self {
        Self {
            reads: reads.into_iter().collect(),
        }
    }

    /// Append a timeout to the end of the script.
    #[must_use]
    pub fn then_timeout(mut self) -> Self {
        self.reads.push_back(None);
        self
    }

    /// Append more bytes to the end of the script.
    #[must_use]
    pub fn then_bytes(mut self, bytes: &[u8]) -> Self {
        self.reads.extend(bytes.iter().copied().map(Some));
        self
    }

    /// Reads left in the script.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.reads.len()
    }
}

impl ByteSource for ReplaySource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.reads
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "replay script exhausted"))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
