// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, screen geometry, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control; there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. `RawMode::enter` snapshots the
// original termios and switches the terminal to raw, unechoed, polling
// input with a 100 ms read timeout. The snapshot is restored exactly once:
// by `RawMode::exit`, by `Drop` on any early return, or by the panic hook
// if the viewer crashes mid-frame.
//
// The panic hook bypasses Rust's stdout lock entirely, writing a pre-built
// reset sequence directly to fd 1. One raw write clears the half-drawn
// frame, then termios is restored and the original panic handler prints
// its message to a working terminal.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::error::TerminalError;
use crate::input::parse_cursor_report;
use crate::reader::ByteSource;

/// Read timeout for raw-mode input, in tenths of a second (`VTIME`).
pub const READ_TIMEOUT_DECISECONDS: u8 = 1;

/// Longest cursor position report we accept, terminator excluded.
const REPORT_MAX: usize = 31;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
///
/// Queried once at startup; the viewer does not follow resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Rows as a `usize`, for indexing arithmetic.
    #[inline]
    #[must_use]
    pub const fn rows(self) -> usize {
        self.rows as usize
    }

    /// Columns as a `usize`, for indexing arithmetic.
    #[inline]
    #[must_use]
    pub const fn cols(self) -> usize {
        self.cols as usize
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// kernel reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Determine the screen size.
///
/// Tries the window-size ioctl first. When that is unavailable or reports
/// zero, falls back to pushing the cursor to the bottom-right corner and
/// asking the terminal where it ended up.
///
/// # Errors
///
/// Returns [`TerminalError::Geometry`] if neither strategy yields a size,
/// or a read/write error from the probe.
pub fn query_geometry(
    src: &mut impl ByteSource,
    out: &mut impl Write,
) -> Result<Size, TerminalError> {
    if let Some(size) = get_size() {
        tracing::debug!(rows = size.rows, cols = size.cols, "window size from ioctl");
        return Ok(size);
    }

    tracing::warn!("window size ioctl unavailable, probing with cursor report");
    probe_geometry(src, out)
}

/// Measure the screen with a cursor position report.
///
/// Reads the reply byte-by-byte until the terminating `R`, a timeout, or
/// [`REPORT_MAX`] bytes, whichever comes first.
///
/// # Errors
///
/// [`TerminalError::Write`] if the probe can't be sent,
/// [`TerminalError::Read`] if reading the reply fails, and
/// [`TerminalError::Geometry`] if the reply is not a valid report.
pub fn probe_geometry(
    src: &mut impl ByteSource,
    out: &mut impl Write,
) -> Result<Size, TerminalError> {
    ansi::cursor_to_bottom_right(out).map_err(TerminalError::Write)?;
    ansi::request_cursor_position(out).map_err(TerminalError::Write)?;
    out.flush().map_err(TerminalError::Write)?;

    let mut reply = Vec::with_capacity(REPORT_MAX);
    while reply.len() < REPORT_MAX {
        match src.read_byte().map_err(TerminalError::Read)? {
            Some(b'R') | None => break,
            Some(b) => reply.push(b),
        }
    }

    let size = parse_cursor_report(&reply).ok_or(TerminalError::Geometry)?;
    tracing::debug!(rows = size.rows, cols = size.cols, "window size from cursor report");
    Ok(size)
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`RawMode`] guard owns its own copy, but the panic hook can't
/// access it. This global backup, behind a [`Mutex`] rather than `static mut`,
/// lets the hook restore the terminal without the guard.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Clear the screen, home the cursor, and make sure it is visible.
///
/// Written in one piece by the panic hook.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard. Ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            write_stdout_fd(EMERGENCY_RESTORE);

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write bytes directly to stdout's file descriptor, ignoring errors.
///
/// Bypasses Rust's `io::stdout()` lock to avoid deadlocking if a panic
/// occurred while the lock was held.
fn write_stdout_fd(bytes: &[u8]) {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            bytes.as_ptr().cast::<libc::c_void>(),
            bytes.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(bytes);
        let _ = io::stdout().flush();
    }
}

/// Best-effort screen reset for fatal paths: clear and home the cursor.
///
/// Never fails: the caller is already on its way out with a more
/// important error to report.
pub fn reset_screen() {
    let mut seq = Vec::with_capacity(8);
    if ansi::reset_screen(&mut seq).is_ok() {
        write_stdout_fd(&seq);
    }
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// Raw-mode guard.
///
/// Holds the terminal attributes captured by [`enter`](Self::enter) and
/// puts them back exactly once: on [`exit`](Self::exit), or on drop if
/// the guard goes out of scope while still active.
///
/// # Example
///
/// ```no_run
/// use kilo_term::terminal::RawMode;
///
/// let mut raw = RawMode::enter()?;
/// // ... render frames, read keys ...
/// raw.exit()?;
/// # Ok::<(), kilo_term::TerminalError>(())
/// ```
pub struct RawMode {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original: Option<libc::termios>,

    #[cfg(not(unix))]
    active: bool,
}

impl RawMode {
    /// Switch stdin's terminal to raw mode.
    ///
    /// Disables echo, canonical input, signal characters, extended input
    /// processing, output post-processing, CR→NL translation and flow
    /// control; sets 8-bit characters; configures reads to return after
    /// at most 100 ms with zero or more bytes.
    ///
    /// # Errors
    ///
    /// [`TerminalError::GetAttributes`] if stdin's attributes can't be read
    /// (e.g. stdin is not a terminal), [`TerminalError::SetAttributes`] if
    /// the raw configuration is rejected.
    #[cfg(unix)]
    pub fn enter() -> Result<Self, TerminalError> {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
            return Err(TerminalError::GetAttributes(io::Error::last_os_error()));
        }

        install_panic_hook();
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(termios);
        }

        let raw = make_raw(termios);
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const raw) } != 0 {
            let err = io::Error::last_os_error();
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            return Err(TerminalError::SetAttributes(err));
        }

        tracing::debug!("raw mode enabled");
        Ok(Self {
            original: Some(termios),
        })
    }

    #[cfg(not(unix))]
    pub fn enter() -> Result<Self, TerminalError> {
        install_panic_hook();
        Ok(Self { active: true })
    }

    /// Whether the saved attributes are still waiting to be restored.
    #[cfg(unix)]
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.original.is_some()
    }

    #[cfg(not(unix))]
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Restore the attributes captured at [`enter`](Self::enter).
    ///
    /// Idempotent: after the first successful call this is a no-op.
    ///
    /// # Errors
    ///
    /// [`TerminalError::SetAttributes`] if `tcsetattr` fails. The guard
    /// stays active so the drop path tries once more.
    #[cfg(unix)]
    pub fn exit(&mut self) -> Result<(), TerminalError> {
        let Some(ref original) = self.original else {
            return Ok(());
        };

        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) } != 0 {
            return Err(TerminalError::SetAttributes(io::Error::last_os_error()));
        }

        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
        self.original = None;
        tracing::debug!("raw mode disabled");
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn exit(&mut self) -> Result<(), TerminalError> {
        self.active = false;
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if self.is_active() {
            if let Err(e) = self.exit() {
                tracing::error!("failed to restore terminal: {e}");
            }
        }
    }
}

/// Derive the raw configuration from the original attributes.
#[cfg(unix)]
fn make_raw(mut termios: libc::termios) -> libc::termios {
    termios.c_iflag &= !(libc::BRKINT | libc::INPCK | libc::ISTRIP | libc::ICRNL | libc::IXON);
    termios.c_oflag &= !libc::OPOST;
    termios.c_cflag |= libc::CS8;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

    // VMIN=0, VTIME=1: read() returns as soon as a byte is available, or
    // with zero bytes after 100 ms.
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;
    termios
}

// ─── Tests ───────────────────────────────────────────────────────────────────
