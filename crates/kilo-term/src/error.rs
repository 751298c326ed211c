// SPDX-License-Identifier: MIT
//
// Terminal failures.
//
// Every variant is fatal to the viewer: there is no degraded mode for a
// terminal we can no longer configure, size, read, or write. Input
// timeouts and unrecognized escape sequences are *not* errors and never
// appear here; the decoder absorbs both.

use std::io;

use thiserror::Error;

/// A failure talking to the controlling terminal.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// `tcgetattr` failed, usually because stdin is not a terminal.
    #[error("tcgetattr: {0}")]
    GetAttributes(#[source] io::Error),

    /// `tcsetattr` failed while entering or leaving raw mode.
    #[error("tcsetattr: {0}")]
    SetAttributes(#[source] io::Error),

    /// Neither the window-size ioctl nor the cursor-report probe produced
    /// a usable screen size.
    #[error("unable to determine window size")]
    Geometry,

    /// Reading a byte from the terminal failed.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// Writing to the terminal failed.
    #[error("write: {0}")]
    Write(#[source] io::Error),
}
