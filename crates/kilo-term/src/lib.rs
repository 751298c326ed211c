// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal engine for kilo.
//
// The part of the viewer that talks to the terminal: raw-mode lifecycle,
// screen measurement, a byte-at-a-time key decoder for VT escape
// sequences, and a frame buffer that turns each screen update into one
// write. Everything runs on a single thread with a 100 ms polling read.
//
// This crate intentionally avoids terminal frameworks (crossterm, termion)
// in favor of direct termios calls and a handful of hand-written ANSI
// sequences. The viewer needs eight escape sequences; it emits exactly those.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::TerminalError;
