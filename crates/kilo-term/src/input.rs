// SPDX-License-Identifier: MIT
//
// Terminal input decoding.
//
// Turns raw stdin bytes into logical keys. Terminals report special keys
// as variable-length escape sequences that share prefixes with each other
// and with the Escape key itself:
//
//   ESC [ A        arrow up          ESC [ 5 ~      page up
//   ESC [ H        home              ESC O H        home (SS3 variant)
//   ESC            the Escape key, or the first byte of any of the above
//
// # Design
//
// The decoder is an explicit finite-state machine. [`transition`] is the
// whole table: one `match` on `(state, input)` where input is either a byte
// or a timeout. Every accepted and rejected sequence is a row in that match,
// so each can be tested on its own.
//
// A timeout anywhere inside a sequence resolves to a lone Escape; the
// decoder never waits longer than one read timeout per byte, so a truncated
// sequence can't hang the viewer. Unrecognized tails are swallowed and also
// come out as Escape, never as an error.

use bitflags::bitflags;

use crate::error::TerminalError;
use crate::reader::ByteSource;
use crate::terminal::Size;

/// The escape byte (0x1B).
pub const ESC: u8 = 0x1B;

// ─── Key Types ───────────────────────────────────────────────────────────────

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A plain byte: printable ASCII, a control letter (see
    /// [`Modifiers::CTRL`]), or any other byte the terminal sent as-is.
    Char(u8),
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Editing / other ─────────────────────────────────────────
    Delete,
    /// Escape pressed alone, or an escape sequence we don't recognize.
    Escape,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Only Ctrl is observable without a keyboard protocol: the terminal
    /// sends Ctrl+letter as the letter's low five bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0000_0100;
    }
}

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + `letter` (lowercase ASCII).
    #[inline]
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self {
            code: KeyCode::Char(letter),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is Ctrl + `letter`.
    #[inline]
    #[must_use]
    pub fn is_ctrl(self, letter: u8) -> bool {
        self.code == KeyCode::Char(letter) && self.modifiers.contains(Modifiers::CTRL)
    }

    /// Decode a single non-escape byte.
    ///
    /// `0x01..=0x1A` are Ctrl+A through Ctrl+Z (so Ctrl-Q is `0x11`);
    /// anything else is delivered as the byte itself.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x01..=0x1A => Self::ctrl(byte + b'a' - 1),
            _ => Self::plain(KeyCode::Char(byte)),
        }
    }
}

// ─── State Machine ───────────────────────────────────────────────────────────

/// Where the decoder is inside an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Between keys.
    #[default]
    Ground,
    /// Saw `ESC`.
    Escape,
    /// Saw `ESC` followed by this byte (`[`, `O`, or anything else).
    EscapeThen(u8),
    /// Saw `ESC [` followed by this ASCII digit; waiting for `~`.
    CsiDigit(u8),
}

/// Outcome of feeding one input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Timed out between keys; nothing happened.
    Idle,
    /// Inside a sequence; read another byte.
    Await(State),
    /// A complete key. The decoder is back in [`State::Ground`].
    Emit(KeyEvent),
}

const fn emit(code: KeyCode) -> Transition {
    Transition::Emit(KeyEvent::plain(code))
}

/// The complete transition table.
///
/// `input` is `None` when the read timed out with no byte.
#[must_use]
pub const fn transition(state: State, input: Option<u8>) -> Transition {
    match (state, input) {
        // ── Between keys ─────────────────────────────────────────
        (State::Ground, None) => Transition::Idle,
        (State::Ground, Some(ESC)) => Transition::Await(State::Escape),
        (State::Ground, Some(b)) => Transition::Emit(KeyEvent::from_byte(b)),

        // ── Timeout inside a sequence: it was just Escape ────────
        (_, None) => emit(KeyCode::Escape),

        // ── ESC x: always read one more byte before deciding ─────
        (State::Escape, Some(b)) => Transition::Await(State::EscapeThen(b)),

        // ── ESC [ x ──────────────────────────────────────────────
        (State::EscapeThen(b'['), Some(d @ b'0'..=b'9')) => Transition::Await(State::CsiDigit(d)),
        (State::EscapeThen(b'['), Some(b'A')) => emit(KeyCode::Up),
        (State::EscapeThen(b'['), Some(b'B')) => emit(KeyCode::Down),
        (State::EscapeThen(b'['), Some(b'C')) => emit(KeyCode::Right),
        (State::EscapeThen(b'['), Some(b'D')) => emit(KeyCode::Left),
        (State::EscapeThen(b'['), Some(b'H')) => emit(KeyCode::Home),
        (State::EscapeThen(b'['), Some(b'F')) => emit(KeyCode::End),

        // ── ESC O x (SS3) ────────────────────────────────────────
        (State::EscapeThen(b'O'), Some(b'H')) => emit(KeyCode::Home),
        (State::EscapeThen(b'O'), Some(b'F')) => emit(KeyCode::End),

        // ── ESC [ d ~ ────────────────────────────────────────────
        (State::CsiDigit(b'1' | b'7'), Some(b'~')) => emit(KeyCode::Home),
        (State::CsiDigit(b'3'), Some(b'~')) => emit(KeyCode::Delete),
        (State::CsiDigit(b'4' | b'8'), Some(b'~')) => emit(KeyCode::End),
        (State::CsiDigit(b'5'), Some(b'~')) => emit(KeyCode::PageUp),
        (State::CsiDigit(b'6'), Some(b'~')) => emit(KeyCode::PageDown),

        // ── Everything else is swallowed ─────────────────────────
        (State::EscapeThen(_) | State::CsiDigit(_), Some(_)) => emit(KeyCode::Escape),
    }
}

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Byte-at-a-time key decoder.
///
/// Holds the current [`State`] so it can be driven either from a
/// [`ByteSource`] ([`read_key`](Self::read_key)) or by feeding inputs
/// directly ([`advance`](Self::advance)).
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    state: State,
}

impl Decoder {
    /// A decoder between keys.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Ground,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Whether the decoder is in the middle of an escape sequence.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !matches!(self.state, State::Ground)
    }

    /// Feed one read result. Returns a key when one completes.
    pub fn advance(&mut self, input: Option<u8>) -> Option<KeyEvent> {
        match transition(self.state, input) {
            Transition::Idle => None,
            Transition::Await(next) => {
                self.state = next;
                None
            }
            Transition::Emit(key) => {
                if key.code == KeyCode::Escape && input.is_some() && self.state != State::Ground {
                    tracing::trace!(state = ?self.state, byte = ?input, "unrecognized escape sequence");
                }
                self.state = State::Ground;
                Some(key)
            }
        }
    }

    /// Try to decode one key.
    ///
    /// Returns `Ok(None)` if the first read times out. Once a byte has
    /// arrived, keeps reading until the sequence resolves. Each further
    /// read is itself bounded by the terminal's timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalError::Read`] if the source fails.
    pub fn try_read_key(
        &mut self,
        src: &mut impl ByteSource,
    ) -> Result<Option<KeyEvent>, TerminalError> {
        loop {
            let input = src.read_byte().map_err(TerminalError::Read)?;
            if let Some(key) = self.advance(input) {
                return Ok(Some(key));
            }
            if !self.is_pending() {
                return Ok(None);
            }
        }
    }

    /// Block until a key arrives, retrying across timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalError::Read`] if the source fails.
    pub fn read_key(&mut self, src: &mut impl ByteSource) -> Result<KeyEvent, TerminalError> {
        loop {
            if let Some(key) = self.try_read_key(src)? {
                return Ok(key);
            }
        }
    }
}

// ─── Cursor Position Report ──────────────────────────────────────────────────

/// Parse a cursor position report, `ESC [ <rows> ; <cols>`, with the
/// final `R` already stripped.
///
/// Returns `None` for anything malformed or for a zero dimension.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(&[ESC, b'['])?;
    let (rows, rest) = parse_u16_from(body)?;
    let rest = rest.strip_prefix(b";")?;
    let (cols, rest) = parse_u16_from(rest)?;

    if !rest.is_empty() || rows == 0 || cols == 0 {
        return None;
    }
    Some(Size { cols, rows })
}

/// Parse a run of ASCII digits at the start of `buf`.
///
/// Returns the value and the unconsumed tail, or `None` if there are no
/// digits or the value overflows `u16`.
fn parse_u16_from(buf: &[u8]) -> Option<(u16, &[u8])> {
    let digits = buf.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let mut val: u16 = 0;
    for &b in &buf[..digits] {
        val = val.checked_mul(10)?.checked_add(u16::from(b - b'0'))?;
    }
    Some((val, &buf[digits..]))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
