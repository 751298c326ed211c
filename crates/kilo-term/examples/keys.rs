// SPDX-License-Identifier: MIT
//
// kilo-term keys — a live key decoder viewer.
//
// Wires raw mode, geometry, the key decoder and single-write frames
// together without any document. Press keys to see what they decode to.
// Ctrl-Q to quit.
//
// Usage:
//   cargo run -p kilo-term --example keys

use std::collections::VecDeque;
use std::io::{self, Write};

use kilo_term::ansi;
use kilo_term::event_loop::{Action, App, EventLoop};
use kilo_term::input::KeyEvent;
use kilo_term::output::FrameBuffer;
use kilo_term::terminal::Size;

/// Keys kept on screen.
const MAX_LOG_ENTRIES: usize = 100;

struct Keys {
    log: VecDeque<String>,
    count: u64,
}

impl App for Keys {
    fn paint(&mut self, frame: &mut FrameBuffer, size: Size) -> io::Result<()> {
        ansi::cursor_hide(frame)?;
        ansi::cursor_home(frame)?;

        let rows = size.rows();
        let header = format!(
            "kilo-term keys  {}x{}  {} keys  (Ctrl-Q quits)",
            size.cols, size.rows, self.count
        );
        let body = rows.saturating_sub(1);
        let skip = self.log.len().saturating_sub(body);

        let mut lines = std::iter::once(header).chain(self.log.iter().skip(skip).cloned());
        for y in 0..rows {
            if let Some(line) = lines.next() {
                let shown = &line.as_bytes()[..line.len().min(size.cols())];
                frame.write_all(shown)?;
            }
            ansi::erase_line(frame)?;
            if y + 1 < rows {
                frame.write_all(b"\r\n")?;
            }
        }
        ansi::cursor_show(frame)
    }

    fn on_key(&mut self, key: KeyEvent, _size: Size) -> Action {
        if key.is_ctrl(b'q') {
            return Action::Quit;
        }
        self.count += 1;
        if self.log.len() == MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
        self.log.push_back(format!("{:>5}  {key:?}", self.count));
        Action::Continue
    }
}

fn main() {
    let mut app = Keys {
        log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
        count: 0,
    };

    let result = EventLoop::new().and_then(|event_loop| event_loop.run(&mut app));
    if let Err(err) = result {
        kilo_term::terminal::reset_screen();
        eprintln!("keys: {err}");
        std::process::exit(1);
    }
}
