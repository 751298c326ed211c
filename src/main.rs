// SPDX-License-Identifier: MIT
//
// kilo — a raw-mode terminal text viewer.
//
// This is the main binary that wires the two crates together:
//
//   kilo-term → raw mode, screen geometry, key decoding, event loop
//   kilo-view → document, viewport, frame rendering, key dispatch
//
// Startup order matters: the file is loaded *before* the terminal is
// touched, so a bad path is reported on a normal, cooked terminal. Only
// then does the event loop enter raw mode and take over the screen.
//
//   args → logging → Document::open → EventLoop::new (raw mode) → run
//
// Any error after raw mode was entered has already released it (the
// `RawMode` guard is dropped on the way out); `main` then clears the
// screen, prints `kilo: <error>` and exits with status 1.

mod logging;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use thiserror::Error;

use kilo_term::TerminalError;
use kilo_term::event_loop::EventLoop;
use kilo_view::LineSourceError;
use kilo_view::document::Document;
use kilo_view::viewer::Viewer;

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "kilo")]
#[command(about = "A raw-mode terminal text viewer", long_about = None)]
#[command(version)]
struct Args {
    /// File to view. Without one, an empty screen with a welcome banner.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Write diagnostics to this file (filtered by RUST_LOG, default debug)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Everything that ends the viewer with a non-zero status.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Terminal(#[from] TerminalError),

    #[error(transparent)]
    Source(#[from] LineSourceError),

    #[error("log file {}: {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run(args: Args) -> Result<(), Error> {
    if let Some(path) = &args.log_file {
        logging::init(path).map_err(|source| Error::Log {
            path: path.clone(),
            source,
        })?;
    }

    let document = match &args.file {
        Some(path) => Document::open(path)?,
        None => Document::new(),
    };

    let event_loop = EventLoop::new()?;
    tracing::debug!(size = ?event_loop.size(), "session started");

    let mut viewer = Viewer::new(document);
    event_loop.run(&mut viewer)?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        tracing::error!(%err, "fatal");
        if matches!(err, Error::Terminal(_)) {
            kilo_term::terminal::reset_screen();
        }
        eprintln!("kilo: {err}");
        process::exit(1);
    }
}
