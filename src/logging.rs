// SPDX-License-Identifier: MIT
//
// Diagnostic logging.
//
// The terminal is in raw mode for the whole session, so log output can
// never go to stdout or stderr. Logging is off unless `--log-file` names a
// file; then every crate's `tracing` events go there, filtered by
// `RUST_LOG` (default: `debug`).

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "debug";

/// Install the global subscriber, truncating `path`.
///
/// # Errors
///
/// Returns the I/O error if the log file can't be created.
pub fn init(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    build_subscriber(file).init();
    tracing::debug!(path = %path.display(), "logging started");
    Ok(())
}

/// The subscriber `init` installs, writing plain text to `file`.
fn build_subscriber(file: File) -> impl tracing::Subscriber + Send + Sync {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_land_in_the_file() {
        let path = std::env::temp_dir().join(format!("kilo-log-{}.log", std::process::id()));
        let file = File::create(&path).unwrap();

        tracing::subscriber::with_default(build_subscriber(file), || {
            tracing::info!(lines = 3, "document loaded");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(contents.contains("document loaded"), "{contents}");
        assert!(contents.contains("lines=3"), "{contents}");
        assert!(!contents.contains('\x1b'), "log must be plain text");
    }

    #[test]
    fn init_reports_uncreatable_file() {
        let err = init(Path::new("/definitely/not/here/kilo.log")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
