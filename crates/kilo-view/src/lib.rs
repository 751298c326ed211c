//! # kilo-view — Viewer core for kilo
//!
//! Everything between the file on disk and the bytes of a frame:
//!
//! - **[`document`]** — `Document` and `Line`, the loaded file as raw bytes
//! - **[`position`]** — `Position` (row, col), 0-indexed
//! - **[`viewport`]** — `ScrollOffset` and the scroll recomputation
//! - **[`render`]** — frame composition: rows, tildes, welcome banner
//! - **[`dispatch`]** — keys to cursor moves (and quit)
//! - **[`viewer`]** — `Viewer`, the [`App`](kilo_term::event_loop::App) tying it together
//!
//! Terminal control lives in `kilo-term`; nothing here touches a file
//! descriptor except [`Document::open`](document::Document::open).

pub mod dispatch;
pub mod document;
pub mod error;
pub mod position;
pub mod render;
pub mod viewer;
pub mod viewport;

pub use error::LineSourceError;
