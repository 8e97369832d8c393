/*!
Side-by-side viewer for diffs between an archived and the current version of
a web page.

The diff itself comes from an external service (`POST /generate-diff`); this
crate selects the archive date, requests the diff, renders it in two columns
and provides the changes-only view and text search on top of it.
*/

pub mod client;
pub mod date_selector;
pub mod html;
pub mod model;
pub mod render;
pub mod report;
pub mod search;
pub mod surface;
pub mod viewer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod utils;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use client::{DiffSource, FetchError, HttpDiffSource};
pub use model::{DiffEntry, DiffResponse, DiffStats, EntryKind, WordDiffEntry, WordKind};
pub use render::ViewMode;
pub use surface::{ElementId, PageSurface, Surface};
pub use viewer::{DiffViewer, ViewerError};
