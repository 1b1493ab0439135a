//! `songbook` - spreadsheet to songbook PDF generator.
//!
//! Songs are imported from a spreadsheet export into a JSON record store,
//! then rendered into singer, musician and projection editions: one PDF per
//! song, tables of contents, and a merged book per edition.

// Re-export public modules for use in integration tests and as a library
pub mod config;
pub mod constants;
pub mod error;
pub mod lyrics;
pub mod render;
pub mod services;
pub mod song;
pub mod toc;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use song::SongRecord;
pub use types::{InnerId, SongId, SortKey, Version};
