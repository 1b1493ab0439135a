//! Record store: the JSON cache between import and generation.
//!
//! Read and written wholesale as an array of flat objects.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::SongRecord;
use crate::error::{Error, Result};
use crate::types::{InnerId, SongId};

/// Load every record from the store.
pub fn load_songs(path: &Path) -> Result<Vec<SongRecord>> {
    if !path.is_file() {
        return Err(Error::config(
            format!("Songs JSON file not found at {}", path.display()),
            "Run `songbook import` first",
        ));
    }
    let data = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
    let songs: Vec<SongRecord> = serde_json::from_str(&data)
        .map_err(|e| Error::parse(format!("Invalid songs JSON: {e}"), path.to_path_buf()))?;
    tracing::info!("Loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

/// Replace the store with `songs`.
pub fn save_songs(path: &Path, songs: &[SongRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).map_err(|e| Error::io(e, parent.to_path_buf()))?;
    }
    let json = serde_json::to_string_pretty(songs)
        .map_err(|e| Error::Msg(format!("Failed to serialize songs: {e}")))?;
    fs_err::write(path, json).map_err(|e| Error::io(e, path.to_path_buf()))?;
    tracing::info!("Wrote {} songs to {}", songs.len(), path.display());
    Ok(())
}

/// How a single song is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongSelector {
    /// By the human id. The first matching record wins.
    Id(SongId),
    /// By the import-assigned id.
    InnerId(InnerId),
}

impl SongSelector {
    /// Find the selected song.
    pub fn find<'a>(&self, songs: &'a [SongRecord]) -> Result<&'a SongRecord> {
        let found = match self {
            Self::Id(id) => songs.iter().find(|s| s.id.as_str().trim() == id.as_str().trim()),
            Self::InnerId(inner) => songs.iter().find(|s| s.inner_id == *inner),
        };
        found.ok_or_else(|| Error::NotFound(format!("song {self}")))
    }
}

impl fmt::Display for SongSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "with id {id}"),
            Self::InnerId(inner) => write!(f, "with inner id {inner}"),
        }
    }
}

/// Counts reported after an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of records.
    pub total: usize,
    /// Records with a recording link.
    pub with_link: usize,
    /// Records flagged as explicit.
    pub explicit: usize,
    /// Records per non-empty category, sorted by category.
    pub categories: BTreeMap<String, usize>,
}

impl Summary {
    /// Tally a record set.
    pub fn of(songs: &[SongRecord]) -> Self {
        let mut summary = Self { total: songs.len(), ..Self::default() };
        for song in songs {
            if song.has_link() {
                summary.with_link += 1;
            }
            if song.explicit_content {
                summary.explicit += 1;
            }
            let category = song.category.trim();
            if !category.is_empty() {
                *summary.categories.entry(category.to_string()).or_insert(0) += 1;
            }
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total songs: {}", self.total)?;
        writeln!(f, "Songs with YouTube links: {}", self.with_link)?;
        write!(f, "Songs with explicit content: {}", self.explicit)?;
        if !self.categories.is_empty() {
            write!(f, "\n\nSongs by category:")?;
            for (category, count) in &self.categories {
                write!(f, "\n  {category}: {count}")?;
            }
        }
        Ok(())
    }
}
