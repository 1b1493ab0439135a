//! Mapping spreadsheet rows to song records.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::Value;

use super::cell;
use super::SongRecord;
use crate::error::{Error, Result};
use crate::types::{InnerId, SongId};

/// One spreadsheet row: header to raw cell, in column order.
pub type Row = serde_json::Map<String, Value>;

/// Record field a sheet column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Human id; normally taken from the first column.
    Id,
    /// Song title.
    Title,
    /// Performer or composer.
    Author,
    /// Plain lyrics.
    Lyrics,
    /// Lyrics with chords.
    LyricsWithChords,
    /// Category.
    Category,
    /// Recording link.
    Youtube,
    /// Sensitive content flag.
    ExplicitContent,
    /// Editorial status.
    Status,
    /// Table of contents exclusion flag.
    SkipToc,
}

impl Field {
    /// Header tried when no configured header for this field is present.
    const fn fallback_header(self) -> Option<&'static str> {
        match self {
            Self::Title => Some("name"),
            Self::Lyrics => Some("text"),
            _ => None,
        }
    }

    const ALL: [Self; 10] = [
        Self::Id,
        Self::Title,
        Self::Author,
        Self::Lyrics,
        Self::LyricsWithChords,
        Self::Category,
        Self::Youtube,
        Self::ExplicitContent,
        Self::Status,
        Self::SkipToc,
    ];
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "lyrics" => Ok(Self::Lyrics),
            "lyrics_with_chords" => Ok(Self::LyricsWithChords),
            "category" => Ok(Self::Category),
            "youtube" => Ok(Self::Youtube),
            "explicit_content" => Ok(Self::ExplicitContent),
            "status" => Ok(Self::Status),
            "skip_toc" => Ok(Self::SkipToc),
            other => Err(format!("unknown record field '{other}'")),
        }
    }
}

/// Builds records from rows using a header to field table.
#[derive(Debug, Clone)]
pub struct SongRecordBuilder {
    mapping: Vec<(String, Field)>,
}

impl SongRecordBuilder {
    /// Resolve a header to field-name table.
    ///
    /// Unknown field names are a configuration error. Fields the sheet only
    /// uses for bookkeeping (such as `lyrics_array`) can be mapped to
    /// `"ignore"`.
    pub fn new(mapping: &BTreeMap<String, String>) -> Result<Self> {
        let mut resolved = Vec::with_capacity(mapping.len());
        for (header, field) in mapping {
            if field == "ignore" {
                continue;
            }
            let field = field.parse::<Field>().map_err(|message| {
                Error::config(message, "Check the column_mapping section of config.json")
            })?;
            resolved.push((header.clone(), field));
        }
        Ok(Self { mapping: resolved })
    }

    /// Build one record. `inner_id` is the running 1-based row counter.
    ///
    /// Missing columns and blank cells become empty strings; nothing is
    /// rejected.
    pub fn build(&self, row: &Row, inner_id: InnerId) -> SongRecord {
        let first_column = row.values().next().map(cell::to_text).unwrap_or_default();
        let mut song = SongRecord::new(SongId(first_column), inner_id);

        for field in Field::ALL {
            let Some(value) = self.lookup(row, field) else {
                continue;
            };
            match field {
                Field::Id => song.id = SongId(cell::to_text(value)),
                Field::Title => song.title = cell::to_text(value),
                Field::Author => song.author = cell::to_text(value),
                Field::Lyrics => song.lyrics = cell::to_text(value),
                Field::LyricsWithChords => song.lyrics_with_chords = cell::to_text(value),
                Field::Category => song.category = cell::to_text(value),
                Field::Youtube => song.youtube = cell::to_text(value),
                Field::ExplicitContent => song.explicit_content = cell::to_flag(value),
                Field::Status => song.status = cell::to_text(value),
                Field::SkipToc => song.skip_toc = cell::to_flag(value),
            }
        }

        song
    }

    /// Build records for every row, numbering them from 1 in input order.
    pub fn build_all(&self, rows: &[Row]) -> Vec<SongRecord> {
        rows.iter()
            .zip(1u32..)
            .map(|(row, n)| self.build(row, InnerId(n)))
            .collect()
    }

    fn lookup<'r>(&self, row: &'r Row, field: Field) -> Option<&'r Value> {
        self.mapping
            .iter()
            .filter(|(_, f)| *f == field)
            .find_map(|(header, _)| row.get(header))
            .or_else(|| field.fallback_header().and_then(|h| row.get(h)))
    }
}
