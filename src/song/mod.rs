//! Song records.
//!
//! A [`SongRecord`] is created once at import time from a spreadsheet row and
//! is read-only input to every later step. Removal from the tables of contents
//! is expressed with `skip_toc`, never by deleting the record.

pub mod builder;
pub mod source;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::types::{InnerId, SongId};

pub use builder::{Field, Row, SongRecordBuilder};
pub use source::{JsonWorkbook, SheetSource};
pub use store::{load_songs, save_songs, SongSelector, Summary};

/// One song as stored between import and generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    /// Human-entered id from the first sheet column.
    #[serde(default, deserialize_with = "cell::song_id")]
    pub id: SongId,
    /// Import-assigned position, the canonical sort and reference key.
    #[serde(deserialize_with = "cell::inner_id")]
    pub inner_id: InnerId,
    /// Song title.
    #[serde(default, deserialize_with = "cell::text")]
    pub title: String,
    /// Performer or composer.
    #[serde(default, deserialize_with = "cell::text")]
    pub author: String,
    /// Plain lyrics.
    #[serde(default, deserialize_with = "cell::text")]
    pub lyrics: String,
    /// Lyrics with chord lines.
    #[serde(default, deserialize_with = "cell::text")]
    pub lyrics_with_chords: String,
    /// Free-form category.
    #[serde(default, deserialize_with = "cell::text")]
    pub category: String,
    /// Recording link, empty when unknown.
    #[serde(default, deserialize_with = "cell::text")]
    pub youtube: String,
    /// Marks songs with sensitive content.
    #[serde(default, deserialize_with = "cell::flag")]
    pub explicit_content: bool,
    /// Editorial status.
    #[serde(default, deserialize_with = "cell::text")]
    pub status: String,
    /// Leave this song out of the tables of contents.
    #[serde(default, deserialize_with = "cell::flag")]
    pub skip_toc: bool,
}

impl SongRecord {
    /// Empty record with only ids set.
    pub fn new(id: impl Into<SongId>, inner_id: InnerId) -> Self {
        Self {
            id: id.into(),
            inner_id,
            title: String::new(),
            author: String::new(),
            lyrics: String::new(),
            lyrics_with_chords: String::new(),
            category: String::new(),
            youtube: String::new(),
            explicit_content: false,
            status: String::new(),
            skip_toc: false,
        }
    }

    /// Whether a usable recording link is present.
    pub fn has_link(&self) -> bool {
        let link = self.youtube.trim();
        !link.is_empty() && link != crate::constants::links::NOT_FOUND
    }
}

/// Read the configured sheet and build records in row order.
pub fn import(config: &Config, source: &dyn SheetSource) -> Result<Vec<SongRecord>> {
    let builder = SongRecordBuilder::new(&config.column_mapping)?;
    let rows = source.read_rows(&config.sheet_name)?;
    let songs = builder.build_all(&rows);
    tracing::info!("Imported {} songs from sheet '{}'", songs.len(), config.sheet_name);
    Ok(songs)
}

/// Lenient conversions for spreadsheet cells and cached JSON values.
pub(crate) mod cell {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::types::{InnerId, SongId};

    /// Render a cell as text. Blank cells become the empty string and whole
    /// numbers lose their fractional part.
    pub fn to_text(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.to_string()
                } else if let Some(u) = n.as_u64() {
                    u.to_string()
                } else {
                    match n.as_f64() {
                        #[allow(clippy::cast_possible_truncation)]
                        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                            (f as i64).to_string()
                        }
                        _ => n.to_string(),
                    }
                }
            }
            Value::Array(_) | Value::Object(_) => value.to_string(),
        }
    }

    /// Interpret a cell as a yes/no flag.
    pub fn to_flag(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "true" | "yes" | "y" | "igen" | "i" | "x" | "1"
            ),
            Value::Null | Value::Array(_) | Value::Object(_) => false,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(to_text(&Value::deserialize(d)?))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(to_flag(&Value::deserialize(d)?))
    }

    pub fn song_id<'de, D: Deserializer<'de>>(d: D) -> Result<SongId, D::Error> {
        Ok(SongId(to_text(&Value::deserialize(d)?)))
    }

    /// Accepts `7` as well as `"7"`; older caches stored the id as a string.
    pub fn inner_id<'de, D: Deserializer<'de>>(d: D) -> Result<InnerId, D::Error> {
        let value = Value::deserialize(d)?;
        let parsed = match &value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        parsed
            .filter(|n| *n > 0)
            .map(InnerId)
            .ok_or_else(|| D::Error::custom(format!("invalid inner_id {value}")))
    }
}
