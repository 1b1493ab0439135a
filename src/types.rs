//! Core type definitions for compile-time safety.
//!
//! Newtype wrappers keep the human-entered song id and the import-assigned
//! inner id from being mixed up, and enums name the songbook editions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Songbook edition being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    /// Plain lyrics, A4, with a QR link to a recording.
    Singer,
    /// Lyrics with highlighted chords, A4.
    Musician,
    /// 16:9 slides for a projector, no table of contents.
    Projection,
}

impl Version {
    /// Returns all versions in generation order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Singer, Self::Musician, Self::Projection]
    }

    /// Lowercase name used in file names and config keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Singer => "singer",
            Self::Musician => "musician",
            Self::Projection => "projection",
        }
    }

    /// Whether this edition carries tables of contents.
    #[must_use]
    pub const fn has_toc(self) -> bool {
        !matches!(self, Self::Projection)
    }

    /// Whether song pages show chord markup.
    #[must_use]
    pub const fn shows_chords(self) -> bool {
        matches!(self, Self::Musician)
    }

    /// Whether song pages carry a QR code for the recording link.
    #[must_use]
    pub const fn shows_qr(self) -> bool {
        matches!(self, Self::Singer)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|v| v.name() == wanted)
            .ok_or_else(|| format!("invalid version '{wanted}' (expected singer, musician or projection)"))
    }
}

/// Ordering of a table of contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending by import order.
    ByInnerId,
    /// By title under the configured alphabet.
    ByTitle,
}

impl SortKey {
    /// Value handed to templates as `sort_order`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ByInnerId => "id",
            Self::ByTitle => "title",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" | "1" | "inner_id" | "by_inner_id" => Ok(Self::ByInnerId),
            "title" | "2" | "by_title" => Ok(Self::ByTitle),
            other => Err(format!("invalid sort key '{other}' (expected id or title)")),
        }
    }
}

/// Import-assigned, 1-based song number. Unique and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InnerId(pub u32);

impl InnerId {
    /// Get the inner numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for InnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for InnerId {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

/// Human-entered song identifier from the first spreadsheet column.
///
/// May be alphanumeric and may repeat, so it is never used for ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub String);

impl SongId {
    /// Create a new `SongId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SongId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SongId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for SongId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn version_parses_case_insensitively() {
        assert_eq!("Singer".parse::<Version>().unwrap(), Version::Singer);
        assert_eq!("PROJECTION".parse::<Version>().unwrap(), Version::Projection);
        assert!("choir".parse::<Version>().is_err());
    }

    #[test]
    fn every_version_round_trips_through_its_name() {
        let parsed: Vec<Version> = Version::all().iter().map(|v| v.name().parse().unwrap()).collect();
        assert_eq!(parsed, Version::all());
    }

    #[test]
    fn only_projection_skips_toc() {
        assert!(Version::Singer.has_toc());
        assert!(Version::Musician.has_toc());
        assert!(!Version::Projection.has_toc());
    }

    #[test]
    fn sort_key_accepts_legacy_toc_numbers() {
        assert_eq!("1".parse::<SortKey>().unwrap(), SortKey::ByInnerId);
        assert_eq!("2".parse::<SortKey>().unwrap(), SortKey::ByTitle);
        assert_eq!("title".parse::<SortKey>().unwrap(), SortKey::ByTitle);
    }
}
