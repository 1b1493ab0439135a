//! Table of contents ordering.
//!
//! Songs flagged `skip_toc` are dropped, the rest are ordered either by import
//! order or by title under a caller-supplied alphabet.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::song::SongRecord;
use crate::types::{InnerId, SongId, SortKey};

/// Orders strings by position in a fixed alphabet.
///
/// Text is lowercased first. Characters missing from the alphabet rank after
/// every alphabet character and tie with each other.
#[derive(Debug, Clone)]
pub struct Collation {
    ranks: HashMap<char, usize>,
    unknown: usize,
}

impl Collation {
    /// Build a collation from an ordered alphabet string.
    pub fn new(alphabet: &str) -> Self {
        let mut ranks = HashMap::new();
        for (i, c) in alphabet.chars().flat_map(char::to_lowercase).enumerate() {
            ranks.entry(c).or_insert(i);
        }
        let unknown = alphabet.chars().count();
        Self { ranks, unknown }
    }

    /// Sort key of `text`: one rank per lowercased character.
    pub fn key(&self, text: &str) -> Vec<usize> {
        text.chars()
            .flat_map(char::to_lowercase)
            .map(|c| self.ranks.get(&c).copied().unwrap_or(self.unknown))
            .collect()
    }

    /// Compare two strings under this collation.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }
}

/// One line of a table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// 1-based position in this listing.
    pub position: usize,
    /// Import-assigned id of the song.
    pub inner_id: InnerId,
    /// Human id as entered in the sheet.
    pub id: SongId,
    /// Song title.
    pub title: String,
}

/// Filter out `skip_toc` songs and order the rest. Input is left untouched.
pub fn sort_songs<'a>(
    songs: &'a [SongRecord],
    sort_key: SortKey,
    collation: &Collation,
) -> Vec<&'a SongRecord> {
    let mut listed: Vec<&SongRecord> = songs.iter().filter(|s| !s.skip_toc).collect();
    match sort_key {
        SortKey::ByInnerId => listed.sort_by_key(|s| s.inner_id),
        SortKey::ByTitle => listed.sort_by_cached_key(|s| collation.key(&s.title)),
    }
    listed
}

/// Sorted songs as numbered entries.
pub fn entries(songs: &[SongRecord], sort_key: SortKey, collation: &Collation) -> Vec<TocEntry> {
    sort_songs(songs, sort_key, collation)
        .into_iter()
        .enumerate()
        .map(|(i, song)| TocEntry {
            position: i + 1,
            inner_id: song.inner_id,
            id: song.id.clone(),
            title: song.title.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::constants::toc::DEFAULT_ALPHABET;

    fn song(inner: u32, title: &str) -> SongRecord {
        let mut s = SongRecord::new(inner.to_string(), InnerId(inner));
        s.title = title.to_string();
        s
    }

    fn titles(sorted: &[&SongRecord]) -> Vec<String> {
        sorted.iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn accented_letters_follow_their_base_letter() {
        let songs = vec![song(1, "Árvácska"), song(2, "Alma"), song(3, "Zsoltár")];
        let sorted = sort_songs(&songs, SortKey::ByTitle, &Collation::new(DEFAULT_ALPHABET));
        assert_eq!(titles(&sorted), ["Alma", "Árvácska", "Zsoltár"]);
    }

    #[test]
    fn code_point_order_would_differ() {
        // 'é' sorts after 'z' by code point but before 'f' in the alphabet.
        let songs = vec![song(1, "Fecske"), song(2, "Ének")];
        let sorted = sort_songs(&songs, SortKey::ByTitle, &Collation::new(DEFAULT_ALPHABET));
        assert_eq!(titles(&sorted), ["Ének", "Fecske"]);
    }

    #[test]
    fn comparison_is_case_insensitive() {
        let c = Collation::new(DEFAULT_ALPHABET);
        assert_eq!(c.compare("ALMA", "alma"), Ordering::Equal);
        assert_eq!(c.compare("Öröm", "ostor"), Ordering::Greater);
    }

    #[test]
    fn unknown_characters_sort_last_and_prefixes_first() {
        let c = Collation::new("ab");
        assert_eq!(c.compare("a", "ab"), Ordering::Less);
        assert_eq!(c.compare("b", "7"), Ordering::Less);
        assert_eq!(c.compare("a b", "ab"), Ordering::Greater);
    }

    #[test]
    fn skipped_songs_never_appear() {
        let mut hidden = song(2, "Alma");
        hidden.skip_toc = true;
        let songs = vec![song(1, "Zsoltár"), hidden, song(3, "Béke")];
        let c = Collation::new(DEFAULT_ALPHABET);
        for key in [SortKey::ByInnerId, SortKey::ByTitle] {
            let sorted = sort_songs(&songs, key, &c);
            assert_eq!(sorted.len(), 2);
            assert!(sorted.iter().all(|s| s.inner_id != InnerId(2)));
        }
    }

    #[test]
    fn inner_id_order_ignores_titles_and_input_order() {
        let songs = vec![song(3, "A"), song(1, "C"), song(2, "B")];
        let listed = entries(&songs, SortKey::ByInnerId, &Collation::new(DEFAULT_ALPHABET));
        let ids: Vec<u32> = listed.iter().map(|e| e.inner_id.get()).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(listed[0].position, 1);
    }

    #[test]
    fn equal_titles_keep_import_order() {
        let songs = vec![song(1, "Alma"), song(2, "alma")];
        let sorted = sort_songs(&songs, SortKey::ByTitle, &Collation::new(DEFAULT_ALPHABET));
        assert_eq!(sorted[0].inner_id, InnerId(1));
    }
}
