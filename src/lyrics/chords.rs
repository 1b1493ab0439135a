//! Inline chord highlighting.
//!
//! Wraps every whole-word chord token in a chord span. Candidates are tried
//! longest first so `Am7` is never split into `A` + `m7`.

use crate::constants::layout::{CHORD_CLOSE, CHORD_OPEN};

/// Chord vocabulary ordered for longest-match-first scanning.
#[derive(Debug, Clone, Default)]
pub struct ChordAnnotator {
    chords: Vec<String>,
}

impl ChordAnnotator {
    /// Build an annotator from a chord vocabulary. Empty entries are ignored.
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chords: Vec<String> = vocabulary
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        chords.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        chords.dedup();
        Self { chords }
    }

    /// Whether the vocabulary has no chords.
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Wrap every whole-word chord token in `text`.
    ///
    /// A token is whole when it starts the text or follows whitespace, and ends
    /// the text or is followed by whitespace. Running this on its own output is
    /// unsupported; call it on plain text only.
    pub fn annotate(&self, text: &str) -> String {
        if self.chords.is_empty() || text.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + text.len() / 2);
        let mut rest = text;
        let mut at_word_start = true;

        while let Some(c) = rest.chars().next() {
            if at_word_start && !c.is_whitespace() {
                if let Some(chord) = self.match_at(rest) {
                    out.push_str(CHORD_OPEN);
                    out.push_str(chord);
                    out.push_str(CHORD_CLOSE);
                    rest = &rest[chord.len()..];
                    at_word_start = false;
                    continue;
                }
            }
            out.push(c);
            at_word_start = c.is_whitespace();
            rest = &rest[c.len_utf8()..];
        }

        out
    }

    /// Longest chord that starts `rest` and ends at a word boundary.
    fn match_at(&self, rest: &str) -> Option<&str> {
        self.chords
            .iter()
            .find(|chord| {
                rest.strip_prefix(chord.as_str())
                    .is_some_and(|after| after.chars().next().is_none_or(char::is_whitespace))
            })
            .map(String::as_str)
    }
}
