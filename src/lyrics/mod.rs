//! Lyrics processing.
//!
//! Turns the raw lyric text of a song into the render-time view used by the
//! templates: chord highlighting, line-break markup, font size class and the
//! optional two-column split. Nothing here mutates a `SongRecord`.

pub mod chords;
pub mod columns;
pub mod layout;

pub use chords::ChordAnnotator;
pub use columns::split_columns;
pub use layout::{classify, count_lines, expand_breaks, Classification, LayoutResult, SizeClass, Thresholds};

/// Produce the render-ready markup for a block of lyrics.
///
/// The text is escaped first; chord vocabulary never contains `&<>"'`, so the
/// annotator still sees every chord token. Breaks are added last.
pub fn render_lyrics(text: &str, annotator: Option<&ChordAnnotator>) -> String {
    let escaped = escape_html(text);
    let annotated = match annotator {
        Some(a) => a.annotate(&escaped),
        None => escaped,
    };
    expand_breaks(&annotated)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
