//! Application constants.
//!
//! Defaults used when the configuration file leaves a value out.

/// Lyric layout constants.
pub mod layout {
    /// Songs with at least this many lines get the small font.
    pub const DEFAULT_SMALL_MAX: usize = 40;

    /// Songs with at most this many lines get the large font.
    pub const DEFAULT_LARGE_MAX: usize = 20;

    /// Songs with at least this many lines are set in two columns.
    pub const DEFAULT_COLUMN_BREAK: usize = 60;

    /// Rendered line break.
    pub const LINE_BREAK: &str = "<br>";

    /// Rendered paragraph separator (an empty line between stanzas).
    pub const PARAGRAPH_BREAK: &str = "<br><br>";

    /// Markup opening a highlighted chord.
    pub const CHORD_OPEN: &str = r#"<span class="chord">"#;

    /// Markup closing a highlighted chord.
    pub const CHORD_CLOSE: &str = "</span>";
}

/// Table of contents constants.
pub mod toc {
    /// Hungarian alphabet used for title collation.
    pub const DEFAULT_ALPHABET: &str = "aábcdeéfghiíjklmnoóöőpqrstuúüűvwxyz";
}

/// Rendering constants.
pub mod render {
    /// Seconds before an external PDF render is killed.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// How often a running render is polled for completion.
    pub const POLL_INTERVAL_MS: u64 = 50;

    /// Pixel size of generated QR codes.
    pub const QR_DIMENSION: u32 = 200;
}

/// Link lookup constants.
pub mod links {
    /// Written in place of a link when none was found.
    pub const NOT_FOUND: &str = "-";

    /// Results requested for the official video query.
    pub const OFFICIAL_LIMIT: u32 = 5;

    /// Results requested for the audio query.
    pub const AUDIO_LIMIT: u32 = 10;

    /// Results requested for the general fallback query.
    pub const GENERAL_LIMIT: u32 = 3;

    /// HTTP timeout for search requests, in seconds.
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Songs looked up at the same time.
    pub const CONCURRENT_LOOKUPS: usize = 4;
}
