//! Font size and column decisions for a song page.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::columns::split_columns;
use crate::constants::layout::{
    DEFAULT_COLUMN_BREAK, DEFAULT_LARGE_MAX, DEFAULT_SMALL_MAX, LINE_BREAK,
};

/// Regex matching a rendered line break in any of its common spellings.
#[allow(clippy::expect_used)]
static RE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>").expect("valid regex: RE_BREAK")
});

/// Line-count thresholds, taken verbatim from configuration.
///
/// `small_max < large_max < column_break` is the usual shape but is not
/// enforced; overlapping bands resolve first-match-wins in [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Line count at or above which the small font is used.
    pub small_max: usize,
    /// Line count at or below which the large font is used.
    pub large_max: usize,
    /// Line count at or above which the page gets two columns.
    pub column_break: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            small_max: DEFAULT_SMALL_MAX,
            large_max: DEFAULT_LARGE_MAX,
            column_break: DEFAULT_COLUMN_BREAK,
        }
    }
}

/// Font size class of the lyrics block, used as a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    /// Long songs.
    Small,
    /// Everything between the other two bands.
    Medium,
    /// Short songs.
    Large,
}

impl SizeClass {
    /// CSS class name.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Font size class.
    pub size_class: SizeClass,
    /// 1 or 2.
    pub column_count: usize,
}

/// Decide size class and column count from a rendered line count.
pub const fn classify(line_count: usize, thresholds: &Thresholds) -> Classification {
    let column_count = if line_count >= thresholds.column_break { 2 } else { 1 };
    let size_class = if line_count <= thresholds.large_max {
        SizeClass::Large
    } else if line_count >= thresholds.small_max {
        SizeClass::Small
    } else {
        SizeClass::Medium
    };
    Classification { size_class, column_count }
}

/// Replace newlines with rendered line breaks.
pub fn expand_breaks(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.replace("\r\n", "\n").replace('\n', LINE_BREAK)
}

/// Number of visual lines in rendered text. Empty text has none.
pub fn count_lines(html: &str) -> usize {
    if html.is_empty() {
        return 0;
    }
    RE_BREAK.find_iter(html).count() + 1
}

/// Render-time layout of a song's lyrics. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutResult {
    /// Font size class.
    pub lyrics_css_class: SizeClass,
    /// 1 or 2.
    pub column_count: usize,
    /// Column texts; the second is empty for single-column pages.
    pub columns: [String; 2],
    /// Visual line count the decision was based on.
    pub line_count: usize,
}

impl LayoutResult {
    /// Lay out rendered lyrics under the given thresholds.
    pub fn compute(html: &str, thresholds: &Thresholds) -> Self {
        let line_count = count_lines(html);
        let Classification { size_class, column_count } = classify(line_count, thresholds);
        let columns = split_columns(html, column_count);
        tracing::debug!(line_count, column_count, size = size_class.css_class(), "Lyrics layout");
        Self { lyrics_css_class: size_class, column_count, columns, line_count }
    }
}
