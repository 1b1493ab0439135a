//! Application configuration.
//!
//! Loads `config.json` plus `.env` overrides. The resulting [`Config`] value is
//! passed explicitly to every component; nothing reads configuration globally.

use dotenv::dotenv;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{Error, Result};
use crate::lyrics::Thresholds;
use crate::render::PageGeometry;
use crate::types::{InnerId, SortKey, Version};

/// Directory and file locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Directory holding the sheet export and the record store.
    pub data_dir: PathBuf,
    /// Directory holding HTML templates.
    pub templates_dir: PathBuf,
    /// Root of all generated PDFs.
    pub output_dir: PathBuf,
    /// Scratch directory for intermediate HTML.
    pub temp_dir: PathBuf,
    /// Name of the static asset directory inside `templates_dir`.
    pub static_dir_name: String,
    /// Record store file name inside `data_dir`.
    pub songs_json_filename: String,
    /// Sheet export file name inside `data_dir`.
    pub sheet_filename: String,
    /// wkhtmltopdf executable.
    pub wkhtmltopdf: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output"),
            temp_dir: env::temp_dir(),
            static_dir_name: "static".to_string(),
            songs_json_filename: "songs.json".to_string(),
            sheet_filename: "Siron.json".to_string(),
            wkhtmltopdf: PathBuf::from("wkhtmltopdf"),
        }
    }
}

/// Output file names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileNames {
    /// Table of contents ordered by inner id.
    pub toc_pdf_ordered: String,
    /// Table of contents ordered by title.
    pub toc_pdf_alphabetical: String,
    /// Merged book; `{version}` is substituted.
    pub merged_pdf_template: String,
    /// Link finder output inside `output_dir`.
    pub links_txt: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            toc_pdf_ordered: "toc_ordered.pdf".to_string(),
            toc_pdf_alphabetical: "toc_alphabetical.pdf".to_string(),
            merged_pdf_template: "{version}_Songbook_Merged.pdf".to_string(),
            links_txt: "youtube_links.txt".to_string(),
        }
    }
}

/// Output directory naming.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputFormats {
    /// Per-version subdirectory of `output_dir`; `{version}` is substituted.
    pub songbook_subdir_template: String,
}

impl Default for OutputFormats {
    fn default() -> Self {
        Self { songbook_subdir_template: "{version}s_songbook".to_string() }
    }
}

/// Template file names inside `templates_dir`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Templates {
    /// Singer song page.
    pub singer_song: String,
    /// Musician song page.
    pub musician_song: String,
    /// Projection slide.
    pub projection_song: String,
    /// Table of contents.
    pub toc_template: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            singer_song: "singer_song_page_template.html".to_string(),
            musician_song: "musician_song_page_template.html".to_string(),
            projection_song: "projection_song_page_template.html".to_string(),
            toc_template: "toc_template.html".to_string(),
        }
    }
}

/// Page geometry per document kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageParameters {
    /// Singer song pages.
    pub singer: PageGeometry,
    /// Musician song pages.
    pub musician: PageGeometry,
    /// Projection slides.
    pub projection: PageGeometry,
    /// Tables of contents.
    pub toc: PageGeometry,
}

impl Default for PageParameters {
    fn default() -> Self {
        Self {
            singer: PageGeometry::a4_portrait(),
            musician: PageGeometry::a4_portrait(),
            projection: PageGeometry::widescreen(),
            toc: PageGeometry::a4_portrait(),
        }
    }
}

/// Table of contents settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Collation alphabet, lowercase, in sort order.
    pub alphabet: String,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self { alphabet: constants::toc::DEFAULT_ALPHABET.to_string() }
    }
}

/// Footer text shown on song pages.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Footer {
    /// Left footer text.
    pub left: String,
    /// Right footer text.
    pub right: String,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            left: "Hasomer Hacair Magyarország".to_string(),
            right: "Siron - Daloskönyv".to_string(),
        }
    }
}

/// Configuration for the application.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory and file locations.
    pub paths: Paths,
    /// Sheet to read from the workbook export.
    pub sheet_name: String,
    /// Output file names.
    pub file_names: FileNames,
    /// Output directory naming.
    pub output_formats: OutputFormats,
    /// Template file names.
    pub templates: Templates,
    /// Page geometry per document kind.
    pub page_parameters: PageParameters,
    /// Sheet header to record field.
    #[serde(alias = "excel_column_mapping")]
    pub column_mapping: BTreeMap<String, String>,
    /// Chord vocabulary for the musician edition.
    pub chords: Vec<String>,
    /// Line-count thresholds for lyric layout.
    pub layout: Thresholds,
    /// Table of contents settings.
    pub toc: TocConfig,
    /// Footer text.
    pub footer: Footer,
    /// Seconds before a PDF render is abandoned.
    pub render_timeout_secs: u64,
    /// YouTube Data API key, from the environment only.
    #[serde(skip)]
    pub youtube_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Paths::default(),
            sheet_name: "Siron".to_string(),
            file_names: FileNames::default(),
            output_formats: OutputFormats::default(),
            templates: Templates::default(),
            page_parameters: PageParameters::default(),
            column_mapping: default_column_mapping(),
            chords: default_chords(),
            layout: Thresholds::default(),
            toc: TocConfig::default(),
            footer: Footer::default(),
            render_timeout_secs: constants::render::DEFAULT_TIMEOUT_SECS,
            youtube_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        if !path.is_file() {
            return Err(Error::config(
                format!("Configuration file not found at {}", path.display()),
                "Pass --config or set SONGBOOK_CONFIG",
            ));
        }
        let text = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        let mut config = Self::from_json_str(&text)
            .map_err(|e| Error::parse(e.to_string(), path.to_path_buf()))?;

        if let Ok(bin) = env::var("WKHTMLTOPDF_PATH") {
            config.paths.wkhtmltopdf = PathBuf::from(bin);
        }
        config.youtube_api_key = env::var("YOUTUBE_API_KEY").ok().filter(|k| !k.is_empty());
        config.expand_paths();

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from JSON text without touching the environment.
    pub fn from_json_str(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    fn expand_paths(&mut self) {
        let expand = |p: &mut PathBuf| {
            *p = PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).to_string());
        };
        expand(&mut self.paths.data_dir);
        expand(&mut self.paths.templates_dir);
        expand(&mut self.paths.output_dir);
        expand(&mut self.paths.temp_dir);
        expand(&mut self.paths.wkhtmltopdf);
    }

    /// Record store location.
    pub fn songs_json_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.paths.songs_json_filename)
    }

    /// Sheet export location.
    pub fn sheet_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.paths.sheet_filename)
    }

    /// Directory holding one version's song and TOC PDFs.
    pub fn version_dir(&self, version: Version) -> PathBuf {
        let subdir = self
            .output_formats
            .songbook_subdir_template
            .replace("{version}", version.name());
        self.paths.output_dir.join(subdir)
    }

    /// Output path of one song page.
    pub fn song_pdf_path(&self, version: Version, inner_id: InnerId) -> PathBuf {
        self.version_dir(version).join(format!("song_{inner_id}.pdf"))
    }

    /// Output path of a table of contents.
    pub fn toc_pdf_path(&self, version: Version, sort_key: SortKey) -> PathBuf {
        let name = match sort_key {
            SortKey::ByInnerId => &self.file_names.toc_pdf_ordered,
            SortKey::ByTitle => &self.file_names.toc_pdf_alphabetical,
        };
        self.version_dir(version).join(name)
    }

    /// Output path of the merged book.
    pub fn merged_pdf_path(&self, version: Version) -> PathBuf {
        let name = self.file_names.merged_pdf_template.replace("{version}", version.name());
        self.paths.output_dir.join(name)
    }

    /// Output path of the link finder report.
    pub fn links_txt_path(&self) -> PathBuf {
        self.paths.output_dir.join(&self.file_names.links_txt)
    }

    /// Song template file name for a version.
    pub fn song_template(&self, version: Version) -> &str {
        match version {
            Version::Singer => &self.templates.singer_song,
            Version::Musician => &self.templates.musician_song,
            Version::Projection => &self.templates.projection_song,
        }
    }

    /// Page geometry for a version's song pages.
    pub const fn song_geometry(&self, version: Version) -> &PageGeometry {
        match version {
            Version::Singer => &self.page_parameters.singer,
            Version::Musician => &self.page_parameters.musician,
            Version::Projection => &self.page_parameters.projection,
        }
    }

    /// `file:///` URL of the static asset directory.
    pub fn static_url(&self) -> String {
        let dir = self.paths.templates_dir.join(&self.paths.static_dir_name);
        let abs = std::path::absolute(&dir).unwrap_or(dir);
        format!("file:///{}", abs.to_string_lossy().replace('\\', "/").trim_start_matches('/'))
    }
}

fn default_column_mapping() -> BTreeMap<String, String> {
    [
        ("Cím", "title"),
        ("Szerző", "author"),
        ("Dalszöveg", "lyrics"),
        ("Dalszöveg akkordokkal", "lyrics_with_chords"),
        ("Kategória", "category"),
        ("Youtube link", "youtube"),
        ("Érzékeny tartalom", "explicit_content"),
        ("Állapot", "status"),
        ("Tartalomjegyzékből kihagy", "skip_toc"),
    ]
    .into_iter()
    .map(|(header, field)| (header.to_string(), field.to_string()))
    .collect()
}

fn default_chords() -> Vec<String> {
    const ROOTS: &[&str] = &[
        "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab", "A", "A#", "Bb",
        "B", "H",
    ];
    const QUALITIES: &[&str] =
        &["", "m", "7", "m7", "maj7", "sus2", "sus4", "dim", "aug", "6", "9", "add9"];

    ROOTS
        .iter()
        .flat_map(|root| QUALITIES.iter().map(move |q| format!("{root}{q}")))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config.sheet_name, "Siron");
        assert_eq!(config.layout, Thresholds::default());
        assert!(config.chords.iter().any(|c| c == "Am7"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_json_str(
            r#"{"paths": {"output_dir": "/tmp/out"}, "layout": {"column_break": 70}}"#,
        )
        .unwrap();
        assert_eq!(config.paths.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.paths.songs_json_filename, "songs.json");
        assert_eq!(config.layout.column_break, 70);
        assert_eq!(config.layout.large_max, constants::layout::DEFAULT_LARGE_MAX);
    }

    #[test]
    fn legacy_mapping_key_is_accepted() {
        let config =
            Config::from_json_str(r#"{"excel_column_mapping": {"Name": "title"}}"#).unwrap();
        assert_eq!(config.column_mapping.get("Name").map(String::as_str), Some("title"));
    }

    #[test]
    fn output_paths_follow_templates() {
        let mut config = Config::default();
        config.paths.output_dir = PathBuf::from("out");
        assert_eq!(
            config.song_pdf_path(Version::Singer, InnerId(12)),
            PathBuf::from("out/singers_songbook/song_12.pdf")
        );
        assert_eq!(
            config.toc_pdf_path(Version::Musician, SortKey::ByTitle),
            PathBuf::from("out/musicians_songbook/toc_alphabetical.pdf")
        );
        assert_eq!(
            config.merged_pdf_path(Version::Projection),
            PathBuf::from("out/projection_Songbook_Merged.pdf")
        );
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Config::load(Path::new("/nonexistent/songbook/config.json")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn example_config_parses() {
        let config = Config::from_json_str(include_str!("../config.example.json")).unwrap();
        assert_eq!(config.page_parameters.projection.page_size, None);
        assert_eq!(config.page_parameters.projection.page_width.as_deref(), Some("1920px"));
        assert_eq!(config.column_mapping.get("Megjegyzés").map(String::as_str), Some("ignore"));
        assert_eq!(config.layout.column_break, 60);
    }
}
