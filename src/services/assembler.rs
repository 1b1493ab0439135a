//! Document assembly.
//!
//! Builds the render context for song pages and tables of contents, hands it
//! to the template renderer and PDF backend, and merges the finished pages
//! into one book per version.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lyrics::{render_lyrics, ChordAnnotator, LayoutResult};
use crate::render::{qr_data_uri, PdfBackend, PdfMerger, TemplateRenderer};
use crate::song::{SongRecord, SongSelector};
use crate::toc::{self, Collation};
use crate::types::{SortKey, Version};

/// Regex matching song page file names, e.g. `song_12.pdf`.
#[allow(clippy::expect_used)]
static RE_SONG_PDF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^song_(\d+)\.pdf$").expect("valid regex: RE_SONG_PDF"));

/// One item of a batch that did not produce a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// What was being generated, e.g. `song 12` or `toc by title`.
    pub item: String,
    /// Error text.
    pub error: String,
}

/// Outcome of a full book run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents written.
    pub succeeded: Vec<PathBuf>,
    /// Items that were skipped.
    pub failed: Vec<BatchFailure>,
}

impl BatchSummary {
    /// Whether every item succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, item: String, result: Result<PathBuf>) {
        match result {
            Ok(path) => self.succeeded.push(path),
            Err(e) => {
                tracing::warn!("Skipping {item}: {e}");
                self.failed.push(BatchFailure { item, error: e.to_string() });
            }
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} succeeded, {} failed", self.succeeded.len(), self.failed.len())?;
        for failure in &self.failed {
            write!(f, "\n  {}: {}", failure.item, failure.error)?;
        }
        Ok(())
    }
}

/// Renders song pages and tables of contents for one configuration.
pub struct DocumentAssembler<'a, R, B> {
    config: &'a Config,
    renderer: R,
    backend: B,
    annotator: ChordAnnotator,
    collation: Collation,
}

impl<'a, R: TemplateRenderer, B: PdfBackend> DocumentAssembler<'a, R, B> {
    /// Create an assembler. The chord vocabulary and TOC alphabet come from `config`.
    pub fn new(config: &'a Config, renderer: R, backend: B) -> Self {
        Self {
            config,
            renderer,
            backend,
            annotator: ChordAnnotator::new(&config.chords),
            collation: Collation::new(&config.toc.alphabet),
        }
    }

    /// Template context for one song page.
    ///
    /// Only the musician edition sees chord markup, and only the singer
    /// edition gets a QR code (when the song has a link).
    pub fn prepare_song_context(&self, song: &SongRecord, version: Version) -> Value {
        let (source, annotator) = if version.shows_chords() {
            let text = if song.lyrics_with_chords.is_empty() {
                &song.lyrics
            } else {
                &song.lyrics_with_chords
            };
            (text, Some(&self.annotator))
        } else {
            (&song.lyrics, None)
        };
        let lyrics_html = render_lyrics(source, annotator);
        let layout = LayoutResult::compute(&lyrics_html, &self.config.layout);

        let qr_code_data = if version.shows_qr() && song.has_link() {
            qr_data_uri(&song.youtube)
        } else {
            None
        };

        json!({
            "version": version.name(),
            "song": song,
            "lyrics_html": lyrics_html,
            "layout": layout,
            "qr_code_data": qr_code_data,
            "footer": self.config.footer,
        })
    }

    /// Render one song page and return the written PDF path.
    pub fn generate_song(&self, song: &SongRecord, version: Version) -> Result<PathBuf> {
        let context = self.prepare_song_context(song, version);
        let html = self.renderer.render(self.config.song_template(version), &context)?;
        let output = self.config.song_pdf_path(version, song.inner_id);
        self.backend.render_pdf(&html, self.config.song_geometry(version), &output)?;
        Ok(output)
    }

    /// Render the song picked by `selector`.
    pub fn generate_single(
        &self,
        selector: &SongSelector,
        version: Version,
        songs: &[SongRecord],
    ) -> Result<PathBuf> {
        let song = selector.find(songs)?;
        tracing::info!("Generating {version} page for '{}' ({})", song.title, song.inner_id);
        self.generate_song(song, version)
    }

    /// Template context for a table of contents.
    pub fn prepare_toc_context(&self, sort_key: SortKey, songs: &[SongRecord]) -> Value {
        let entries = toc::entries(songs, sort_key, &self.collation);
        json!({
            "songs": entries,
            "sort_order": sort_key.name(),
            "page": {
                "static_path": self.config.static_url(),
                "generated_on": chrono::Local::now().format("%Y-%m-%d").to_string(),
            },
            "footer": self.config.footer,
        })
    }

    /// Render a table of contents. Projection has none and yields `Ok(None)`.
    pub fn generate_toc(
        &self,
        version: Version,
        sort_key: SortKey,
        songs: &[SongRecord],
    ) -> Result<Option<PathBuf>> {
        if !version.has_toc() {
            tracing::info!("The {version} edition has no table of contents");
            return Ok(None);
        }
        let context = self.prepare_toc_context(sort_key, songs);
        let html = self.renderer.render(&self.config.templates.toc_template, &context)?;
        let output = self.config.toc_pdf_path(version, sort_key);
        self.backend.render_pdf(&html, &self.config.page_parameters.toc, &output)?;
        Ok(Some(output))
    }

    /// Render both tables of contents and every song page of one edition.
    ///
    /// A failing item is logged and recorded; the rest still run.
    pub fn generate_book(&self, version: Version, songs: &[SongRecord]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for sort_key in [SortKey::ByInnerId, SortKey::ByTitle] {
            match self.generate_toc(version, sort_key, songs) {
                Ok(Some(path)) => summary.succeeded.push(path),
                Ok(None) => {}
                Err(e) => summary.record(format!("toc by {}", sort_key.name()), Err(e)),
            }
        }

        tracing::info!("Generating {} {version} pages", songs.len());
        let results: Vec<(String, Result<PathBuf>)> = songs
            .par_iter()
            .map(|song| (format!("song {}", song.inner_id), self.generate_song(song, version)))
            .collect();
        for (item, result) in results {
            summary.record(item, result);
        }

        tracing::info!("Finished {version} book: {summary}");
        summary
    }
}

/// PDFs of one edition in book order: TOC by id, TOC by title, then songs by inner id.
///
/// Missing TOCs are skipped with a warning. A missing edition directory is fatal.
pub fn collect_book_pages(config: &Config, version: Version) -> Result<Vec<PathBuf>> {
    let dir = config.version_dir(version);
    if !dir.is_dir() {
        return Err(Error::config(
            format!("Songbook directory not found at {}", dir.display()),
            "Run `songbook book` for this version first",
        ));
    }

    let mut pages = Vec::new();
    if version.has_toc() {
        for sort_key in [SortKey::ByInnerId, SortKey::ByTitle] {
            let path = config.toc_pdf_path(version, sort_key);
            if path.is_file() {
                pages.push(path);
            } else {
                tracing::warn!("Table of contents not found: {}", path.display());
            }
        }
    }

    let mut songs: Vec<(u64, PathBuf)> = Vec::new();
    for entry in fs_err::read_dir(&dir).map_err(|e| Error::io(e, dir.clone()))? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(number) = name
            .to_str()
            .and_then(|n| RE_SONG_PDF.captures(n))
            .and_then(|caps| caps[1].parse::<u64>().ok())
        else {
            continue;
        };
        songs.push((number, entry.path()));
    }
    songs.sort_by_key(|(number, _)| *number);
    pages.extend(songs.into_iter().map(|(_, path)| path));
    Ok(pages)
}

/// Merge one edition's pages into the configured book file.
pub fn merge_final(config: &Config, version: Version, merger: &dyn PdfMerger) -> Result<PathBuf> {
    let pages = collect_book_pages(config, version)?;
    if pages.is_empty() {
        return Err(Error::NotFound(format!(
            "no PDF pages in {}",
            config.version_dir(version).display()
        )));
    }
    let output = config.merged_pdf_path(version);
    merger.merge(&pages, &output)?;
    Ok(output)
}
