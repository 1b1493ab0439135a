//! Debug tool to summarize the song store and each song's page layout.
//!
//! Usage:
//!   `cargo run --bin dump_songs -- [config.json]`
//!
//! Prints the import summary, then one line per song with its line count,
//! size class and column count as each edition sees it.

use std::path::PathBuf;

use anyhow::Context;
use songbook::lyrics::{render_lyrics, ChordAnnotator, LayoutResult};
use songbook::song::{load_songs, Summary};
use songbook::{Config, SongRecord, Version};

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("SONGBOOK_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.json"));

    let config = Config::load(&path)?;
    let store = config.songs_json_path();
    let songs = load_songs(&store).with_context(|| format!("loading {}", store.display()))?;
    let annotator = ChordAnnotator::new(&config.chords);

    println!("{}", Summary::of(&songs));
    println!();
    print!("{:>5}  {:<10}  {:<28}", "inner", "id", "title");
    for version in Version::all() {
        print!("  {:>14}", version.name());
    }
    println!();

    for song in &songs {
        let title: String = song.title.chars().take(28).collect();
        print!("{:>5}  {:<10}  {:<28}", song.inner_id, song.id, title);
        for &version in Version::all() {
            let layout = layout_for(song, version, &annotator, &config);
            print!("  {:>14}", describe(&layout));
        }
        println!("{}", if song.skip_toc { "  (not in toc)" } else { "" });
    }
    Ok(())
}

fn layout_for(song: &SongRecord, version: Version, annotator: &ChordAnnotator, config: &Config) -> LayoutResult {
    let html = if version.shows_chords() {
        let text = if song.lyrics_with_chords.is_empty() { &song.lyrics } else { &song.lyrics_with_chords };
        render_lyrics(text, Some(annotator))
    } else {
        render_lyrics(&song.lyrics, None)
    };
    LayoutResult::compute(&html, &config.layout)
}

fn describe(layout: &LayoutResult) -> String {
    format!(
        "{}/{}/{}col",
        layout.line_count,
        layout.lyrics_css_class.css_class(),
        layout.column_count
    )
}
