//! Best-effort recording link lookup.
//!
//! Every failure here degrades to the `-` sentinel; nothing propagates to the
//! caller except errors writing the report file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::Value;

use crate::config::Config;
use crate::constants::links::{
    AUDIO_LIMIT, CONCURRENT_LOOKUPS, GENERAL_LIMIT, NOT_FOUND, OFFICIAL_LIMIT, REQUEST_TIMEOUT_SECS,
};
use crate::error::{Error, Result};
use crate::song::SongRecord;

const BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    /// Video title as shown on the site.
    pub title: String,
    /// Watch URL.
    pub link: String,
    /// View count, when the backend knows it.
    pub views: Option<u64>,
}

/// A video search backend.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Up to `limit` results for `query`, best match first.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<VideoCandidate>>;
}

fn is_live(title_lower: &str) -> bool {
    title_lower.contains("concert") || title_lower.contains("live")
}

async fn search_or_empty(search: &dyn VideoSearch, query: &str, limit: u32) -> Vec<VideoCandidate> {
    match search.search(query, limit).await {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!("Search for '{query}' failed: {e}");
            Vec::new()
        }
    }
}

/// Best-guess recording link for a song, or `-`.
///
/// Tries an official music video first, then the most viewed audio or lyric
/// upload, then the first general hit. Concert and live recordings are never
/// picked.
pub async fn find_link(search: &dyn VideoSearch, title: &str, author: &str) -> String {
    let (title, author) = (title.trim(), author.trim());
    if title.is_empty() || author.is_empty() {
        tracing::warn!("Cannot search without title and author ('{title}' / '{author}')");
        return NOT_FOUND.to_string();
    }

    let query = format!("{author} {title} official music video");
    let official = search_or_empty(search, &query, OFFICIAL_LIMIT).await;
    let found = official.into_iter().find(|video| {
        let t = video.title.to_lowercase();
        (t.contains("official video") || t.contains("official music video")) && !is_live(&t)
    });
    if let Some(video) = found {
        tracing::debug!("Official video for '{title}': {}", video.title);
        return video.link;
    }

    let title_lower = title.to_lowercase();
    let audio = search_or_empty(search, &format!("{author} {title} audio"), AUDIO_LIMIT).await;
    let mut best: Option<(u64, VideoCandidate)> = None;
    for video in audio {
        let t = video.title.to_lowercase();
        if is_live(&t) {
            continue;
        }
        if !(t.contains("audio") || t.contains("lyric") || t.contains(&title_lower)) {
            continue;
        }
        let views = video.views.unwrap_or(0);
        if best.as_ref().is_none_or(|(most, _)| views > *most) {
            best = Some((views, video));
        }
    }
    if let Some((views, video)) = best {
        tracing::debug!("Audio upload for '{title}': {} ({views} views)", video.title);
        return video.link;
    }

    let general = search_or_empty(search, &format!("{author} {title}"), GENERAL_LIMIT).await;
    if let Some(video) = general.into_iter().find(|v| !is_live(&v.title.to_lowercase())) {
        tracing::debug!("General match for '{title}': {}", video.title);
        return video.link;
    }

    tracing::info!("No recording found for '{author} - {title}'");
    NOT_FOUND.to_string()
}

/// One link per song, in store order. Existing links are kept as they are.
pub async fn find_links_for_songs(search: &dyn VideoSearch, songs: &[SongRecord]) -> Vec<String> {
    stream::iter(songs)
        .map(|song| async move {
            let existing = song.youtube.trim();
            if existing.is_empty() {
                find_link(search, &song.title, &song.author).await
            } else {
                existing.to_string()
            }
        })
        .buffered(CONCURRENT_LOOKUPS)
        .collect()
        .await
}

/// Write one link per line.
pub fn write_links(path: &Path, links: &[String]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).map_err(|e| Error::io(e, parent.to_path_buf()))?;
    }
    let mut text = String::new();
    for link in links {
        text.push_str(link);
        text.push('\n');
    }
    fs_err::write(path, text).map_err(|e| Error::io(e, path.to_path_buf()))?;
    tracing::info!("Wrote {} links to {}", links.len(), path.display());
    Ok(())
}

/// Client for the YouTube Data API.
#[derive(Clone)]
pub struct YoutubeApiSearch {
    api_key: Option<String>,
    client: Client,
}

impl YoutubeApiSearch {
    /// Create a client using the key from `YOUTUBE_API_KEY`.
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.youtube_api_key.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(Error::config("YouTube API key not set", "Set YOUTUBE_API_KEY"));
        };
        let url = format!("{BASE_URL}{path}");
        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {path} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Network(format!("Request to {path} returned {status}")));
        }

        resp.json()
            .await
            .map_err(|e| Error::Network(format!("Invalid JSON from {path}: {e}")))
    }

    /// View counts keyed by video id.
    async fn view_counts(&self, ids: &[String]) -> Result<HashMap<String, u64>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let joined = ids.join(",");
        let json = self.get("/videos", &[("part", "statistics"), ("id", joined.as_str())]).await?;
        let items = json["items"].as_array().map(Vec::as_slice).unwrap_or(&[]);
        Ok(items
            .iter()
            .filter_map(|item| {
                let id = item["id"].as_str()?.to_string();
                let views = item["statistics"]["viewCount"].as_str()?.parse::<u64>().ok()?;
                Some((id, views))
            })
            .collect())
    }
}

#[async_trait]
impl VideoSearch for YoutubeApiSearch {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<VideoCandidate>> {
        let max_results = limit.to_string();
        let json = self
            .get(
                "/search",
                &[("part", "snippet"), ("type", "video"), ("maxResults", max_results.as_str()), ("q", query)],
            )
            .await?;

        let items = json["items"]
            .as_array()
            .ok_or_else(|| Error::Network("Missing 'items' array in search response".to_string()))?;
        let hits: Vec<(String, String)> = items
            .iter()
            .filter_map(|item| {
                let id = item["id"]["videoId"].as_str()?.to_string();
                let title = item["snippet"]["title"].as_str().unwrap_or_default().to_string();
                Some((id, title))
            })
            .collect();

        let ids: Vec<String> = hits.iter().map(|(id, _)| id.clone()).collect();
        let views = match self.view_counts(&ids).await {
            Ok(views) => views,
            Err(e) => {
                tracing::warn!("View counts unavailable: {e}");
                HashMap::new()
            }
        };

        Ok(hits
            .into_iter()
            .map(|(id, title)| VideoCandidate {
                views: views.get(&id).copied(),
                link: format!("https://www.youtube.com/watch?v={id}"),
                title,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use std::sync::Mutex;

    use super::*;
    use crate::types::InnerId;

    /// Canned results per query; records every query it sees.
    #[derive(Default)]
    struct FakeSearch {
        results: HashMap<String, Vec<VideoCandidate>>,
        failing: bool,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        fn with(mut self, query: &str, hits: &[(&str, &str, Option<u64>)]) -> Self {
            let hits = hits
                .iter()
                .map(|(title, link, views)| VideoCandidate {
                    title: (*title).to_string(),
                    link: (*link).to_string(),
                    views: *views,
                })
                .collect();
            self.results.insert(query.to_string(), hits);
            self
        }
    }

    #[async_trait]
    impl VideoSearch for FakeSearch {
        async fn search(&self, query: &str, _limit: u32) -> Result<Vec<VideoCandidate>> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.failing {
                return Err(Error::Network("offline".to_string()));
            }
            Ok(self.results.get(query).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn official_video_wins() {
        let search = FakeSearch::default().with(
            "Band Song official music video",
            &[
                ("Band - Song (Official Video) LIVE", "live", None),
                ("Band - Song (Official Music Video)", "official", None),
            ],
        );
        assert_eq!(find_link(&search, "Song", "Band").await, "official");
        assert_eq!(search.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn most_viewed_audio_is_next() {
        let search = FakeSearch::default().with(
            "Band Song audio",
            &[
                ("Song (audio)", "few", Some(10)),
                ("Song lyric video", "many", Some(5000)),
                ("Song live audio", "concert", Some(90000)),
                ("Something else", "unrelated", Some(100_000)),
            ],
        );
        assert_eq!(find_link(&search, "Song", "Band").await, "many");
    }

    #[tokio::test]
    async fn unknown_views_only_win_alone() {
        let search = FakeSearch::default().with(
            "Band Song audio",
            &[("Song audio", "unknown", None), ("Song audio HQ", "known", Some(3))],
        );
        assert_eq!(find_link(&search, "Song", "Band").await, "known");

        let search = FakeSearch::default()
            .with("Band Song audio", &[("Song audio", "unknown", None)]);
        assert_eq!(find_link(&search, "Song", "Band").await, "unknown");
    }

    #[tokio::test]
    async fn general_fallback_skips_concerts() {
        let search = FakeSearch::default().with(
            "Band Song",
            &[("Band in concert", "concert", None), ("Band - Song", "plain", None)],
        );
        assert_eq!(find_link(&search, "Song", "Band").await, "plain");
        assert_eq!(search.queries.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn failures_degrade_to_sentinel() {
        let search = FakeSearch { failing: true, ..Default::default() };
        assert_eq!(find_link(&search, "Song", "Band").await, NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_author_skips_search() {
        let search = FakeSearch::default();
        assert_eq!(find_link(&search, "Song", " ").await, NOT_FOUND);
        assert!(search.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn existing_links_are_kept_in_order() {
        let search = FakeSearch::default().with("B Second", &[("B - Second", "found", None)]);
        let mut first = SongRecord::new("1", InnerId(1));
        first.youtube = "https://youtu.be/keep".to_string();
        let mut second = SongRecord::new("2", InnerId(2));
        second.title = "Second".to_string();
        second.author = "B".to_string();
        let third = SongRecord::new("3", InnerId(3));

        let links = find_links_for_songs(&search, &[first, second, third]).await;
        assert_eq!(links, ["https://youtu.be/keep", "found", "-"]);
    }

    #[test]
    fn links_file_has_one_line_per_song() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("links.txt");
        write_links(&path, &["a".to_string(), "-".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n-\n");
    }

    #[test]
    fn client_without_key_is_unconfigured() {
        let search = YoutubeApiSearch::new(&Config::default());
        assert!(!search.is_configured());
    }
}
