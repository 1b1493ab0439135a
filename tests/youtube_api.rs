//! Integration tests for the YouTube Data API search backend.

// Only runs with `--features integration_test`; needs network access and a key.
#![cfg(feature = "integration_test")]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use songbook::services::{find_link, VideoSearch, YoutubeApiSearch};
use songbook::Config;

// Helper function to set up the client for tests
fn setup_client() -> Option<YoutubeApiSearch> {
    let mut config = Config::default();
    dotenv::dotenv().ok();
    config.youtube_api_key = std::env::var("YOUTUBE_API_KEY").ok().filter(|k| !k.is_empty());

    let client = YoutubeApiSearch::new(&config);
    if client.is_configured() {
        Some(client)
    } else {
        println!("Skipping integration test: YOUTUBE_API_KEY not found in environment/.env file.");
        None
    }
}

#[tokio::test]
async fn test_search_returns_watch_links() {
    if let Some(client) = setup_client() {
        let results = client.search("Queen Bohemian Rhapsody", 3).await.unwrap();
        assert!(!results.is_empty());
        assert!(results.len() <= 3);
        for video in &results {
            assert!(video.link.starts_with("https://www.youtube.com/watch?v="));
            assert!(!video.title.is_empty());
        }
    }
}

#[tokio::test]
async fn test_find_link_for_known_song() {
    if let Some(client) = setup_client() {
        let link = find_link(&client, "Bohemian Rhapsody", "Queen").await;
        assert!(link.starts_with("https://www.youtube.com/watch?v="), "got {link}");
    }
}
