//! AniList metadata - fetch watch progress and episode info over GraphQL
//!
//! One request per media id. Only the fields the wheel needs are queried:
//! - MediaList: progress of the user on this media
//! - Media: episode count, duration, titles, cover color

use anyhow::{bail, Result};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

const SEARCH_QUERY: &str = r#"
query($userName: String, $mediaId: Int) {
  MediaList(userName: $userName, mediaId: $mediaId) {
    progress
  }
  Media(id: $mediaId) {
    episodes
    title {
      english
      romaji
    }
    synonyms
    coverImage {
      color
    }
    duration
  }
}"#;

/// One show on the wheel
#[derive(Debug, Clone, PartialEq)]
pub struct AnimeEntry {
    pub progress: u32,
    pub episodes: u32,
    pub title: String,
    /// Cover color as `#rrggbb`, may be empty
    pub color: String,
    /// Minutes per episode
    pub duration: u32,
    pub episodes_left: u32,
    pub minutes_left: u32,
}

impl AnimeEntry {
    pub fn new(title: &str, progress: u32, episodes: u32, duration: u32, color: &str) -> Self {
        let episodes_left = episodes.saturating_sub(progress);
        Self {
            progress,
            episodes,
            title: title.to_string(),
            color: color.to_string(),
            duration,
            episodes_left,
            minutes_left: duration * episodes_left,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    errors: Vec<GraphQlError>,
    data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    status: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseData {
    media_list: Option<MediaList>,
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
struct MediaList {
    progress: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Media {
    episodes: Option<u32>,
    title: Option<MediaTitle>,
    #[serde(default)]
    synonyms: Vec<String>,
    cover_image: Option<CoverImage>,
    duration: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct MediaTitle {
    english: Option<String>,
    romaji: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoverImage {
    color: Option<String>,
}

/// English title, else first synonym, else romaji
fn pick_title(title: Option<MediaTitle>, synonyms: &[String]) -> String {
    let (english, romaji) = match title {
        Some(t) => (t.english, t.romaji),
        None => (None, None),
    };

    english
        .filter(|s| !s.is_empty())
        .or_else(|| synonyms.first().cloned())
        .or(romaji)
        .unwrap_or_default()
}

fn parse_response(media_id: u32, response: GraphQlResponse) -> Result<AnimeEntry> {
    if !response.errors.is_empty() {
        let messages: Vec<String> = response
            .errors
            .iter()
            .map(|e| match e.status {
                Some(status) => format!("{} ({})", e.message, status),
                None => e.message.clone(),
            })
            .collect();
        bail!("AniList returned errors for media {}: {}", media_id, messages.join("; "));
    }

    let Some(data) = response.data else {
        bail!("AniList returned no data for media {}", media_id);
    };
    let Some(media) = data.media else {
        bail!("Media {} not found", media_id);
    };

    let progress = data.media_list.and_then(|l| l.progress).unwrap_or(0);
    let title = pick_title(media.title, &media.synonyms);
    let color = media.cover_image.and_then(|c| c.color).unwrap_or_default();

    Ok(AnimeEntry::new(
        &title,
        progress,
        media.episodes.unwrap_or(0),
        media.duration.unwrap_or(0),
        &color,
    ))
}

/// Decode a response body; the HTTP status is reported when the body isn't usable
fn decode_body(media_id: u32, status: reqwest::StatusCode, body: &str) -> Result<AnimeEntry> {
    let parsed: GraphQlResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) if !status.is_success() => {
            bail!("AniList returned status {} for media {}: {}", status, media_id, e);
        }
        Err(e) => return Err(e.into()),
    };

    // GraphQL errors come with a non-2xx status but carry the useful message
    let entry = parse_response(media_id, parsed)?;
    if !status.is_success() {
        bail!("AniList returned status {} for media {}", status, media_id);
    }

    Ok(entry)
}

/// Fetch one show's progress for `username`
pub async fn fetch_anime(
    client: &reqwest::Client,
    api_url: &str,
    username: &str,
    media_id: u32,
) -> Result<AnimeEntry> {
    tracing::info!("Fetching media {} for {}", media_id, username);

    let body = serde_json::json!({
        "query": SEARCH_QUERY,
        "variables": {
            "userName": username,
            "mediaId": media_id,
        },
    });

    let response = client
        .post(api_url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    tracing::debug!("AniList answered {} for media {}", status, media_id);

    let entry = decode_body(media_id, status, &body)?;
    tracing::debug!(
        "Media {}: '{}' {}/{} episodes, {} min each",
        media_id,
        entry.title,
        entry.progress,
        entry.episodes,
        entry.duration
    );
    Ok(entry)
}

/// Fetch every id in order; the first failure aborts
pub async fn fetch_all(api_url: &str, username: &str, media_ids: &[u32]) -> Result<Vec<AnimeEntry>> {
    let client = reqwest::Client::builder()
        .user_agent("AniListSpinner/0.1")
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let mut entries = Vec::with_capacity(media_ids.len());
    for &id in media_ids {
        entries.push(fetch_anime(&client, api_url, username, id).await?);
    }

    Ok(entries)
}

/// Built-in entries used when `TEST_DATA` is set
pub fn test_entries() -> Vec<AnimeEntry> {
    vec![
        AnimeEntry::new("anime a", 4, 23, 19, "#ff0000"),
        AnimeEntry::new("anime b: is really damn cool", 5, 20, 21, "#00ff00"),
        AnimeEntry::new("anime c - isnt it!!?", 6, 22, 22, "#0000ff"),
        AnimeEntry::new("anime d: the long lived gopher and its legacy", 7, 20, 30, "#ff00ff"),
    ]
}

fn title_shortener() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+)[:-]").expect("title pattern is valid"))
}

/// Drop subtitles: keep what comes before the last `:` or `-`
pub fn shorten_title(title: &str) -> String {
    match title_shortener().captures(title).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().trim().to_string(),
        None => title.to_string(),
    }
}
