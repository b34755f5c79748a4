pub mod config;
pub mod error;
pub mod gemini;
pub mod output;
pub mod pipeline;
pub mod summarize;
pub mod transcript;
pub mod translate;
pub mod youtube;

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

pub use error::{Error, Result};

const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

/// Hosts that carry the id in the `v` query parameter (or an /embed/, /shorts/ path)
const CANONICAL_HOSTS: &[&str] = &["www.youtube.com", "youtube.com", "m.youtube.com"];

/// Hosts that carry the id as the whole path
const SHORT_HOSTS: &[&str] = &["youtu.be"];

/// A single captioned segment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Identifier of a video on YouTube
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caption languages the pipeline knows how to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
}

/// Track selection order when nothing else is configured
pub const DEFAULT_LANGUAGES: &[Language] = &[Language::English, Language::Hindi];

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }

    /// Whether text in this language must be translated before summarizing
    pub fn needs_translation(&self) -> bool {
        *self != Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "hi" | "hindi" => Ok(Language::Hindi),
            other => Err(format!("unsupported language '{other}' (supported: en, hi)")),
        }
    }
}

/// Flattened transcript text and the language of the track it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub video_id: VideoId,
    pub language: Language,
    pub text: String,
}

/// Extract the video id from a YouTube watch, short, embed or shorts URL
pub fn extract_video_id(input: &str) -> Result<VideoId> {
    let input = input.trim();

    let url = Url::parse(input).map_err(|e| Error::InvalidUrlFormat(format!("{input} ({e})")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::InvalidUrlFormat(format!(
            "{input} (unsupported scheme: {})",
            url.scheme()
        )));
    }

    let host = url.host_str().unwrap_or_default();

    let id = if CANONICAL_HOSTS.contains(&host) {
        canonical_id(&url)
    } else if SHORT_HOSTS.contains(&host) {
        Some(url.path().trim_start_matches('/').to_string())
    } else {
        return Err(Error::InvalidUrlFormat(format!("{input} (not a YouTube host)")));
    };

    match id {
        Some(id) if !id.is_empty() => {
            debug!("Extracted video id {id} from {input}");
            Ok(VideoId(id))
        }
        _ => Err(Error::InvalidUrlFormat(format!("{input} (no video id)"))),
    }
}

fn canonical_id(url: &Url) -> Option<String> {
    if let Some((_, v)) = url.query_pairs().find(|(k, v)| k == "v" && !v.is_empty()) {
        return Some(v.into_owned());
    }

    // youtube.com/embed/ID and youtube.com/shorts/ID
    let mut segments = url.path_segments()?;
    match (segments.next(), segments.next()) {
        (Some("embed" | "shorts"), Some(id)) => Some(id.to_string()),
        _ => None,
    }
}

/// Preview image for a video
pub fn thumbnail_url(video_id: &VideoId) -> String {
    format!("{THUMBNAIL_BASE}/{video_id}/0.jpg")
}
