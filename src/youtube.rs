use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::transcript::{Track, TranscriptService};
use crate::{Error, Result, Segment, VideoId};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackName {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
    runs: Option<Vec<TextRun>>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn text(&self) -> Option<String> {
        self.simple_text
            .clone()
            .or_else(|| self.runs.as_ref()?.first().map(|r| r.text.clone()))
    }
}

impl From<CaptionTrack> for Track {
    fn from(ct: CaptionTrack) -> Self {
        let name = ct
            .name
            .as_ref()
            .and_then(TrackName::text)
            .unwrap_or_else(|| ct.language_code.clone());
        Track {
            generated: ct.kind.as_deref() == Some("asr"),
            base_url: ct.base_url.replace("&fmt=srv3", ""),
            language_code: ct.language_code,
            name,
        }
    }
}

/// Caption tracks from YouTube via the InnerTube player API
pub struct YouTubeTranscripts {
    client: reqwest::Client,
    base_url: String,
}

impl YouTubeTranscripts {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, YOUTUBE_BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_text(&self, url: &str, what: &str) -> Result<String> {
        self.client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en-US")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::TranscriptService(format!("failed to fetch {what}: {e}")))?
            .text()
            .await
            .map_err(|e| Error::TranscriptService(format!("failed to read {what}: {e}")))
    }
}

#[async_trait]
impl TranscriptService for YouTubeTranscripts {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<Track>> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        debug!("Fetching watch page: {watch_url}");

        let page_html = self.get_text(&watch_url, "watch page").await?;

        if page_html.contains("g-recaptcha") {
            return Err(Error::TranscriptService(format!(
                "request for {video_id} was blocked by a captcha"
            )));
        }

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("{}/youtubei/v1/player?key={api_key}&prettyPrint=false", self.base_url);

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": "en",
                    "gl": "US",
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id.as_str()
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::TranscriptService(format!("InnerTube player request failed: {e}")))?
            .json()
            .await
            .map_err(|e| Error::TranscriptService(format!("malformed InnerTube response: {e}")))?;

        tracks_from_player(video_id, resp)
    }

    async fn fetch_track(&self, track: &Track) -> Result<Vec<Segment>> {
        debug!("Fetching caption track: lang={} url={}", track.language_code, track.base_url);
        let caption_xml = self.get_text(&track.base_url, "caption track").await?;
        parse_caption_xml(&caption_xml)
    }
}

fn tracks_from_player(video_id: &VideoId, resp: InnerTubePlayerResponse) -> Result<Vec<Track>> {
    if let Some(ps) = resp.playability_status {
        let status = ps.status.unwrap_or_default();
        if !status.is_empty() && status != "OK" {
            let reason = ps.reason.unwrap_or_else(|| "no reason given".to_string());
            return Err(Error::TranscriptService(format!(
                "video {video_id} is not playable ({status}): {reason}"
            )));
        }
    }

    let tracks = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(Error::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(tracks.into_iter().map(Track::from).collect())
}

fn extract_api_key(html: &str) -> Result<String> {
    let patterns = [r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#, r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#];

    for pattern in patterns {
        let re = Regex::new(pattern).map_err(|e| Error::TranscriptService(e.to_string()))?;
        if let Some(caps) = re.captures(html) {
            return Ok(caps[1].to_string());
        }
    }

    Err(Error::TranscriptService(
        "could not extract InnerTube API key from watch page".to_string(),
    ))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                current_start = start;
                // some tracks omit dur on the final cue
                current_dur = dur.or(Some(0.0));
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).replace('\n', " ");
                    let text = text.trim();
                    if !text.is_empty() {
                        segments.push(Segment {
                            text: text.to_string(),
                            start,
                            duration: dur,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::TranscriptService(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
