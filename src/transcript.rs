use async_trait::async_trait;
use log::{debug, info};

use crate::{Error, Language, Result, Segment, Transcript, VideoId};

/// One language-specific caption stream offered for a video
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub language_code: String,
    pub name: String,
    pub generated: bool,
    pub base_url: String,
}

impl Track {
    /// Supported language of this track, matched on the primary subtag (`en-GB` is English)
    pub fn language(&self) -> Option<Language> {
        let primary = self.language_code.split(['-', '_']).next().unwrap_or_default();
        primary.parse().ok()
    }
}

/// Somewhere caption tracks can be listed and downloaded from
#[async_trait]
pub trait TranscriptService: Send + Sync {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<Track>>;

    async fn fetch_track(&self, track: &Track) -> Result<Vec<Segment>>;
}

/// List the tracks for a video, pick one by language priority and flatten it to text
pub async fn fetch_transcript<S>(service: &S, video_id: &VideoId, languages: &[Language]) -> Result<Transcript>
where
    S: TranscriptService + ?Sized,
{
    let tracks = service.list_tracks(video_id).await?;
    debug!(
        "Available tracks for {video_id}: {}",
        tracks.iter().map(|t| t.language_code.as_str()).collect::<Vec<_>>().join(", ")
    );

    let (track, language) = select_track(&tracks, languages).ok_or_else(|| Error::NoTranscriptFound {
        video_id: video_id.to_string(),
        languages: languages.iter().map(|l| l.code().to_string()).collect(),
    })?;

    info!(
        "Using {} caption track '{}' ({})",
        language.name(),
        track.language_code,
        if track.generated { "auto-generated" } else { "manual" }
    );

    let segments = service.fetch_track(track).await?;
    debug!("Fetched {} segments", segments.len());

    Ok(Transcript {
        video_id: video_id.clone(),
        language,
        text: flatten(&segments),
    })
}

/// First track matching the priority list; manual captions win over generated ones
pub fn select_track<'a>(tracks: &'a [Track], languages: &[Language]) -> Option<(&'a Track, Language)> {
    languages.iter().find_map(|&lang| {
        let mut candidates = tracks.iter().filter(|t| t.language() == Some(lang));
        let first = candidates.next()?;
        let track = std::iter::once(first)
            .chain(candidates)
            .find(|t| !t.generated)
            .unwrap_or(first);
        Some((track, lang))
    })
}

fn flatten(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join(" ")
}
