use log::info;
use serde::Serialize;

use crate::config::Settings;
use crate::gemini::{GeminiClient, LanguageModel};
use crate::summarize::summarize;
use crate::transcript::{TranscriptService, fetch_transcript};
use crate::youtube::YouTubeTranscripts;
use crate::{Language, Result, VideoId, extract_video_id, thumbnail_url};

/// Everything a finished run hands to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notes {
    pub video_id: VideoId,
    pub thumbnail_url: String,
    pub language: Language,
    pub summary: String,
    #[serde(skip)]
    pub transcript: String,
}

/// URL in, notes out: parse, fetch captions, translate if needed, summarize
pub struct Pipeline<S, M> {
    transcripts: S,
    model: M,
    languages: Vec<Language>,
}

impl Pipeline<YouTubeTranscripts, GeminiClient> {
    pub fn from_settings(settings: &Settings) -> Self {
        let client = reqwest::Client::new();
        Self::new(
            YouTubeTranscripts::new(client.clone()),
            GeminiClient::new(client, settings.api_key.clone(), &settings.model),
            settings.languages.clone(),
        )
    }
}

impl<S, M> Pipeline<S, M>
where
    S: TranscriptService,
    M: LanguageModel,
{
    pub fn new(transcripts: S, model: M, languages: Vec<Language>) -> Self {
        Self {
            transcripts,
            model,
            languages,
        }
    }

    /// Run every stage in order; the first failure ends the run with nothing kept
    pub async fn run(&self, url: &str) -> Result<Notes> {
        let video_id = extract_video_id(url)?;
        info!("Processing video {video_id}");

        let transcript = fetch_transcript(&self.transcripts, &video_id, &self.languages).await?;
        info!(
            "Transcript ready: {} characters in {}",
            transcript.text.chars().count(),
            transcript.language.name()
        );

        let summary = summarize(&self.model, &transcript.text, transcript.language).await?;

        Ok(Notes {
            thumbnail_url: thumbnail_url(&video_id),
            video_id,
            language: transcript.language,
            summary,
            transcript: transcript.text,
        })
    }
}
