use async_trait::async_trait;
use log::debug;

use crate::{Error, Result};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// A text-completion service: prompt in, text out
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Google Generative Language API client
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>, model: &str) -> Self {
        Self::with_base_url(client, api_key, model, GEMINI_BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, api_key: Option<String>, model: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key,
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::GenerativeService("no API key configured".to_string()))?;

        debug!(
            "Calling Gemini model {} with a {}-character prompt",
            self.model,
            prompt.chars().count()
        );

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);

        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::GenerativeService(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::GenerativeService(format!("Gemini API returned {status}: {body}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::GenerativeService(format!("malformed response: {e}")))?;
        extract_gemini_text(&json)
    }
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }

    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(Error::GenerativeService(format!("prompt was blocked: {reason}")));
    }

    if let Some(reason) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("finishReason"))
        .and_then(|r| r.as_str())
    {
        return Err(Error::GenerativeService(format!(
            "no text in Gemini response (finishReason: {reason})"
        )));
    }

    Err(Error::GenerativeService("unexpected Gemini API response format".to_string()))
}
