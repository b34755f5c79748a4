use log::{debug, info};

use crate::gemini::LanguageModel;
use crate::translate::translate_to_english;
use crate::{Language, Result};

/// Instruction prepended to the transcript; the word limit is a request, nothing enforces it
pub const SUMMARY_PROMPT: &str = "
You are a YouTube video summarizer.
You will take the transcript text and summarize the entire video.
Provide the summary as clear and concise bullet points, with each point representing a key idea or topic from the video.
Ensure the summary is within 250 words.
Please provide the bullet-pointed summary for the text given: .
";

/// Summarize transcript text as markdown bullet points, translating it to English first if needed
pub async fn summarize<M>(model: &M, transcript_text: &str, language: Language) -> Result<String>
where
    M: LanguageModel + ?Sized,
{
    let english = if language.needs_translation() {
        let translated = translate_to_english(model, transcript_text).await?;
        debug!("Translation returned {} characters", translated.chars().count());
        translated
    } else {
        transcript_text.to_string()
    };

    info!("Requesting bullet-point summary");
    model.generate(&format!("{SUMMARY_PROMPT}{english}")).await
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::Error;

    /// Scripted model: answers with `replies` in order (repeating the last) and records every prompt
    pub(crate) struct FakeModel {
        replies: Vec<String>,
        fail_at: Option<usize>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeModel {
        pub(crate) fn replying(replies: &[&str]) -> Self {
            Self {
                replies: replies.iter().map(|r| r.to_string()).collect(),
                fail_at: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing_at(call: usize) -> Self {
            Self {
                replies: vec!["* unused".to_string()],
                fail_at: Some(call),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        pub(crate) fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LanguageModel for FakeModel {
        async fn generate(&self, prompt: &str) -> Result<String> {
            let call = {
                let mut prompts = self.prompts.lock().unwrap();
                prompts.push(prompt.to_string());
                prompts.len() - 1
            };
            if self.fail_at == Some(call) {
                return Err(Error::GenerativeService("model unavailable".to_string()));
            }
            let reply = self.replies.get(call).or(self.replies.last()).cloned().unwrap_or_default();
            Ok(reply)
        }
    }

    #[tokio::test]
    async fn test_english_is_not_translated() {
        let model = FakeModel::replying(&["* Point one\n* Point two"]);
        let summary = summarize(&model, "Hello world", Language::English).await.unwrap();

        assert_eq!(summary, "* Point one\n* Point two");
        assert_eq!(model.prompts(), vec![format!("{SUMMARY_PROMPT}Hello world")]);
    }

    #[tokio::test]
    async fn test_hindi_is_translated_once_before_summary() {
        let model = FakeModel::replying(&["Hello world", "* Greeting"]);
        let summary = summarize(&model, "नमस्ते दुनिया", Language::Hindi).await.unwrap();

        assert_eq!(summary, "* Greeting");
        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].starts_with("Translate the following text to English:"));
        assert!(prompts[0].contains("नमस्ते दुनिया"));
        assert_eq!(prompts[1], format!("{SUMMARY_PROMPT}Hello world"));
    }

    #[tokio::test]
    async fn test_failed_translation_skips_summary() {
        let model = FakeModel::failing_at(0);
        let err = summarize(&model, "नमस्ते", Language::Hindi).await.unwrap_err();

        assert!(matches!(err, Error::GenerativeService(_)));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_summary_propagates() {
        let model = FakeModel::failing_at(0);
        let err = summarize(&model, "Hello", Language::English).await.unwrap_err();
        assert_eq!(err.to_string(), "generative service error: model unavailable");
    }

    #[tokio::test]
    async fn test_repeated_calls_are_not_cached() {
        let model = FakeModel::replying(&["* first", "* second"]);
        let a = summarize(&model, "Hello", Language::English).await.unwrap();
        let b = summarize(&model, "Hello", Language::English).await.unwrap();

        assert_eq!(model.calls(), 2);
        assert_eq!(a, "* first");
        assert_eq!(b, "* second");
    }

    #[test]
    fn test_prompt_asks_for_bullets_and_limit() {
        assert!(SUMMARY_PROMPT.contains("bullet points"));
        assert!(SUMMARY_PROMPT.contains("250 words"));
    }
}
