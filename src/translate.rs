use log::info;

use crate::Result;
use crate::gemini::LanguageModel;

const TRANSLATION_PROMPT: &str = "Translate the following text to English:";

fn translation_prompt(text: &str) -> String {
    format!("{TRANSLATION_PROMPT}\n{text}\n")
}

/// Ask the model for an English rendering of `text`; the reply is returned as-is
pub async fn translate_to_english<M>(model: &M, text: &str) -> Result<String>
where
    M: LanguageModel + ?Sized,
{
    info!("Translating {} characters of transcript to English", text.chars().count());
    model.generate(&translation_prompt(text)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::summarize::tests::FakeModel;

    #[test]
    fn test_translation_prompt() {
        assert_eq!(
            translation_prompt("नमस्ते दुनिया"),
            "Translate the following text to English:\nनमस्ते दुनिया\n"
        );
    }

    #[tokio::test]
    async fn test_translate_returns_raw_reply() {
        let model = FakeModel::replying(&["  hello world  "]);
        let english = translate_to_english(&model, "नमस्ते दुनिया").await.unwrap();
        assert_eq!(english, "  hello world  ");
        assert_eq!(model.prompts(), vec![translation_prompt("नमस्ते दुनिया")]);
    }

    #[tokio::test]
    async fn test_translate_propagates_error() {
        let model = FakeModel::failing_at(0);
        let err = translate_to_english(&model, "नमस्ते").await.unwrap_err();
        assert!(matches!(err, Error::GenerativeService(_)));
    }
}
