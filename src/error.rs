use thiserror::Error;

/// Everything that can stop a notes run
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid YouTube URL format: {0}")]
    InvalidUrlFormat(String),

    #[error("transcripts are disabled for the video: {0}")]
    TranscriptsDisabled(String),

    #[error("no transcript found for the video {video_id} (tried: {})", .languages.join(", "))]
    NoTranscriptFound { video_id: String, languages: Vec<String> },

    #[error("transcript service error: {0}")]
    TranscriptService(String),

    #[error("generative service error: {0}")]
    GenerativeService(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the user can fix the problem by entering a different URL
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InvalidUrlFormat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_transcript_found_lists_languages() {
        let err = Error::NoTranscriptFound {
            video_id: "abc123".to_string(),
            languages: vec!["en".to_string(), "hi".to_string()],
        };
        assert_eq!(err.to_string(), "no transcript found for the video abc123 (tried: en, hi)");
    }

    #[test]
    fn test_is_input_error() {
        assert!(Error::InvalidUrlFormat("x".to_string()).is_input_error());
        assert!(!Error::TranscriptsDisabled("abc123".to_string()).is_input_error());
        assert!(!Error::GenerativeService("boom".to_string()).is_input_error());
    }
}
