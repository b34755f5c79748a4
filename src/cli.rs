use clap::Parser;
use std::path::PathBuf;

use ytnotes::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytnotes",
    about = "YouTube transcript to bullet-point notes",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL (reads the first line of stdin if omitted)
    pub url: Option<String>,

    /// Output format: text, markdown (default), json
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Caption languages to try, in order (e.g. en,hi)
    #[arg(short, long, value_delimiter = ',')]
    pub lang: Option<Vec<Language>>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Gemini model for translation and summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Also print the flattened transcript
    #[arg(long)]
    pub show_transcript: bool,

    /// Show video and transcript metadata
    #[arg(short, long)]
    pub verbose: bool,
}
