use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use eyre::{Result, bail};
use log::{debug, info, warn};

mod cli;

use cli::{Cli, OutputFormat};
use ytnotes::config::{Config, Settings};
use ytnotes::pipeline::{Notes, Pipeline};

const SUPPORTED_FORMATS: &str = "Supported formats:
  https://www.youtube.com/watch?v=ID
  https://youtu.be/ID
  https://www.youtube.com/embed/ID
  https://www.youtube.com/shorts/ID";

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytnotes.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytnotes")
        .join("logs")
}

fn build_after_help(config: &Config, env_file: Option<&Path>) -> String {
    let key_env = config.api_key_env();
    let key_line = if std::env::var(key_env).is_ok_and(|v| !v.trim().is_empty()) {
        format!("  \x1b[32m✅\x1b[0m {key_env}")
    } else {
        format!("  \x1b[31m❌\x1b[0m {key_env}  (not set, translation and summarization will fail)")
    };

    let env_line = match env_file {
        Some(path) => format!("Loaded .env from: {}", path.display()),
        None => "No .env file found (the key may also be set in ./.env)".to_string(),
    };

    let config_path = ytnotes::config::config_path();
    let log_path = log_dir().join("ytnotes.log");

    format!(
        "\nAPI KEY:\n{key_line}\n{env_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        config_path.display(),
        log_path.display()
    )
}

/// Load the config file; a broken file is reported on `diag` and replaced by defaults
fn load_config(path: &Path, diag: &mut impl Write) -> Config {
    Config::load_from(path).unwrap_or_else(|e| {
        warn!("Ignoring config file: {e:#}");
        let _ = writeln!(diag, "Warning: ignoring config file: {e:#}");
        Config::default()
    })
}

/// Rendered notes go to `out` (or the --output file); the transcript goes to `diag`
fn write_notes(cli: &Cli, notes: &Notes, format: OutputFormat, out: &mut impl Write, diag: &mut impl Write) -> Result<()> {
    if cli.show_transcript {
        writeln!(diag, "--- Transcript ---\n{}\n", notes.transcript)?;
    }

    let rendered = match format {
        OutputFormat::Text => ytnotes::output::render_text(notes),
        OutputFormat::Markdown => ytnotes::output::render_markdown(notes),
        OutputFormat::Json => ytnotes::output::render_json(notes),
    };

    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        if cli.verbose {
            writeln!(diag, "Output written to: {}", path.display())?;
        }
    } else {
        writeln!(out, "{rendered}")?;
    }

    Ok(())
}

fn read_url(cli: &Cli) -> Result<String> {
    if let Some(ref url) = cli.url {
        return Ok(url.trim().to_string());
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(line.trim().to_string());
        }
    }

    bail!("no YouTube URL provided\n\nUsage: ytnotes <URL>\n       echo <URL> | ytnotes");
}

fn resolve_format(cli: &Cli, config: &Config) -> Result<OutputFormat> {
    if let Some(format) = cli.format {
        return Ok(format);
    }
    match config.format {
        Some(ref name) => {
            OutputFormat::from_str(name, true).map_err(|e| eyre::eyre!("invalid format '{name}' in config: {e}"))
        }
        None => Ok(OutputFormat::Markdown),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    // Load config file (non-fatal if missing/invalid)
    let config = load_config(&ytnotes::config::config_path(), &mut io::stderr());

    // A .env file may carry the API key; real environment variables take priority
    let env_file = ytnotes::config::load_env_file(None);

    let after_help = build_after_help(&config, env_file.as_deref());
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // The credential is read exactly once, here, and handed to the pipeline
    let api_key = std::env::var(config.api_key_env()).ok();
    let settings = Settings::resolve(&config, cli.model.clone(), cli.lang.clone(), api_key)?;
    let format = resolve_format(&cli, &config)?;

    if settings.api_key.is_none() {
        warn!("{} is not set; generative calls will fail", config.api_key_env());
    }

    if cli.verbose {
        let config_path = ytnotes::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!(
            "Model: {}\nLanguages: {}",
            settings.model,
            settings.languages.iter().map(|l| l.code()).collect::<Vec<_>>().join(", ")
        );
    }

    let url = read_url(&cli)?;
    debug!("Input URL: {url}");

    let pipeline = Pipeline::from_settings(&settings);

    let notes = match pipeline.run(&url).await {
        Ok(notes) => notes,
        Err(e) if e.is_input_error() => bail!("{e}\n\n{SUPPORTED_FORMATS}"),
        Err(e) => return Err(e.into()),
    };

    if cli.verbose {
        eprintln!(
            "Video: {}\nThumbnail: {}\nLanguage: {}\nTranscript: {} characters",
            notes.video_id,
            notes.thumbnail_url,
            notes.language.name(),
            notes.transcript.chars().count(),
        );
    }

    write_notes(&cli, &notes, format, &mut io::stdout(), &mut io::stderr())
}
