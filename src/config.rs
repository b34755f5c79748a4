use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::debug;
use serde::Deserialize;

use crate::gemini::DEFAULT_MODEL;
use crate::{DEFAULT_LANGUAGES, Language};

/// Environment variable holding the Gemini API key unless the config names another
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: Option<String>,
    pub languages: Option<Vec<String>>,
    pub api_key_env: Option<String>,
    pub format: Option<String>,
}

impl Config {
    /// Load config from `path` (normally ~/.config/ytnotes/config.toml) if it exists
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config =
                toml::from_str(&content).wrap_err_with(|| format!("invalid config file {}", path.display()))?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// Language priority from the config file, if one is set
    pub fn languages(&self) -> Result<Option<Vec<Language>>> {
        self.languages
            .as_ref()
            .map(|codes| {
                codes
                    .iter()
                    .map(|c| c.parse::<Language>().map_err(|e| eyre::eyre!("config languages: {e}")))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytnotes")
        .join("config.toml")
}

/// Load `KEY=value` pairs from a .env file (the nearest one when `path` is None);
/// variables already set in the environment are left alone
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match path {
        Some(p) => dotenvy::from_path(p).map(|_| p.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(p) => {
            debug!("Loaded environment from {}", p.display());
            Some(p)
        }
        Err(e) => {
            debug!("No .env file loaded: {e}");
            None
        }
    }
}

/// Fully resolved values a notes run needs; built once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub languages: Vec<Language>,
    pub api_key: Option<String>,
}

impl Settings {
    /// CLI values win over the config file, which wins over built-in defaults
    pub fn resolve(
        config: &Config,
        cli_model: Option<String>,
        cli_languages: Option<Vec<Language>>,
        api_key: Option<String>,
    ) -> Result<Self> {
        let model = cli_model
            .or_else(|| config.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let languages = match cli_languages {
            Some(langs) => langs,
            None => config.languages()?.unwrap_or_else(|| DEFAULT_LANGUAGES.to_vec()),
        };

        if languages.is_empty() {
            eyre::bail!("at least one transcript language is required");
        }

        Ok(Self {
            model,
            languages,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
model = "gemini-1.5-pro"
languages = ["hi", "en"]
api_key_env = "GEMINI_KEY"
format = "markdown"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.api_key_env(), "GEMINI_KEY");
        assert_eq!(config.format.as_deref(), Some("markdown"));
        assert_eq!(
            config.languages().unwrap(),
            Some(vec![Language::Hindi, Language::English])
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.model.is_none());
        assert!(config.languages().unwrap().is_none());
        assert_eq!(config.api_key_env(), DEFAULT_API_KEY_ENV);
    }

    #[test]
    fn test_unknown_language_rejected() {
        let config: Config = toml::from_str(r#"languages = ["en", "fr"]"#).unwrap();
        let err = config.languages().unwrap_err();
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn test_load_missing_file() {
        let config = Config::load_from(Path::new("/nonexistent/ytnotes/config.toml")).unwrap();
        assert!(config.model.is_none());
    }

    #[test]
    fn test_load_env_file_supplies_api_key() {
        let dir = std::env::temp_dir().join(format!("ytnotes-dotenv-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(".env");
        std::fs::write(&path, "YTNOTES_TEST_DOTENV_KEY=from-dotenv\n").unwrap();

        assert_eq!(load_env_file(Some(&path)), Some(path.clone()));

        let config: Config = toml::from_str(r#"api_key_env = "YTNOTES_TEST_DOTENV_KEY""#).unwrap();
        let api_key = std::env::var(config.api_key_env()).ok();
        let settings = Settings::resolve(&config, None, None, api_key).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("from-dotenv"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_env_file_missing() {
        assert!(load_env_file(Some(Path::new("/nonexistent/ytnotes/.env"))).is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::resolve(&Config::default(), None, None, None).unwrap();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.languages, vec![Language::English, Language::Hindi]);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_resolve_precedence() {
        let config: Config = toml::from_str(
            r#"
model = "from-config"
languages = ["hi"]
"#,
        )
        .unwrap();

        let settings = Settings::resolve(&config, None, None, Some("k".to_string())).unwrap();
        assert_eq!(settings.model, "from-config");
        assert_eq!(settings.languages, vec![Language::Hindi]);
        assert_eq!(settings.api_key.as_deref(), Some("k"));

        let settings = Settings::resolve(
            &config,
            Some("from-cli".to_string()),
            Some(vec![Language::English]),
            None,
        )
        .unwrap();
        assert_eq!(settings.model, "from-cli");
        assert_eq!(settings.languages, vec![Language::English]);
    }

    #[test]
    fn test_resolve_blank_api_key() {
        let settings = Settings::resolve(&Config::default(), None, None, Some("  ".to_string())).unwrap();
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_resolve_empty_languages() {
        assert!(Settings::resolve(&Config::default(), None, Some(vec![]), None).is_err());
    }
}
