use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Resolved application configuration.
///
/// The API key comes from the environment and is read exactly once, here;
/// everything downstream receives it by value.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the generative language API.
    pub api_key: String,

    /// Model to send prompts to.
    pub model: String,

    /// Base URL of the API, overridable for testing.
    pub base_url: String,

    /// Gemchat home directory (config file, log file).
    pub home: PathBuf,
}

/// Optional overrides from `~/.gemchat/config.toml`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    model: Option<String>,
    base_url: Option<String>,
}

impl Config {
    /// Load configuration from the environment and the config file.
    pub fn load() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY is not set; export a generative language API key")?;

        let home = dirs::home_dir()
            .context("Could not find home directory")?
            .join(".gemchat");
        fs::create_dir_all(&home).context("Failed to create .gemchat directory")?;

        let overrides = read_config_file(&home.join("config.toml"))?;
        Ok(Self::assemble(api_key, home, overrides))
    }

    fn assemble(api_key: String, home: PathBuf, file: ConfigFile) -> Self {
        Config {
            api_key,
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: file.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            home,
        }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}
