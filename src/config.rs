use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory before the platform config dir.
pub const LOCAL_CONFIG_FILE: &str = "yt-summarizer.toml";

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub transcript: TranscriptConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key for the chat completions endpoint (or set OPENAI_API_KEY).
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API (or set OPENAI_API_BASE).
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Preferred transcript languages, most preferred first.
    pub languages: Vec<String>,
    pub timeout_secs: u64,
}

// --- Default implementations ---

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            languages: vec![DEFAULT_LANGUAGE.to_string()],
            timeout_secs: 30,
        }
    }
}

// --- Config loading ---

impl Config {
    /// Load config and return the resolved file path (if any).
    pub fn load_with_path(path: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        // 1. Explicit path must exist
        if let Some(p) = path {
            let config = Self::read_file(p)?;
            return Ok((config, Some(p.to_path_buf())));
        }

        // 2. Working directory
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            let config = Self::read_file(&local)?;
            return Ok((config, Some(local)));
        }

        // 3. Platform config directory (e.g. ~/.config/yt-summarizer/config.toml)
        if let Some(platform_config) = Self::platform_config_path() {
            if platform_config.exists() {
                let config = Self::read_file(&platform_config)?;
                return Ok((config, Some(platform_config)));
            }
        }

        // 4. Fall back to defaults
        tracing::debug!("No config file found, using defaults");
        Ok((Config::default(), None))
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_path(path).map(|(config, _)| config)
    }

    fn read_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e)
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file {}: {}", path.display(), e)
        })?;
        Ok(config)
    }

    pub fn platform_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("yt-summarizer").join("config.toml"))
    }

    /// Apply command-line overrides on top of the loaded file values.
    pub fn apply_overrides(
        &mut self,
        api_key: Option<&str>,
        api_base: Option<&str>,
        model: Option<&str>,
    ) {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.llm.api_key = key.to_string();
        }
        if let Some(base) = api_base.filter(|b| !b.is_empty()) {
            self.llm.api_base = base.to_string();
        }
        if let Some(model) = model.filter(|m| !m.is_empty()) {
            self.llm.model = model.to_string();
        }
    }

    /// Generate a default config file with all fields and inline documentation.
    pub fn generate_default_commented() -> String {
        format!(
r#"# yt-summarizer configuration

[llm]
# API key for the chat completions endpoint (or set OPENAI_API_KEY).
# api_key = ""
# Base URL of an OpenAI-compatible API (or set OPENAI_API_BASE).
# api_base = "{api_base}"
# Model used for summaries, question extraction and topic extraction.
model = "{model}"
# HTTP timeout for a single generation request, in seconds.
timeout_secs = 120

[transcript]
# Preferred transcript languages, most preferred first. When none of them is
# available the first transcript the video offers is used instead.
languages = ["{language}"]
# HTTP timeout for each transcript request, in seconds.
timeout_secs = 30
"#,
            api_base = DEFAULT_API_BASE,
            model = DEFAULT_MODEL,
            language = DEFAULT_LANGUAGE,
        )
    }
}
