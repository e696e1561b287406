//! Configuration management for askql.
//!
//! Handles loading configuration from TOML files, with sections for the LLM
//! provider, the database bootstrap and the question pipeline.

use crate::error::{AskqlError, Result};
use crate::llm::LlmProvider;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Questions asked when none are supplied on the command line or in the config file.
pub const DEFAULT_QUESTIONS: &[&str] = &[
    "List all customers in Canada.",
    "Which employees are sales agents?",
    "What are the 5 most purchased tracks?",
    "Show total sales per country in decending order.",
    "Which artists have more than 5 albums?",
    "list three expensive albums",
    "What is the total revenue from sales?",
];

/// Environment variable that overrides the configured model.
pub const MODEL_ENV: &str = "ASKQL_MODEL";

/// Main configuration structure for askql.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Database file and seed script.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Question pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider: "gemini", "openai" or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name. Each provider has its own default when unset.
    #[serde(default)]
    pub model: Option<String>,

    /// Base URL override for OpenAI-compatible endpoints.
    #[serde(default)]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Parses the configured provider name.
    pub fn provider_kind(&self) -> Result<LlmProvider> {
        self.provider.parse().map_err(AskqlError::config)
    }
}

/// Database bootstrap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// SQL script that creates and populates the database.
    #[serde(default = "default_seed_path")]
    pub seed: PathBuf,

    /// Skip running the seed script and use the database as-is.
    #[serde(default)]
    pub skip_seed: bool,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("Chinook.db")
}

fn default_seed_path() -> PathBuf {
    PathBuf::from("data/chinook_seed.sql")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            seed: default_seed_path(),
            skip_seed: false,
        }
    }
}

/// Question pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Questions to ask, in order. Empty means the built-in demo list.
    #[serde(default)]
    pub questions: Vec<String>,

    /// Refuse to execute statements that are not read-only.
    #[serde(default)]
    pub read_only: bool,

    /// Maximum number of rows printed per result table.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_max_rows() -> usize {
    20
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            questions: Vec::new(),
            read_only: false,
            max_rows: default_max_rows(),
        }
    }
}

impl PipelineConfig {
    /// Returns the configured questions, falling back to [`DEFAULT_QUESTIONS`].
    pub fn questions_or_default(&self) -> Vec<String> {
        if self.questions.is_empty() {
            DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
        } else {
            self.questions.clone()
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("askql")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AskqlError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Applies environment overrides on top of the file values.
    ///
    /// Runs after the dotenv file is loaded and before command-line flags,
    /// so `--model` still wins over `ASKQL_MODEL`.
    pub fn apply_env_overrides(&mut self) {
        self.override_model(std::env::var(MODEL_ENV).ok());
    }

    fn override_model(&mut self, model: Option<String>) {
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.llm.model = Some(model);
        }
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AskqlError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}

/// Reads questions from a file, one per line. `-` reads from stdin.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_questions_file(path: &Path) -> Result<Vec<String>> {
    if path == Path::new("-") {
        let stdin = std::io::stdin();
        let lines = stdin
            .lock()
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| AskqlError::config(format!("Failed to read questions from stdin: {e}")))?;
        return Ok(parse_questions(&lines.join("\n")));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        AskqlError::config(format!(
            "Failed to read questions file {}: {e}",
            path.display()
        ))
    })?;
    Ok(parse_questions(&content))
}

/// Splits question text into one question per non-empty, non-comment line.
pub fn parse_questions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
