//! Command-line argument parsing for askql.
//!
//! Uses clap to parse CLI arguments. Flags override values from the
//! config file.

use crate::config::{read_questions_file, Config};
use crate::error::Result;
use crate::llm::LlmProvider;
use clap::Parser;
use std::path::PathBuf;

/// Ask questions about the Chinook database in plain English.
#[derive(Parser, Debug)]
#[command(name = "askql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (":memory:" for an in-memory database)
    #[arg(short = 'd', long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// SQL script that creates and populates the database
    #[arg(short = 's', long, value_name = "PATH")]
    pub seed: Option<PathBuf>,

    /// Use the database as-is without running the seed script
    #[arg(long)]
    pub skip_seed: bool,

    /// Question to ask (repeatable)
    #[arg(short = 'q', long = "question", value_name = "TEXT")]
    pub questions: Vec<String>,

    /// File with one question per line (use "-" for stdin)
    #[arg(short = 'f', long, value_name = "PATH")]
    pub questions_file: Option<PathBuf>,

    /// LLM provider: gemini, openai or mock
    #[arg(long, value_name = "PROVIDER")]
    pub llm: Option<LlmProvider>,

    /// Model name override
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Dotenv file with API keys
    #[arg(long, value_name = "PATH", default_value = ".env")]
    pub env_file: PathBuf,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Refuse to execute statements that are not read-only
    #[arg(long)]
    pub read_only: bool,

    /// Rows shown per result table (0 shows all)
    #[arg(long, value_name = "N")]
    pub max_rows: Option<usize>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.database {
            config.database.path = path.clone();
        }
        if let Some(seed) = &self.seed {
            config.database.seed = seed.clone();
        }
        if self.skip_seed {
            config.database.skip_seed = true;
        }
        if let Some(provider) = self.llm {
            config.llm.provider = provider.as_str().to_string();
        }
        if let Some(model) = &self.model {
            config.llm.model = Some(model.clone());
        }
        if self.read_only {
            config.pipeline.read_only = true;
        }
        if let Some(max_rows) = self.max_rows {
            config.pipeline.max_rows = max_rows;
        }
    }

    /// Resolves the questions to ask.
    ///
    /// `--question` wins over `--questions-file`, which wins over the
    /// config file, which wins over the built-in demo list.
    pub fn resolve_questions(&self, config: &Config) -> Result<Vec<String>> {
        if !self.questions.is_empty() {
            return Ok(self.questions.clone());
        }
        if let Some(path) = &self.questions_file {
            return read_questions_file(path);
        }
        Ok(config.pipeline.questions_or_default())
    }
}
