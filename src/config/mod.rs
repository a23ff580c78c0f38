pub mod toml_config;

use crate::core::form::{ParsedScore, PlayerDirectory, ScoreForm};
use crate::utils::error::Result;
use crate::utils::validation;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use toml_config::LeagueConfig;

pub const DEFAULT_STORE_PATH: &str = "./data/scores.json";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "league-scores")]
#[command(about = "Validate and record tennis league line scores")]
pub struct CliConfig {
    /// Path to the league TOML configuration
    #[arg(short, long)]
    pub config: Option<String>,

    /// Score store JSON file, overrides [store] path from the config
    #[arg(long)]
    pub store: Option<String>,

    /// Submission JSON file (form, player directory, submitter)
    #[arg(short, long)]
    pub submission: String,

    #[arg(long, help = "Validate and print the winner without writing")]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("submission", &self.submission)?;
        if let Some(store) = &self.store {
            validation::validate_path("store", store)?;
        }
        Ok(())
    }
}

/// One score submission as handed to the CLI: the form as typed, the
/// roster lookup for both teams and, optionally, a voice parse to merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub form: ScoreForm,
    #[serde(default)]
    pub players: PlayerDirectory,
    pub voice: Option<ParsedScore>,
}

impl SubmissionRequest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn submitter(&self) -> Result<&str> {
        let submitter = validation::validate_required_field("submitted_by", &self.submitted_by)?;
        validation::validate_non_empty_string("submitted_by", submitter)?;
        Ok(submitter.as_str())
    }
}
