pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{LeagueConfig, SubmissionRequest};

pub use crate::adapters::local_store::LocalScoreStore;
pub use crate::core::form::{ParsedScore, PlayerDirectory, ScoreForm};
pub use crate::core::idempotency::is_submission_unchanged;
pub use crate::core::rules::{
    determine_winner, validate_match_tiebreak, validate_standard_set, ScoringRules,
};
pub use crate::core::submission::{ScoreSubmissionService, SubmissionAction, SubmissionOutcome};
pub use crate::domain::model::{MatchTiebreakScore, MatchType, ScoreRecord, SetScore, Side, Winner};
pub use crate::utils::error::{Result, ScoreError};
