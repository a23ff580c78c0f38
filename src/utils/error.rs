use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single rejected form field, surfaced to the submitter as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Score validation failed: {}", join_field_errors(.errors))]
    Validation { errors: Vec<FieldError> },

    #[error("Unable to determine a winner from the provided scores")]
    UndeterminedWinner,

    #[error("No changes detected for match {match_id} line {line_number}")]
    NoChanges { match_id: String, line_number: u32 },

    #[error("Score store error: {message}")]
    StoreError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ScoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ScoreError::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoreError::Validation { .. }
            | ScoreError::UndeterminedWinner
            | ScoreError::NoChanges { .. } => ErrorCategory::Input,
            ScoreError::ConfigError { .. }
            | ScoreError::ConfigValidationError { .. }
            | ScoreError::InvalidConfigValueError { .. }
            | ScoreError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScoreError::IoError(_)
            | ScoreError::SerializationError(_)
            | ScoreError::StoreError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 重複送出不算失敗
            ScoreError::NoChanges { .. } => ErrorSeverity::Low,
            ScoreError::Validation { .. } | ScoreError::UndeterminedWinner => {
                ErrorSeverity::Medium
            }
            ScoreError::ConfigError { .. }
            | ScoreError::ConfigValidationError { .. }
            | ScoreError::InvalidConfigValueError { .. }
            | ScoreError::MissingConfigError { .. } => ErrorSeverity::High,
            ScoreError::IoError(_)
            | ScoreError::SerializationError(_)
            | ScoreError::StoreError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ScoreError::Validation { .. } => {
                "Sets 1 and 2 must be valid tennis scores (6-4, 7-5, 7-6 etc.) and the third set a tiebreak to 7, win by 2, or blank".to_string()
            }
            ScoreError::UndeterminedWinner => "Check set results: one side must win two sets".to_string(),
            ScoreError::NoChanges { .. } => {
                "Update scores or notes before resubmitting".to_string()
            }
            ScoreError::ConfigError { .. }
            | ScoreError::ConfigValidationError { .. }
            | ScoreError::InvalidConfigValueError { .. }
            | ScoreError::MissingConfigError { .. } => {
                "Check the league configuration file".to_string()
            }
            ScoreError::IoError(_) | ScoreError::StoreError { .. } => {
                "Make sure the score store path exists and is writable".to_string()
            }
            ScoreError::SerializationError(_) => {
                "Make sure the input file is valid JSON".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScoreError::Validation { errors } => errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("\n"),
            ScoreError::UndeterminedWinner => {
                "Unable to determine a winner from the provided scores. Check set results."
                    .to_string()
            }
            ScoreError::NoChanges { .. } => {
                "No changes detected for this line. Update scores or notes before resubmitting."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
