use crate::core::rules::{
    ScoringRules, LINES_PER_MATCH, MATCH_TIEBREAK_TARGET, MAX_NOTES_LENGTH, STANDARD_SET_MIN_WIN,
};
use crate::domain::ports::RulesProvider;
use crate::utils::error::{Result, ScoreError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];
/// 局數與搶分目標的上限
pub const MAX_RULE_VALUE: i64 = 99;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub league: LeagueSection,
    #[serde(default)]
    pub rules: RulesConfig,
    pub store: Option<StoreConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueSection {
    pub name: String,
    pub season: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    pub standard_set_min_win: Option<i64>,
    pub match_tiebreak_target: Option<i64>,
    pub max_notes_length: Option<usize>,
    pub lines_per_match: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<String>,
}

impl LeagueConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScoreError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SCORE_STORE_PATH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScoreError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn scoring_rules(&self) -> ScoringRules {
        ScoringRules::from_provider(self)
    }

    pub fn store_path(&self) -> Option<&str> {
        self.store.as_ref().map(|s| s.path.as_str())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f == "json")
            .unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("league.name", &self.league.name)?;

        validation::validate_range(
            "rules.standard_set_min_win",
            self.standard_set_min_win(),
            1,
            MAX_RULE_VALUE,
        )?;
        validation::validate_range(
            "rules.match_tiebreak_target",
            self.match_tiebreak_target(),
            2,
            MAX_RULE_VALUE,
        )?;
        validation::validate_positive_number("rules.max_notes_length", self.max_notes_length(), 1)?;
        validation::validate_positive_number("rules.lines_per_match", self.lines_per_match(), 1)?;

        if let Some(store) = &self.store {
            validation::validate_path("store.path", &store.path)?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            validation::validate_one_of("logging.format", format, &LOG_FORMATS)?;
        }

        Ok(())
    }
}

impl RulesProvider for LeagueConfig {
    fn standard_set_min_win(&self) -> i64 {
        self.rules.standard_set_min_win.unwrap_or(STANDARD_SET_MIN_WIN)
    }

    fn match_tiebreak_target(&self) -> i64 {
        self.rules.match_tiebreak_target.unwrap_or(MATCH_TIEBREAK_TARGET)
    }

    fn max_notes_length(&self) -> usize {
        self.rules.max_notes_length.unwrap_or(MAX_NOTES_LENGTH)
    }

    fn lines_per_match(&self) -> u32 {
        self.rules.lines_per_match.unwrap_or(LINES_PER_MATCH)
    }
}

impl Validate for LeagueConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
