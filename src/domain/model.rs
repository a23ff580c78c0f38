use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Games won by each side in one standard set.
///
/// Values are signed so that raw negative input survives long enough to be
/// rejected by the rules instead of wrapping or being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetScore {
    pub home: i64,
    pub away: i64,
}

impl SetScore {
    pub fn new(home: i64, away: i64) -> Self {
        Self { home, away }
    }
}

impl fmt::Display for SetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Points won by each side in the deciding match tiebreak. `(0, 0)` means
/// the tiebreak was not played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MatchTiebreakScore {
    pub home: i64,
    pub away: i64,
}

impl MatchTiebreakScore {
    pub const NOT_PLAYED: MatchTiebreakScore = MatchTiebreakScore { home: 0, away: 0 };

    pub fn new(home: i64, away: i64) -> Self {
        Self { home, away }
    }

    pub fn is_not_played(&self) -> bool {
        *self == Self::NOT_PLAYED
    }
}

impl From<SetScore> for MatchTiebreakScore {
    fn from(set: SetScore) -> Self {
        Self::new(set.home, set.away)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

/// Derived match outcome. Callers must treat `Undetermined` as a rejected
/// submission, never as a default side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Home,
    Away,
    Undetermined,
}

impl Winner {
    pub fn is_determined(self) -> bool {
        self != Winner::Undetermined
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Winner::Home => "home",
            Winner::Away => "away",
            Winner::Undetermined => "undetermined",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Singles,
    #[default]
    Doubles,
}

impl MatchType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "singles" => Some(MatchType::Singles),
            "doubles" => Some(MatchType::Doubles),
            _ => None,
        }
    }
}

/// Normalized line result as handed to the store. Missing fields
/// deserialize as `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRecord {
    pub match_id: String,
    pub line_number: u32,
    pub match_type: MatchType,
    pub home_player_1_id: Option<String>,
    pub home_player_2_id: Option<String>,
    pub away_player_1_id: Option<String>,
    pub away_player_2_id: Option<String>,
    pub home_set_1: Option<i64>,
    pub away_set_1: Option<i64>,
    pub home_set_2: Option<i64>,
    pub away_set_2: Option<i64>,
    pub home_set_3: Option<i64>,
    pub away_set_3: Option<i64>,
    pub home_won: Option<bool>,
    pub notes: Option<String>,
    pub submitted_by: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ScoreRecord {
    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            match_id: self.match_id.clone(),
            line_number: self.line_number,
            match_type: self.match_type,
            home_player_1_id: self.home_player_1_id.clone(),
            home_player_2_id: self.home_player_2_id.clone(),
            away_player_1_id: self.away_player_1_id.clone(),
            away_player_2_id: self.away_player_2_id.clone(),
            home_set_1: self.home_set_1,
            away_set_1: self.away_set_1,
            home_set_2: self.home_set_2,
            away_set_2: self.away_set_2,
            home_set_3: self.home_set_3,
            away_set_3: self.away_set_3,
            home_won: self.home_won,
            notes: self.notes.clone().unwrap_or_default(),
        }
    }

    pub fn is_same_line(&self, match_id: &str, line_number: u32) -> bool {
        self.match_id == match_id && self.line_number == line_number
    }
}

/// Audit projection of a line result, without submitter metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub match_id: String,
    pub line_number: u32,
    pub match_type: MatchType,
    pub home_player_1_id: Option<String>,
    pub home_player_2_id: Option<String>,
    pub away_player_1_id: Option<String>,
    pub away_player_2_id: Option<String>,
    pub home_set_1: Option<i64>,
    pub away_set_1: Option<i64>,
    pub home_set_2: Option<i64>,
    pub away_set_2: Option<i64>,
    pub home_set_3: Option<i64>,
    pub away_set_3: Option<i64>,
    pub home_won: Option<bool>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub previous_state: Option<ScoreSnapshot>,
    pub new_state: ScoreSnapshot,
    pub recorded_at: DateTime<Utc>,
}
