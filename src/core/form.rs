use crate::core::input::{games_from_json, is_blank, parse_games};
use crate::core::rules::ScoringRules;
use crate::domain::model::{MatchType, ScoreRecord, SetScore, Side, Winner};
use crate::utils::error::{FieldError, Result, ScoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Player display name to player id, as loaded from both team rosters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerDirectory {
    ids: HashMap<String, String>,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.ids.insert(name.into(), id.into());
    }

    pub fn id_for(&self, name: &str) -> Option<String> {
        if is_blank(name) {
            return None;
        }
        self.ids.get(name).cloned()
    }
}

impl<N: Into<String>, I: Into<String>> FromIterator<(N, I)> for PlayerDirectory {
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        Self {
            ids: iter
                .into_iter()
                .map(|(name, id)| (name.into(), id.into()))
                .collect(),
        }
    }
}

/// Raw score entry for one line of a team match, exactly as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreForm {
    pub match_id: String,
    pub line_number: u32,
    pub match_type: MatchType,
    pub home_players: [String; 2],
    pub away_players: [String; 2],
    pub home_set_1: String,
    pub away_set_1: String,
    pub home_set_2: String,
    pub away_set_2: String,
    pub home_set_3: String,
    pub away_set_3: String,
    pub notes: String,
}

impl Default for ScoreForm {
    fn default() -> Self {
        Self {
            match_id: String::new(),
            line_number: 1,
            match_type: MatchType::Doubles,
            home_players: Default::default(),
            away_players: Default::default(),
            home_set_1: String::new(),
            away_set_1: String::new(),
            home_set_2: String::new(),
            away_set_2: String::new(),
            home_set_3: String::new(),
            away_set_3: String::new(),
            notes: String::new(),
        }
    }
}

/// Score fields produced by the voice/AI transcription parser. Every field
/// is optional and loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParsedScore {
    pub line_number: Option<serde_json::Value>,
    pub match_type: Option<String>,
    pub home_set_1: Option<serde_json::Value>,
    pub away_set_1: Option<serde_json::Value>,
    pub home_set_2: Option<serde_json::Value>,
    pub away_set_2: Option<serde_json::Value>,
    pub home_set_3: Option<serde_json::Value>,
    pub away_set_3: Option<serde_json::Value>,
    pub notes: Option<String>,
}

fn parse_set(home: &str, away: &str) -> Option<SetScore> {
    Some(SetScore::new(parse_games(home)?, parse_games(away)?))
}

impl ScoreForm {
    pub fn has_third_set(&self) -> bool {
        !is_blank(&self.home_set_3) || !is_blank(&self.away_set_3)
    }

    /// Singles only carries the first player of each side.
    pub fn normalized_players(&self, side: Side) -> [String; 2] {
        let players = match side {
            Side::Home => &self.home_players,
            Side::Away => &self.away_players,
        };
        match self.match_type {
            MatchType::Singles => [players[0].clone(), String::new()],
            MatchType::Doubles => players.clone(),
        }
    }

    /// Set 1, set 2 and, if entered, the match tiebreak. `None` when any
    /// entered value is not an integer.
    pub fn sets(&self) -> Option<Vec<SetScore>> {
        let mut sets = vec![
            parse_set(&self.home_set_1, &self.away_set_1)?,
            parse_set(&self.home_set_2, &self.away_set_2)?,
        ];
        if self.has_third_set() {
            sets.push(parse_set(&self.home_set_3, &self.away_set_3)?);
        }
        Some(sets)
    }

    pub fn winner(&self, rules: &ScoringRules) -> Winner {
        self.sets()
            .map(|sets| rules.determine_winner(&sets))
            .unwrap_or(Winner::Undetermined)
    }

    fn score_errors(&self, rules: &ScoringRules) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let standard_ok = |home: &str, away: &str| {
            parse_set(home, away)
                .map(|set| rules.is_standard_set_valid(set.home, set.away))
                .unwrap_or(false)
        };
        if !standard_ok(&self.home_set_1, &self.away_set_1)
            || !standard_ok(&self.home_set_2, &self.away_set_2)
        {
            let min_win = rules.standard_set_min_win;
            errors.push(FieldError::new(
                "sets",
                format!(
                    "Sets 1 and 2 must be valid tennis scores (win by 2, {}-{}/{}-{}/{}-{} etc.)",
                    min_win,
                    min_win.saturating_sub(2),
                    min_win.saturating_add(1),
                    min_win.saturating_sub(1),
                    min_win.saturating_add(1),
                    min_win
                ),
            ));
        }

        if self.has_third_set() {
            let tiebreak_ok = parse_set(&self.home_set_3, &self.away_set_3)
                .map(|set| rules.is_match_tiebreak_valid(set.home, set.away))
                .unwrap_or(false);
            if !tiebreak_ok {
                errors.push(FieldError::new(
                    "set_3",
                    format!(
                        "Third set must be a valid tiebreak (first to {}, win by 2) or blank",
                        rules.match_tiebreak_target
                    ),
                ));
            }
        }

        errors
    }

    /// Checks every field and reports all problems at once.
    pub fn validate(&self, rules: &ScoringRules) -> Result<()> {
        let mut errors = Vec::new();

        if is_blank(&self.match_id) {
            errors.push(FieldError::new("match_id", "Please select a match"));
        }

        if self.line_number < 1 || self.line_number > rules.lines_per_match {
            errors.push(FieldError::new(
                "line_number",
                format!("Line number must be between 1 and {}", rules.lines_per_match),
            ));
        }

        let home = self.normalized_players(Side::Home);
        let away = self.normalized_players(Side::Away);
        if is_blank(&home[0]) || is_blank(&away[0]) {
            errors.push(FieldError::new(
                "players",
                "Select at least one player for each team",
            ));
        }

        let selected: Vec<String> = home
            .iter()
            .chain(away.iter())
            .filter(|name| !is_blank(name))
            .map(|name| name.trim().to_lowercase())
            .collect();
        let unique: HashSet<&String> = selected.iter().collect();
        if unique.len() != selected.len() {
            errors.push(FieldError::new(
                "players",
                "Players cannot appear on both sides of the net",
            ));
        }

        errors.extend(self.score_errors(rules));

        if self.notes.chars().count() > rules.max_notes_length {
            errors.push(FieldError::new(
                "notes",
                format!("Notes cannot exceed {} characters", rules.max_notes_length),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ScoreError::Validation { errors })
        }
    }

    /// Builds the normalized line result handed to the store.
    pub fn to_record(
        &self,
        directory: &PlayerDirectory,
        submitted_by: &str,
        winner: Winner,
        submitted_at: DateTime<Utc>,
    ) -> ScoreRecord {
        let home = self.normalized_players(Side::Home);
        let away = self.normalized_players(Side::Away);
        let doubles = self.match_type == MatchType::Doubles;

        let (home_set_3, away_set_3) = if self.has_third_set() {
            (parse_games(&self.home_set_3), parse_games(&self.away_set_3))
        } else {
            (None, None)
        };

        ScoreRecord {
            match_id: self.match_id.clone(),
            line_number: self.line_number,
            match_type: self.match_type,
            home_player_1_id: directory.id_for(&home[0]),
            home_player_2_id: if doubles { directory.id_for(&home[1]) } else { None },
            away_player_1_id: directory.id_for(&away[0]),
            away_player_2_id: if doubles { directory.id_for(&away[1]) } else { None },
            home_set_1: parse_games(&self.home_set_1),
            away_set_1: parse_games(&self.away_set_1),
            home_set_2: parse_games(&self.home_set_2),
            away_set_2: parse_games(&self.away_set_2),
            home_set_3,
            away_set_3,
            home_won: Some(winner == Winner::Home),
            notes: Some(self.notes.trim().to_string()),
            submitted_by: Some(submitted_by.to_string()),
            submitted_at: Some(submitted_at),
        }
    }

    /// Applies a voice/AI parse result on top of this form.
    ///
    /// The merged scores go through the same set checks as a typed
    /// submission; an invalid parse leaves the form untouched.
    pub fn merge_parsed(&self, parsed: &ParsedScore, rules: &ScoringRules) -> Result<ScoreForm> {
        let line_number = parsed
            .line_number
            .as_ref()
            .and_then(games_from_json)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(self.line_number);
        let match_type = parsed
            .match_type
            .as_deref()
            .and_then(MatchType::parse)
            .unwrap_or(self.match_type);

        let mut unparseable = false;
        let mut field = |value: &Option<serde_json::Value>| -> String {
            match value {
                None | Some(serde_json::Value::Null) => String::new(),
                Some(raw) => match games_from_json(raw) {
                    Some(games) => games.to_string(),
                    None => {
                        unparseable = true;
                        String::new()
                    }
                },
            }
        };

        let mut next = ScoreForm {
            line_number,
            match_type,
            home_set_1: field(&parsed.home_set_1),
            away_set_1: field(&parsed.away_set_1),
            home_set_2: field(&parsed.home_set_2),
            away_set_2: field(&parsed.away_set_2),
            home_set_3: field(&parsed.home_set_3),
            away_set_3: field(&parsed.away_set_3),
            ..self.clone()
        };

        if let Some(notes) = parsed.notes.as_deref().map(str::trim) {
            if !notes.is_empty() {
                next.notes = notes.to_string();
            }
        }

        if unparseable || !next.score_errors(rules).is_empty() {
            tracing::debug!("Rejected voice parse result: {:?}", parsed);
            return Err(ScoreError::validation(
                "voice_input",
                "AI parsed an invalid score. Please correct the values and try again.",
            ));
        }

        if match_type != self.match_type || line_number != self.line_number {
            next.home_players = Default::default();
            next.away_players = Default::default();
        }

        Ok(next)
    }
}
