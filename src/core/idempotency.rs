use crate::domain::model::ScoreRecord;

fn trimmed_notes(record: &ScoreRecord) -> &str {
    record.notes.as_deref().unwrap_or("").trim()
}

/// Returns `true` when `proposed` would rewrite `previous` without changing
/// anything a reader of the line result could see.
///
/// Submitter and timestamp are not compared. Missing values compare as
/// `None`, `home_won` compares as a plain boolean and notes compare after
/// trimming.
pub fn is_submission_unchanged(previous: Option<&ScoreRecord>, proposed: &ScoreRecord) -> bool {
    let Some(previous) = previous else {
        return false;
    };

    previous.match_type == proposed.match_type
        && previous.home_player_1_id == proposed.home_player_1_id
        && previous.home_player_2_id == proposed.home_player_2_id
        && previous.away_player_1_id == proposed.away_player_1_id
        && previous.away_player_2_id == proposed.away_player_2_id
        && previous.home_set_1 == proposed.home_set_1
        && previous.home_set_2 == proposed.home_set_2
        && previous.home_set_3 == proposed.home_set_3
        && previous.away_set_1 == proposed.away_set_1
        && previous.away_set_2 == proposed.away_set_2
        && previous.away_set_3 == proposed.away_set_3
        && previous.home_won.unwrap_or(false) == proposed.home_won.unwrap_or(false)
        && trimmed_notes(previous) == trimmed_notes(proposed)
}
