use crate::domain::model::{MatchTiebreakScore, SetScore, Side, Winner};
use crate::domain::ports::RulesProvider;
use serde::{Deserialize, Serialize};

pub const STANDARD_SET_MIN_WIN: i64 = 6;
/// League plays a match tiebreak to 7, win by 2, in place of a third set.
pub const MATCH_TIEBREAK_TARGET: i64 = 7;
pub const MAX_NOTES_LENGTH: usize = 500;
pub const LINES_PER_MATCH: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub standard_set_min_win: i64,
    pub match_tiebreak_target: i64,
    pub max_notes_length: usize,
    pub lines_per_match: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            standard_set_min_win: STANDARD_SET_MIN_WIN,
            match_tiebreak_target: MATCH_TIEBREAK_TARGET,
            max_notes_length: MAX_NOTES_LENGTH,
            lines_per_match: LINES_PER_MATCH,
        }
    }
}

/// Splits a score into (winner, loser) after the checks every scoring
/// predicate shares: non-negative and not tied.
fn decided_pair(home: i64, away: i64) -> Option<(i64, i64)> {
    if home < 0 || away < 0 || home == away {
        return None;
    }
    Some((home.max(away), home.min(away)))
}

fn side_winner(side: Side) -> Winner {
    match side {
        Side::Home => Winner::Home,
        Side::Away => Winner::Away,
    }
}

fn leading_side(home: i64, away: i64) -> Side {
    if home > away {
        Side::Home
    } else {
        Side::Away
    }
}

impl ScoringRules {
    pub fn from_provider<P: RulesProvider + ?Sized>(provider: &P) -> Self {
        Self {
            standard_set_min_win: provider.standard_set_min_win(),
            match_tiebreak_target: provider.match_tiebreak_target(),
            max_notes_length: provider.max_notes_length(),
            lines_per_match: provider.lines_per_match(),
        }
    }

    /// A standard set ends at 6-0 through 6-4, 7-5 or 7-6. There is no
    /// win-by-2 continuation past 7.
    pub fn is_standard_set_valid(&self, home: i64, away: i64) -> bool {
        let Some((winner, loser)) = decided_pair(home, away) else {
            return false;
        };
        let min_win = self.standard_set_min_win;

        if winner < min_win {
            return false;
        }
        if winner == min_win {
            return loser <= min_win.saturating_sub(2);
        }
        if winner == min_win.saturating_add(1) {
            return loser == min_win.saturating_sub(1) || loser == min_win;
        }

        false
    }

    /// A match tiebreak ends the instant the leader reaches the target with
    /// a 2 point margin; past the target the margin must be exactly 2.
    pub fn is_match_tiebreak_valid(&self, home: i64, away: i64) -> bool {
        if home == 0 && away == 0 {
            return true;
        }
        let Some((winner, loser)) = decided_pair(home, away) else {
            return false;
        };
        let target = self.match_tiebreak_target;

        if winner < target {
            return false;
        }
        if winner == target {
            return winner - loser >= 2;
        }
        winner - loser == 2
    }

    pub fn standard_set_winner(&self, set: SetScore) -> Option<Side> {
        self.is_standard_set_valid(set.home, set.away)
            .then(|| leading_side(set.home, set.away))
    }

    /// `None` for the not-played sentinel as well as for invalid scores.
    pub fn match_tiebreak_winner(&self, tiebreak: MatchTiebreakScore) -> Option<Side> {
        if tiebreak.is_not_played() {
            return None;
        }
        self.is_match_tiebreak_valid(tiebreak.home, tiebreak.away)
            .then(|| leading_side(tiebreak.home, tiebreak.away))
    }

    /// Determines the match winner from two standard sets and an optional
    /// third entry scored as a match tiebreak.
    ///
    /// Any invalid set makes the result `Undetermined`. The third set is only
    /// consulted on a 1–1 split of the first two.
    pub fn determine_winner(&self, sets: &[SetScore]) -> Winner {
        if sets.len() < 2 || sets.len() > 3 {
            return Winner::Undetermined;
        }

        let (Some(first), Some(second)) = (
            self.standard_set_winner(sets[0]),
            self.standard_set_winner(sets[1]),
        ) else {
            return Winner::Undetermined;
        };

        let third = sets.get(2).map(|set| MatchTiebreakScore::from(*set));
        if let Some(tiebreak) = third {
            if !self.is_match_tiebreak_valid(tiebreak.home, tiebreak.away) {
                return Winner::Undetermined;
            }
        }

        if first == second {
            return side_winner(first);
        }

        third
            .and_then(|tiebreak| self.match_tiebreak_winner(tiebreak))
            .map(side_winner)
            .unwrap_or(Winner::Undetermined)
    }
}

pub fn validate_standard_set(home: i64, away: i64) -> bool {
    ScoringRules::default().is_standard_set_valid(home, away)
}

pub fn validate_match_tiebreak(home: i64, away: i64) -> bool {
    ScoringRules::default().is_match_tiebreak_valid(home, away)
}

pub fn determine_winner(sets: &[SetScore]) -> Winner {
    ScoringRules::default().determine_winner(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(scores: &[(i64, i64)]) -> Vec<SetScore> {
        scores.iter().map(|&(h, a)| SetScore::new(h, a)).collect()
    }

    #[test]
    fn test_six_game_sets() {
        for loser in 0..=4 {
            assert!(validate_standard_set(6, loser), "6-{} should be valid", loser);
            assert!(validate_standard_set(loser, 6), "{}-6 should be valid", loser);
        }
        assert!(!validate_standard_set(6, 5));
        assert!(!validate_standard_set(5, 6));
        assert!(!validate_standard_set(6, 6));
    }

    #[test]
    fn test_seven_game_sets() {
        assert!(validate_standard_set(7, 5));
        assert!(validate_standard_set(7, 6));
        assert!(validate_standard_set(6, 7));
        for loser in 0..=4 {
            assert!(!validate_standard_set(7, loser), "7-{} should be invalid", loser);
        }
        assert!(!validate_standard_set(7, 7));
    }

    #[test]
    fn test_standard_set_rejects_out_of_range() {
        assert!(!validate_standard_set(5, 3));
        assert!(!validate_standard_set(8, 6));
        assert!(!validate_standard_set(9, 7));
        assert!(!validate_standard_set(-1, 6));
        assert!(!validate_standard_set(6, -2));
        assert!(!validate_standard_set(0, 0));
    }

    #[test]
    fn test_match_tiebreak() {
        assert!(validate_match_tiebreak(0, 0));
        assert!(validate_match_tiebreak(7, 5));
        assert!(validate_match_tiebreak(7, 0));
        assert!(validate_match_tiebreak(5, 7));
        assert!(validate_match_tiebreak(9, 7));
        assert!(validate_match_tiebreak(12, 10));

        assert!(!validate_match_tiebreak(7, 6));
        assert!(!validate_match_tiebreak(10, 7));
        assert!(!validate_match_tiebreak(6, 4));
        assert!(!validate_match_tiebreak(8, 8));
        assert!(!validate_match_tiebreak(-7, 0));
        assert!(!validate_match_tiebreak(7, -1));
    }

    #[test]
    fn test_determine_winner() {
        assert_eq!(determine_winner(&sets(&[(6, 2), (4, 6), (7, 5)])), Winner::Home);
        assert_eq!(determine_winner(&sets(&[(6, 2), (6, 3)])), Winner::Home);
        assert_eq!(determine_winner(&sets(&[(3, 6), (5, 7)])), Winner::Away);
        assert_eq!(determine_winner(&sets(&[(2, 6), (6, 4), (8, 10)])), Winner::Away);
    }

    #[test]
    fn test_split_sets_without_tiebreak_is_undetermined() {
        assert_eq!(
            determine_winner(&sets(&[(6, 7), (6, 2), (0, 0)])),
            Winner::Undetermined
        );
        assert_eq!(determine_winner(&sets(&[(6, 7), (6, 2)])), Winner::Undetermined);
        assert_eq!(
            determine_winner(&sets(&[(6, 7), (6, 2), (10, 7)])),
            Winner::Undetermined
        );
    }

    #[test]
    fn test_third_set_ignored_once_decided() {
        assert_eq!(determine_winner(&sets(&[(6, 1), (6, 1), (3, 7)])), Winner::Home);
        assert_eq!(determine_winner(&sets(&[(6, 1), (6, 1), (0, 0)])), Winner::Home);
    }

    #[test]
    fn test_invalid_set_never_decides_match() {
        assert_eq!(determine_winner(&sets(&[(6, 2), (9, 0)])), Winner::Undetermined);
        assert_eq!(
            determine_winner(&sets(&[(6, 2), (9, 0), (3, 7)])),
            Winner::Undetermined
        );
        assert_eq!(
            determine_winner(&sets(&[(5, 7), (6, 5), (7, 3)])),
            Winner::Undetermined
        );
        assert_eq!(
            determine_winner(&sets(&[(6, 1), (6, 1), (10, 7)])),
            Winner::Undetermined
        );
    }

    #[test]
    fn test_extreme_rules_do_not_overflow() {
        let rules = ScoringRules {
            standard_set_min_win: i64::MAX,
            ..ScoringRules::default()
        };
        assert!(!rules.is_standard_set_valid(6, 4));
        assert!(rules.is_standard_set_valid(i64::MAX, 0));
    }

    #[test]
    fn test_malformed_set_lists() {
        assert_eq!(determine_winner(&[]), Winner::Undetermined);
        assert_eq!(determine_winner(&sets(&[(6, 0)])), Winner::Undetermined);
        assert_eq!(
            determine_winner(&sets(&[(6, 0), (6, 0), (7, 0), (7, 0)])),
            Winner::Undetermined
        );
        assert_eq!(determine_winner(&sets(&[(0, 0), (0, 0)])), Winner::Undetermined);
    }

    #[test]
    fn test_custom_rules() {
        let rules = ScoringRules {
            standard_set_min_win: 4,
            match_tiebreak_target: 10,
            ..ScoringRules::default()
        };
        assert!(rules.is_standard_set_valid(4, 2));
        assert!(rules.is_standard_set_valid(5, 3));
        assert!(!rules.is_standard_set_valid(6, 4));
        assert!(rules.is_match_tiebreak_valid(10, 8));
        assert!(!rules.is_match_tiebreak_valid(9, 7));
    }

    #[test]
    fn test_predicates_are_pure() {
        let rules = ScoringRules::default();
        for home in -1..=12 {
            for away in -1..=12 {
                let first = rules.is_standard_set_valid(home, away);
                let second = rules.is_standard_set_valid(home, away);
                assert_eq!(first, second);
                assert_eq!(
                    rules.is_match_tiebreak_valid(home, away),
                    rules.is_match_tiebreak_valid(home, away)
                );
            }
        }
    }
}
