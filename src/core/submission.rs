use crate::core::form::{PlayerDirectory, ScoreForm};
use crate::core::idempotency::is_submission_unchanged;
use crate::core::rules::ScoringRules;
use crate::domain::model::{AuditEntry, ScoreRecord, Winner};
use crate::domain::ports::ScoreStore;
use crate::utils::error::{Result, ScoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionAction {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub action: SubmissionAction,
    pub winner: Winner,
    pub record: ScoreRecord,
    pub dispute_resolved: bool,
}

impl SubmissionOutcome {
    pub fn message(&self) -> &'static str {
        match (self.action, self.dispute_resolved) {
            (SubmissionAction::Inserted, _) => "Scores submitted successfully!",
            (SubmissionAction::Updated, true) => {
                "Scores updated successfully! Any dispute has been resolved."
            }
            (SubmissionAction::Updated, false) => "Scores updated successfully!",
        }
    }
}

pub struct ScoreSubmissionService<S: ScoreStore> {
    store: S,
    rules: ScoringRules,
}

impl<S: ScoreStore> ScoreSubmissionService<S> {
    pub fn new(store: S, rules: ScoringRules) -> Self {
        Self { store, rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates the form and derives the winner without touching the store.
    pub fn preview(&self, form: &ScoreForm) -> Result<Winner> {
        form.validate(&self.rules)?;

        let winner = form.winner(&self.rules);
        if !winner.is_determined() {
            return Err(ScoreError::UndeterminedWinner);
        }
        Ok(winner)
    }

    pub async fn submit(
        &self,
        form: &ScoreForm,
        directory: &PlayerDirectory,
        submitted_by: &str,
    ) -> Result<SubmissionOutcome> {
        tracing::info!(
            "📝 Submitting match {} line {} ({:?})",
            form.match_id,
            form.line_number,
            form.match_type
        );

        let winner = self.preview(form)?;
        tracing::debug!("Winner determined: {}", winner);

        let record = form.to_record(directory, submitted_by, winner, Utc::now());
        let existing = self
            .store
            .find_line(&record.match_id, record.line_number)
            .await?;

        if is_submission_unchanged(existing.as_ref(), &record) {
            tracing::warn!(
                "No changes for match {} line {}, skipping write",
                record.match_id,
                record.line_number
            );
            return Err(ScoreError::NoChanges {
                match_id: record.match_id,
                line_number: record.line_number,
            });
        }

        let action = if existing.is_some() {
            SubmissionAction::Updated
        } else {
            SubmissionAction::Inserted
        };
        let audit = AuditEntry {
            previous_state: existing.as_ref().map(ScoreRecord::snapshot),
            new_state: record.snapshot(),
            recorded_at: Utc::now(),
        };
        let saved = self.store.save_line(record, audit).await?;

        let dispute_resolved = if self.store.is_disputed(&saved.match_id).await? {
            self.store.resolve_dispute(&saved.match_id).await?;
            tracing::info!("⚖️ Dispute on match {} resolved", saved.match_id);
            true
        } else {
            false
        };

        tracing::info!(
            "✅ Line {} of match {} {:?}, winner: {}",
            saved.line_number,
            saved.match_id,
            action,
            winner
        );

        Ok(SubmissionOutcome {
            action,
            winner,
            record: saved,
            dispute_resolved,
        })
    }

    /// Lines recorded so far and lines still missing for a match.
    pub async fn progress(&self, match_id: &str) -> Result<(usize, usize)> {
        let recorded = self.store.line_results(match_id).await?.len();
        let total = self.rules.lines_per_match as usize;
        Ok((recorded, total.saturating_sub(recorded)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MatchType;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        lines: Mutex<Vec<ScoreRecord>>,
        audit: Mutex<Vec<AuditEntry>>,
        disputed: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ScoreStore for MemoryStore {
        async fn find_line(&self, match_id: &str, line_number: u32) -> Result<Option<ScoreRecord>> {
            let lines = self.lines.lock().unwrap();
            Ok(lines
                .iter()
                .find(|r| r.is_same_line(match_id, line_number))
                .cloned())
        }

        async fn save_line(&self, record: ScoreRecord, audit: AuditEntry) -> Result<ScoreRecord> {
            let mut lines = self.lines.lock().unwrap();
            match lines
                .iter_mut()
                .find(|line| line.is_same_line(&record.match_id, record.line_number))
            {
                Some(line) => *line = record.clone(),
                None => lines.push(record.clone()),
            }
            self.audit.lock().unwrap().push(audit);
            Ok(record)
        }

        async fn line_results(&self, match_id: &str) -> Result<Vec<ScoreRecord>> {
            let lines = self.lines.lock().unwrap();
            Ok(lines.iter().filter(|r| r.match_id == match_id).cloned().collect())
        }

        async fn is_disputed(&self, match_id: &str) -> Result<bool> {
            Ok(self.disputed.lock().unwrap().iter().any(|m| m == match_id))
        }

        async fn resolve_dispute(&self, match_id: &str) -> Result<()> {
            self.disputed.lock().unwrap().retain(|m| m != match_id);
            Ok(())
        }
    }

    fn singles_form() -> ScoreForm {
        ScoreForm {
            match_id: "m-1".to_string(),
            line_number: 1,
            match_type: MatchType::Singles,
            home_players: ["Home One".to_string(), String::new()],
            away_players: ["Away One".to_string(), String::new()],
            home_set_1: "6".to_string(),
            away_set_1: "2".to_string(),
            home_set_2: "6".to_string(),
            away_set_2: "3".to_string(),
            ..ScoreForm::default()
        }
    }

    fn directory() -> PlayerDirectory {
        [("Home One", "h1"), ("Away One", "a1")].into_iter().collect()
    }

    #[test]
    fn test_insert_then_unchanged_resubmission() {
        let service = ScoreSubmissionService::new(MemoryStore::default(), ScoringRules::default());

        tokio_test::block_on(async {
            let outcome = service
                .submit(&singles_form(), &directory(), "captain")
                .await
                .unwrap();
            assert_eq!(outcome.action, SubmissionAction::Inserted);
            assert_eq!(outcome.winner, Winner::Home);
            assert_eq!(outcome.message(), "Scores submitted successfully!");

            let again = service.submit(&singles_form(), &directory(), "captain").await;
            assert!(matches!(again, Err(ScoreError::NoChanges { line_number: 1, .. })));
            assert_eq!(service.store().audit.lock().unwrap().len(), 1);
            assert_eq!(service.progress("m-1").await.unwrap(), (1, 2));
        });
    }

    #[test]
    fn test_update_resolves_dispute() {
        let service = ScoreSubmissionService::new(MemoryStore::default(), ScoringRules::default());

        tokio_test::block_on(async {
            let first = service
                .submit(&singles_form(), &directory(), "captain")
                .await
                .unwrap();
            assert!(!first.dispute_resolved);
            service.store().disputed.lock().unwrap().push("m-1".to_string());

            let mut corrected = singles_form();
            corrected.away_set_2 = "4".to_string();
            let outcome = service
                .submit(&corrected, &directory(), "captain")
                .await
                .unwrap();
            assert_eq!(outcome.action, SubmissionAction::Updated);
            assert!(outcome.dispute_resolved);
            assert!(!service.store().is_disputed("m-1").await.unwrap());
            assert_eq!(
                outcome.message(),
                "Scores updated successfully! Any dispute has been resolved."
            );

            let audit = service.store().audit.lock().unwrap();
            assert_eq!(audit.len(), 2);
            assert!(audit[0].previous_state.is_none());
            assert_eq!(audit[1].previous_state.as_ref().unwrap().away_set_2, Some(3));
            assert_eq!(audit[1].new_state.away_set_2, Some(4));
        });
    }

    #[test]
    fn test_undetermined_winner_is_rejected() {
        let service = ScoreSubmissionService::new(MemoryStore::default(), ScoringRules::default());
        let mut form = singles_form();
        form.home_set_2 = "4".to_string();
        form.away_set_2 = "6".to_string();

        assert!(matches!(service.preview(&form), Err(ScoreError::UndeterminedWinner)));
        form.home_set_3 = "0".to_string();
        form.away_set_3 = "0".to_string();
        assert!(matches!(service.preview(&form), Err(ScoreError::UndeterminedWinner)));
    }
}
