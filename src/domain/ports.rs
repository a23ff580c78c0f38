use crate::domain::model::{AuditEntry, ScoreRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence of line results, their audit trail and the per-match
/// dispute flag.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn find_line(&self, match_id: &str, line_number: u32) -> Result<Option<ScoreRecord>>;
    /// Writes the line and its audit entry together: both land or neither
    /// does. `previous_state: None` inserts and fails if the line already
    /// exists; `Some` replaces an existing line and fails if it is missing.
    async fn save_line(&self, record: ScoreRecord, audit: AuditEntry) -> Result<ScoreRecord>;
    async fn line_results(&self, match_id: &str) -> Result<Vec<ScoreRecord>>;
    async fn is_disputed(&self, match_id: &str) -> Result<bool>;
    async fn resolve_dispute(&self, match_id: &str) -> Result<()>;
}

pub trait RulesProvider: Send + Sync {
    fn standard_set_min_win(&self) -> i64;
    fn match_tiebreak_target(&self) -> i64;
    fn max_notes_length(&self) -> usize;
    fn lines_per_match(&self) -> u32;
}
