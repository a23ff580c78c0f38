pub mod form;
pub mod idempotency;
pub mod input;
pub mod rules;
pub mod submission;

pub use crate::domain::model::{MatchTiebreakScore, MatchType, ScoreRecord, SetScore, Winner};
pub use crate::domain::ports::{RulesProvider, ScoreStore};
pub use crate::utils::error::Result;
