use crate::domain::model::{AuditEntry, ScoreRecord};
use crate::domain::ports::ScoreStore;
use crate::utils::error::{Result, ScoreError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// On-disk layout of the local store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreContents {
    pub line_results: Vec<ScoreRecord>,
    pub audit: Vec<AuditEntry>,
    pub disputed_matches: Vec<String>,
}

/// `ScoreStore` backed by a single pretty-printed JSON file.
#[derive(Debug)]
pub struct LocalScoreStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// 檔案不存在時視為空的 store
    pub async fn load(&self) -> Result<StoreContents> {
        match tokio::fs::read(&self.path).await {
            Ok(data) if data.is_empty() => Ok(StoreContents::default()),
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreContents::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, contents: &StoreContents) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_vec_pretty(contents)?;
        tokio::fs::write(&self.path, data).await?;
        tracing::debug!("Score store written to {}", self.path.display());
        Ok(())
    }

    async fn modify<T, F>(&self, change: F) -> Result<T>
    where
        F: FnOnce(&mut StoreContents) -> Result<T> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut contents = self.load().await?;
        let value = change(&mut contents)?;
        self.save(&contents).await?;
        Ok(value)
    }

    pub async fn flag_dispute(&self, match_id: &str) -> Result<()> {
        let match_id = match_id.to_string();
        self.modify(move |contents| {
            if !contents.disputed_matches.contains(&match_id) {
                contents.disputed_matches.push(match_id);
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ScoreStore for LocalScoreStore {
    async fn find_line(&self, match_id: &str, line_number: u32) -> Result<Option<ScoreRecord>> {
        let contents = self.load().await?;
        Ok(contents
            .line_results
            .into_iter()
            .find(|r| r.is_same_line(match_id, line_number)))
    }

    // 同一次 modify 內寫入，失敗時檔案不變
    async fn save_line(&self, record: ScoreRecord, audit: AuditEntry) -> Result<ScoreRecord> {
        self.modify(move |contents| {
            let slot = contents
                .line_results
                .iter()
                .position(|r| r.is_same_line(&record.match_id, record.line_number));

            match (slot, audit.previous_state.is_some()) {
                (Some(index), true) => contents.line_results[index] = record.clone(),
                (None, false) => contents.line_results.push(record.clone()),
                (Some(_), false) => {
                    return Err(ScoreError::StoreError {
                        message: format!(
                            "line {} of match {} already has a result",
                            record.line_number, record.match_id
                        ),
                    });
                }
                (None, true) => {
                    return Err(ScoreError::StoreError {
                        message: format!(
                            "no result for line {} of match {}",
                            record.line_number, record.match_id
                        ),
                    });
                }
            }

            contents.audit.push(audit);
            Ok(record)
        })
        .await
    }

    async fn line_results(&self, match_id: &str) -> Result<Vec<ScoreRecord>> {
        let contents = self.load().await?;
        let mut lines: Vec<ScoreRecord> = contents
            .line_results
            .into_iter()
            .filter(|r| r.match_id == match_id)
            .collect();
        lines.sort_by_key(|r| r.line_number);
        Ok(lines)
    }

    async fn is_disputed(&self, match_id: &str) -> Result<bool> {
        let contents = self.load().await?;
        Ok(contents.disputed_matches.iter().any(|m| m == match_id))
    }

    async fn resolve_dispute(&self, match_id: &str) -> Result<()> {
        let match_id = match_id.to_string();
        self.modify(move |contents| {
            contents.disputed_matches.retain(|m| *m != match_id);
            Ok(())
        })
        .await
    }
}
