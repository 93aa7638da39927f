//! 解析結果ファイル
//!
//! カタログのスナップショットのみ保存する。
//! フィルタと表示件数は保存せず、読み込むたびにデフォルトから始める。

use crate::error::{MoodboardError, Result};
use moodboard_common::{Moodcheck, ResultsSession, Session};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSession {
    /// 保存日時（RFC3339）
    pub saved_at: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(flatten)]
    pub result: Moodcheck,
}

impl SavedSession {
    pub fn from_results(results: &ResultsSession) -> Self {
        Self {
            saved_at: chrono::Utc::now().to_rfc3339(),
            prompt: results.prompt().to_string(),
            result: results.snapshot(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MoodboardError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let saved: SavedSession = serde_json::from_str(&content)?;
        Ok(saved)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// 新しいセッションとして読み込む
    pub fn into_session(self) -> Session {
        let mut session = Session::default();
        session.load(self.prompt, self.result);
        session
    }
}
