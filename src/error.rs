use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoodboardError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("入力が不正です: {0}")]
    InvalidInput(String),

    #[error("通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("対話入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// 共通ライブラリのエラー（バックエンドのメッセージはそのまま表示）
    #[error("{0}")]
    Common(#[from] moodboard_common::Error),
}

impl MoodboardError {
    /// バックエンドが返した失敗か
    pub fn is_remote(&self) -> bool {
        matches!(self, MoodboardError::Common(moodboard_common::Error::Remote(_)))
    }
}

pub type Result<T> = std::result::Result<T, MoodboardError>;
