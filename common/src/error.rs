//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    /// バックエンドが返したエラーメッセージ（そのまま表示する）
    #[error("{0}")]
    Remote(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("No results loaded")]
    NoResults,

    #[error("Refinement needs exactly one selected category or retailer")]
    NoRefinementTarget,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
