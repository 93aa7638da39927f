//! base64 Data URI の生成と検証

use super::MAX_IMAGE_BYTES;
use crate::error::{MoodboardError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;

/// 送信できるMIMEタイプ
pub const SUPPORTED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Data URI を組み立てる
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Data URI を検証し (MIMEタイプ, デコード後のバイト数) を返す
pub fn validate(data_uri: &str) -> Result<(String, usize)> {
    lazy_static::lazy_static! {
        static ref DATA_URI: Regex = Regex::new(r"^data:([^;,]+);base64,(.+)$").unwrap();
    }

    let caps = DATA_URI
        .captures(data_uri)
        .ok_or_else(|| MoodboardError::InvalidInput("base64 Data URIの形式ではありません".into()))?;

    let mime_type = caps[1].to_string();
    if !SUPPORTED_TYPES.contains(&mime_type.as_str()) {
        return Err(MoodboardError::InvalidInput(format!(
            "未対応の形式です: {}（JPEG, PNG, WEBPのみ）",
            mime_type
        )));
    }

    let decoded = STANDARD
        .decode(&caps[2])
        .map_err(|e| MoodboardError::InvalidInput(format!("base64のデコードに失敗: {}", e)))?;

    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(MoodboardError::InvalidInput(format!(
            "画像サイズが上限（{}MB）を超えています",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }

    Ok((mime_type, decoded.len()))
}
