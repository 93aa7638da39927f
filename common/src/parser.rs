//! APIレスポンスパーサー
//!
//! HTTPステータスとボディから結果またはエラーメッセージを取り出す。
//! バックエンドのエラーメッセージはそのまま `Error::Remote` に入れる。

use crate::error::{Error, Result};
use crate::types::{Moodcheck, MoodcheckResponse, MoreProductsResponse, Product};
use serde::Deserialize;

/// 解析失敗時の既定メッセージ
pub const MOODCHECK_FALLBACK_ERROR: &str = "Failed to analyze your vibe";

/// 追加取得失敗時の既定メッセージ
pub const MORE_PRODUCTS_FALLBACK_ERROR: &str = "Failed to load more products";

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// 非2xxレスポンスのボディからメッセージを取り出す
///
/// ボディがJSONでない、またはerrorがない場合は既定メッセージ。
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// POST /api/moodcheck のレスポンスをパース
///
/// # Arguments
/// * `status_ok` - HTTPステータスが2xxか
/// * `body` - レスポンスボディ
///
/// # Returns
/// * `Ok(Moodcheck)` - success: true かつ vibe あり
/// * `Err(Error::Remote)` - 非2xx または success: false
/// * `Err(Error::Parse)` - JSON不正、またはvibeなし
pub fn parse_moodcheck_response(status_ok: bool, body: &str) -> Result<Moodcheck> {
    if !status_ok {
        return Err(Error::Remote(error_message(body, MOODCHECK_FALLBACK_ERROR)));
    }

    let response: MoodcheckResponse = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("moodcheck response: {}", e)))?;

    if !response.success {
        return Err(Error::Remote(
            response.error.unwrap_or_else(|| MOODCHECK_FALLBACK_ERROR.to_string()),
        ));
    }

    let vibe = response
        .vibe
        .ok_or_else(|| Error::Parse("moodcheck response has no vibe".into()))?;

    Ok(Moodcheck {
        vibe,
        trend: response.trend,
        products: response.products,
        detected_item_type: response.detected_item_type,
    })
}

/// POST /api/more-products のレスポンスをパース
pub fn parse_more_products_response(status_ok: bool, body: &str) -> Result<Vec<Product>> {
    if !status_ok {
        return Err(Error::Remote(error_message(body, MORE_PRODUCTS_FALLBACK_ERROR)));
    }

    let response: MoreProductsResponse = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("more-products response: {}", e)))?;

    if !response.success {
        return Err(Error::Remote(
            response.error.unwrap_or_else(|| MORE_PRODUCTS_FALLBACK_ERROR.to_string()),
        ));
    }

    Ok(response.products)
}
