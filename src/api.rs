//! バックエンドAPI連携
//!
//! - POST /api/moodcheck: 画像・プロンプトからバイブと商品を取得
//! - POST /api/more-products: 既存商品を除外して追加取得
//!
//! リトライはしない。タイムアウトは設定時のみ。
//! 同時に1リクエストのみ（呼び出し側でawaitする）。

use crate::config::Config;
use crate::error::Result;
use moodboard_common::{
    parse_moodcheck_response, parse_more_products_response, Moodcheck, MoodcheckRequest,
    MoreProductsRequest, Product,
};
use serde::Serialize;
use std::time::Duration;

pub const MOODCHECK_PATH: &str = "/api/moodcheck";
pub const MORE_PRODUCTS_PATH: &str = "/api/more-products";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `timeout` が None のときは応答まで待ち続ける
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.timeout_seconds.map(Duration::from_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// JSONをPOSTして (2xxか, ボディ) を返す
    async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<(bool, String)> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(%url, status = status.as_u16(), bytes = text.len(), "response");
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "request failed");
        }

        Ok((status.is_success(), text))
    }

    /// バイブ解析
    pub async fn moodcheck(&self, request: &MoodcheckRequest) -> Result<Moodcheck> {
        let (ok, body) = self.post_json(MOODCHECK_PATH, request).await?;
        Ok(parse_moodcheck_response(ok, &body)?)
    }

    /// 追加の商品を取得
    pub async fn more_products(&self, request: &MoreProductsRequest) -> Result<Vec<Product>> {
        let (ok, body) = self.post_json(MORE_PRODUCTS_PATH, request).await?;
        Ok(parse_more_products_response(ok, &body)?)
    }
}
