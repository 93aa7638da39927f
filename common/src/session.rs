//! 結果セッション
//!
//! 状態遷移:
//! - Idle → Loaded: 解析成功（フィルタはデフォルト、表示20件）
//! - Loaded → Loaded: フィルタ変更 / もっと見る（通信なし）
//! - Loaded → Loaded: 再検索成功（カタログ置換、フィルタと表示件数をリセット）
//! - Loaded → Loaded（変更なし）: 再検索失敗
//! - Loaded → Idle: やり直し
//!
//! 再検索中は `&mut` 借用がセッションを占有するため、
//! 途中状態が他から見えることはない。

use crate::error::{Error, Result};
use crate::filter::{self, filter_products, FilterState};
use crate::pagination::PaginationWindow;
use crate::refinement::RefinementTarget;
use crate::types::{Moodcheck, MoodcheckRequest, MoreProductsRequest, Product, Trend, Vibe};
use std::future::Future;

/// 解析結果が読み込まれたセッション
#[derive(Debug, Clone)]
pub struct ResultsSession {
    prompt: String,
    vibe: Vibe,
    trend: Option<Trend>,
    detected_item_type: Option<String>,
    catalog: Vec<Product>,
    filters: FilterState,
    window: PaginationWindow,
    /// catalog と filters から計算した最新の結果
    filtered: Vec<Product>,
}

impl ResultsSession {
    pub fn new(prompt: impl Into<String>, result: Moodcheck) -> Self {
        let filters = FilterState::default();
        let filtered = filter_products(&result.products, &filters);
        Self {
            prompt: prompt.into(),
            vibe: result.vibe,
            trend: result.trend,
            detected_item_type: result.detected_item_type,
            catalog: result.products,
            filters,
            window: PaginationWindow::default(),
            filtered,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn vibe(&self) -> &Vibe {
        &self.vibe
    }

    pub fn trend(&self) -> Option<&Trend> {
        self.trend.as_ref()
    }

    pub fn detected_item_type(&self) -> Option<&str> {
        self.detected_item_type.as_deref()
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn window(&self) -> PaginationWindow {
        self.window
    }

    /// フィルタ後の全件
    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    /// 表示中の商品
    pub fn visible(&self) -> &[Product] {
        self.window.visible(&self.filtered)
    }

    pub fn has_more(&self) -> bool {
        self.window.has_more(&self.filtered)
    }

    /// もっと見る
    pub fn load_more(&mut self) {
        self.window.advance();
        tracing::debug!(displayed = self.window.displayed_count(), "load more");
    }

    /// pages ページ分まで表示を広げる（狭めはしない）
    pub fn show_pages(&mut self, pages: usize) {
        let target = PaginationWindow::with_pages(pages);
        if target.displayed_count() > self.window.displayed_count() {
            self.window = target;
        }
    }

    fn recompute(&mut self) {
        self.filtered = filter_products(&self.catalog, &self.filters);
        tracing::debug!(
            total = self.catalog.len(),
            matched = self.filtered.len(),
            active = self.filters.active_filter_count(),
            "filters applied"
        );
    }

    /// フィルタを変更して再計算
    pub fn update_filters<F, T>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut FilterState) -> T,
    {
        let out = f(&mut self.filters);
        self.recompute();
        out
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.update_filters(|current| *current = filters);
    }

    pub fn clear_filters(&mut self) {
        self.update_filters(FilterState::clear);
    }

    pub fn categories(&self) -> Vec<String> {
        filter::categories(&self.catalog)
    }

    pub fn brands(&self) -> Vec<String> {
        filter::brands(&self.catalog)
    }

    pub fn retailers(&self) -> Vec<String> {
        filter::retailers(&self.catalog)
    }

    /// 現在のフィルタで再検索できる対象
    pub fn refinement_target(&self) -> Option<RefinementTarget> {
        RefinementTarget::from_filters(&self.filters)
    }

    /// カタログを丸ごと置き換え、フィルタと表示件数をリセット
    pub fn replace_catalog(&mut self, products: Vec<Product>) {
        self.catalog = products;
        self.filters = FilterState::default();
        self.window.reset();
        self.recompute();
    }

    /// 再検索
    ///
    /// `fetch` が成功した場合のみセッションを更新する。
    /// 失敗時はカタログ・フィルタ・表示件数とも変更しない。
    pub async fn refine<F, Fut, E>(&mut self, fetch: F) -> std::result::Result<RefinementTarget, E>
    where
        F: FnOnce(MoodcheckRequest) -> Fut,
        Fut: Future<Output = std::result::Result<Moodcheck, E>>,
        E: From<Error>,
    {
        let target = self.refinement_target().ok_or(Error::NoRefinementTarget)?;
        let request = target.request(&self.vibe);
        tracing::info!(query = %request.prompt, "refining catalog");

        let result = fetch(request).await?;

        tracing::info!(products = result.products.len(), "catalog replaced");
        if result.detected_item_type.is_some() {
            self.detected_item_type = result.detected_item_type;
        }
        self.replace_catalog(result.products);
        Ok(target)
    }

    /// 追加取得のリクエスト（現在のカタログのIDを除外）
    pub fn more_products_request(&self, max_products: usize) -> MoreProductsRequest {
        MoreProductsRequest {
            vibe_profile: self.vibe.clone(),
            exclude_ids: self.catalog.iter().filter_map(|p| p.id.clone()).collect(),
            max_products,
        }
    }

    /// 追加取得した商品を末尾に足す（フィルタと表示件数は維持）
    ///
    /// カタログを置き換えずに変更する唯一の操作。表示件数はリセットしない。
    pub fn append_products(&mut self, products: Vec<Product>) {
        tracing::info!(added = products.len(), "products appended");
        self.catalog.extend(products);
        self.recompute();
    }

    /// 保存用のスナップショット
    pub fn snapshot(&self) -> Moodcheck {
        Moodcheck {
            vibe: self.vibe.clone(),
            trend: self.trend.clone(),
            products: self.catalog.clone(),
            detected_item_type: self.detected_item_type.clone(),
        }
    }
}

/// セッション
#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Idle,
    Loaded(ResultsSession),
}

impl Session {
    /// 新しい解析結果を読み込む（フィルタ・表示件数は新規）
    pub fn load(&mut self, prompt: impl Into<String>, result: Moodcheck) {
        tracing::info!(products = result.products.len(), vibe = %result.vibe.name, "session loaded");
        *self = Session::Loaded(ResultsSession::new(prompt, result));
    }

    /// やり直し
    pub fn start_over(&mut self) {
        *self = Session::Idle;
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Session::Loaded(_))
    }

    pub fn results(&self) -> Option<&ResultsSession> {
        match self {
            Session::Loaded(results) => Some(results),
            Session::Idle => None,
        }
    }

    pub fn results_mut(&mut self) -> Result<&mut ResultsSession> {
        match self {
            Session::Loaded(results) => Ok(results),
            Session::Idle => Err(Error::NoResults),
        }
    }

    /// 表示中の商品（未読み込みなら空）
    pub fn visible(&self) -> &[Product] {
        self.results().map(ResultsSession::visible).unwrap_or(&[])
    }

    /// 再検索（未読み込みならエラー）
    pub async fn refine<F, Fut, E>(&mut self, fetch: F) -> std::result::Result<RefinementTarget, E>
    where
        F: FnOnce(MoodcheckRequest) -> Fut,
        Fut: Future<Output = std::result::Result<Moodcheck, E>>,
        E: From<Error>,
    {
        self.results_mut()?.refine(fetch).await
    }
}
