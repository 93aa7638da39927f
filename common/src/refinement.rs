//! 絞り込み再検索
//!
//! カテゴリまたは販売店が1つだけ選択されているとき、
//! その値でバックエンドに再問い合わせするためのリクエストを組み立てる。

use crate::filter::FilterState;
use crate::types::{MoodcheckRequest, Vibe};

/// 再検索で要求する商品数
pub const REFINE_MAX_PRODUCTS: usize = 30;

/// 再検索の対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefinementTarget {
    Category(String),
    Retailer(String),
}

/// 集合の要素がちょうど1つならそれを返す
fn single(set: &std::collections::BTreeSet<String>) -> Option<&String> {
    if set.len() == 1 {
        set.iter().next()
    } else {
        None
    }
}

impl RefinementTarget {
    /// フィルタ状態から対象を判定（カテゴリ優先）
    pub fn from_filters(filters: &FilterState) -> Option<Self> {
        if let Some(category) = single(&filters.categories) {
            return Some(RefinementTarget::Category(category.clone()));
        }
        single(&filters.retailers).map(|retailer| RefinementTarget::Retailer(retailer.clone()))
    }

    /// バイブ名と選択値から検索クエリを生成
    pub fn query(&self, vibe_name: &str) -> String {
        match self {
            RefinementTarget::Category(category) => {
                format!("{} {}", vibe_name, category.to_lowercase())
            }
            RefinementTarget::Retailer(retailer) => format!("{} {}", vibe_name, retailer),
        }
    }

    /// ボタン表示用の文言
    pub fn label(&self) -> String {
        match self {
            RefinementTarget::Category(category) => {
                format!("Load {} {} items", REFINE_MAX_PRODUCTS, category)
            }
            RefinementTarget::Retailer(retailer) => {
                format!("Load {} from {}", REFINE_MAX_PRODUCTS, retailer)
            }
        }
    }

    /// 画像なし・クエリをプロンプトとしたリクエスト
    pub fn request(&self, vibe: &Vibe) -> MoodcheckRequest {
        MoodcheckRequest {
            images: Vec::new(),
            prompt: self.query(&vibe.name),
            max_products: Some(REFINE_MAX_PRODUCTS),
        }
    }
}
