//! APIの型定義
//!
//! CLIとライブラリで共有される型:
//! - Product: 商品レコード（取得後は不変）
//! - Vibe / Trend: 解析されたムードとトレンド
//! - MoodcheckRequest / MoreProductsRequest: リクエストボディ
//! - MoodcheckResponse / MoreProductsResponse: レスポンスボディ（ワイヤ形式）

use serde::{Deserialize, Deserializer, Serialize};

/// `null` をデフォルト値として扱う
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_in_stock() -> bool {
    true
}

/// 商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub retailer: Option<String>,

    /// 欠損時はフィルタ上0として扱う（effective_price参照）
    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub original_price: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub on_sale: bool,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub product_url: String,

    /// この商品を見つけた検索クエリ
    #[serde(default)]
    pub match_reason: Option<String>,

    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            brand: String::new(),
            category: None,
            retailer: None,
            price: None,
            original_price: None,
            on_sale: false,
            currency: default_currency(),
            image_url: String::new(),
            product_url: String::new(),
            match_reason: None,
            in_stock: true,
        }
    }
}

impl Product {
    /// フィルタ用の価格（欠損は0）
    pub fn effective_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// 一覧表示用のキー
    ///
    /// product_urlが空の場合は位置インデックスを使う。
    /// URLの重複は許容する（重複除去はしない）。
    pub fn list_key(&self, index: usize) -> String {
        if self.product_url.is_empty() {
            index.to_string()
        } else {
            self.product_url.clone()
        }
    }
}

/// カラーパレットの1色
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSwatch {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hex: String,
}

/// 解析されたムード（バイブ）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vibe {
    pub name: String,
    pub mood: String,
    pub color_palette: Vec<ColorSwatch>,
    pub key_pieces: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_archetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub occasions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    pub search_queries: Vec<String>,
}

/// トレンドの向き
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TrendDirection {
    /// バッジ表示用ラベル（unknownはバッジなし）
    pub fn badge_label(&self) -> Option<&'static str> {
        match self {
            TrendDirection::Rising => Some("Rising"),
            TrendDirection::Falling => Some("Cooling off"),
            TrendDirection::Stable => Some("Steady"),
            TrendDirection::Unknown => None,
        }
    }
}

/// トレンド情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trend {
    pub direction: TrendDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<f64>,
    pub sparkline: Vec<f64>,
}

/// POST /api/moodcheck のリクエスト
#[derive(Debug, Clone, Default, Serialize)]
pub struct MoodcheckRequest {
    /// base64 Data URI
    pub images: Vec<String>,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_products: Option<usize>,
}

/// POST /api/more-products のリクエスト
#[derive(Debug, Clone, Serialize)]
pub struct MoreProductsRequest {
    pub vibe_profile: Vibe,
    pub exclude_ids: Vec<String>,
    pub max_products: usize,
}

/// POST /api/moodcheck のレスポンス（ワイヤ形式）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MoodcheckResponse {
    pub success: bool,
    pub vibe: Option<Vibe>,
    pub trend: Option<Trend>,
    pub products: Vec<Product>,
    pub detected_item_type: Option<String>,
    pub error: Option<String>,
}

/// POST /api/more-products のレスポンス（ワイヤ形式）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MoreProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
    pub error: Option<String>,
}

/// 解析成功時の結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Moodcheck {
    pub vibe: Vibe,
    #[serde(default)]
    pub trend: Option<Trend>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub detected_item_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserialize_backend_shape() {
        let json = r#"{
            "id": "ss_101",
            "name": "Oversized Linen Blazer",
            "brand": "Reformation",
            "price": 128.0,
            "original_price": 160.0,
            "on_sale": true,
            "currency": "USD",
            "image_url": "https://img.example/1.jpg",
            "product_url": "https://shop.example/1",
            "retailer": "Nordstrom",
            "category": "Jackets",
            "match_reason": "linen blazer",
            "in_stock": true
        }"#;

        let product: Product = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(product.id.as_deref(), Some("ss_101"));
        assert_eq!(product.brand, "Reformation");
        assert_eq!(product.category.as_deref(), Some("Jackets"));
        assert!(product.on_sale);
        assert_eq!(product.effective_price(), 128.0);
    }

    #[test]
    fn test_product_deserialize_missing_fields() {
        let json = r#"{"name": "Plain Tee", "price": null, "brand": null}"#;

        let product: Product = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(product.name, "Plain Tee");
        assert_eq!(product.brand, "");
        assert_eq!(product.price, None);
        assert_eq!(product.effective_price(), 0.0);
        assert_eq!(product.currency, "USD");
        assert!(product.in_stock);
        assert!(!product.on_sale);
        assert_eq!(product.category, None);
    }

    #[test]
    fn test_product_list_key_falls_back_to_index() {
        let with_url = Product {
            product_url: "https://shop.example/a".to_string(),
            ..Default::default()
        };
        let without_url = Product::default();

        assert_eq!(with_url.list_key(3), "https://shop.example/a");
        assert_eq!(without_url.list_key(3), "3");
    }

    #[test]
    fn test_trend_direction_unknown_fallback() {
        let trend: Trend = serde_json::from_str(r#"{"direction": "sideways"}"#).expect("デシリアライズ失敗");
        assert_eq!(trend.direction, TrendDirection::Unknown);
        assert_eq!(trend.direction.badge_label(), None);

        let trend: Trend = serde_json::from_str(r#"{"direction": "falling", "change": "-12%"}"#).expect("デシリアライズ失敗");
        assert_eq!(trend.direction.badge_label(), Some("Cooling off"));
        assert_eq!(trend.change.as_deref(), Some("-12%"));
    }

    #[test]
    fn test_moodcheck_request_omits_max_products() {
        let request = MoodcheckRequest {
            images: vec![],
            prompt: "coastal grandmother".to_string(),
            max_products: None,
        };
        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(!json.contains("max_products"));

        let request = MoodcheckRequest {
            max_products: Some(30),
            ..request
        };
        let json = serde_json::to_string(&request).expect("シリアライズ失敗");
        assert!(json.contains("\"max_products\":30"));
    }

    #[test]
    fn test_vibe_deserialize_partial() {
        let json = r##"{
            "name": "Quiet Luxury",
            "mood": "understated and refined",
            "color_palette": [{"name": "camel", "hex": "#C19A6B"}],
            "key_pieces": ["cashmere sweater", "tailored trousers"]
        }"##;

        let vibe: Vibe = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(vibe.name, "Quiet Luxury");
        assert_eq!(vibe.color_palette[0].hex, "#C19A6B");
        assert_eq!(vibe.key_pieces.len(), 2);
        assert!(vibe.occasions.is_empty());
        assert_eq!(vibe.confidence, None);
    }
}
