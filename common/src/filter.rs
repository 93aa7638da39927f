//! 商品フィルタ
//!
//! - PRICE_RANGES: 価格帯の固定テーブル
//! - FilterState: 有効なフィルタ条件
//! - filter_products: 条件の論理積（各次元内の複数選択は論理和）
//! - categories / brands / retailers: 商品一覧から選択肢を導出

use crate::classifier::{find_item_type, matches_any_item_type};
use crate::error::{Error, Result};
use crate::types::Product;
use std::collections::BTreeSet;

/// 価格帯 [min, max)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

pub const ALL_PRICES: &str = "All Prices";

/// 価格帯テーブル（先頭がデフォルト）
pub const PRICE_RANGES: [PriceRange; 6] = [
    PriceRange { label: ALL_PRICES, min: 0.0, max: f64::INFINITY },
    PriceRange { label: "Under $25", min: 0.0, max: 25.0 },
    PriceRange { label: "$25 - $50", min: 25.0, max: 50.0 },
    PriceRange { label: "$50 - $100", min: 50.0, max: 100.0 },
    PriceRange { label: "$100 - $200", min: 100.0, max: 200.0 },
    PriceRange { label: "$200+", min: 200.0, max: f64::INFINITY },
];

impl PriceRange {
    /// 価格が範囲内か（上限は含まない）
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price < self.max
    }

    pub fn is_all(&self) -> bool {
        self.label == ALL_PRICES
    }

    /// ラベルから検索
    pub fn from_label(label: &str) -> Option<Self> {
        PRICE_RANGES.iter().find(|r| r.label == label).copied()
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PRICE_RANGES[0]
    }
}

impl std::str::FromStr for PriceRange {
    type Err = Error;

    /// ラベルそのもの、または短縮形（all, under-25, 25-50, 50-100, 100-200, 200+）
    fn from_str(s: &str) -> Result<Self> {
        if let Some(range) = Self::from_label(s) {
            return Ok(range);
        }

        let index = match s.trim().to_lowercase().as_str() {
            "all" | "any" => 0,
            "under-25" | "under25" | "<25" | "0-25" => 1,
            "25-50" => 2,
            "50-100" => 3,
            "100-200" => 4,
            "200+" | "over-200" | "200-" => 5,
            _ => {
                return Err(Error::Config(format!(
                    "unknown price range: {}. Use all, under-25, 25-50, 50-100, 100-200 or 200+",
                    s
                )))
            }
        };
        Ok(PRICE_RANGES[index])
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// フィルタ条件
///
/// デフォルトは恒等変換（入力をそのまま返す）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub price_range: PriceRange,
    pub item_types: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub brands: BTreeSet<String>,
    pub retailers: BTreeSet<String>,
    pub on_sale_only: bool,
}

/// 集合内にあれば削除、なければ追加
fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// 次元が無効（空集合）か、値が集合に含まれるか
fn passes_exact(selected: &BTreeSet<String>, value: Option<&str>) -> bool {
    if selected.is_empty() {
        return true;
    }
    value.is_some_and(|v| selected.contains(v))
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// 有効な次元の数 (0..=6)
    pub fn active_filter_count(&self) -> usize {
        [
            !self.price_range.is_all(),
            !self.item_types.is_empty(),
            !self.categories.is_empty(),
            !self.brands.is_empty(),
            !self.retailers.is_empty(),
            self.on_sale_only,
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    /// 価格帯をラベル（または短縮形）で設定
    pub fn set_price_range(&mut self, label: &str) -> Result<()> {
        self.price_range = label.parse()?;
        Ok(())
    }

    /// アイテム種別を切り替え（未知のラベルはエラー）
    pub fn toggle_item_type(&mut self, label: &str) -> Result<()> {
        if find_item_type(label).is_none() {
            return Err(Error::Config(format!("unknown item type: {}", label)));
        }
        toggle(&mut self.item_types, label);
        Ok(())
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.categories, category);
    }

    pub fn toggle_brand(&mut self, brand: &str) {
        toggle(&mut self.brands, brand);
    }

    pub fn toggle_retailer(&mut self, retailer: &str) {
        toggle(&mut self.retailers, retailer);
    }

    pub fn toggle_on_sale(&mut self) {
        self.on_sale_only = !self.on_sale_only;
    }

    /// すべての条件を解除
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 商品が全ての有効な次元を通過するか
    pub fn matches(&self, product: &Product) -> bool {
        if !self.item_types.is_empty() && !matches_any_item_type(&product.name, &self.item_types) {
            return false;
        }

        if !self.price_range.is_all() && !self.price_range.contains(product.effective_price()) {
            return false;
        }

        if !passes_exact(&self.categories, product.category.as_deref()) {
            return false;
        }

        if !passes_exact(&self.brands, Some(product.brand.as_str())) {
            return false;
        }

        if !passes_exact(&self.retailers, product.retailer.as_deref()) {
            return false;
        }

        !self.on_sale_only || product.on_sale
    }
}

/// 商品一覧をフィルタ（順序は維持）
pub fn filter_products(products: &[Product], filters: &FilterState) -> Vec<Product> {
    products
        .iter()
        .filter(|product| filters.matches(product))
        .cloned()
        .collect()
}

/// 空でない値をソート済み・重複なしで収集
fn unique_sorted<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = Option<&'a str>>,
{
    values
        .flatten()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// カテゴリの選択肢
pub fn categories(products: &[Product]) -> Vec<String> {
    unique_sorted(products.iter().map(|p| p.category.as_deref()))
}

/// ブランドの選択肢
pub fn brands(products: &[Product]) -> Vec<String> {
    unique_sorted(products.iter().map(|p| Some(p.brand.as_str())))
}

/// 販売店の選択肢
pub fn retailers(products: &[Product]) -> Vec<String> {
    unique_sorted(products.iter().map(|p| p.retailer.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: f64) -> Product {
        Product {
            name: format!("Item {}", price),
            price: Some(price),
            ..Default::default()
        }
    }

    fn sample_catalog() -> Vec<Product> {
        vec![
            Product {
                name: "Ribbed Tank Top".to_string(),
                brand: "X".to_string(),
                category: Some("Tops".to_string()),
                retailer: Some("Nordstrom".to_string()),
                price: Some(18.0),
                ..Default::default()
            },
            Product {
                name: "Pleated Midi Skirt".to_string(),
                brand: "Y".to_string(),
                category: Some("Bottoms".to_string()),
                retailer: Some("Revolve".to_string()),
                price: Some(64.0),
                on_sale: true,
                ..Default::default()
            },
            Product {
                name: "Leather Loafer".to_string(),
                brand: "Z".to_string(),
                category: None,
                retailer: None,
                price: Some(210.0),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_default_filters_are_identity() {
        let catalog = sample_catalog();
        let filters = FilterState::default();
        assert!(filters.is_default());
        assert_eq!(filter_products(&catalog, &filters), catalog);
        assert_eq!(filter_products(&[], &filters), Vec::<Product>::new());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = sample_catalog();
        let mut filters = FilterState::default();
        filters.toggle_item_type("Bottoms").unwrap();
        filters.toggle_item_type("Dresses").unwrap();

        let once = filter_products(&catalog, &filters);
        let twice = filter_products(&once, &filters);
        assert_eq!(once, twice);
        // "midi" は Dresses、"skirt" は Bottoms
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_price_boundary_is_half_open() {
        let catalog = vec![priced(50.0)];
        let mut filters = FilterState::default();

        filters.set_price_range("$25 - $50").unwrap();
        assert!(filter_products(&catalog, &filters).is_empty());

        filters.set_price_range("$50 - $100").unwrap();
        assert_eq!(filter_products(&catalog, &filters).len(), 1);
    }

    #[test]
    fn test_every_price_lands_in_exactly_one_bucket() {
        for price in [0.0, 24.99, 25.0, 49.99, 50.0, 100.0, 199.99, 200.0, 5000.0] {
            let hits = PRICE_RANGES[1..].iter().filter(|r| r.contains(price)).count();
            assert_eq!(hits, 1, "price {} matched {} buckets", price, hits);
        }
    }

    #[test]
    fn test_missing_price_counts_as_zero() {
        let catalog = vec![Product { name: "Mystery".to_string(), ..Default::default() }];
        let mut filters = FilterState::default();
        filters.set_price_range("under-25").unwrap();
        assert_eq!(filter_products(&catalog, &filters).len(), 1);
    }

    #[test]
    fn test_or_within_and_across_dimensions() {
        let a = Product {
            name: "A".to_string(),
            category: Some("Tops".to_string()),
            brand: "X".to_string(),
            on_sale: false,
            ..Default::default()
        };
        let b = Product {
            name: "B".to_string(),
            category: Some("Bottoms".to_string()),
            brand: "Y".to_string(),
            on_sale: true,
            ..Default::default()
        };
        let catalog = vec![a, b.clone()];

        let mut filters = FilterState::default();
        filters.toggle_category("Tops");
        filters.toggle_category("Bottoms");
        filters.toggle_on_sale();

        assert_eq!(filter_products(&catalog, &filters), vec![b]);
    }

    #[test]
    fn test_missing_field_never_passes_active_filter() {
        let catalog = sample_catalog();
        let mut filters = FilterState::default();
        filters.toggle_retailer("Nordstrom");
        filters.toggle_retailer("Revolve");

        let result = filter_products(&catalog, &filters);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|p| p.retailer.is_some()));
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let catalog = sample_catalog();
        let mut filters = FilterState::default();
        filters.toggle_category("tops");
        assert!(filter_products(&catalog, &filters).is_empty());
    }

    #[test]
    fn test_brand_dimension_works_without_ui() {
        let catalog = sample_catalog();
        let mut filters = FilterState::default();
        filters.toggle_brand("Z");
        let result = filter_products(&catalog, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Leather Loafer");
    }

    #[test]
    fn test_end_to_end_price_then_sale() {
        let mut catalog: Vec<Product> = [10.0, 30.0, 60.0, 210.0].into_iter().map(priced).collect();
        catalog[1].on_sale = true;

        let mut filters = FilterState::default();
        filters.set_price_range("$25 - $50").unwrap();
        let result = filter_products(&catalog, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].price, Some(30.0));

        filters.set_price_range(ALL_PRICES).unwrap();
        filters.toggle_on_sale();
        let result = filter_products(&catalog, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].price, Some(30.0));
    }

    #[test]
    fn test_toggle_and_active_count() {
        let mut filters = FilterState::default();
        assert_eq!(filters.active_filter_count(), 0);

        filters.toggle_category("Tops");
        filters.toggle_category("Bottoms");
        filters.toggle_on_sale();
        filters.set_price_range("200+").unwrap();
        assert_eq!(filters.active_filter_count(), 3);

        filters.toggle_category("Tops");
        assert_eq!(filters.categories.len(), 1);

        filters.clear();
        assert!(filters.is_default());
    }

    #[test]
    fn test_unknown_labels_are_rejected_at_the_edge() {
        let mut filters = FilterState::default();
        assert!(filters.set_price_range("cheap").is_err());
        assert!(filters.toggle_item_type("Swimwear").is_err());
        assert!(filters.is_default());
    }

    #[test]
    fn test_unknown_item_type_in_state_fails_closed() {
        let catalog = sample_catalog();
        let mut filters = FilterState::default();
        filters.item_types.insert("Swimwear".to_string());
        assert!(filter_products(&catalog, &filters).is_empty());
    }

    #[test]
    fn test_price_range_aliases() {
        assert_eq!("all".parse::<PriceRange>().unwrap().label, ALL_PRICES);
        assert_eq!("25-50".parse::<PriceRange>().unwrap().label, "$25 - $50");
        assert_eq!("$100 - $200".parse::<PriceRange>().unwrap().max, 200.0);
        assert!("200+".parse::<PriceRange>().unwrap().max.is_infinite());
    }

    #[test]
    fn test_facets_sorted_unique_non_empty() {
        let mut catalog = sample_catalog();
        catalog.push(Product {
            name: "Another Top".to_string(),
            category: Some("Tops".to_string()),
            retailer: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(categories(&catalog), vec!["Bottoms", "Tops"]);
        assert_eq!(retailers(&catalog), vec!["Nordstrom", "Revolve"]);
        assert_eq!(brands(&catalog), vec!["X", "Y", "Z"]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const NAMES: &[&str] = &[
            "Ribbed Tank Top", "Cropped Cardigan", "Wide Leg Jeans", "Slip Dress",
            "Wool Coat", "Chelsea Boot", "Leather Tote", "Gold Chain Necklace", "Silk Scarf",
            "Mystery Item",
        ];
        const CATEGORIES: &[&str] = &["Tops", "tops", "Knitwear", "Shoes", "Bags", ""];
        const BRANDS: &[&str] = &["Aritzia", "Vince", "Zara", ""];
        const RETAILERS: &[&str] = &["Nordstrom", "Revolve", "Aritzia", ""];
        const BOUNDARIES: &[f64] = &[0.0, 25.0, 50.0, 100.0, 200.0];
        // 表にない "Swimwear" も混ぜる
        const ITEM_LABELS: &[&str] = &["Tops", "Bottoms", "Dresses", "Outerwear", "Shoes", "Swimwear"];

        fn arb_product() -> impl Strategy<Value = Product> {
            (
                prop::sample::select(NAMES),
                prop::option::of(prop::sample::select(CATEGORIES)),
                prop::sample::select(BRANDS),
                prop::option::of(prop::sample::select(RETAILERS)),
                prop::option::of(0.0f64..500.0),
                any::<bool>(),
            )
                .prop_map(|(name, category, brand, retailer, price, on_sale)| Product {
                    name: name.to_string(),
                    brand: brand.to_string(),
                    category: category.map(str::to_string),
                    retailer: retailer.map(str::to_string),
                    price,
                    on_sale,
                    ..Default::default()
                })
        }

        fn arb_set(values: &'static [&'static str]) -> impl Strategy<Value = BTreeSet<String>> {
            prop::collection::btree_set(prop::sample::select(values).prop_map(str::to_string), 0..3)
        }

        fn arb_filters() -> impl Strategy<Value = FilterState> {
            (
                0..PRICE_RANGES.len(),
                arb_set(ITEM_LABELS),
                arb_set(CATEGORIES),
                arb_set(BRANDS),
                arb_set(RETAILERS),
                any::<bool>(),
            )
                .prop_map(|(price, item_types, categories, brands, retailers, on_sale_only)| {
                    FilterState {
                        price_range: PRICE_RANGES[price],
                        item_types,
                        categories,
                        brands,
                        retailers,
                        on_sale_only,
                    }
                })
        }

        fn arb_price() -> impl Strategy<Value = f64> {
            prop_oneof![
                0.0f64..1_000_000.0,
                prop::sample::select(BOUNDARIES),
            ]
        }

        proptest! {
            /// デフォルトのフィルタは入力をそのまま（順序も）返す
            #[test]
            fn default_filters_keep_everything_in_order(
                products in prop::collection::vec(arb_product(), 0..40)
            ) {
                let result = filter_products(&products, &FilterState::default());
                prop_assert_eq!(result, products);
            }

            /// 2回かけても結果は変わらない
            #[test]
            fn filtering_is_idempotent(
                products in prop::collection::vec(arb_product(), 0..40),
                filters in arb_filters()
            ) {
                let once = filter_products(&products, &filters);
                let twice = filter_products(&once, &filters);
                prop_assert_eq!(&once, &twice);
                prop_assert!(once.iter().all(|p| filters.matches(p)));
            }

            /// 0以上の価格はちょうど1つの価格帯に入る
            #[test]
            fn every_price_lands_in_one_bucket(price in arb_price()) {
                let hits = PRICE_RANGES[1..].iter().filter(|r| r.contains(price)).count();
                prop_assert_eq!(hits, 1, "price {} matched {} buckets", price, hits);
            }
        }
    }
}
