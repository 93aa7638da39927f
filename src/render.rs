//! 端末表示
//!
//! 表示用の文字列を組み立てる。出力は呼び出し側で行う。

use moodboard_common::{FilterState, Product, ResultsSession, Trend, Vibe};

/// 画面に出すカテゴリ候補の上限
pub const CATEGORY_DISPLAY_LIMIT: usize = 12;
/// 画面に出す販売店候補の上限
pub const RETAILER_DISPLAY_LIMIT: usize = 8;

pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// バイブの概要
pub fn vibe_summary(vibe: &Vibe) -> String {
    let mut lines = vec![format!("✨ {}", vibe.name)];
    if !vibe.mood.is_empty() {
        lines.push(format!("   {}", vibe.mood));
    }
    if !vibe.color_palette.is_empty() {
        let palette = vibe
            .color_palette
            .iter()
            .map(|c| format!("{} {}", c.name, c.hex))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("  🎨 {}", palette));
    }
    if !vibe.key_pieces.is_empty() {
        lines.push(format!("  👗 {}", vibe.key_pieces.join(" / ")));
    }
    if let Some(archetype) = &vibe.style_archetype {
        lines.push(format!("  スタイル: {}", archetype));
    }
    if !vibe.occasions.is_empty() {
        lines.push(format!("  シーン: {}", vibe.occasions.join(", ")));
    }
    if let Some(season) = &vibe.season {
        lines.push(format!("  季節: {}", season));
    }
    lines.join("\n")
}

/// トレンドバッジ（unknownはNone）
pub fn trend_badge(trend: &Trend) -> Option<String> {
    let label = trend.direction.badge_label()?;
    Some(match &trend.change {
        Some(change) => format!("📈 {} {}", label, change),
        None => format!("📈 {}", label),
    })
}

const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// 1行のスパークライン（値がなければNone）
pub fn sparkline(values: &[f64]) -> Option<String> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    let span = max - min;

    Some(
        values
            .iter()
            .map(|v| {
                if span == 0.0 {
                    SPARK_GLYPHS[3]
                } else {
                    let level = ((v - min) / span * 7.0).round() as usize;
                    SPARK_GLYPHS[level.min(7)]
                }
            })
            .collect(),
    )
}

/// スパークラインと現在値/ピーク
pub fn trend_detail(trend: &Trend) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(line) = sparkline(&trend.sparkline) {
        parts.push(line);
    }
    if let Some(current) = trend.current {
        parts.push(format!("現在 {}", current));
    }
    if let Some(peak) = trend.peak {
        parts.push(format!("ピーク {}", peak));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("  "))
    }
}

/// 商品1行
pub fn product_line(index: usize, product: &Product) -> String {
    let mut line = format!("{:>3}. {}", index + 1, product.name);
    if !product.brand.is_empty() {
        line.push_str(&format!(" - {}", product.brand));
    }
    line.push_str(&format!("  {}", format_price(product.effective_price())));
    if product.on_sale {
        match product.original_price {
            Some(original) => line.push_str(&format!(" (SALE, 元値 {})", format_price(original))),
            None => line.push_str(" (SALE)"),
        }
    }
    if let Some(retailer) = product.retailer.as_deref().filter(|r| !r.is_empty()) {
        line.push_str(&format!(" @ {}", retailer));
    }
    line
}

/// 有効なフィルタの説明
pub fn filter_summary(filters: &FilterState) -> String {
    if filters.is_default() {
        return "フィルタなし".to_string();
    }

    let mut parts = Vec::new();
    if !filters.price_range.is_all() {
        parts.push(filters.price_range.label.to_string());
    }
    let sets = [
        ("種別", &filters.item_types),
        ("カテゴリ", &filters.categories),
        ("ブランド", &filters.brands),
        ("販売店", &filters.retailers),
    ];
    for (name, set) in sets {
        if !set.is_empty() {
            let values: Vec<&str> = set.iter().map(String::as_str).collect();
            parts.push(format!("{}: {}", name, values.join(" | ")));
        }
    }
    if filters.on_sale_only {
        parts.push("セールのみ".to_string());
    }

    format!("フィルタ({}): {}", filters.active_filter_count(), parts.join(", "))
}

/// 表示中の商品一覧とフッター
pub fn product_page(results: &ResultsSession) -> String {
    let visible = results.visible();
    let mut lines: Vec<String> = visible
        .iter()
        .enumerate()
        .map(|(i, p)| product_line(i, p))
        .collect();

    if visible.is_empty() {
        lines.push("条件に合う商品がありません".to_string());
    }

    lines.push(format!(
        "-- {}/{}件を表示（全{}件中）{}",
        visible.len(),
        results.filtered().len(),
        results.catalog().len(),
        if results.has_more() { " もっと見るあり" } else { "" }
    ));
    lines.join("\n")
}
