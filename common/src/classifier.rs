//! アイテム種別の判定
//!
//! 商品名をキーワードの部分一致で大まかな種別に振り分ける。

/// アイテム種別とキーワード
#[derive(Debug, Clone, Copy)]
pub struct ItemType {
    pub label: &'static str,
    /// 小文字のキーワード
    pub keywords: &'static [&'static str],
}

/// アイテム種別テーブル
///
/// "cardigan" は Tops と Outerwear の両方に含まれる。
pub const ITEM_TYPES: &[ItemType] = &[
    ItemType {
        label: "Tops",
        keywords: &[
            "top", "blouse", "shirt", "tee", "t-shirt", "tank", "sweater", "hoodie",
            "cardigan", "pullover", "cami", "bodysuit",
        ],
    },
    ItemType {
        label: "Bottoms",
        keywords: &["pants", "jeans", "trousers", "shorts", "skirt", "leggings"],
    },
    ItemType {
        label: "Dresses",
        keywords: &["dress", "gown", "romper", "jumpsuit", "maxi", "midi", "mini dress"],
    },
    ItemType {
        label: "Outerwear",
        keywords: &["jacket", "coat", "blazer", "cardigan", "vest", "parka", "puffer", "trench"],
    },
    ItemType {
        label: "Shoes",
        keywords: &["shoe", "boot", "sneaker", "sandal", "heel", "flat", "loafer", "mule", "slipper"],
    },
    ItemType {
        label: "Bags",
        keywords: &["bag", "purse", "tote", "clutch", "backpack", "crossbody", "handbag", "satchel"],
    },
    ItemType {
        label: "Jewelry",
        keywords: &["necklace", "earring", "bracelet", "ring", "jewelry", "chain", "pendant"],
    },
    ItemType {
        label: "Accessories",
        keywords: &["scarf", "hat", "belt", "sunglasses", "watch", "hair", "headband"],
    },
];

/// ラベルから種別を検索（完全一致）
pub fn find_item_type(label: &str) -> Option<&'static ItemType> {
    ITEM_TYPES.iter().find(|t| t.label == label)
}

/// 全ラベル
pub fn item_type_labels() -> impl Iterator<Item = &'static str> {
    ITEM_TYPES.iter().map(|t| t.label)
}

impl ItemType {
    /// 小文字化済みの商品名がキーワードを含むか
    fn matches_lowercase(&self, name_lower: &str) -> bool {
        self.keywords.iter().any(|keyword| name_lower.contains(keyword))
    }
}

/// 商品名が指定種別に該当するか
///
/// 大文字小文字を区別しない部分一致。未知のラベルは常にfalse。
pub fn matches_item_type(product_name: &str, type_label: &str) -> bool {
    match find_item_type(type_label) {
        Some(item_type) => item_type.matches_lowercase(&product_name.to_lowercase()),
        None => false,
    }
}

/// 商品名がいずれかの種別に該当するか（OR）
pub fn matches_any_item_type<'a, I>(product_name: &str, type_labels: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    let name_lower = product_name.to_lowercase();
    type_labels
        .into_iter()
        .filter_map(|label| find_item_type(label))
        .any(|item_type| item_type.matches_lowercase(&name_lower))
}
