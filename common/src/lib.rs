//! Moodboard Common Library
//!
//! 商品フィルタ・ページング・再検索のロジックと、APIで共有される型。
//! 通信は行わない（再検索は呼び出し側が渡す非同期関数で実行する）。

pub mod types;
pub mod classifier;
pub mod filter;
pub mod pagination;
pub mod refinement;
pub mod session;
pub mod parser;
pub mod error;

pub use types::{ColorSwatch, Moodcheck, MoodcheckRequest, MoreProductsRequest, Product, Trend, TrendDirection, Vibe};
pub use classifier::{matches_item_type, ItemType, ITEM_TYPES};
pub use filter::{filter_products, FilterState, PriceRange, PRICE_RANGES};
pub use pagination::{PaginationWindow, PAGE_SIZE};
pub use refinement::{RefinementTarget, REFINE_MAX_PRODUCTS};
pub use session::{ResultsSession, Session};
pub use parser::{parse_moodcheck_response, parse_more_products_response};
pub use error::{Error, Result};
