use clap::{Args, Parser, Subcommand};
use moodboard_common::{FilterState, PriceRange};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moodboard")]
#[command(about = "画像やプロンプトからバイブを解析し、商品を絞り込むツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIのURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像・プロンプトを解析して商品を表示
    Check {
        /// 画像ファイル・フォルダ・Data URI（最大5枚）
        images: Vec<String>,

        /// イメージの説明（200文字以内）
        #[arg(short, long, default_value = "")]
        prompt: String,

        /// 結果を保存するJSONファイル
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        /// 表示ページ数（1ページ20件）
        #[arg(long, default_value = "1")]
        pages: usize,
    },

    /// 保存した結果をオフラインで絞り込み
    Filter {
        /// 結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// 表示ページ数（1ページ20件）
        #[arg(long, default_value = "1")]
        pages: usize,

        /// カテゴリ・ブランド・販売店の候補を表示
        #[arg(long)]
        facets: bool,
    },

    /// カテゴリまたは販売店を1つ指定して再検索（結果ファイルを置き換え）
    Refine {
        /// 結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// カテゴリ
        #[arg(long, conflicts_with = "retailer", required_unless_present = "retailer")]
        category: Option<String>,

        /// 販売店
        #[arg(long)]
        retailer: Option<String>,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 追加の商品を取得して結果に追記
    More {
        /// 結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 取得数（省略時は設定値）
        #[arg(long)]
        max: Option<usize>,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話的に絞り込み・もっと見る・再検索
    Browse {
        /// 画像ファイル・フォルダ・Data URI（最大5枚）
        images: Vec<String>,

        /// イメージの説明（200文字以内）
        #[arg(short, long, default_value = "")]
        prompt: String,

        /// 保存済みの結果から開始
        #[arg(short, long, conflicts_with_all = ["images", "prompt"])]
        input: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIのURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// フィルタ指定
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// 価格帯 (all/under-25/25-50/50-100/100-200/200+)
    #[arg(long)]
    pub price: Option<PriceRange>,

    /// アイテム種別 (Tops/Bottoms/Dresses/Outerwear/Shoes/Bags/Jewelry/Accessories)
    #[arg(long = "item-type")]
    pub item_types: Vec<String>,

    /// カテゴリ（完全一致、複数可）
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// ブランド（完全一致、複数可）
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// 販売店（完全一致、複数可）
    #[arg(long = "retailer")]
    pub retailers: Vec<String>,

    /// セール品のみ
    #[arg(long)]
    pub on_sale: bool,
}

impl FilterArgs {
    pub fn to_filter_state(&self) -> moodboard_common::Result<FilterState> {
        let mut filters = FilterState::default();
        if let Some(price) = self.price {
            filters.price_range = price;
        }
        for item_type in &self.item_types {
            if !filters.item_types.contains(item_type) {
                filters.toggle_item_type(item_type)?;
            }
        }
        filters.categories.extend(self.categories.iter().cloned());
        filters.brands.extend(self.brands.iter().cloned());
        filters.retailers.extend(self.retailers.iter().cloned());
        filters.on_sale_only = self.on_sale;
        Ok(filters)
    }
}
