//! 対話式ブラウズ
//!
//! セッションを1つ持ち、メニュー操作でフィルタ・もっと見る・再検索を行う。
//! 通信中は次の操作を受け付けない（awaitしてからメニューに戻る）。

use crate::api::ApiClient;
use crate::error::Result;
use crate::progress::with_spinner;
use crate::render::{self, CATEGORY_DISPLAY_LIMIT, RETAILER_DISPLAY_LIMIT};
use crate::results::SavedSession;
use crate::scanner;
use dialoguer::{Input, Select};
use moodboard_common::classifier::item_type_labels;
use moodboard_common::{ResultsSession, Session, PRICE_RANGES};
use std::path::{Path, PathBuf};

/// メニュー項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    LoadMore,
    PriceRange,
    ItemType,
    Category,
    Retailer,
    Brand,
    ToggleOnSale,
    ClearFilters,
    Refine(String),
    MoreProducts,
    Save,
    StartOver,
    Quit,
}

impl BrowseAction {
    pub fn label(&self) -> String {
        match self {
            BrowseAction::LoadMore => "もっと見る".to_string(),
            BrowseAction::PriceRange => "価格帯".to_string(),
            BrowseAction::ItemType => "アイテム種別".to_string(),
            BrowseAction::Category => "カテゴリ".to_string(),
            BrowseAction::Retailer => "販売店".to_string(),
            BrowseAction::Brand => "ブランド".to_string(),
            BrowseAction::ToggleOnSale => "セール品のみ 切替".to_string(),
            BrowseAction::ClearFilters => "フィルタをすべて解除".to_string(),
            BrowseAction::Refine(label) => format!("再検索: {}", label),
            BrowseAction::MoreProducts => "追加の商品を取得".to_string(),
            BrowseAction::Save => "保存".to_string(),
            BrowseAction::StartOver => "やり直し".to_string(),
            BrowseAction::Quit => "終了".to_string(),
        }
    }
}

/// 現在の状態で選べる操作
pub fn available_actions(results: &ResultsSession) -> Vec<BrowseAction> {
    let mut actions = Vec::new();

    if results.has_more() {
        actions.push(BrowseAction::LoadMore);
    }
    actions.push(BrowseAction::PriceRange);
    actions.push(BrowseAction::ItemType);
    if !results.categories().is_empty() {
        actions.push(BrowseAction::Category);
    }
    if !results.retailers().is_empty() {
        actions.push(BrowseAction::Retailer);
    }
    if !results.brands().is_empty() {
        actions.push(BrowseAction::Brand);
    }
    actions.push(BrowseAction::ToggleOnSale);
    if results.filters().active_filter_count() > 0 {
        actions.push(BrowseAction::ClearFilters);
    }
    if let Some(target) = results.refinement_target() {
        actions.push(BrowseAction::Refine(target.label()));
    }
    actions.push(BrowseAction::MoreProducts);
    actions.push(BrowseAction::Save);
    actions.push(BrowseAction::StartOver);
    actions.push(BrowseAction::Quit);

    actions
}

/// 選択中なら ✓ を付ける
fn mark(selected: bool, value: &str) -> String {
    if selected {
        format!("✓ {}", value)
    } else {
        format!("  {}", value)
    }
}

fn select(prompt: &str, items: &[String]) -> Result<Option<usize>> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()?)
}

/// 値リストから1つ選んで切り替える
fn toggle_from(
    results: &mut ResultsSession,
    prompt: &str,
    values: &[String],
    is_selected: impl Fn(&ResultsSession, &str) -> bool,
    toggle: impl FnOnce(&mut ResultsSession, &str),
) -> Result<()> {
    let items: Vec<String> = values
        .iter()
        .map(|v| mark(is_selected(results, v.as_str()), v))
        .collect();
    if let Some(index) = select(prompt, &items)? {
        toggle(results, values[index].as_str());
    }
    Ok(())
}

fn print_results(results: &ResultsSession) {
    println!("\n{}", render::filter_summary(results.filters()));
    println!("{}\n", render::product_page(results));
}

fn print_header(results: &ResultsSession) {
    println!("{}", render::vibe_summary(results.vibe()));
    if let Some(badge) = results.trend().and_then(render::trend_badge) {
        println!("  {}", badge);
    }
    if let Some(detail) = results.trend().and_then(render::trend_detail) {
        println!("  {}", detail);
    }
}

fn save_results(results: &ResultsSession, save_path: &Path) -> Result<()> {
    SavedSession::from_results(results).save(save_path)?;
    println!("✔ 保存しました: {}", save_path.display());
    Ok(())
}

/// 新しいプロンプトを入力して解析（空入力で終了）
async fn start_new(client: &ApiClient, session: &mut Session) -> Result<bool> {
    let prompt: String = Input::new()
        .with_prompt("イメージを説明してください（空で終了）")
        .allow_empty(true)
        .interact_text()?;

    if prompt.trim().is_empty() {
        return Ok(false);
    }

    let request = match scanner::moodcheck_request(&[], &prompt) {
        Ok(request) => request,
        Err(e) => {
            println!("⚠ {}", e);
            return Ok(true);
        }
    };

    match with_spinner("バイブを解析中...", client.moodcheck(&request)).await {
        Ok(result) => {
            session.load(request.prompt, result);
            if let Some(results) = session.results() {
                print_header(results);
                print_results(results);
            }
        }
        Err(e) => println!("⚠ {}", e),
    }
    Ok(true)
}

/// 対話ループ
pub async fn run_browse(
    client: &ApiClient,
    mut session: Session,
    save_path: Option<PathBuf>,
    max_products: usize,
) -> Result<()> {
    let save_path = save_path.unwrap_or_else(|| PathBuf::from("moodboard-results.json"));

    if let Some(results) = session.results() {
        print_header(results);
        print_results(results);
    }

    loop {
        if !session.is_loaded() {
            if start_new(client, &mut session).await? {
                continue;
            }
            break;
        }
        let results = session.results_mut()?;

        let actions = available_actions(results);
        let labels: Vec<String> = actions.iter().map(BrowseAction::label).collect();
        let Some(index) = select("操作を選んでください", &labels)? else {
            break;
        };

        match &actions[index] {
            BrowseAction::LoadMore => results.load_more(),
            BrowseAction::PriceRange => {
                let current = results.filters().price_range.label;
                let items: Vec<String> = PRICE_RANGES
                    .iter()
                    .map(|r| mark(r.label == current, r.label))
                    .collect();
                if let Some(i) = select("価格帯", &items)? {
                    results.update_filters(|f| f.price_range = PRICE_RANGES[i]);
                }
            }
            BrowseAction::ItemType => {
                let labels: Vec<String> = item_type_labels().map(str::to_string).collect();
                toggle_from(
                    results,
                    "アイテム種別",
                    &labels,
                    |r, v| r.filters().item_types.contains(v),
                    |r, v| {
                        if let Err(e) = r.update_filters(|f| f.toggle_item_type(v)) {
                            println!("⚠ {}", e);
                        }
                    },
                )?;
            }
            BrowseAction::Category => {
                let mut values = results.categories();
                values.truncate(CATEGORY_DISPLAY_LIMIT);
                toggle_from(
                    results,
                    "カテゴリ",
                    &values,
                    |r, v| r.filters().categories.contains(v),
                    |r, v| r.update_filters(|f| f.toggle_category(v)),
                )?;
            }
            BrowseAction::Retailer => {
                let mut values = results.retailers();
                values.truncate(RETAILER_DISPLAY_LIMIT);
                toggle_from(
                    results,
                    "販売店",
                    &values,
                    |r, v| r.filters().retailers.contains(v),
                    |r, v| r.update_filters(|f| f.toggle_retailer(v)),
                )?;
            }
            BrowseAction::Brand => {
                let values = results.brands();
                toggle_from(
                    results,
                    "ブランド",
                    &values,
                    |r, v| r.filters().brands.contains(v),
                    |r, v| r.update_filters(|f| f.toggle_brand(v)),
                )?;
            }
            BrowseAction::ToggleOnSale => results.update_filters(|f| f.toggle_on_sale()),
            BrowseAction::ClearFilters => results.clear_filters(),
            BrowseAction::Refine(label) => {
                let message = format!("{}...", label);
                let refined = with_spinner(&message, results.refine(|request| async move {
                    client.moodcheck(&request).await
                }))
                .await;
                match refined {
                    Ok(_) => println!("✔ 商品を入れ替えました（フィルタはリセット）"),
                    Err(e) => println!("⚠ {}", e),
                }
            }
            BrowseAction::MoreProducts => {
                let request = results.more_products_request(max_products);
                match with_spinner("追加の商品を取得中...", client.more_products(&request)).await {
                    Ok(products) => results.append_products(products),
                    Err(e) => println!("⚠ {}", e),
                }
            }
            BrowseAction::Save => save_results(results, &save_path)?,
            BrowseAction::StartOver => {
                session.start_over();
                continue;
            }
            BrowseAction::Quit => break,
        }

        if let Some(results) = session.results() {
            print_results(results);
        }
    }

    Ok(())
}
