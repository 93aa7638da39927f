use clap::Parser;
use moodboard::{api, browse, cli, config, error, logging, progress, render, results, scanner};
use api::ApiClient;
use cli::{Cli, Commands, FilterArgs};
use config::Config;
use error::Result;
use moodboard_common::{ResultsSession, Session};
use results::SavedSession;
use std::path::Path;

/// フィルタとページ数を適用して一覧を表示
fn show_results(results: &mut ResultsSession, filters: &FilterArgs, pages: usize) -> Result<()> {
    results.set_filters(filters.to_filter_state()?);
    results.show_pages(pages);

    println!("{}", render::filter_summary(results.filters()));
    println!("{}", render::product_page(results));
    Ok(())
}

fn print_header(results: &ResultsSession) {
    println!("{}", render::vibe_summary(results.vibe()));
    if let Some(badge) = results.trend().and_then(render::trend_badge) {
        println!("  {}", badge);
    }
    if let Some(detail) = results.trend().and_then(render::trend_detail) {
        println!("  {}", detail);
    }
    if let Some(item_type) = results.detected_item_type() {
        println!("  検出アイテム: {}", item_type);
    }
    println!();
}

fn print_facets(results: &ResultsSession) {
    let facets = [
        ("カテゴリ", results.categories(), render::CATEGORY_DISPLAY_LIMIT),
        ("ブランド", results.brands(), usize::MAX),
        ("販売店", results.retailers(), render::RETAILER_DISPLAY_LIMIT),
    ];
    for (name, values, limit) in facets {
        let shown: Vec<&str> = values.iter().take(limit).map(String::as_str).collect();
        let rest = values.len() - shown.len();
        if rest > 0 {
            println!("{}: {} ほか{}件", name, shown.join(", "), rest);
        } else {
            println!("{}: {}", name, shown.join(", "));
        }
    }
    println!();
}

fn load_results(input: &Path) -> Result<Session> {
    let saved = SavedSession::load(input)?;
    println!("✔ 結果を読み込み: {}件 ({})\n", saved.result.products.len(), input.display());
    Ok(saved.into_session())
}

fn save_results(session: &mut Session, path: &Path) -> Result<()> {
    let results = session.results_mut()?;
    SavedSession::from_results(results).save(path)?;
    println!("✔ 結果を保存: {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    tracing::debug!(api_url = %config.api_url, "config loaded");

    match cli.command {
        Commands::Check { images, prompt, output, filters, pages } => {
            println!("✨ moodboard - バイブ解析\n");

            // 1. 入力チェック
            println!("[1/3] 入力を確認中...");
            let images = scanner::collect_images(&images)?;
            let request = scanner::moodcheck_request(&images, &prompt)?;
            println!("✔ 画像{}枚{}\n", images.len(), if request.prompt.is_empty() { "" } else { " + プロンプト" });

            // 2. 解析
            println!("[2/3] 解析中...");
            let client = ApiClient::from_config(&config)?;
            let result = progress::with_spinner("バイブを解析中...", client.moodcheck(&request)).await?;
            println!("✔ {}件の商品を取得\n", result.products.len());

            let mut session = Session::default();
            session.load(request.prompt, result);

            // 3. 表示・保存
            println!("[3/3] 結果");
            let results = session.results_mut()?;
            print_header(results);
            show_results(results, &filters, pages)?;

            if let Some(output) = output {
                println!();
                save_results(&mut session, &output)?;
            }
        }

        Commands::Filter { input, filters, pages, facets } => {
            let mut session = load_results(&input)?;
            let results = session.results_mut()?;
            print_header(results);
            if facets {
                print_facets(results);
            }
            show_results(results, &filters, pages)?;
        }

        Commands::Refine { input, category, retailer, output } => {
            println!("🔎 moodboard - 再検索\n");

            let mut session = load_results(&input)?;
            {
                let results = session.results_mut()?;
                results.update_filters(|f| {
                    if let Some(category) = &category {
                        f.toggle_category(category);
                    } else if let Some(retailer) = &retailer {
                        f.toggle_retailer(retailer);
                    }
                });
            }

            let client = ApiClient::from_config(&config)?;
            let target = progress::with_spinner(
                "再検索中...",
                session.refine(|request| async move { client.moodcheck(&request).await }),
            )
            .await?;
            println!("✔ {}\n", target.label());

            let results = session.results_mut()?;
            println!("{}", render::product_page(results));
            println!();
            save_results(&mut session, output.as_deref().unwrap_or(&input))?;
        }

        Commands::More { input, max, output } => {
            println!("➕ moodboard - 追加取得\n");

            let mut session = load_results(&input)?;
            let client = ApiClient::from_config(&config)?;
            let request = session.results_mut()?.more_products_request(max.unwrap_or(config.max_products));

            let products = progress::with_spinner("追加の商品を取得中...", client.more_products(&request)).await?;
            println!("✔ {}件を追加\n", products.len());

            session.results_mut()?.append_products(products);
            save_results(&mut session, output.as_deref().unwrap_or(&input))?;
        }

        Commands::Browse { images, prompt, input } => {
            println!("🛍 moodboard - ブラウズ\n");

            let client = ApiClient::from_config(&config)?;
            let session = match &input {
                Some(path) => load_results(path)?,
                None if images.is_empty() && prompt.trim().is_empty() => Session::default(),
                None => {
                    let images = scanner::collect_images(&images)?;
                    let request = scanner::moodcheck_request(&images, &prompt)?;
                    let result = progress::with_spinner("バイブを解析中...", client.moodcheck(&request)).await?;
                    let mut session = Session::default();
                    session.load(request.prompt, result);
                    session
                }
            };

            browse::run_browse(&client, session, input, config.max_products).await?;
        }

        Commands::Config { set_api_url, show } => {
            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ APIのURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  API URL: {}", config.api_url);
                println!("  追加取得数: {}", config.max_products);
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: なし"),
                }
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}
