use ai_scraper::client::{BarReporter, BatchClient};
use ai_scraper::{cli, config, display, error, export, form_prompt, logging, session};
use ai_scraper_common::{normalize_batch, BatchOptions, FormState, SavedBatch};
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, Environment};
use error::{Result, ScraperError};
use session::ScrapeSession;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Scrape {
            urls,
            instruction,
            urls_file,
            interactive,
            format,
            output,
            save_raw,
            endpoint,
            production,
        } => {
            println!("🔎 ai-scraper - 商品データ抽出\n");

            let mut all_urls = urls;
            if let Some(path) = urls_file {
                all_urls.extend(form_prompt::read_urls_file(&path)?);
            }
            let mut form = FormState::from_urls(instruction.unwrap_or_default(), all_urls);
            if interactive || !form.can_submit() {
                form_prompt::run_interactive_form(&mut form)?;
            }

            let environment = config.effective_environment(production)?;
            let base_url = config.resolve_endpoint(endpoint.as_deref(), environment)?;
            let options = BatchOptions {
                parallel: config.parallel,
                is_production: (environment == Environment::Production).then_some(true),
            };
            let client = BatchClient::new(&base_url, config.timeout())?;

            // 1. 送信
            println!(
                "[1/3] {}件のURLを送信中... ({}, {})",
                form.active_urls().len(),
                environment,
                base_url
            );
            let mut session = ScrapeSession::new(form)
                .with_options(options)
                .with_per_url_estimate(config.per_url_estimate())
                .with_reporter(Arc::new(BarReporter::new()));
            session.submit(&client).await;

            if let Some(message) = session.error() {
                println!("⚠ {}\n", message);
            }

            // 2. 結果表示
            println!("[2/3] 結果");
            println!("{}\n", display::render_form_summary(session.form(), session.failed_urls()));
            if !session.rows().is_empty() {
                println!("{}\n", display::render_table(session.columns(), session.rows()));
                println!("✔ {}件の商品データを取得\n", session.raw_records().len());
            }

            if let (Some(path), Some(batch)) = (save_raw, session.batch()) {
                let json = serde_json::to_string_pretty(batch)?;
                std::fs::write(&path, json)?;
                println!("✔ 生データを保存: {}\n", path.display());
            }

            // 3. エクスポート
            let kinds = format.kinds();
            if kinds.is_empty() {
                println!("[3/3] エクスポートなし（--format で指定）");
            } else {
                println!("[3/3] エクスポート中...");
                let output_dir = output_dir_or_default(output, &config);
                export::export_records(session.raw_records(), &kinds, &output_dir)?;
            }

            println!("\n✅ 完了");
        }

        Commands::Export { input, format, output } => {
            println!("📄 ai-scraper - エクスポート\n");

            if !input.exists() {
                return Err(ScraperError::FileNotFound(input.display().to_string()));
            }
            let content = std::fs::read_to_string(&input)?;
            let saved: SavedBatch = serde_json::from_str(&content)?;
            let normalized = normalize_batch(&saved.into_results());

            println!("✔ {}件の商品データを読み込み", normalized.raw_records.len());
            if !normalized.errors.is_empty() {
                println!("⚠ {}件のエラーを除外", normalized.errors.len());
            }

            let output_dir = output_dir_or_default(output, &config);
            let report = export::export_records(&normalized.raw_records, &format.kinds(), &output_dir)?;
            if report.is_empty() {
                println!("- 出力するファイルはありません");
            }

            println!("\n✅ エクスポート完了");
        }

        Commands::Config {
            set_endpoint,
            set_deployed_endpoint,
            set_environment,
            set_parallel,
            show,
        } => {
            let mut config = config;

            if let Some(url) = set_endpoint {
                config.set_endpoint(url)?;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(url) = set_deployed_endpoint {
                config.set_deployed_endpoint(url)?;
                println!("✔ 本番エンドポイントを設定しました");
            }

            if let Some(environment) = set_environment {
                config.set_environment(environment)?;
                println!("✔ 環境を設定しました: {}", environment);
            }

            if let Some(parallel) = set_parallel {
                config.set_parallel(parallel)?;
                println!("✔ 同時処理数を設定しました: {}", parallel);
            }

            if show {
                println!("設定:");
                println!("  ローカル: {}", config.local_endpoint);
                println!(
                    "  本番: {}",
                    config.deployed_endpoint.as_deref().unwrap_or("未設定")
                );
                println!("  環境: {}", config.environment);
                println!("  同時処理数: {}", config.parallel);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  1URLあたりの想定時間: {}ms", config.per_url_estimate_ms);
                println!(
                    "  出力先: {}",
                    config
                        .default_output_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| ".".into())
                );
            }
        }
    }

    Ok(())
}

fn output_dir_or_default(output: Option<PathBuf>, config: &Config) -> PathBuf {
    output
        .or_else(|| config.default_output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}
