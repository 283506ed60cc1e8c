use crate::config::Environment;
use ai_scraper_common::ExportKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ai-scraper")]
#[command(about = "AIスクレイパー・ポータル（商品ページの一括抽出とエクスポート）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// URLを送信して商品データを抽出
    Scrape {
        /// 商品ページのURL（省略時は対話入力）
        urls: Vec<String>,

        /// 抽出の指示（省略時は既定プロンプト）
        #[arg(short, long)]
        instruction: Option<String>,

        /// URLリストファイル（1行1URL、`#` 行は無視）
        #[arg(long)]
        urls_file: Option<PathBuf>,

        /// 対話形式で入力
        #[arg(long)]
        interactive: bool,

        /// 出力形式 (csv/json/excel/all/none)
        #[arg(short, long, default_value = "none")]
        format: ExportFormat,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// バッチ結果（生データ）をJSONで保存
        #[arg(long)]
        save_raw: Option<PathBuf>,

        /// エンドポイント（ベースURL）
        #[arg(long)]
        endpoint: Option<String>,

        /// 本番環境に送信
        #[arg(long)]
        production: bool,
    },

    /// 保存済みバッチ結果からCSV/JSON/Excelを生成
    Export {
        /// 入力JSONファイル（`--save-raw` の出力またはレスポンス全体）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (csv/json/excel/all)
        #[arg(short, long, default_value = "all")]
        format: ExportFormat,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// ローカルのエンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 本番のエンドポイントを設定
        #[arg(long)]
        set_deployed_endpoint: Option<String>,

        /// 既定の環境を設定 (local/production)
        #[arg(long)]
        set_environment: Option<Environment>,

        /// 同時処理数を設定
        #[arg(long)]
        set_parallel: Option<usize>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
    All,
    #[default]
    None,
}

impl ExportFormat {
    /// 出力する形式の一覧
    pub fn kinds(&self) -> Vec<ExportKind> {
        match self {
            ExportFormat::Csv => vec![ExportKind::Csv],
            ExportFormat::Json => vec![ExportKind::Json],
            ExportFormat::Excel => vec![ExportKind::Excel],
            ExportFormat::All => ExportKind::ALL.to_vec(),
            ExportFormat::None => Vec::new(),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "all" => Ok(ExportFormat::All),
            "none" => Ok(ExportFormat::None),
            _ => Err(format!("Unknown format: {}. Use csv, json, excel, all, or none", s)),
        }
    }
}
