//! 対話式フォーム入力
//!
//! 指示文を入力したあと、URLを1件ずつ入力する。
//! 最後の欄で値を入力してEnterを押すと次の空欄が増える。

use crate::error::{Result, ScraperError};
use ai_scraper_common::FormState;
use dialoguer::Input;
use std::path::Path;

/// URL欄での操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// 最後の欄に入力
    Url(String),
    /// N番目（1始まり）を削除
    Remove(usize),
    /// 入力終了
    Finish,
}

impl FormAction {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return FormAction::Finish;
        }
        if let Some(number) = trimmed.strip_prefix('-') {
            if let Ok(n) = number.trim().parse::<usize>() {
                return FormAction::Remove(n);
            }
        }
        FormAction::Url(trimmed.to_string())
    }
}

/// 操作をフォームに反映（続行するなら true）
pub fn apply_action(form: &mut FormState, action: FormAction) -> bool {
    match action {
        FormAction::Url(url) => {
            let last = form.len() - 1;
            form.set_url(last, url);
            form.handle_enter(last);
            true
        }
        FormAction::Remove(n) => {
            if n == 0 || !form.remove_url(n - 1) {
                println!("  → 削除できません: {}", n);
            }
            true
        }
        FormAction::Finish => false,
    }
}

/// URLリストファイルを読む（1行1URL、空行と `#` 行は無視）
pub fn read_urls_file(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(ScraperError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn print_urls(form: &FormState) {
    for (i, url) in form.urls().iter().enumerate() {
        if !url.trim().is_empty() {
            println!("  {:>2}. {}", i + 1, url);
        }
    }
}

/// 対話式でフォームを埋める
pub fn run_interactive_form(form: &mut FormState) -> Result<()> {
    println!("---");
    println!("操作: URLを入力して[Enter]で追加 / [-番号]で削除 / 空欄で送信");
    println!("---\n");

    let instruction: String = Input::new()
        .with_prompt("抽出の指示 (空欄で既定プロンプト)")
        .with_initial_text(form.instruction())
        .allow_empty(true)
        .interact_text()?;
    form.set_instruction(instruction.trim());

    // 入力済みの最後の欄の後ろに空欄を用意
    let last = form.len() - 1;
    if !form.urls()[last].trim().is_empty() {
        form.handle_enter(last);
    }
    print_urls(form);

    loop {
        let input: String = Input::new()
            .with_prompt(format!("URL [{}]", form.len()))
            .allow_empty(true)
            .interact_text()?;

        let action = FormAction::parse(&input);
        let removing = matches!(action, FormAction::Remove(_));
        if !apply_action(form, action) {
            if form.can_submit() {
                break;
            }
            println!("  → URLを1件以上入力してください");
            continue;
        }
        if removing {
            print_urls(form);
        }
    }

    println!("✔ {}件のURLを送信します\n", form.active_urls().len());
    Ok(())
}
