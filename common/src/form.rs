//! フォーム状態
//!
//! 指示文とURLリストを保持する。URLリストは常に1件以上（空欄可）。

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    instruction: String,
    urls: Vec<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// 空欄1件で初期化
    pub fn new() -> Self {
        Self {
            instruction: String::new(),
            urls: vec![String::new()],
        }
    }

    /// 既存の値から作成（URLが空なら空欄1件）
    pub fn from_urls<I, S>(instruction: impl Into<String>, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        if urls.is_empty() {
            urls.push(String::new());
        }
        Self {
            instruction: instruction.into(),
            urls,
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        self.instruction = instruction.into();
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// 常に1件以上あるので false
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// 範囲外は無視
    pub fn set_url(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.urls.get_mut(index) {
            *slot = value.into();
        }
    }

    /// 空欄を末尾に追加
    pub fn add_url(&mut self) {
        self.urls.push(String::new());
    }

    /// 1件しかない場合・範囲外の場合は何もしない
    pub fn remove_url(&mut self, index: usize) -> bool {
        if self.urls.len() <= 1 || index >= self.urls.len() {
            return false;
        }
        self.urls.remove(index);
        true
    }

    /// 最後の入力欄でEnterが押されたら空欄を追加
    pub fn handle_enter(&mut self, index: usize) -> bool {
        if index + 1 == self.urls.len() {
            self.add_url();
            true
        } else {
            false
        }
    }

    /// 送信対象のURL（前後空白除去・空欄除外）
    pub fn active_urls(&self) -> Vec<String> {
        self.urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn can_submit(&self) -> bool {
        self.urls.iter().any(|u| !u.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_one_blank_slot() {
        let form = FormState::new();
        assert_eq!(form.urls(), &[String::new()]);
        assert!(!form.can_submit());
    }

    #[test]
    fn test_remove_last_slot_is_noop() {
        let mut form = FormState::new();
        form.set_url(0, "https://a.example");
        assert!(!form.remove_url(0));
        assert_eq!(form.len(), 1);
        assert_eq!(form.urls()[0], "https://a.example");
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut form = FormState::from_urls("", ["a", "b"]);
        assert!(!form.remove_url(5));
        assert!(form.remove_url(0));
        assert_eq!(form.urls(), &["b".to_string()]);
    }

    #[test]
    fn test_enter_appends_only_on_last() {
        let mut form = FormState::from_urls("", ["a", "b"]);
        assert!(!form.handle_enter(0));
        assert_eq!(form.len(), 2);
        assert!(form.handle_enter(1));
        assert_eq!(form.len(), 3);
        assert_eq!(form.urls()[2], "");
    }

    #[test]
    fn test_active_urls_trim_and_filter() {
        let form = FormState::from_urls("", ["  https://a.example  ", "", "   ", "https://b.example"]);
        assert_eq!(
            form.active_urls(),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(form.can_submit());
    }

    #[test]
    fn test_from_empty_urls() {
        let form = FormState::from_urls("extract", Vec::<String>::new());
        assert_eq!(form.len(), 1);
        assert_eq!(form.instruction(), "extract");
    }
}
