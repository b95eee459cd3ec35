use std::fmt;

use regex::Regex;

use super::secret::Secret;

/// 脱敏掩码
pub const REDACTED: &str = "***";

/// 敏感值前后不能紧邻的字符，否则视为更长词的一部分
const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn at_boundary(c: Option<char>) -> bool {
    c.is_none_or(|c| !is_word_char(c))
}

/// 敏感值擦除器
///
/// 持有一个提供商全部敏感字段的明文（及其 JSON 转义形式），
/// 用于在写日志或构造错误前擦除它们。只擦除独立成词的出现，
/// 短值不会破坏上游响应体的其余内容。
#[derive(Clone, Default)]
pub struct Redactor {
    /// 长值优先
    variants: Vec<String>,
    /// 候选位置定位，编译失败时逐字符扫描
    pattern: Option<Regex>,
}

impl Redactor {
    #[must_use]
    pub fn new<'a>(secrets: impl IntoIterator<Item = &'a Secret>) -> Self {
        let mut variants = Vec::new();
        for secret in secrets.into_iter().filter(|s| !s.is_empty()) {
            let raw = secret.expose();
            variants.push(raw.to_string());
            // 上游在 JSON 字符串里回显时会转义引号与反斜杠
            if let Ok(quoted) = serde_json::to_string(raw) {
                let escaped = &quoted[1..quoted.len() - 1];
                if escaped != raw {
                    variants.push(escaped.to_string());
                }
            }
        }
        variants.sort_by(|a, b| b.len().cmp(&a.len()));
        variants.dedup();

        let pattern = if variants.is_empty() {
            None
        } else {
            let alternation = variants
                .iter()
                .map(|v| regex::escape(v))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&alternation).ok()
        };

        Self { variants, pattern }
    }

    fn next_candidate(&self, text: &str, from: usize) -> Option<usize> {
        match &self.pattern {
            Some(pattern) => pattern.find_at(text, from).map(|m| m.start()),
            None => text[from..]
                .char_indices()
                .map(|(i, _)| from + i)
                .find(|&i| self.variants.iter().any(|v| text[i..].starts_with(v.as_str()))),
        }
    }

    /// 独立成词的敏感值在 `start` 处的长度
    fn whole_match_at(&self, text: &str, start: usize) -> Option<usize> {
        if !at_boundary(text[..start].chars().next_back()) {
            return None;
        }
        self.variants
            .iter()
            .filter(|v| text[start..].starts_with(v.as_str()))
            .map(String::len)
            .find(|len| at_boundary(text[start + len..].chars().next()))
    }

    /// 将文本中所有独立出现的敏感值替换为掩码
    #[must_use]
    pub fn redact(&self, text: &str) -> String {
        if self.variants.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut from = 0;
        while let Some(start) = self.next_candidate(text, from) {
            if let Some(len) = self.whole_match_at(text, start) {
                out.push_str(&text[copied..start]);
                out.push_str(REDACTED);
                copied = start + len;
                from = copied;
            } else {
                from = start + text[start..].chars().next().map_or(1, char::len_utf8);
            }
            if from >= text.len() {
                break;
            }
        }
        out.push_str(&text[copied..]);
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl fmt::Debug for Redactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Redactor")
            .field("secrets", &self.variants.len())
            .finish()
    }
}
