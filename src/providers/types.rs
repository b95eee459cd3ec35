//! # 领域类型定义

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 问题（工单）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// 问题编辑：`None` 表示不修改该字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl IssueUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// 逐字段构建上游 `input`，只包含调用方提供的键
    #[must_use]
    pub fn to_input(&self) -> Map<String, Value> {
        let mut input = Map::new();
        if let Some(title) = &self.title {
            input.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(description) = &self.description {
            input.insert("description".to_string(), Value::String(description.clone()));
        }
        input
    }
}

/// 待发送的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    /// 为空时使用提供商配置的默认频道
    pub channel: Option<String>,
    /// 回复到某条消息的线程
    pub thread_id: Option<String>,
}

impl OutboundMessage {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            channel: None,
            thread_id: None,
        }
    }

    #[must_use]
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    #[must_use]
    pub fn in_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }
}

/// 消息发送回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    pub channel: String,
    pub message_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_input_omits_unset_fields() {
        let update = IssueUpdate::new().title("New");
        assert_eq!(Value::Object(update.to_input()), json!({"title": "New"}));
        assert!(!update.to_input().contains_key("description"));
    }

    #[test]
    fn update_input_keeps_explicit_empty_string() {
        let update = IssueUpdate::new().description("");
        assert_eq!(Value::Object(update.to_input()), json!({"description": ""}));
    }

    #[test]
    fn empty_update() {
        assert!(IssueUpdate::new().is_empty());
        assert!(IssueUpdate::new().to_input().is_empty());
    }

    #[test]
    fn issue_description_defaults_to_none() {
        let issue: Issue = serde_json::from_value(json!({"id": "1", "title": "Bug"})).unwrap();
        assert_eq!(issue.description, None);
    }
}
