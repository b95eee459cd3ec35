//! # 测试数据 Fixtures
//!
//! 提供测试用的配置与上游响应

use std::time::Duration;

use serde_json::{Value, json};

use crate::config::{ProviderConfig, ProviderContext};
use crate::provider::ExecutorOptions;

fn config(description: &str, authentication: Value) -> ProviderConfig {
    ProviderConfig::new(
        description,
        authentication.as_object().cloned().unwrap_or_default(),
    )
}

/// Linear 提供商配置
pub fn linear_config(api_token: &str, team_id: &str) -> ProviderConfig {
    config(
        "Linear Input Provider",
        json!({"api_token": api_token, "team_id": team_id}),
    )
}

/// Slack 提供商配置
pub fn slack_config(access_token: &str, default_channel: Option<&str>) -> ProviderConfig {
    let mut authentication = json!({"access_token": access_token});
    if let Some(channel) = default_channel {
        authentication["default_channel"] = json!(channel);
    }
    config("Slack Output Provider", authentication)
}

/// 测试上下文
pub fn test_context() -> ProviderContext {
    ProviderContext::new("test-tenant").with_workflow("test")
}

/// 指向 Mock 上游的执行器选项
pub fn mock_options(endpoint: impl Into<String>) -> ExecutorOptions {
    ExecutorOptions::default()
        .with_endpoint(endpoint)
        .with_timeout(Duration::from_secs(5))
}

/// Linear `team.issues` 查询响应
pub fn linear_issues_response(issues: &[(&str, &str, &str)]) -> Value {
    let nodes: Vec<Value> = issues
        .iter()
        .map(|(id, title, description)| {
            json!({"id": id, "title": title, "description": description})
        })
        .collect();
    json!({"data": {"team": {"issues": {"nodes": nodes}}}})
}
