//! # 提供商实例配置
//!
//! 调用方为每个提供商实例构建一次 `ProviderConfig`，构造后不可变。

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::auth::AuthField;
use crate::error::ConfigError;

/// 如何连接一个提供商实例
///
/// `authentication` 是自由格式的映射，由各提供商的字段表校验。
/// 不实现 `Serialize`，`Debug` 只显示字段名。
#[derive(Clone, Default, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub authentication: Map<String, Value>,
}

impl ProviderConfig {
    #[must_use]
    pub fn new(description: impl Into<String>, authentication: Map<String, Value>) -> Self {
        Self {
            description: description.into(),
            authentication,
        }
    }

    /// 从键值查找函数构建配置，键名为 `{PREFIX}_{FIELD}` 的大写形式
    ///
    /// 例如前缀 `LINEAR` 与字段 `api_token` 对应 `LINEAR_API_TOKEN`。
    pub fn from_lookup<F>(
        description: impl Into<String>,
        prefix: &str,
        fields: &[AuthField],
        mut lookup: F,
    ) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let authentication = fields
            .iter()
            .filter_map(|field| {
                let key = format!("{prefix}_{}", field.name).to_uppercase();
                lookup(&key).map(|value| (field.name.to_string(), Value::String(value)))
            })
            .collect();
        Self::new(description, authentication)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("description", &self.description)
            .field(
                "authentication",
                &self.authentication.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// 调用方的执行上下文
///
/// 只用于日志字段，不参与任何请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderContext {
    pub tenant_id: String,
    pub workflow_id: Option<String>,
}

impl ProviderContext {
    #[must_use]
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            workflow_id: None,
        }
    }

    /// 单租户部署使用的默认上下文
    #[must_use]
    pub fn single_tenant() -> Self {
        Self::new("singletenant")
    }

    #[must_use]
    pub fn with_workflow(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }
}

impl Default for ProviderContext {
    fn default() -> Self {
        Self::single_tenant()
    }
}

/// 已支持的提供商种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Linear,
    Slack,
}

impl ProviderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Slack => "slack",
        }
    }

    fn normalize(input: &str) -> &str {
        input.split(':').next().unwrap_or(input).trim()
    }

    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match Self::normalize(name).to_ascii_lowercase().as_str() {
            "linear" | "linear-app" => Ok(Self::Linear),
            "slack" => Ok(Self::Slack),
            other => Err(ConfigError::invalid(format!("unknown provider kind: {other}"))),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
