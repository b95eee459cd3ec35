//! # 应用配置结构定义

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::provider_config::{ProviderConfig, ProviderKind};
use crate::error::ConfigResult;
use crate::ensure_config;
use crate::provider::ExecutorOptions;

/// 默认上游调用超时（秒）
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// 应用主配置结构
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 上游调用配置
    #[serde(default)]
    pub executor: ExecutorSettings,
    /// 提供商实例列表
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

/// 上游调用配置
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorSettings {
    /// 单次调用超时时间（秒）
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_user_agent() -> String {
    concat!("provider-bridge/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

/// 单个提供商实例
///
/// `Debug` 只通过 `ProviderConfig` 输出认证字段名。
#[derive(Clone, Deserialize)]
pub struct ProviderEntry {
    /// 调用方分配的实例 ID
    pub id: String,
    /// 提供商种类，例如 `linear`、`slack`
    pub kind: String,
    #[serde(default)]
    pub description: String,
    /// 覆盖默认上游地址（测试或自建网关）
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub authentication: Map<String, Value>,
}

impl ProviderEntry {
    pub fn kind(&self) -> ConfigResult<ProviderKind> {
        ProviderKind::parse(&self.kind)
    }

    #[must_use]
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(self.description.clone(), self.authentication.clone())
    }
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("config", &self.provider_config())
            .finish()
    }
}

impl AppConfig {
    /// 按 ID 查找提供商实例
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ProviderEntry> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// 第一个指定种类的实例
    #[must_use]
    pub fn first_of_kind(&self, kind: ProviderKind) -> Option<&ProviderEntry> {
        self.providers
            .iter()
            .find(|p| p.kind().is_ok_and(|k| k == kind))
    }

    /// 为某个实例生成执行器选项
    #[must_use]
    pub fn executor_options(&self, entry: &ProviderEntry) -> ExecutorOptions {
        ExecutorOptions {
            endpoint: entry.endpoint.clone(),
            timeout: Duration::from_secs(self.executor.timeout_seconds),
            user_agent: self.executor.user_agent.clone(),
        }
    }

    /// 验证配置有效性
    pub fn validate(&self) -> ConfigResult<()> {
        ensure_config!(
            self.executor.timeout_seconds > 0,
            "executor.timeout_seconds must be greater than 0"
        );
        ensure_config!(
            !self.executor.user_agent.trim().is_empty(),
            "executor.user_agent must not be empty"
        );

        let mut seen = HashSet::new();
        for entry in &self.providers {
            ensure_config!(!entry.id.trim().is_empty(), "provider id must not be empty");
            ensure_config!(
                seen.insert(entry.id.as_str()),
                "duplicate provider id: {}",
                entry.id
            );
            entry.kind()?;
        }
        Ok(())
    }
}
