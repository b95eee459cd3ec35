//! # 错误类型定义

use thiserror::Error;

/// 提供商主要错误类型
///
/// 四类失败对调用方都是显式的：配置校验、上游拒绝/传输失败、超时、非法状态。
/// 所有字符串表示在构造前已经过脱敏，不包含任何敏感配置值。
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 认证配置校验失败（构造时同步抛出，不可重试）
    #[error("{provider} 配置校验失败: {}", describe_fields(.missing, .invalid))]
    ConfigValidation {
        provider: String,
        missing: Vec<String>,
        invalid: Vec<InvalidField>,
    },

    /// 上游拒绝了操作，或传输层本身失败
    #[error("{provider} {operation} 上游错误 (status={}): {body}", display_status(.status))]
    Upstream {
        provider: String,
        operation: String,
        status: Option<u16>,
        body: String,
    },

    /// 调用未在配置的时限内完成
    #[error("{provider} {operation} 超时: {timeout_ms}ms")]
    Timeout {
        provider: String,
        operation: String,
        timeout_ms: u64,
    },

    /// 在释放后继续调用
    #[error("{provider} '{provider_id}' 状态非法: {state}")]
    InvalidState {
        provider: String,
        provider_id: String,
        state: String,
    },
}

/// 值无法使用的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub name: String,
    pub reason: String,
}

fn describe_fields(missing: &[String], invalid: &[InvalidField]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing required fields: {}", missing.join(", ")));
    }
    if !invalid.is_empty() {
        let invalid = invalid
            .iter()
            .map(|f| format!("{} ({})", f.name, f.reason))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("invalid fields: {invalid}"));
    }
    parts.join("; ")
}

#[allow(clippy::ref_option)]
fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl ProviderError {
    /// 创建配置校验错误
    pub fn config_validation<P: Into<String>>(
        provider: P,
        missing: Vec<String>,
        invalid: Vec<InvalidField>,
    ) -> Self {
        Self::ConfigValidation {
            provider: provider.into(),
            missing,
            invalid,
        }
    }

    /// 创建上游错误
    pub fn upstream<P: Into<String>, O: Into<String>, B: Into<String>>(
        provider: P,
        operation: O,
        status: Option<u16>,
        body: B,
    ) -> Self {
        Self::Upstream {
            provider: provider.into(),
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// 创建超时错误
    pub fn timeout<P: Into<String>, O: Into<String>>(
        provider: P,
        operation: O,
        timeout_ms: u64,
    ) -> Self {
        Self::Timeout {
            provider: provider.into(),
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// 创建非法状态错误
    pub fn invalid_state<P: Into<String>, I: Into<String>, S: Into<String>>(
        provider: P,
        provider_id: I,
        state: S,
    ) -> Self {
        Self::InvalidState {
            provider: provider.into(),
            provider_id: provider_id.into(),
            state: state.into(),
        }
    }

    /// 出错的提供商类型名
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::ConfigValidation { provider, .. }
            | Self::Upstream { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::InvalidState { provider, .. } => provider,
        }
    }

    /// 上游 HTTP 状态码（如有）
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// 缺失的必填字段（仅配置校验错误）
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::ConfigValidation { missing, .. } => missing,
            _ => &[],
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    /// 错误分类，用于日志与调用方的重试策略
    #[must_use]
    pub const fn category(&self) -> super::ErrorCategory {
        match self {
            Self::ConfigValidation { .. } | Self::InvalidState { .. } => {
                super::ErrorCategory::Client
            }
            Self::Upstream { .. } | Self::Timeout { .. } => super::ErrorCategory::Upstream,
        }
    }
}
