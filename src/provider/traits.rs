use async_trait::async_trait;

use super::types::LifecycleState;
use crate::error::Result;
use crate::providers::types::{Issue, IssueUpdate, MessageReceipt, OutboundMessage};

/// 所有提供商共有的身份与生命周期接口
///
/// 领域操作取 `&self`，可并发调用；`dispose` 取 `&mut self`，
/// 因此释放与进行中的调用天然互斥。
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// 提供商类型名，出现在所有错误中
    fn provider_type(&self) -> &'static str;

    /// 调用方分配的实例 ID
    fn provider_id(&self) -> &str;

    fn description(&self) -> &str;

    fn state(&self) -> LifecycleState;

    /// 释放连接句柄；重复调用无副作用
    fn dispose(&mut self);
}

/// 问题跟踪类提供商
#[async_trait]
pub trait IssueTracker: Provider {
    async fn fetch_issues(&self, correlation_id: Option<&str>) -> Result<Vec<Issue>>;

    async fn create_issue(
        &self,
        title: &str,
        description: &str,
        correlation_id: Option<&str>,
    ) -> Result<Issue>;

    /// 只发送调用方提供的字段，未提供的字段保持上游原值
    async fn edit_issue(
        &self,
        issue_id: &str,
        update: &IssueUpdate,
        correlation_id: Option<&str>,
    ) -> Result<Issue>;

    async fn delete_issue(&self, issue_id: &str, correlation_id: Option<&str>) -> Result<bool>;
}

/// 消息通知类提供商
#[async_trait]
pub trait Notifier: Provider {
    async fn notify(
        &self,
        message: &OutboundMessage,
        correlation_id: Option<&str>,
    ) -> Result<MessageReceipt>;
}
