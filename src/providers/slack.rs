//! # Slack 消息提供商
//!
//! 通过 Slack Web API `chat.postMessage` 发送消息。Slack 对业务失败同样返回
//! HTTP 200，并以 `ok: false` 标识，执行器会据此归类为上游错误。

use async_trait::async_trait;
use serde_json::{Value, json};

use super::types::{MessageReceipt, OutboundMessage};
use crate::auth::{AuthConfig, AuthField, AuthSchema, Secret, ValidatedAuth};
use crate::config::{ProviderConfig, ProviderContext};
use crate::error::{ProviderError, Result};
use crate::linfo;
use crate::logging::{LogComponent, LogStage, SYSTEM_REQUEST_ID};
use crate::provider::{
    ExecutorOptions, Lifecycle, LifecycleState, Notifier, Provider, RequestExecutor,
    UpstreamRequest,
};

/// 提供商类型名
pub const SLACK_PROVIDER: &str = "SlackProvider";

/// Slack Web API 基础地址
pub const SLACK_API_URL: &str = "https://slack.com/api";

/// Slack 认证配置
#[derive(Debug)]
pub struct SlackAuthConfig {
    pub access_token: Secret,
    pub default_channel: Option<String>,
}

impl AuthSchema for SlackAuthConfig {
    const FIELDS: &'static [AuthField] = &[
        AuthField::required("access_token", "Slack Bot Token").sensitive(),
        AuthField::optional("default_channel", "Channel used when a message names none"),
    ];

    fn from_validated(values: &mut ValidatedAuth) -> Result<Self> {
        Ok(Self {
            access_token: values.secret("access_token")?,
            default_channel: values.optional("default_channel"),
        })
    }
}

/// Slack 提供商实例
#[derive(Debug)]
pub struct SlackProvider {
    provider_id: String,
    context: ProviderContext,
    config: ProviderConfig,
    authentication_config: AuthConfig<SlackAuthConfig>,
    executor: RequestExecutor,
    lifecycle: Lifecycle,
}

impl SlackProvider {
    pub fn new(
        context: &ProviderContext,
        provider_id: impl Into<String>,
        config: &ProviderConfig,
    ) -> Result<Self> {
        Self::with_options(context, provider_id, config, &ExecutorOptions::default())
    }

    pub fn with_options(
        context: &ProviderContext,
        provider_id: impl Into<String>,
        config: &ProviderConfig,
        options: &ExecutorOptions,
    ) -> Result<Self> {
        let provider_id = provider_id.into();
        let mut lifecycle = Lifecycle::new();

        let authentication_config = AuthConfig::<SlackAuthConfig>::validate(SLACK_PROVIDER, config)?;
        let executor = RequestExecutor::new(
            SLACK_PROVIDER,
            SLACK_API_URL,
            authentication_config.access_token.clone(),
            authentication_config.redactor().clone(),
            options,
        )?;
        lifecycle.mark_ready();

        linfo!(
            SYSTEM_REQUEST_ID,
            LogStage::Lifecycle,
            LogComponent::Slack,
            "provider_ready",
            &format!(
                "{SLACK_PROVIDER} '{provider_id}' 就绪: tenant={}, auth={}",
                context.tenant_id,
                authentication_config.redacted()
            )
        );

        Ok(Self {
            provider_id,
            context: context.clone(),
            config: config.clone(),
            authentication_config,
            executor,
            lifecycle,
        })
    }

    #[must_use]
    pub const fn context(&self) -> &ProviderContext {
        &self.context
    }

    /// 消息未指定频道时回落到默认频道；两者都没有属于配置缺失
    fn resolve_channel<'a>(&'a self, message: &'a OutboundMessage) -> Result<&'a str> {
        message
            .channel
            .as_deref()
            .or(self.authentication_config.default_channel.as_deref())
            .ok_or_else(|| {
                ProviderError::config_validation(
                    SLACK_PROVIDER,
                    vec!["default_channel".to_string()],
                    Vec::new(),
                )
            })
    }

    fn post_message_request(channel: &str, message: &OutboundMessage) -> UpstreamRequest {
        let mut body = json!({
            "channel": channel,
            "text": message.text,
        });
        if let Some(thread_id) = &message.thread_id {
            body["thread_ts"] = Value::String(thread_id.clone());
        }
        UpstreamRequest::json("notify", "chat.postMessage", body).expect_success_at("/ok")
    }
}

impl Provider for SlackProvider {
    fn provider_type(&self) -> &'static str {
        SLACK_PROVIDER
    }

    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn description(&self) -> &str {
        &self.config.description
    }

    fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    fn dispose(&mut self) {
        if self.lifecycle.dispose() {
            self.executor.close();
            linfo!(
                SYSTEM_REQUEST_ID,
                LogStage::Lifecycle,
                LogComponent::Slack,
                "dispose",
                &format!("{SLACK_PROVIDER} '{}' 已释放", self.provider_id)
            );
        }
    }
}

#[async_trait]
impl Notifier for SlackProvider {
    async fn notify(
        &self,
        message: &OutboundMessage,
        correlation_id: Option<&str>,
    ) -> Result<MessageReceipt> {
        self.lifecycle.ensure_ready(SLACK_PROVIDER, &self.provider_id)?;
        let channel = self.resolve_channel(message)?;
        let response = self
            .executor
            .execute(&Self::post_message_request(channel, message), correlation_id)
            .await?;

        Ok(MessageReceipt {
            channel: response.decode_at("/channel")?,
            message_id: response.decode_at("/ts")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockUpstream, mock_options, slack_config, test_context};

    #[test]
    fn default_channel_is_optional() {
        let provider =
            SlackProvider::new(&test_context(), "alerts", &slack_config("xoxb-1", None)).unwrap();
        assert_eq!(provider.state(), LifecycleState::Ready);
        assert!(provider.authentication_config.default_channel.is_none());
    }

    #[test]
    fn thread_id_only_sent_when_present() {
        let plain = SlackProvider::post_message_request("C1", &OutboundMessage::new("hi"));
        assert_eq!(plain.payload(), &json!({"channel": "C1", "text": "hi"}));

        let threaded = SlackProvider::post_message_request(
            "C1",
            &OutboundMessage::new("hi").in_thread("1700000000.0001"),
        );
        assert_eq!(threaded.payload()["thread_ts"], json!("1700000000.0001"));
    }

    #[test]
    fn message_channel_overrides_default() {
        let provider = SlackProvider::new(
            &test_context(),
            "alerts",
            &slack_config("xoxb-1", Some("C-default")),
        )
        .unwrap();
        let explicit = OutboundMessage::new("hi").channel("C-explicit");
        assert_eq!(provider.resolve_channel(&explicit).unwrap(), "C-explicit");
        assert_eq!(
            provider.resolve_channel(&OutboundMessage::new("hi")).unwrap(),
            "C-default"
        );
    }

    #[tokio::test]
    async fn notify_without_any_channel_fails_before_network() {
        let provider =
            SlackProvider::new(&test_context(), "alerts", &slack_config("xoxb-1", None)).unwrap();
        let err = provider
            .notify(&OutboundMessage::new("hi"), None)
            .await
            .unwrap_err();
        assert_eq!(err.missing_fields(), ["default_channel"]);
    }

    #[tokio::test]
    async fn notify_decodes_receipt() {
        let upstream = MockUpstream::start().await;
        upstream
            .mock_post(
                "/chat.postMessage",
                200,
                json!({"ok": true, "channel": "C1", "ts": "1700000000.0002"}),
            )
            .await;
        let provider = SlackProvider::with_options(
            &test_context(),
            "alerts",
            &slack_config("xoxb-1", Some("C1")),
            &mock_options(upstream.uri()),
        )
        .unwrap();

        let receipt = provider.notify(&OutboundMessage::new("hi"), None).await.unwrap();
        assert_eq!(receipt.message_id, "1700000000.0002");
        assert_eq!(upstream.received_count().await, 1);
    }
}
