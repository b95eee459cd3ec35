//! # 上游请求执行器
//!
//! 由每个提供商组合持有：附加认证头、限时发送、把传输与响应层面的失败
//! 统一归类为 `ProviderError`。本层不做重试，创建类操作无法安全地盲目重放。

use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::request::UpstreamRequest;
use crate::auth::{REDACTED, Redactor, Secret};
use crate::config::DEFAULT_TIMEOUT_SECONDS;
use crate::error::{InvalidField, ProviderError, Result};
use crate::logging::{LogComponent, LogStage, SYSTEM_REQUEST_ID};
use crate::{ldebug, lwarn};

/// 透传调用方关联 ID 的请求头
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// 执行器选项
#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// 覆盖提供商默认端点
    pub endpoint: Option<String>,
    /// 单次调用的时限（含读取响应体）
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            user_agent: concat!("provider-bridge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ExecutorOptions {
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// 成功的上游响应
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    provider: &'static str,
    operation: &'static str,
    status: u16,
    body: Value,
}

impl UpstreamResponse {
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// 解码 JSON Pointer 处的值；缺失或形状不符都视为上游错误
    pub fn decode_at<T: DeserializeOwned>(&self, pointer: &str) -> Result<T> {
        let value = self.body.pointer(pointer).ok_or_else(|| {
            ProviderError::upstream(
                self.provider,
                self.operation,
                Some(self.status),
                format!("response missing {pointer}"),
            )
        })?;

        serde_json::from_value(value.clone()).map_err(|e| {
            ProviderError::upstream(
                self.provider,
                self.operation,
                Some(self.status),
                format!("unexpected response shape at {pointer}: {e}"),
            )
        })
    }
}

/// 上游请求执行器
#[derive(Debug)]
pub struct RequestExecutor {
    provider: &'static str,
    endpoint: String,
    credential: Secret,
    redactor: Redactor,
    timeout: Duration,
    user_agent: String,
    /// 首次调用时才建立，`close` 后释放
    client: OnceCell<Client>,
}

impl RequestExecutor {
    /// 创建执行器，端点与超时在此校验
    pub fn new(
        provider: &'static str,
        default_endpoint: &str,
        credential: Secret,
        redactor: Redactor,
        options: &ExecutorOptions,
    ) -> Result<Self> {
        let endpoint = options.endpoint.as_deref().unwrap_or(default_endpoint);

        let mut invalid = Vec::new();
        match Url::parse(endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => invalid.push(InvalidField {
                name: "endpoint".to_string(),
                reason: format!("unsupported scheme: {}", url.scheme()),
            }),
            Err(e) => invalid.push(InvalidField {
                name: "endpoint".to_string(),
                reason: e.to_string(),
            }),
        }
        if options.timeout.is_zero() {
            invalid.push(InvalidField {
                name: "timeout".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if !invalid.is_empty() {
            return Err(ProviderError::config_validation(provider, Vec::new(), invalid));
        }

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
            credential,
            redactor,
            timeout: options.timeout,
            user_agent: options.user_agent.clone(),
            client: OnceCell::new(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 连接句柄是否已建立
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.client.get().is_some()
    }

    /// 释放连接句柄，返回是否确实释放了一个已建立的句柄
    pub fn close(&mut self) -> bool {
        self.client.take().is_some()
    }

    fn client(&self) -> Result<&Client> {
        self.client
            .get_or_try_init(|| {
                Client::builder()
                    .timeout(self.timeout)
                    .user_agent(self.user_agent.as_str())
                    .build()
            })
            .map_err(|e| {
                ProviderError::upstream(
                    self.provider,
                    "open_client",
                    None,
                    self.redactor.redact(&e.to_string()),
                )
            })
    }

    /// 可安全写入日志的请求描述：凭证与所有敏感值均已掩码
    #[must_use]
    pub fn describe_for_log(&self, request: &UpstreamRequest, correlation_id: Option<&str>) -> String {
        let body = request
            .body
            .to_bytes()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();
        let correlation = correlation_id
            .map(|id| format!(", {CORRELATION_ID_HEADER}: {id}"))
            .unwrap_or_default();
        let rendered = format!(
            "POST {} headers={{authorization: Bearer {REDACTED}, content-type: application/json{correlation}}} body={body}",
            request.url(&self.endpoint),
        );
        self.redactor.redact(&rendered)
    }

    fn timeout_error(&self, request_id: &str, operation: &'static str) -> ProviderError {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        lwarn!(
            request_id,
            LogStage::ResponseFailure,
            LogComponent::Executor,
            operation,
            &format!("{} {operation} 超时: {timeout_ms}ms", self.provider)
        );
        ProviderError::timeout(self.provider, operation, timeout_ms)
    }

    /// 发送一次上游调用
    ///
    /// 返回值要么是完整成功的响应，要么是错误；不存在部分结果。
    pub async fn execute(
        &self,
        request: &UpstreamRequest,
        correlation_id: Option<&str>,
    ) -> Result<UpstreamResponse> {
        let request_id = correlation_id.unwrap_or(SYSTEM_REQUEST_ID);
        let operation = request.operation;

        let body = request.body.to_bytes().map_err(|e| {
            ProviderError::upstream(
                self.provider,
                operation,
                None,
                format!("request serialization failed: {e}"),
            )
        })?;

        ldebug!(
            request_id,
            LogStage::UpstreamRequest,
            LogComponent::Executor,
            operation,
            &self.describe_for_log(request, correlation_id)
        );

        let client = self.client()?;
        let mut builder = client
            .post(request.url(&self.endpoint))
            .header(AUTHORIZATION, format!("Bearer {}", self.credential.expose()))
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(id) = correlation_id {
            builder = builder.header(CORRELATION_ID_HEADER, id);
        }

        let started = Instant::now();
        let call = async {
            let response = builder.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) if err.is_timeout() => {
                return Err(self.timeout_error(request_id, operation));
            }
            Ok(Err(err)) => {
                let detail = self.redactor.redact(&err.to_string());
                lwarn!(
                    request_id,
                    LogStage::ResponseFailure,
                    LogComponent::Executor,
                    operation,
                    &format!("{} {operation} 传输失败: {detail}", self.provider)
                );
                return Err(ProviderError::upstream(
                    self.provider,
                    operation,
                    err.status().map(|s| s.as_u16()),
                    detail,
                ));
            }
            Err(_elapsed) => return Err(self.timeout_error(request_id, operation)),
        };

        let status = status.as_u16();
        ldebug!(
            request_id,
            LogStage::Response,
            LogComponent::Executor,
            operation,
            &format!("{} {operation} 响应: status={status}, 耗时: {:?}", self.provider, started.elapsed())
        );

        let body = self.classify(request, status, &text).inspect_err(|err| {
            lwarn!(
                request_id,
                LogStage::ResponseFailure,
                LogComponent::Executor,
                operation,
                &err.to_string()
            );
        })?;

        Ok(UpstreamResponse {
            provider: self.provider,
            operation,
            status,
            body,
        })
    }

    /// 响应分类：HTTP 状态与应用层标志两层都必须成功
    fn classify(&self, request: &UpstreamRequest, status: u16, text: &str) -> Result<Value> {
        let fail = |body: String| {
            ProviderError::upstream(self.provider, request.operation, Some(status), body)
        };

        if !(200..300).contains(&status) {
            return Err(fail(self.redactor.redact(text)));
        }

        let value: Value = serde_json::from_str(text).map_err(|e| {
            fail(self.redactor.redact(&format!("invalid JSON response ({e}): {text}")))
        })?;

        // GraphQL 即使 200 也可能带 errors
        if request.body.is_graphql()
            && value
                .get("errors")
                .is_some_and(|errors| !errors.is_null() && errors.as_array().is_none_or(|a| !a.is_empty()))
        {
            return Err(fail(self.redactor.redact(text)));
        }

        if value.get("success") == Some(&Value::Bool(false)) {
            return Err(fail(self.redactor.redact(text)));
        }

        let flag_ok = request
            .success_flag
            .is_none_or(|pointer| value.pointer(pointer) == Some(&Value::Bool(true)));
        if !flag_ok {
            return Err(fail(self.redactor.redact(text)));
        }

        Ok(value)
    }
}
