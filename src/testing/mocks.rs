//! # Mock 上游服务
//!
//! 基于 wiremock 的上游替身，记录收到的请求以便断言

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock 上游服务器
pub struct MockUpstream {
    server: MockServer,
}

impl MockUpstream {
    /// 启动 Mock 服务器
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// 获取服务器 URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// GraphQL 端点
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.server.uri())
    }

    /// 添加 POST 响应 Mock
    pub async fn mock_post(&self, route: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// 添加 GraphQL 响应 Mock
    pub async fn mock_graphql(&self, status: u16, body: Value) {
        self.mock_post("/graphql", status, body).await;
    }

    /// 添加原始文本响应 Mock
    pub async fn mock_raw(&self, route: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// 添加延迟响应 Mock，用于超时测试
    pub async fn mock_delayed(&self, route: &str, delay: Duration, body: Value) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// 收到的请求数
    pub async fn received_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }

    /// 收到的 JSON 请求体
    pub async fn received_json(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }

    /// 收到的某个请求头（每个请求一项）
    pub async fn received_header(&self, name: &str) -> Vec<Option<String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                request
                    .headers
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}
