//! # 上游请求描述
//!
//! 一次逻辑操作 = 操作名 + 请求体 + 可选的应用层成功标志位置。

use serde_json::{Value, json};

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// GraphQL 查询/变更
    GraphQl { query: &'static str, variables: Value },
    /// REST JSON 请求体
    Json(Value),
}

impl RequestBody {
    /// 序列化为请求字节
    ///
    /// `serde_json` 的对象按键排序，同一请求多次序列化结果逐字节一致。
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Self::GraphQl { query, variables } => serde_json::to_vec(&json!({
                "query": query,
                "variables": variables,
            })),
            Self::Json(body) => serde_json::to_vec(body),
        }
    }

    #[must_use]
    pub const fn is_graphql(&self) -> bool {
        matches!(self, Self::GraphQl { .. })
    }
}

/// 一次上游调用
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    /// 操作名，用于日志与错误
    pub operation: &'static str,
    /// 相对于端点的路径（REST 风格接口）
    pub path: Option<&'static str>,
    pub body: RequestBody,
    /// 必须为 `true` 的 JSON Pointer，例如 `/data/issueCreate/success`
    pub success_flag: Option<&'static str>,
}

impl UpstreamRequest {
    #[must_use]
    pub fn graphql(operation: &'static str, query: &'static str, variables: Value) -> Self {
        Self {
            operation,
            path: None,
            body: RequestBody::GraphQl { query, variables },
            success_flag: None,
        }
    }

    #[must_use]
    pub fn json(operation: &'static str, path: &'static str, body: Value) -> Self {
        Self {
            operation,
            path: Some(path),
            body: RequestBody::Json(body),
            success_flag: None,
        }
    }

    /// 声明响应中的应用层成功标志
    #[must_use]
    pub fn expect_success_at(mut self, pointer: &'static str) -> Self {
        self.success_flag = Some(pointer);
        self
    }

    /// 变量或请求体（GraphQL 取 `variables`）
    #[must_use]
    pub const fn payload(&self) -> &Value {
        match &self.body {
            RequestBody::GraphQl { variables, .. } => variables,
            RequestBody::Json(body) => body,
        }
    }

    /// 拼接最终 URL
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        match self.path {
            Some(path) => format!(
                "{}/{}",
                endpoint.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => endpoint.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_body_is_deterministic() {
        let request = UpstreamRequest::graphql(
            "create_issue",
            "mutation X { x }",
            json!({"input": {"title": "t", "description": "d", "teamId": "T1"}}),
        );
        let first = request.body.to_bytes().unwrap();
        let second = request.body.to_bytes().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            r#"{"query":"mutation X { x }","variables":{"input":{"description":"d","teamId":"T1","title":"t"}}}"#
        );
    }

    #[test]
    fn url_joins_rest_path() {
        let request = UpstreamRequest::json("notify", "chat.postMessage", json!({}));
        assert_eq!(
            request.url("https://slack.com/api/"),
            "https://slack.com/api/chat.postMessage"
        );
        let graphql = UpstreamRequest::graphql("fetch_issues", "query", json!({}));
        assert_eq!(
            graphql.url("https://api.linear.app/graphql"),
            "https://api.linear.app/graphql"
        );
    }

    #[test]
    fn success_flag_is_recorded() {
        let request = UpstreamRequest::json("notify", "chat.postMessage", json!({}))
            .expect_success_at("/ok");
        assert_eq!(request.success_flag, Some("/ok"));
        assert!(!request.body.is_graphql());
    }
}
