//! # 配置文件到提供商实例的端到端测试

use std::io::Write;
use std::time::Duration;

use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use provider_bridge::config::{ProviderKind, load_config};
use provider_bridge::error::ConfigError;
use provider_bridge::providers::LinearProvider;
use provider_bridge::{IssueTracker, ProviderContext};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn provider_built_from_config_file_calls_configured_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"team": {"issues": {"nodes": [{"id": "1", "title": "Bug"}]}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = write_config(&format!(
        r#"
[executor]
timeout_seconds = 3

[[providers]]
id = "tracker"
kind = "linear"
description = "Linear Input Provider"
endpoint = "{}/graphql"

[providers.authentication]
api_token = "t"
team_id = "T1"
"#,
        server.uri()
    ));

    let app = load_config(file.path()).unwrap();
    let entry = app.first_of_kind(ProviderKind::Linear).unwrap();
    let options = app.executor_options(entry);
    assert_eq!(options.timeout, Duration::from_secs(3));

    let provider = LinearProvider::with_options(
        &ProviderContext::single_tenant(),
        entry.id.clone(),
        &entry.provider_config(),
        &options,
    )
    .unwrap();

    let issues = provider.fetch_issues(None).await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].description, None);
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let file = write_config("[[providers]\nid = ");
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
