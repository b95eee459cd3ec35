//! # 配置管理模块
//!
//! 提供商实例配置与应用级 TOML 配置的加载、验证

mod app_config;
mod provider_config;

pub use app_config::{AppConfig, DEFAULT_TIMEOUT_SECONDS, ExecutorSettings, ProviderEntry};
pub use provider_config::{ProviderConfig, ProviderContext, ProviderKind};

use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::logging::{LogComponent, LogStage, SYSTEM_REQUEST_ID};
use crate::linfo;

/// 加载并验证配置文件
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_config(&content)?;

    linfo!(
        SYSTEM_REQUEST_ID,
        LogStage::Configuration,
        LogComponent::Config,
        "load_config",
        &format!(
            "配置加载完成: {} ({} 个提供商)",
            path.display(),
            config.providers.len()
        )
    );

    Ok(config)
}

/// 解析并验证 TOML 配置文本
pub fn parse_config(content: &str) -> ConfigResult<AppConfig> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[executor]
timeout_seconds = 5

[[providers]]
id = "linear"
kind = "linear"
description = "Linear Input Provider"
endpoint = "http://127.0.0.1:9000/graphql"

[providers.authentication]
api_token = "t"
team_id = "T1"

[[providers]]
id = "alerts"
kind = "slack"

[providers.authentication]
access_token = "xoxb"
"#;

    #[test]
    fn parse_sample_config() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.executor.timeout_seconds, 5);
        assert_eq!(config.providers.len(), 2);

        let linear = config.find("linear").unwrap();
        assert_eq!(linear.kind().unwrap(), ProviderKind::Linear);
        let options = config.executor_options(linear);
        assert_eq!(options.timeout.as_secs(), 5);
        assert_eq!(options.endpoint.as_deref(), Some("http://127.0.0.1:9000/graphql"));

        assert_eq!(
            config.first_of_kind(ProviderKind::Slack).map(|p| p.id.as_str()),
            Some("alerts")
        );
    }

    #[test]
    fn defaults_apply_when_sections_missing() {
        let config = parse_config("").unwrap();
        assert_eq!(config.executor.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.executor.user_agent.starts_with("provider-bridge/"));
        assert!(config.providers.is_empty());
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = parse_config("[executor]\ntimeout_seconds = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_ids_and_unknown_kinds() {
        let dup = r#"
[[providers]]
id = "a"
kind = "linear"
[[providers]]
id = "a"
kind = "slack"
"#;
        assert!(parse_config(dup).unwrap_err().to_string().contains("duplicate provider id: a"));

        let unknown = "[[providers]]\nid = \"a\"\nkind = \"jira\"\n";
        assert!(parse_config(unknown).unwrap_err().to_string().contains("unknown provider kind"));
    }

    #[test]
    fn debug_output_hides_authentication_values() {
        let config = parse_config(SAMPLE).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("team_id"));
        assert!(!debug.contains("xoxb"));
    }

    #[test]
    fn load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.providers.len(), 2);
    }

    #[test]
    fn load_config_missing_file() {
        let err = load_config("/nonexistent/providers.toml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
