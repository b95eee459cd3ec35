//! # Linear 问题跟踪提供商
//!
//! 通过 Linear GraphQL API 读取、创建、编辑、删除团队下的问题

use async_trait::async_trait;
use serde_json::{Value, json};

use super::types::{Issue, IssueUpdate};
use crate::auth::{AuthConfig, AuthField, AuthSchema, Secret, ValidatedAuth};
use crate::config::{ProviderConfig, ProviderContext};
use crate::error::Result;
use crate::logging::{LogComponent, LogStage, SYSTEM_REQUEST_ID};
use crate::provider::{
    ExecutorOptions, IssueTracker, Lifecycle, LifecycleState, Provider, RequestExecutor,
    UpstreamRequest,
};
use crate::{ldebug, linfo};

/// 提供商类型名
pub const LINEAR_PROVIDER: &str = "LinearProvider";

/// Linear GraphQL 端点
pub const LINEAR_GRAPHQL_URL: &str = "https://api.linear.app/graphql";

const FETCH_ISSUES_QUERY: &str = r"
query TeamIssues($teamId: String!) {
  team(id: $teamId) {
    issues {
      nodes {
        id
        title
        description
      }
    }
  }
}
";

const CREATE_ISSUE_MUTATION: &str = r"
mutation IssueCreate($input: IssueCreateInput!) {
  issueCreate(input: $input) {
    success
    issue {
      id
      title
      description
    }
  }
}
";

const UPDATE_ISSUE_MUTATION: &str = r"
mutation IssueUpdate($id: String!, $input: IssueUpdateInput!) {
  issueUpdate(id: $id, input: $input) {
    success
    issue {
      id
      title
      description
    }
  }
}
";

const DELETE_ISSUE_MUTATION: &str = r"
mutation IssueDelete($id: String!) {
  issueDelete(id: $id) {
    success
  }
}
";

/// Linear 认证配置
#[derive(Debug)]
pub struct LinearAuthConfig {
    pub api_token: Secret,
    pub team_id: String,
}

impl AuthSchema for LinearAuthConfig {
    const FIELDS: &'static [AuthField] = &[
        AuthField::required("api_token", "Linear API Token").sensitive(),
        AuthField::required("team_id", "Linear Team ID"),
    ];

    fn from_validated(values: &mut ValidatedAuth) -> Result<Self> {
        Ok(Self {
            api_token: values.secret("api_token")?,
            team_id: values.required("team_id")?,
        })
    }
}

/// Linear 提供商实例
#[derive(Debug)]
pub struct LinearProvider {
    provider_id: String,
    context: ProviderContext,
    config: ProviderConfig,
    authentication_config: AuthConfig<LinearAuthConfig>,
    executor: RequestExecutor,
    lifecycle: Lifecycle,
}

impl LinearProvider {
    /// 创建并校验，使用默认端点与超时
    pub fn new(
        context: &ProviderContext,
        provider_id: impl Into<String>,
        config: &ProviderConfig,
    ) -> Result<Self> {
        Self::with_options(context, provider_id, config, &ExecutorOptions::default())
    }

    /// 创建并校验；校验失败时不发起任何网络调用
    pub fn with_options(
        context: &ProviderContext,
        provider_id: impl Into<String>,
        config: &ProviderConfig,
        options: &ExecutorOptions,
    ) -> Result<Self> {
        let provider_id = provider_id.into();
        let mut lifecycle = Lifecycle::new();

        let authentication_config = AuthConfig::<LinearAuthConfig>::validate(LINEAR_PROVIDER, config)?;
        let executor = RequestExecutor::new(
            LINEAR_PROVIDER,
            LINEAR_GRAPHQL_URL,
            authentication_config.api_token.clone(),
            authentication_config.redactor().clone(),
            options,
        )?;
        lifecycle.mark_ready();

        linfo!(
            SYSTEM_REQUEST_ID,
            LogStage::Lifecycle,
            LogComponent::Linear,
            "provider_ready",
            &format!(
                "{LINEAR_PROVIDER} '{provider_id}' 就绪: tenant={}, endpoint={}, auth={}",
                context.tenant_id,
                executor.endpoint(),
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
    pub fn team_id(&self) -> &str {
        &self.authentication_config.team_id
    }

    #[must_use]
    pub const fn context(&self) -> &ProviderContext {
        &self.context
    }

    #[must_use]
    pub const fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    fn ensure_ready(&self) -> Result<()> {
        self.lifecycle.ensure_ready(LINEAR_PROVIDER, &self.provider_id)
    }

    fn fetch_issues_request(&self) -> UpstreamRequest {
        UpstreamRequest::graphql(
            "fetch_issues",
            FETCH_ISSUES_QUERY,
            json!({"teamId": self.team_id()}),
        )
    }

    fn create_issue_request(&self, title: &str, description: &str) -> UpstreamRequest {
        UpstreamRequest::graphql(
            "create_issue",
            CREATE_ISSUE_MUTATION,
            json!({
                "input": {
                    "title": title,
                    "description": description,
                    "teamId": self.team_id(),
                }
            }),
        )
        .expect_success_at("/data/issueCreate/success")
    }

    fn edit_issue_request(issue_id: &str, update: &IssueUpdate) -> UpstreamRequest {
        UpstreamRequest::graphql(
            "edit_issue",
            UPDATE_ISSUE_MUTATION,
            json!({
                "id": issue_id,
                "input": Value::Object(update.to_input()),
            }),
        )
        .expect_success_at("/data/issueUpdate/success")
    }

    fn delete_issue_request(issue_id: &str) -> UpstreamRequest {
        UpstreamRequest::graphql("delete_issue", DELETE_ISSUE_MUTATION, json!({"id": issue_id}))
            .expect_success_at("/data/issueDelete/success")
    }
}

impl Provider for LinearProvider {
    fn provider_type(&self) -> &'static str {
        LINEAR_PROVIDER
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
            let closed = self.executor.close();
            linfo!(
                SYSTEM_REQUEST_ID,
                LogStage::Lifecycle,
                LogComponent::Linear,
                "dispose",
                &format!(
                    "{LINEAR_PROVIDER} '{}' 已释放 (连接句柄已关闭: {closed})",
                    self.provider_id
                )
            );
        }
    }
}

#[async_trait]
impl IssueTracker for LinearProvider {
    async fn fetch_issues(&self, correlation_id: Option<&str>) -> Result<Vec<Issue>> {
        self.ensure_ready()?;
        let response = self
            .executor
            .execute(&self.fetch_issues_request(), correlation_id)
            .await?;
        let issues: Vec<Issue> = response.decode_at("/data/team/issues/nodes")?;

        ldebug!(
            correlation_id.unwrap_or(SYSTEM_REQUEST_ID),
            LogStage::Response,
            LogComponent::Linear,
            "fetch_issues",
            &format!("团队 {} 返回 {} 个问题", self.team_id(), issues.len())
        );
        Ok(issues)
    }

    async fn create_issue(
        &self,
        title: &str,
        description: &str,
        correlation_id: Option<&str>,
    ) -> Result<Issue> {
        self.ensure_ready()?;
        let response = self
            .executor
            .execute(&self.create_issue_request(title, description), correlation_id)
            .await?;
        response.decode_at("/data/issueCreate/issue")
    }

    async fn edit_issue(
        &self,
        issue_id: &str,
        update: &IssueUpdate,
        correlation_id: Option<&str>,
    ) -> Result<Issue> {
        self.ensure_ready()?;
        let response = self
            .executor
            .execute(&Self::edit_issue_request(issue_id, update), correlation_id)
            .await?;
        response.decode_at("/data/issueUpdate/issue")
    }

    async fn delete_issue(&self, issue_id: &str, correlation_id: Option<&str>) -> Result<bool> {
        self.ensure_ready()?;
        let response = self
            .executor
            .execute(&Self::delete_issue_request(issue_id), correlation_id)
            .await?;
        response.decode_at("/data/issueDelete/success")
    }
}
