//! # 提供商实现模块
//!
//! 每种上游一个实现，共享 `provider::RequestExecutor`

pub mod linear;
pub mod slack;
pub mod types;

pub use linear::{LINEAR_GRAPHQL_URL, LINEAR_PROVIDER, LinearAuthConfig, LinearProvider};
pub use slack::{SLACK_API_URL, SLACK_PROVIDER, SlackAuthConfig, SlackProvider};
pub use types::{Issue, IssueUpdate, MessageReceipt, OutboundMessage};
