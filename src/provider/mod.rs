//! Provider capability module。
//!
//! - `traits`：`Provider` 生命周期接口及 `IssueTracker`/`Notifier` 领域接口
//! - `types`：生命周期状态机
//! - `request`：上游请求描述（GraphQL / REST）
//! - `executor`：组合进每个提供商的请求执行器

mod executor;
mod request;
mod traits;
mod types;

pub use executor::{CORRELATION_ID_HEADER, ExecutorOptions, RequestExecutor, UpstreamResponse};
pub use request::{RequestBody, UpstreamRequest};
pub use traits::{IssueTracker, Notifier, Provider};
pub use types::{Lifecycle, LifecycleState};
