//! # Provider Bridge
//!
//! 第三方系统连接器的统一生命周期与请求执行框架：
//! 构造 → 校验配置 → 执行类型化操作 → 释放

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod providers;
pub mod testing;

// Re-export commonly used types
pub use config::{ProviderConfig, ProviderContext};
pub use error::{ProviderError, Result};
pub use provider::{IssueTracker, Notifier, Provider};
