//! # 认证配置模块
//!
//! 每种提供商通过静态字段表声明认证字段（必填/可选、描述、是否敏感），
//! 由 `AuthConfig::validate` 在任何网络调用之前统一校验。
//!
//! - `schema`：字段声明与 `AuthSchema` 特征
//! - `secret`：敏感值包装，`Debug`/`Display` 只输出掩码
//! - `validation`：校验逻辑，一次性列出所有缺失字段
//! - `redact`：从日志与错误文本中抹去敏感值

mod redact;
mod schema;
mod secret;
mod validation;

pub use redact::{REDACTED, Redactor};
pub use schema::{AuthField, AuthSchema};
pub use secret::Secret;
pub use validation::{AuthConfig, ValidatedAuth, validate_fields};
