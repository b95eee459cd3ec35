use crate::error::Result;

use super::validation::ValidatedAuth;

/// 认证字段声明
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
    /// 敏感字段不得出现在任何日志、序列化结果或错误信息中
    pub sensitive: bool,
}

impl AuthField {
    #[must_use]
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            required: true,
            description,
            sensitive: false,
        }
    }

    #[must_use]
    pub const fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            required: false,
            description,
            sensitive: false,
        }
    }

    /// 标记为敏感字段（仅是注解，校验逻辑与普通字段一致）
    #[must_use]
    pub const fn sensitive(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }
}

/// 一种提供商的类型化认证配置
///
/// `FIELDS` 决定校验规则；`from_validated` 只会在所有必填字段通过校验后调用。
pub trait AuthSchema: Sized {
    const FIELDS: &'static [AuthField];

    fn from_validated(values: &mut ValidatedAuth) -> Result<Self>;
}
