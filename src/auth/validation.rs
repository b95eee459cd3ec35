//! # 认证配置校验
//!
//! 校验返回带标签的结果：成功得到类型化配置，失败得到列出全部缺失字段的错误。

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use serde_json::{Map, Value};

use super::redact::{REDACTED, Redactor};
use super::schema::{AuthField, AuthSchema};
use super::secret::Secret;
use crate::config::ProviderConfig;
use crate::error::{InvalidField, ProviderError, Result};
use crate::logging::{LogComponent, LogStage, SYSTEM_REQUEST_ID};
use crate::{ldebug, lwarn};

enum FieldValue {
    Present(String),
    Missing,
    Invalid(&'static str),
}

fn normalize(value: Option<&Value>) -> FieldValue {
    match value {
        None | Some(Value::Null) => FieldValue::Missing,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                FieldValue::Missing
            } else {
                FieldValue::Present(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => FieldValue::Present(n.to_string()),
        Some(Value::Bool(b)) => FieldValue::Present(b.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => FieldValue::Invalid("expected a scalar value"),
    }
}

/// 已通过校验的字段值，仅包含声明过的字段
pub struct ValidatedAuth {
    provider: String,
    values: BTreeMap<&'static str, String>,
}

impl ValidatedAuth {
    /// 取出必填字段
    pub fn required(&mut self, name: &str) -> Result<String> {
        self.values.remove(name).ok_or_else(|| {
            ProviderError::config_validation(&self.provider, vec![name.to_string()], Vec::new())
        })
    }

    /// 取出必填的敏感字段
    pub fn secret(&mut self, name: &str) -> Result<Secret> {
        self.required(name).map(Secret::from)
    }

    /// 取出可选字段
    pub fn optional(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    fn sensitive_values(&self, fields: &[AuthField]) -> Vec<Secret> {
        fields
            .iter()
            .filter(|f| f.sensitive)
            .filter_map(|f| self.values.get(f.name))
            .map(|v| Secret::new(v.clone()))
            .collect()
    }

    fn redacted(&self, fields: &[AuthField]) -> Value {
        let mut summary = Map::new();
        for field in fields {
            if let Some(value) = self.values.get(field.name) {
                let shown = if field.sensitive {
                    REDACTED.to_string()
                } else {
                    value.clone()
                };
                summary.insert(field.name.to_string(), Value::String(shown));
            }
        }
        Value::Object(summary)
    }
}

impl fmt::Debug for ValidatedAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedAuth")
            .field("provider", &self.provider)
            .field("fields", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// 按字段表校验认证映射
///
/// 未声明的字段被忽略；所有缺失的必填字段与值类型不可用的字段一次性返回。
pub fn validate_fields(
    provider: &str,
    fields: &'static [AuthField],
    authentication: &Map<String, Value>,
) -> Result<ValidatedAuth> {
    let mut values = BTreeMap::new();
    let mut missing = Vec::new();
    let mut invalid = Vec::new();

    for field in fields {
        match normalize(authentication.get(field.name)) {
            FieldValue::Present(value) => {
                values.insert(field.name, value);
            }
            FieldValue::Missing if field.required => missing.push(field.name.to_string()),
            FieldValue::Missing => {}
            FieldValue::Invalid(reason) => invalid.push(InvalidField {
                name: field.name.to_string(),
                reason: reason.to_string(),
            }),
        }
    }

    if !missing.is_empty() || !invalid.is_empty() {
        let err = ProviderError::config_validation(provider, missing, invalid);
        lwarn!(
            SYSTEM_REQUEST_ID,
            LogStage::Validation,
            LogComponent::AuthConfig,
            "validate_auth_config",
            &err.to_string()
        );
        return Err(err);
    }

    Ok(ValidatedAuth {
        provider: provider.to_string(),
        values,
    })
}

/// 经过校验的类型化认证配置
///
/// 同时保存由敏感字段构建的擦除器，以及可安全记录的脱敏摘要。
pub struct AuthConfig<T> {
    inner: T,
    redactor: Redactor,
    redacted: Value,
}

impl<T: AuthSchema> AuthConfig<T> {
    /// 校验 `config.authentication`，失败时不产生任何副作用
    pub fn validate(provider: &str, config: &ProviderConfig) -> Result<Self> {
        let mut values = validate_fields(provider, T::FIELDS, &config.authentication)?;
        let secrets = values.sensitive_values(T::FIELDS);
        let redacted = values.redacted(T::FIELDS);
        let inner = T::from_validated(&mut values)?;

        ldebug!(
            SYSTEM_REQUEST_ID,
            LogStage::Validation,
            LogComponent::AuthConfig,
            "validate_auth_config",
            &format!("{provider} 认证配置校验通过: {redacted}")
        );

        Ok(Self {
            inner,
            redactor: Redactor::new(&secrets),
            redacted,
        })
    }
}

impl<T> AuthConfig<T> {
    #[must_use]
    pub const fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// 敏感字段已被掩码替换的摘要，可直接写入日志
    #[must_use]
    pub const fn redacted(&self) -> &Value {
        &self.redacted
    }
}

impl<T> Deref for AuthConfig<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for AuthConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("inner", &self.inner)
            .field("redacted", &self.redacted)
            .finish_non_exhaustive()
    }
}
