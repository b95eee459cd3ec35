use std::fmt;

use crate::error::{ProviderError, Result};

/// 提供商生命周期状态
///
/// `Unvalidated → Ready → Disposed`，构造函数内同步完成第一步迁移。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unvalidated,
    Ready,
    Disposed,
}

impl LifecycleState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unvalidated => "unvalidated",
            Self::Ready => "ready",
            Self::Disposed => "disposed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生命周期状态机
#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: LifecycleState::Unvalidated,
        }
    }

    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// 校验通过后调用
    pub const fn mark_ready(&mut self) {
        if matches!(self.state, LifecycleState::Unvalidated) {
            self.state = LifecycleState::Ready;
        }
    }

    /// 迁移到 `Disposed`，返回本次调用是否发生了迁移
    pub const fn dispose(&mut self) -> bool {
        if matches!(self.state, LifecycleState::Disposed) {
            return false;
        }
        self.state = LifecycleState::Disposed;
        true
    }

    /// 仅 `Ready` 状态允许执行操作
    pub fn ensure_ready(&self, provider: &str, provider_id: &str) -> Result<()> {
        match self.state {
            LifecycleState::Ready => Ok(()),
            state => Err(ProviderError::invalid_state(
                provider,
                provider_id,
                state.as_str(),
            )),
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_state_machine() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.ensure_ready("P", "p").is_err());

        lifecycle.mark_ready();
        assert_eq!(lifecycle.state(), LifecycleState::Ready);
        assert!(lifecycle.ensure_ready("P", "p").is_ok());

        assert!(lifecycle.dispose());
        assert!(!lifecycle.dispose());
        assert_eq!(lifecycle.state(), LifecycleState::Disposed);

        lifecycle.mark_ready();
        assert_eq!(lifecycle.state(), LifecycleState::Disposed);

        let err = lifecycle.ensure_ready("P", "p").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidState { ref state, .. } if state == "disposed"));
    }
}
