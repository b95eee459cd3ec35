//! # 错误处理宏

/// 快速创建配置无效错误的宏
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::ConfigError::invalid($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::ConfigError::invalid(format!($fmt, $($arg)*))
    };
}

/// 确保条件成立，否则返回配置无效错误
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::config_error!($msg));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::config_error!($fmt, $($arg)*));
        }
    };
}
