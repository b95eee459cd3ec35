//! The unified error handling system for provider connectors.

// 1. Core Types
pub use config::ConfigError;
pub use types::{InvalidField, ProviderError};

/// A unified `Result` type for provider operations.
///
/// Every construction and domain operation returns this type.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Result of loading application configuration.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// 2. Module declarations
pub mod config;
pub mod macros;
pub mod types;

// 3. Error Category for logging and caller retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Errors the caller must fix (bad configuration, use after dispose).
    /// Never worth retrying.
    Client,
    /// Errors raised by or on the way to the upstream system.
    /// The caller decides whether the operation is safe to retry.
    Upstream,
}
