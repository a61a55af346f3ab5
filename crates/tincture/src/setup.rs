//! Error types for setup operations.

use thiserror::Error;
use tincture_style::ConfigurationError;

/// Error type for setup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Template, style, pattern or palette file error.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    /// Another logger is already installed.
    #[error("logger already installed: {0}")]
    Logger(#[from] log::SetLoggerError),
}
