//! Core error types

use thiserror::Error;

/// Errors raised while decoding scene inputs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A color string was not `#RGB` or `#RRGGBB`
    #[error("Invalid hex color: {0:?}")]
    InvalidColor(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
