//! Viewer error types

use thiserror::Error;

/// Errors raised while building viewer inputs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// An appearance color could not be parsed
    #[error("Invalid {field} color: {source}")]
    InvalidColor {
        field: &'static str,
        #[source]
        source: skate_core::CoreError,
    },

    /// A region name did not match front, middle or back
    #[error("Unknown board region: {0:?}")]
    UnknownRegion(String),
}

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;
