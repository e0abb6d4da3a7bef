//! Error types for the physics footer

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Host element has no usable area
    #[error("host element has degenerate size {width}x{height}")]
    DegenerateHost { width: f32, height: f32 },

    /// A tunable is out of range
    #[error("invalid footer config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
