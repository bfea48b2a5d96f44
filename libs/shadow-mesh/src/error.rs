//! # Shadow Errors
//!
//! Error types for densification, projection and stereographic mapping.
//!
//! ## Error Policy
//!
//! - Option values are validated before any geometric work starts
//! - Numeric degeneracies are resolved internally and never reported here
//! - An empty shadow is a valid result, not an error

use thiserror::Error;

/// Errors that can occur in the shadow pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShadowError {
    /// Unsupported or out-of-range option value
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Predicted densification output exceeds the safety ceiling
    #[error("Resource limit exceeded: estimated {estimated} points (max: {limit})")]
    ResourceLimit { estimated: usize, limit: usize },

    /// Surface invariant violated (index out of range, repeated index, ...)
    #[error("Invalid surface: {message}")]
    InvalidSurface { message: String },

    /// Malformed polygon input
    #[error("Invalid polygon: {message}")]
    InvalidPolygon { message: String },

    /// A mesher could not triangulate the given loops
    #[error("Triangulation failed: {message}")]
    Triangulation { message: String },
}

impl ShadowError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an invalid surface error.
    pub fn invalid_surface(message: impl Into<String>) -> Self {
        Self::InvalidSurface {
            message: message.into(),
        }
    }

    /// Creates an invalid polygon error.
    pub fn invalid_polygon(message: impl Into<String>) -> Self {
        Self::InvalidPolygon {
            message: message.into(),
        }
    }

    /// Creates a triangulation error.
    pub fn triangulation(message: impl Into<String>) -> Self {
        Self::Triangulation {
            message: message.into(),
        }
    }
}

/// Result type alias for shadow operations.
pub type ShadowResult<T> = Result<T, ShadowError>;
