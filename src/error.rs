//! Error types for planet building and turn submission

use thiserror::Error;

/// Errors surfaced at the edges of the crate
///
/// The generation and simulation algorithms themselves never fail: they
/// return their best effort. Errors only come from validating what callers
/// hand in (configuration, mesh buffers, planned actions).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GlobeError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Vertex or index buffers cannot form a triangle mesh
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    /// Requested region ID does not exist
    #[error("region not found: {0}")]
    RegionNotFound(usize),
    /// Region exists but was merged away or drowned
    #[error("region {0} is no longer active")]
    RegionInactive(usize),
    /// Requested player ID does not exist
    #[error("player not found: {0}")]
    PlayerNotFound(usize),
    /// A planned action is not allowed
    #[error("invalid action: {0}")]
    InvalidAction(String),
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, GlobeError>;
