use thiserror::Error;

use crate::layers::LayerHandle;

/// Failures while loading or locating administrative boundaries.
///
/// Every variant names the region involved so the message can be shown to the
/// user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    /// The request never produced a response (offline, DNS, CORS, ...).
    #[error("Failed to load boundaries for {region}: {reason}")]
    NetworkFailure { region: String, reason: String },

    /// The host answered with a non-success status.
    #[error("Failed to load boundaries for {region}: HTTP {status}")]
    NotFound { region: String, status: u16 },

    /// The body was not a GeoJSON FeatureCollection.
    #[error("Invalid boundary data for {region}: {reason}")]
    InvalidFormat { region: String, reason: String },

    /// A named state or district was not present in the fetched boundaries.
    #[error("Region not found: {region}")]
    RegionNotFound { region: String },
}

impl BoundaryError {
    /// The region this error refers to.
    pub fn region(&self) -> &str {
        match self {
            BoundaryError::NetworkFailure { region, .. }
            | BoundaryError::NotFound { region, .. }
            | BoundaryError::InvalidFormat { region, .. }
            | BoundaryError::RegionNotFound { region } => region,
        }
    }
}

/// Failures reported by a [`crate::render::MapSurface`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("layer {0} is not attached")]
    NotAttached(LayerHandle),
}

/// The embedded claims collection could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("claims dataset is not valid GeoJSON: {0}")]
    Parse(String),
    #[error("claim #{index} has unreadable properties: {reason}")]
    Properties { index: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("no drawing in progress")]
    NotDrawing,
    #[error("a {shape} needs at least {needed} points, got {got}")]
    TooFewPoints {
        shape: &'static str,
        needed: usize,
        got: usize,
    },
}
