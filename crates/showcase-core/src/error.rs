use thiserror::Error;

/// Faults raised while computing a magnetic button offset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MagneticError {
    #[error("pointer position is not finite ({x}, {y})")]
    NonFinitePointer { x: f64, y: f64 },
    #[error("button bounds are unusable (width {width}, height {height})")]
    BadBounds { width: f64, height: f64 },
}

/// Faults raised while building, driving or tearing down the product viewer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewerError {
    #[error("viewer container is missing")]
    MissingContainer,
    #[error("3D rendering is unavailable: {0}")]
    Unsupported(String),
    #[error("failed to create {what}: {reason}")]
    Resource { what: &'static str, reason: String },
    #[error("render failed: {0}")]
    Render(String),
    #[error("viewer is {0}, expected {1}")]
    InvalidState(&'static str, &'static str),
}
