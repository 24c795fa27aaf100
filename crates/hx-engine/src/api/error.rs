use thiserror::Error;

/// Invalid geometric input. These are precondition failures, reported at
/// construction time rather than surfacing later as wrong answers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polygon needs at least 3 vertices, found {found}")]
    TooFewVertices { found: usize },

    #[error("vertex {index} coincides with its successor")]
    DegenerateEdge { index: usize },

    #[error("polygon is not convex")]
    NonConvex,

    #[error("vertex coordinates must be finite")]
    NonFinite,

    #[error("scale factor {0} would collapse or corrupt the polygon")]
    InvalidScale(f64),

    #[error("operation is undefined for the zero vector")]
    ZeroVector,
}

/// Errors raised while loading a scene manifest.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("manifest parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid body geometry: {0}")]
    Geometry(#[from] GeometryError),
}
