use thiserror::Error;

/// Top-level error type for the reblock crate.
#[derive(Debug, Error)]
pub enum ReblockError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error(
        "vector projection of ({}, {}) onto segment ({}, {})-({}, {}) failed",
        .point[0], .point[1], .segment[0][0], .segment[0][1], .segment[1][0], .segment[1][1]
    )]
    ProjectionFailed {
        point: [f64; 2],
        segment: [[f64; 2]; 2],
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// Structural invariant violations of a planar graph.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("no vertex at ({x}, {y})")]
    VertexNotFound { x: f64, y: f64 },

    #[error("more than one vertex at ({x}, {y})")]
    DuplicateVertex { x: f64, y: f64 },

    #[error("no edge between ({}, {}) and ({}, {})", .from[0], .from[1], .to[0], .to[1])]
    EdgeNotFound { from: [f64; 2], to: [f64; 2] },

    #[error("more than one edge between ({}, {}) and ({}, {})", .from[0], .from[1], .to[0], .to[1])]
    DuplicateEdge { from: [f64; 2], to: [f64; 2] },

    #[error("edge would connect ({x}, {y}) to itself")]
    SelfLoop { x: f64, y: f64 },
}

/// Errors related to graph operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(
        "graph is not connected: no path from ({}, {}) to ({}, {})",
        .from[0], .from[1], .to[0], .to[1]
    )]
    DisconnectedGraph { from: [f64; 2], to: [f64; 2] },

    #[error("graph has no edge a point can be attached to")]
    NoEligibleEdge,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while saving or loading a graph snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`ReblockError`].
pub type Result<T> = std::result::Result<T, ReblockError>;
