use grid_util::point::Point;
use thiserror::Error;

/// Which endpoint a grid is missing when a run is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingEndpoint {
    Start,
    Goal,
    Both,
}

impl std::fmt::Display for MissingEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingEndpoint::Start => write!(f, "start"),
            MissingEndpoint::Goal => write!(f, "goal"),
            MissingEndpoint::Both => write!(f, "start and goal"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("position {position} is outside the {cols}x{rows} grid")]
    OutOfBounds {
        position: Point,
        rows: usize,
        cols: usize,
    },
    /// Blocks a run; the message is shown to the user as is.
    #[error("place both a start and a goal before running (missing {missing})")]
    InvalidGrid { missing: MissingEndpoint },
    #[error("a grid needs at least two cells, got {rows} rows and {cols} columns")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("default endpoints must be distinct in-bounds cells")]
    InvalidEndpoints,
    #[error("cell {position} holds the start or goal; move the endpoint instead")]
    EndpointOccupied { position: Point },
    #[error("layout line {line}: {reason}")]
    InvalidLayout { line: usize, reason: String },
    #[error("wall density must lie in 0..=1, got {0}")]
    InvalidDensity(f64),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("malformed node-link document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node id {0:?} appears more than once")]
    DuplicateNode(String),
    #[error("unknown node id {0:?}")]
    UnknownNode(String),
    #[error("edge {from:?} -> {to:?} has invalid weight {weight}")]
    InvalidWeight { from: String, to: String, weight: f64 },
}
