use thiserror::Error;
use crate::model::PieceType;

/// Failures while building the grid map. No partial map is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("track has no pieces")]
    EmptyTrack,
    #[error("({0},{1}) is not a cardinal unit vector")]
    BadOrientation(i32, i32),
    #[error("piece {position} has no rotation entry when entered going ({x},{y})")]
    Malformed { position :usize, x :i32, y :i32 },
}

/// Vehicle telemetry that does not fit the map it is drawn on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlacementError {
    #[error("track position {0} is not part of the map")]
    UnknownPosition(usize),
    #[error("track position {position} is a {on_map:?} on the map but the vehicle reports {reported:?}")]
    PieceMismatch { position :usize, on_map :PieceType, reported :PieceType },
    #[error("lookup entry for track position {0} does not resolve to a map element")]
    Dangling(usize),
}

#[derive(Debug, Error)]
pub enum TrackFileError {
    #[error("could not read track file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse RON track file: {0}")]
    Ron(#[from] ron::Error),
    #[error("could not parse JSON track file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
