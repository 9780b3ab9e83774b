use thiserror::Error;

use super::layout::MarkerId;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RadiusError {
    #[error("chart radius must be a positive, finite number of pixels (got {0})")]
    NotPositive(f32),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no chart with id {0}")]
    NotFound(String),
    #[error("lookup backend unavailable: {0}")]
    Unavailable(String),
    #[error("lookup worker panicked while resolving {0}")]
    Panicked(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InteractionError {
    #[error("marker {0:?} does not belong to the current snapshot")]
    UnknownMarker(MarkerId),
    #[error("item \"{name}\" has no id to navigate to")]
    MissingNavigationTarget { name: String },
    #[error("item \"{name}\" has no cross-referenced chart")]
    NoCrossReference { name: String },
}
