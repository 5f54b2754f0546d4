use thiserror::Error;

/// A step that the requested matcher cannot walk.
///
/// The vectorized matcher needs a positive multiple of [`VECTOR_WIDTH`];
/// every matcher needs a positive step.
///
/// [`VECTOR_WIDTH`]: crate::VECTOR_WIDTH
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("step {step} is not a positive multiple of {width}")]
pub struct InvalidStep {
    pub step: usize,
    pub width: usize,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    InvalidStep(#[from] InvalidStep),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("could not start a search thread: {0}")]
    ResourceExhausted(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
