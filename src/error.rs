use thiserror::Error;

/// Failures of the view lifecycle.
#[derive(Debug, Error)]
pub enum GlobeError {
    /// The host could not hand out a drawing context. Nothing can be rendered
    /// without one, so mounting is aborted.
    #[error("rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("view is not mounted")]
    NotMounted,
}

/// Failures while reading keyword input.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("keyword input is empty")]
    Empty,

    #[error("invalid keyword JSON: {0}")]
    Json(String),

    #[error("line {line}: expected `word weight`, got {text:?}")]
    Line { line: usize, text: String },

    #[error("line {line}: invalid weight {value:?}")]
    Weight { line: usize, value: String },
}
