pub type Result<T> = std::result::Result<T, Error>;

/// Hard errors surfaced to callers.
///
/// Degenerate geometry and unknown style tags are absorbed where they are detected and never show
/// up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Diagram generation input error: {message}")]
    GenerationInput { message: String },

    #[error("Invalid diagram JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn generation_input(message: impl Into<String>) -> Self {
        Self::GenerationInput {
            message: message.into(),
        }
    }
}
