/// Convenience result type used across scorecast.
pub type ScorecastResult<T> = Result<T, ScorecastError>;

/// Top-level error taxonomy for the overlay pipeline.
///
/// Every variant is fatal to a run; benign conditions (for example a fully transparent frame) are
/// logged instead of raised.
#[derive(thiserror::Error, Debug)]
pub enum ScorecastError {
    /// Input table missing, empty, or containing an unparseable row.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Template document missing or unreadable.
    #[error("template read error: {0}")]
    TemplateRead(String),

    /// The render backend failed to produce a raster.
    #[error("render backend error: {0}")]
    RenderBackend(String),

    /// The external encoder failed; carries its diagnostic output.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid run options.
    #[error("configuration error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScorecastError {
    pub fn malformed_input(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn template_read(msg: impl Into<String>) -> Self {
        Self::TemplateRead(msg.into())
    }

    pub fn render_backend(msg: impl Into<String>) -> Self {
        Self::RenderBackend(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
