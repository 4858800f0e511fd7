use thiserror::Error;

/// Errors surfaced by the canvas engine.
///
/// Malformed gesture streams are not represented here: a move or end event
/// without an active draw session is logged and ignored, never returned.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// Export was requested with no background and no committed strokes.
    #[error("Nothing to export: the canvas has no background and no strokes")]
    EmptyCanvas,

    /// The rendering backend could not produce encoded bytes.
    #[error("Failed to encode snapshot: {0}")]
    Encoding(String),

    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },

    #[error("Failed to decode background image: {0}")]
    ImageDecode(#[from] image::ImageError),
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur while loading an engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}
