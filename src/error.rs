//! Error types for the poster service

use thiserror::Error;

/// Result type alias for poster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a poster
///
/// Metadata resolution never produces these: resolution failures degrade to
/// empty fields. Everything from template construction onward is fatal to
/// the request and surfaces through this enum.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the rasterization engine
    #[error("Engine initialization failed: {0}")]
    Initialization(String),

    /// Failed to load the poster document into the engine
    #[error("Failed to load document: {0}")]
    Load(String),

    /// Failed to capture the rendered output
    #[error("Rendering failed: {0}")]
    Render(String),

    /// The source URL could not be parsed for hostname extraction
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// I/O error while writing or streaming the poster artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
