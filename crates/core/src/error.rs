//! Error types for slide-deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a slide deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Required configuration (such as the model credential) is missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The deck request is not usable (for example, an empty topic).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No JSON object could be located in the model output.
    #[error("Malformed outline: {0}")]
    MalformedOutline(String),

    /// The model collaborator failed or returned nothing usable.
    #[error("Model error: {0}")]
    Model(String),

    /// Image decoding or re-encoding failed.
    #[error("Image error: {0}")]
    Image(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}
