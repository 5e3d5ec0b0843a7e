//! Error types for sightline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SightlineError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Camera capture errors
    #[error("Camera capture failed: {message}")]
    Capture { message: String },

    #[error("Camera produced no frame buffer")]
    MissingBuffer,

    // Classification errors
    #[error("Inference failed: {message}")]
    Inference { message: String },

    #[error("Label index {index} out of range for table of {len} labels")]
    LabelOutOfRange { index: usize, len: usize },

    #[error("Label file not found at {path}")]
    LabelFileNotFound { path: String },

    // Output errors
    #[error("Display update failed: {message}")]
    Display { message: String },

    #[error("Speech synthesis failed: {message}")]
    Speech { message: String },

    #[error("Command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SightlineError>;
