use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the image-processing collaborator.
#[derive(Debug, Clone, Error)]
pub enum ProcessingError {
    /// Source image could not be opened or decoded
    #[error("Failed to load {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// Target box has a zero side
    #[error("Invalid target size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Resized image could not be encoded
    #[error("Failed to encode thumbnail: {message}")]
    Encode { message: String },

    /// Encoded thumbnail could not be written to disk
    #[error("Failed to save {}: {message}", path.display())]
    Save { path: PathBuf, message: String },
}

/// Errors returned by the thumbnail service.
#[derive(Debug, Clone, Error)]
pub enum ThumbError {
    /// Source path does not exist
    #[error("Image not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Source content is neither JPEG nor PNG
    #[error("Unsupported format for {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Cache directory is missing and could not be created
    #[error("Could not create cache directory {}: {message}", path.display())]
    DirectoryCreation { path: PathBuf, message: String },

    /// Requested thumbnail has no area
    #[error("Invalid thumbnail dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Reading the source failed before format detection could finish
    #[error("I/O error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Load, resize, encode or save failed
    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),
}
