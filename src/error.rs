//! Error types shared by the engine, the upload path and the controller.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to build an OCR engine. Blocks OCR for the session until the
/// engine configuration changes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineInitError {
    #[error("no OCR language selected")]
    NoLanguages,

    #[error("unsupported OCR language: {0}")]
    UnsupportedLanguage(String),

    #[error(
        "OCR models not found. Expected locations:\n  - {}\n  - {}",
        detection.display(),
        recognition.display()
    )]
    ModelsMissing {
        detection: PathBuf,
        recognition: PathBuf,
    },

    #[error("failed to load OCR model: {0}")]
    ModelLoad(String),

    #[error("OCR engine loader crashed: {0}")]
    LoaderCrashed(String),
}

/// Recoverable failure of a single detection call
#[derive(Error, Debug, Clone, PartialEq)]
#[error("OCR inference failed: {message}")]
pub struct OcrInferenceError {
    pub message: String,
}

impl OcrInferenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("unsupported image format: {0:?} (expected .png, .jpg or .jpeg)")]
    UnsupportedFormat(String),

    #[error("failed to decode image")]
    Decode(#[source] image::ImageError),
}
