//! Error taxonomy for the sizing pipeline
//!
//! Field-level validation errors and structural file errors are detected
//! at the normalizer/parser boundary and never reach the sizing engine;
//! the engine itself only ever reports insufficient data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One user-correctable problem with a single request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Structural problem with an uploaded file, user-correctable by
/// re-uploading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unsupported file format: .{extension} (expected xls, xlsx or csv)")]
    UnsupportedFormat { extension: String },

    #[error("uploaded file is empty")]
    EmptyInput,

    #[error("no recognized columns in the file header")]
    UnrecognizedSchema,

    #[error("file could not be decoded: {0}")]
    Malformed(String),
}

/// The only error the sizing engine raises; all partial parse failures
/// are absorbed before this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SizingError {
    #[error("profile contains no usable sizing signal")]
    InsufficientData,
}

/// Failure modes of request normalization
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("request has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("normalized profile contains no usable sizing signal")]
    Insufficient,
}
