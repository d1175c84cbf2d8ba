//! Error types for diagram reconstruction and document packaging
//!
//! `InvalidPrimitive` is recoverable: the offending primitive is skipped and
//! recorded. Every other variant aborts the current conversion.

use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which family of input primitive an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Polygon,
    LineSegment,
    Text,
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrimitiveKind::Polygon => "polygon",
            PrimitiveKind::LineSegment => "line segment",
            PrimitiveKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Stable discriminant for structured failure reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidPrimitive,
    InvalidCanvas,
    IdentifierExhaustion,
    SerializationFailure,
}

/// Failures while writing the archive
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML write error in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid {kind} primitive #{index}: {reason}")]
    InvalidPrimitive {
        kind: PrimitiveKind,
        index: usize,
        reason: String,
    },

    #[error("invalid canvas size {width}x{height}: both dimensions must be positive")]
    InvalidCanvas { width: f64, height: f64 },

    #[error("identifier space exhausted: more than {limit} {what}")]
    IdentifierExhaustion { what: &'static str, limit: u32 },

    #[error("serialization failed: {0}")]
    Serialization(#[from] SerializationError),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::InvalidPrimitive { .. } => ErrorKind::InvalidPrimitive,
            ConvertError::InvalidCanvas { .. } => ErrorKind::InvalidCanvas,
            ConvertError::IdentifierExhaustion { .. } => ErrorKind::IdentifierExhaustion,
            ConvertError::Serialization(_) => ErrorKind::SerializationFailure,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Serialization(SerializationError::Io {
            path: path.into(),
            source,
        })
    }
}

impl From<zip::result::ZipError> for ConvertError {
    fn from(err: zip::result::ZipError) -> Self {
        ConvertError::Serialization(SerializationError::Zip(err))
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
