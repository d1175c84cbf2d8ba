//! JSON-RPC protocol types for the conversion server

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ErrorKind};

/// JSON-RPC Request format
#[derive(Debug, Deserialize)]
pub struct Request {
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC Response format
#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

/// JSON-RPC Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
    /// Set when the failure came from the converter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl Response {
    /// Create a success response with a JSON value
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Response {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Serialize `result` into a success response
    pub fn from_serializable<T: Serialize>(id: Option<serde_json::Value>, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Response::success(id, value),
            Err(e) => Response::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to encode result: {}", e),
            ),
        }
    }

    /// Create an error response
    pub fn error(id: Option<serde_json::Value>, code: i32, message: String) -> Self {
        Response {
            id,
            result: None,
            error: Some(ErrorResponse {
                code,
                message,
                kind: None,
            }),
        }
    }

    /// Map a converter failure to an error response carrying its kind
    pub fn conversion_error(id: Option<serde_json::Value>, err: &ConvertError) -> Self {
        let kind = err.kind();
        let code = match kind {
            ErrorKind::InvalidPrimitive => error_codes::INVALID_PRIMITIVE,
            ErrorKind::InvalidCanvas => error_codes::INVALID_CANVAS,
            ErrorKind::IdentifierExhaustion => error_codes::IDENTIFIER_EXHAUSTION,
            ErrorKind::SerializationFailure => error_codes::SERIALIZATION_FAILED,
        };
        Response {
            id,
            result: None,
            error: Some(ErrorResponse {
                code,
                message: err.to_string(),
                kind: Some(kind),
            }),
        }
    }
}

/// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Custom error codes
    pub const INVALID_FILE_ID: i32 = 2;
    pub const FILE_NOT_FOUND: i32 = 3;
    pub const INSPECT_FAILED: i32 = 4;
    pub const CLEANUP_FAILED: i32 = 5;
    pub const UPLOAD_FAILED: i32 = 6;
    pub const INVALID_PRIMITIVE: i32 = 10;
    pub const INVALID_CANVAS: i32 = 11;
    pub const IDENTIFIER_EXHAUSTION: i32 = 12;
    pub const SERIALIZATION_FAILED: i32 = 13;
}
