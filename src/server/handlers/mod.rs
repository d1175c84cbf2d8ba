//! Handler module declarations and re-exports

pub mod convert;
pub mod files;

pub use convert::*;
pub use files::*;

use serde::de::DeserializeOwned;

use crate::draw::geometry::DetectionInput;
use crate::server::protocol::{error_codes, Response};
use crate::server::state::ServerState;

/// Decode request params, keeping serde's message for the error response
pub(crate) fn parse_params<T: DeserializeOwned>(
    params: Option<serde_json::Value>,
    expected: &str,
) -> Result<T, String> {
    let value = params.ok_or_else(|| format!("Missing params: expected {}", expected))?;
    serde_json::from_value(value).map_err(|e| format!("Invalid params: expected {} ({})", expected, e))
}

/// The inline input if one was sent, otherwise the upload stored under `file_id`
pub(crate) fn resolve_input(
    state: &ServerState,
    id: &Option<serde_json::Value>,
    file_id: Option<&str>,
    input: Option<DetectionInput>,
) -> Result<DetectionInput, Response> {
    if let Some(input) = input {
        return Ok(input);
    }
    let Some(file_id) = file_id else {
        return Err(Response::error(
            id.clone(),
            error_codes::INVALID_PARAMS,
            "Expected either input or the file_id of an upload".to_string(),
        ));
    };

    let path = state
        .upload_path(file_id)
        .map_err(|message| Response::error(id.clone(), error_codes::INVALID_FILE_ID, message))?;
    if !path.is_file() {
        return Err(Response::error(
            id.clone(),
            error_codes::FILE_NOT_FOUND,
            format!("No upload for {}", file_id),
        ));
    }
    state.load_upload(file_id).map_err(|e| {
        Response::error(
            id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Stored upload {} is unreadable: {:#}", file_id, e),
        )
    })
}
