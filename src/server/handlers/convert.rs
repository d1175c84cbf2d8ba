//! Conversion operations: Convert, Analyze

use serde::Deserialize;
use std::time::Instant;

use crate::convert::{analyze, convert};
use crate::draw::geometry::DetectionInput;
use crate::server::handlers::{parse_params, resolve_input};
use crate::server::protocol::{error_codes, Response};
use crate::server::state::ServerState;

/// Handle Convert request - builds the diagram and writes `<file_id>.vsdx`
///
/// The input is taken from `input` when present, otherwise from the upload
/// stored under `file_id`.
pub fn handle_convert(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct ConvertParams {
        file_id: String,
        #[serde(default)]
        input: Option<DetectionInput>,
    }

    let params: ConvertParams = match parse_params(params, "{file_id: string, input?: object}") {
        Ok(p) => p,
        Err(message) => return Response::error(id, error_codes::INVALID_PARAMS, message),
    };

    let output_path = match state.output_path(&params.file_id) {
        Ok(path) => path,
        Err(message) => return Response::error(id, error_codes::INVALID_FILE_ID, message),
    };
    let input = match resolve_input(state, &id, Some(&params.file_id), params.input) {
        Ok(input) => input,
        Err(response) => return response,
    };

    log::info!(
        "Converting {} ({} polygons, {} segments)",
        params.file_id,
        input.polygons.len(),
        input.segments.len()
    );
    let start = Instant::now();

    match convert(&input, &output_path, &state.config) {
        Ok(report) => {
            log::debug!("Convert {} finished in {:.2?}", params.file_id, start.elapsed());
            Response::from_serializable(id, &report)
        }
        Err(e) => {
            log::error!("Conversion of {} failed: {}", params.file_id, e);
            Response::conversion_error(id, &e)
        }
    }
}

/// Handle Analyze request - returns the diagram as data, writes nothing
pub fn handle_analyze(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct AnalyzeParams {
        #[serde(default)]
        file_id: Option<String>,
        #[serde(default)]
        input: Option<DetectionInput>,
    }

    let params: AnalyzeParams = match parse_params(params, "{file_id?: string, input?: object}") {
        Ok(p) => p,
        Err(message) => return Response::error(id, error_codes::INVALID_PARAMS, message),
    };
    let input = match resolve_input(state, &id, params.file_id.as_deref(), params.input) {
        Ok(input) => input,
        Err(response) => return response,
    };

    match analyze(&input, &state.config) {
        Ok(build) => Response::from_serializable(id, &build),
        Err(e) => {
            log::warn!("Analyze failed: {}", e);
            Response::conversion_error(id, &e)
        }
    }
}
