//! File operations: Upload, Inspect, Download, Cleanup

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::draw::geometry::DetectionInput;
use crate::server::handlers::parse_params;
use crate::server::protocol::{error_codes, Response};
use crate::server::state::ServerState;
use crate::vsdx::inspect_document;
use crate::vsdx::schema::content_type;

#[derive(Deserialize)]
struct FileParams {
    file_id: String,
}

const EXPECTED: &str = "{file_id: string}";

/// Resolve the params to a file ID and its output path, or the error response to send
fn resolve(
    state: &ServerState,
    id: &Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Result<(String, PathBuf), Response> {
    let params: FileParams = parse_params(params, EXPECTED)
        .map_err(|message| Response::error(id.clone(), error_codes::INVALID_PARAMS, message))?;
    let path = state
        .output_path(&params.file_id)
        .map_err(|message| Response::error(id.clone(), error_codes::INVALID_FILE_ID, message))?;
    Ok((params.file_id, path))
}

fn not_converted(id: Option<serde_json::Value>, file_id: &str) -> Response {
    Response::error(
        id,
        error_codes::FILE_NOT_FOUND,
        format!("No converted document for {}", file_id),
    )
}

/// Handle Upload request - stores the input and issues the file ID for it
pub fn handle_upload(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct UploadParams {
        input: DetectionInput,
    }

    let params: UploadParams = match parse_params(params, "{input: object}") {
        Ok(p) => p,
        Err(message) => return Response::error(id, error_codes::INVALID_PARAMS, message),
    };

    match state.store_upload(&params.input) {
        Ok(file_id) => {
            log::info!(
                "Stored upload {} ({} polygons, {} segments)",
                file_id,
                params.input.polygons.len(),
                params.input.segments.len()
            );
            Response::success(id, serde_json::json!({ "file_id": file_id }))
        }
        Err(e) => {
            log::error!("Upload failed: {:#}", e);
            Response::error(
                id,
                error_codes::UPLOAD_FAILED,
                format!("Failed to store upload: {:#}", e),
            )
        }
    }
}

/// Handle Inspect request - summarises a converted document
pub fn handle_inspect(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let (file_id, path) = match resolve(state, &id, params) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    if !path.is_file() {
        return not_converted(id, &file_id);
    }

    match inspect_document(&path) {
        Ok(summary) => Response::from_serializable(id, &summary),
        Err(e) => Response::error(
            id,
            error_codes::INSPECT_FAILED,
            format!("Failed to inspect {}: {}", file_id, e),
        ),
    }
}

#[derive(Debug, Serialize)]
struct DownloadInfo {
    path: PathBuf,
    media_type: &'static str,
    file_name: String,
    size: u64,
}

/// Handle Download request - reports where the document is and how to serve it
pub fn handle_download(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let (file_id, path) = match resolve(state, &id, params) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let metadata = match std::fs::metadata(&path) {
        Ok(m) if m.is_file() => m,
        _ => return not_converted(id, &file_id),
    };

    Response::from_serializable(
        id,
        &DownloadInfo {
            file_name: format!("{}.vsdx", file_id),
            path,
            media_type: content_type::DRAWING,
            size: metadata.len(),
        },
    )
}

/// Handle Cleanup request - deletes the upload and the converted document, whichever exist
pub fn handle_cleanup(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let (file_id, output_path) = match resolve(state, &id, params) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    let upload_path = match state.upload_path(&file_id) {
        Ok(path) => path,
        Err(message) => return Response::error(id, error_codes::INVALID_FILE_ID, message),
    };

    let mut deleted = Vec::new();
    for path in [upload_path, output_path] {
        match std::fs::remove_file(&path) {
            Ok(()) => deleted.push(path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Response::error(
                    id,
                    error_codes::CLEANUP_FAILED,
                    format!("Failed to delete {}: {}", path.display(), e),
                );
            }
        }
    }

    log::info!("Cleanup {}: {} file(s) removed", file_id, deleted.len());
    Response::success(id, serde_json::json!({ "status": "ok", "deleted": deleted }))
}
