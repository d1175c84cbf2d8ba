//! Conversion server - newline-delimited JSON-RPC over a reader/writer pair
//!
//! # Module Structure
//! - `protocol` - JSON-RPC request/response types
//! - `state` - output directory and converter configuration
//! - `handlers` - request handlers organized by functionality
//!
//! Every request is independent: a conversion owns its allocator and scratch
//! directory, so nothing in `ServerState` is mutated while serving.

pub mod handlers;
pub mod protocol;
pub mod state;

pub use protocol::{error_codes, ErrorResponse, Request, Response};
pub use state::{validate_file_id, ServerState};

use handlers::*;
use std::io::{self, BufRead, Write};

/// Route one request to its handler
pub fn dispatch(state: &ServerState, request: Request) -> Response {
    log::debug!("Request {}", request.method);
    match request.method.as_str() {
        "Upload" => handle_upload(state, request.id, request.params),
        "Convert" => handle_convert(state, request.id, request.params),
        "Analyze" => handle_analyze(state, request.id, request.params),
        "Inspect" => handle_inspect(state, request.id, request.params),
        "Download" => handle_download(state, request.id, request.params),
        "Cleanup" => handle_cleanup(state, request.id, request.params),
        other => Response::error(
            request.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Unknown method: {}", other),
        ),
    }
}

/// Serve requests until the reader is exhausted; one response line per request line
pub fn run<R: BufRead, W: Write>(state: &ServerState, reader: R, mut writer: W) -> io::Result<()> {
    let mut served = 0usize;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => dispatch(state, request),
            Err(e) => {
                log::warn!("Failed to parse request: {}", e);
                Response::error(None, error_codes::PARSE_ERROR, format!("Parse error: {}", e))
            }
        };

        let encoded = serde_json::to_string(&response)?;
        writeln!(writer, "{}", encoded)?;
        writer.flush()?;
        served += 1;
    }
    log::info!("Input closed after {} requests", served);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterConfig;

    fn serve(state: &ServerState, input: &str) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        run(state, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_unknown_method_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let state = ServerState::new(dir.path(), ConverterConfig::default());
        let responses = serve(&state, "{\"id\":1,\"method\":\"Explode\"}\n\nnot json\n");
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], error_codes::METHOD_NOT_FOUND);
        assert_eq!(responses[1]["error"]["code"], error_codes::PARSE_ERROR);
    }

    #[test]
    fn test_invalid_file_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = ServerState::new(dir.path(), ConverterConfig::default());
        let responses = serve(
            &state,
            "{\"id\":7,\"method\":\"Download\",\"params\":{\"file_id\":\"../x\"}}\n",
        );
        assert_eq!(responses[0]["id"], 7);
        assert_eq!(responses[0]["error"]["code"], error_codes::INVALID_FILE_ID);
    }
}
