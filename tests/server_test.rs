use image_to_vsdx::server::{error_codes, run, ServerState};
use image_to_vsdx::ConverterConfig;
use serde_json::{json, Value};

fn serve(state: &ServerState, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    let mut output = Vec::new();
    run(state, input.as_bytes(), &mut output).expect("server loop failed");
    String::from_utf8(output)
        .expect("responses are UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("response is JSON"))
        .collect()
}

fn square(x: f64, y: f64, side: f64) -> Value {
    json!({
        "vertices": [
            {"x": x, "y": y},
            {"x": x + side, "y": y},
            {"x": x + side, "y": y + side},
            {"x": x, "y": y + side}
        ],
        "area": side * side,
        "bbox": {"x": x, "y": y, "width": side, "height": side}
    })
}

fn two_boxes() -> Value {
    json!({
        "image_width": 800,
        "image_height": 600,
        "polygons": [square(100.0, 100.0, 80.0), square(400.0, 100.0, 80.0)],
        "segments": [{"start": {"x": 140.0, "y": 140.0}, "end": {"x": 440.0, "y": 140.0}}]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_inspect_download_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let state = ServerState::new(dir.path(), ConverterConfig::default());

        let responses = serve(&state, &[
            json!({"id": 1, "method": "Convert", "params": {"file_id": "upload-1", "input": two_boxes()}}),
            json!({"id": 2, "method": "Inspect", "params": {"file_id": "upload-1"}}),
            json!({"id": 3, "method": "Download", "params": {"file_id": "upload-1"}}),
            json!({"id": 4, "method": "Cleanup", "params": {"file_id": "upload-1"}}),
            json!({"id": 5, "method": "Download", "params": {"file_id": "upload-1"}}),
        ]);
        assert_eq!(responses.len(), 5);

        let report = &responses[0]["result"];
        assert_eq!(report["shapes"], 2);
        assert_eq!(report["connectors"], 1);

        let summary = &responses[1]["result"];
        assert_eq!(summary["shape_ids"], json!([1, 2]));
        assert_eq!(summary["connector_ids"], json!([1000]));

        let download = &responses[2]["result"];
        assert_eq!(download["media_type"], "application/vnd.ms-visio.drawing");
        assert_eq!(download["file_name"], "upload-1.vsdx");
        assert!(download["size"].as_u64().unwrap() > 0);

        assert_eq!(responses[3]["result"]["deleted"].as_array().unwrap().len(), 1);
        assert!(!dir.path().join("upload-1.vsdx").exists());

        assert_eq!(responses[4]["error"]["code"], error_codes::FILE_NOT_FOUND);
    }

    #[test]
    fn test_analyze_returns_diagram_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let state = ServerState::new(dir.path(), ConverterConfig::default());

        let responses = serve(&state, &[json!({"id": "a", "method": "Analyze", "params": {"input": two_boxes()}})]);
        let diagram = &responses[0]["result"]["diagram"];
        assert_eq!(diagram["shapes"][0]["category"], "square");
        assert_eq!(diagram["connectors"][0]["source"], 1);
        assert_eq!(diagram["connectors"][0]["target"], 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_conversion_errors_carry_kind() {
        let dir = tempfile::tempdir().unwrap();
        let state = ServerState::new(dir.path(), ConverterConfig::default());
        let mut input = two_boxes();
        input["image_width"] = json!(0);

        let responses = serve(&state, &[
            json!({"id": 1, "method": "Convert", "params": {"file_id": "zero", "input": input}}),
            json!({"id": 2, "method": "Convert", "params": {"file_id": "x"}}),
            json!({"id": 3, "method": "Cleanup", "params": {"file_id": "never-made"}}),
            json!({"id": 4, "method": "Convert", "params": {"input": two_boxes()}}),
            json!({"id": 5, "method": "Analyze", "params": {}}),
        ]);

        assert_eq!(responses[0]["error"]["kind"], "invalid_canvas");
        assert_eq!(responses[0]["error"]["code"], error_codes::INVALID_CANVAS);
        // No inline input and nothing uploaded under that ID
        assert_eq!(responses[1]["error"]["code"], error_codes::FILE_NOT_FOUND);
        // Cleaning up something that was never converted is not an error
        assert_eq!(responses[2]["result"]["deleted"], json!([]));
        assert_eq!(responses[3]["error"]["code"], error_codes::INVALID_PARAMS);
        assert_eq!(responses[4]["error"]["code"], error_codes::INVALID_PARAMS);
    }

    #[test]
    fn test_upload_issues_id_used_by_convert_analyze_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let state = ServerState::new(dir.path(), ConverterConfig::default());

        let uploaded = serve(&state, &[json!({"id": 1, "method": "Upload", "params": {"input": two_boxes()}})]);
        let file_id = uploaded[0]["result"]["file_id"].as_str().unwrap().to_string();
        assert!(!file_id.is_empty());

        let responses = serve(&state, &[
            json!({"id": 2, "method": "Analyze", "params": {"file_id": file_id}}),
            json!({"id": 3, "method": "Convert", "params": {"file_id": file_id}}),
            json!({"id": 4, "method": "Inspect", "params": {"file_id": file_id}}),
            json!({"id": 5, "method": "Cleanup", "params": {"file_id": file_id}}),
        ]);

        assert_eq!(responses[0]["result"]["diagram"]["connectors"][0]["id"], 1000);
        assert_eq!(responses[1]["result"]["shapes"], 2);
        assert_eq!(responses[2]["result"]["connector_ids"], json!([1000]));
        // Both the stored upload and the converted document go
        assert_eq!(responses[3]["result"]["deleted"].as_array().unwrap().len(), 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
