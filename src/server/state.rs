//! Server state: where uploads and outputs live and how conversions are configured

use anyhow::{anyhow, Context};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use crate::config::ConverterConfig;
use crate::draw::geometry::DetectionInput;

pub const OUTPUT_EXTENSION: &str = "vsdx";
pub const UPLOAD_EXTENSION: &str = "json";
const UPLOAD_PREFIX: &str = "upload-";

/// Shared, read-only for the life of the process; every request gets its own
/// allocator and scratch directory.
pub struct ServerState {
    pub output_dir: PathBuf,
    pub config: ConverterConfig,
}

impl ServerState {
    pub fn new(output_dir: impl Into<PathBuf>, config: ConverterConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            config,
        }
    }

    /// `<output_dir>/<file_id>.vsdx`, or an error for IDs that could escape the directory
    pub fn output_path(&self, file_id: &str) -> Result<PathBuf, String> {
        validate_file_id(file_id)?;
        Ok(self.output_dir.join(format!("{}.{}", file_id, OUTPUT_EXTENSION)))
    }

    /// `<output_dir>/<file_id>.json`, where an uploaded input is kept
    pub fn upload_path(&self, file_id: &str) -> Result<PathBuf, String> {
        validate_file_id(file_id)?;
        Ok(self.output_dir.join(format!("{}.{}", file_id, UPLOAD_EXTENSION)))
    }

    /// Stores `input` under a fresh file ID and returns the ID
    pub fn store_upload(&self, input: &DetectionInput) -> anyhow::Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix(UPLOAD_PREFIX)
            .suffix(&format!(".{}", UPLOAD_EXTENSION))
            .rand_bytes(12)
            .tempfile_in(&self.output_dir)
            .with_context(|| format!("Failed to create upload in {}", self.output_dir.display()))?;
        let encoded = serde_json::to_vec(input).context("Failed to encode upload")?;
        file.write_all(&encoded).context("Failed to write upload")?;

        let (_, path) = file.keep().context("Failed to keep upload")?;
        let file_id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| anyhow!("Upload path {} has no usable name", path.display()))?
            .to_string();
        validate_file_id(&file_id).map_err(|message| anyhow!(message))?;
        Ok(file_id)
    }

    pub fn load_upload(&self, file_id: &str) -> anyhow::Result<DetectionInput> {
        let path = self.upload_path(file_id).map_err(|message| anyhow!(message))?;
        let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to decode {}", path.display()))
    }
}

/// File IDs are opaque, but restricted to ASCII alphanumerics, `-` and `_`
pub fn validate_file_id(file_id: &str) -> Result<(), String> {
    if file_id.is_empty() {
        return Err("file_id must not be empty".to_string());
    }
    if let Some(bad) = file_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("file_id contains invalid character {:?}", bad));
    }
    Ok(())
}
