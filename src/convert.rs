//! End-to-end conversion: detections in, diagram or document out

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ConverterConfig;
use crate::diagram::{DiagramBuild, DiagramBuilder, RejectedPrimitive};
use crate::draw::geometry::DetectionInput;
use crate::error::Result;
use crate::vsdx::{DocumentOptions, VsdxWriter};

/// Outcome of a successful `convert`
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub shapes: usize,
    pub connectors: usize,
    pub text_elements: usize,
    pub rejected: Vec<RejectedPrimitive>,
    pub noise: usize,
    pub dropped_segments: usize,
}

/// Builds the diagram without writing a document
pub fn analyze(input: &DetectionInput, config: &ConverterConfig) -> Result<DiagramBuild> {
    DiagramBuilder::new(config).build(input)
}

pub fn convert(
    input: &DetectionInput,
    output_path: impl AsRef<Path>,
    config: &ConverterConfig,
) -> Result<ConversionReport> {
    convert_with_options(input, output_path, config, DocumentOptions::default())
}

pub fn convert_with_options(
    input: &DetectionInput,
    output_path: impl AsRef<Path>,
    config: &ConverterConfig,
    options: DocumentOptions,
) -> Result<ConversionReport> {
    let output_path = output_path.as_ref();
    let start = Instant::now();

    let build = analyze(input, config)?;
    VsdxWriter::new(config)
        .with_options(options)
        .write(&build.diagram, output_path)?;

    log::info!("Converted to {} in {:.2?}", output_path.display(), start.elapsed());
    Ok(ConversionReport {
        output_path: output_path.to_path_buf(),
        shapes: build.diagram.shapes.len(),
        connectors: build.diagram.connectors.len(),
        text_elements: build.diagram.text.len(),
        rejected: build.rejected,
        noise: build.noise,
        dropped_segments: build.dropped_segments,
    })
}
