//! Converter configuration
//!
//! Every field has a default matching the tuned constants, so an empty TOML
//! file (or no file at all) yields the standard behaviour.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Highest shape identifier; connector identifiers start right after it.
pub const MAX_SHAPE_ID: u32 = 999;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub classifier: ClassifierConfig,
    pub association: AssociationConfig,
    pub page: PageConfig,
    pub document: DocumentConfig,
    pub limits: LimitsConfig,
}

/// Thresholds used when turning polygons into shapes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Polygons smaller than this (px²) are treated as noise
    pub min_area: f64,
    /// Allowed deviation of width/height from 1.0 for a square
    pub square_tolerance: f64,
    pub circularity_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_area: 500.0,
            square_tolerance: 0.05,
            circularity_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    /// Maximum endpoint-to-centre distance in pixels (exclusive)
    pub max_distance: f64,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self { max_distance: 30.0 }
    }
}

/// Target page, in inches
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width: f64,
    pub height: f64,
    pub name: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 8.5,
            height: 11.0,
            name: "Page-1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub creator: String,
    pub application: String,
    pub template: String,
    pub compression: Compression,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            creator: "Image to Visio Converter".to_string(),
            application: "Microsoft Visio".to_string(),
            template: "Basic Diagram.vstx".to_string(),
            compression: Compression::Deflated,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_shapes: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_shapes: MAX_SHAPE_ID,
        }
    }
}

impl LimitsConfig {
    /// Shape limit clamped so shape IDs never enter the connector range
    pub fn effective_max_shapes(&self) -> u32 {
        self.max_shapes.min(MAX_SHAPE_ID)
    }
}

impl ConverterConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: ConverterConfig =
            toml::from_str(source).context("Failed to parse converter configuration")?;
        anyhow::ensure!(
            config.page.width > 0.0 && config.page.height > 0.0,
            "page dimensions must be positive, got {}x{}",
            config.page.width,
            config.page.height
        );
        anyhow::ensure!(
            config.association.max_distance >= 0.0,
            "association.max_distance must not be negative"
        );
        Ok(config)
    }
}

/// Load configuration from a TOML file, or defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<ConverterConfig> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = ConverterConfig::from_toml_str(&source)?;
            log::info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => {
            log::debug!("No configuration file given, using defaults");
            Ok(ConverterConfig::default())
        }
    }
}
