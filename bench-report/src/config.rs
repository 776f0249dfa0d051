//! Report configuration types
//!
//! Holds the input path, output directory and image format used by the
//! generator. Defaults match the paths the benchmark harness writes to.

use crate::types::ReportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default benchmark CSV location
pub const DEFAULT_CSV_FILE: &str = "CSV/resultados_completo.csv";

/// Default directory for rendered charts
pub const DEFAULT_OUTPUT_DIR: &str = "graficos_otimizados";

/// Image format of the rendered charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ReportError;

    /// Case-insensitive: `png` or `svg`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(ReportError::Config(format!(
                "unsupported image format '{}' (expected png or svg)",
                other
            ))),
        }
    }
}

/// Configuration for a report run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Benchmark CSV to read
    #[serde(default = "default_csv_file")]
    pub csv_file: PathBuf,

    /// Directory the charts are written to (created if missing)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub format: ImageFormat,
}

fn default_csv_file() -> PathBuf {
    PathBuf::from(DEFAULT_CSV_FILE)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            csv_file: default_csv_file(),
            output_dir: default_output_dir(),
            format: ImageFormat::default(),
        }
    }
}

impl ReportConfig {
    /// Create a configuration with the default paths
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the input CSV
    pub fn with_csv_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_file = path.into();
        self
    }

    /// Builder method: set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builder method: set the image format
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Full path of a chart file with the given stem
    pub fn chart_path(&self, stem: &str) -> PathBuf {
        self.output_dir.join(self.chart_file_name(stem))
    }

    pub fn chart_file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.format.extension())
    }

    pub fn csv_file(&self) -> &Path {
        &self.csv_file
    }
}
