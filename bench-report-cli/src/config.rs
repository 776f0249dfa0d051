//! Configuration file loading and merging with command line flags

use anyhow::{Context, Result};
use bench_report::{ImageFormat, ReportConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub csv_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    pub format: Option<ImageFormat>,
}

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub csv_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<ImageFormat>,
}

impl AppConfig {
    /// Build the report configuration: flag > config file > default
    pub fn into_report_config(self, overrides: Overrides) -> ReportConfig {
        let mut config = ReportConfig::new();

        if let Some(csv_file) = overrides.csv_file.or(self.input.csv_file) {
            config = config.with_csv_file(csv_file);
        }
        if let Some(dir) = overrides.output_dir.or(self.output.dir) {
            config = config.with_output_dir(dir);
        }
        if let Some(format) = overrides.format.or(self.output.format) {
            config = config.with_format(format);
        }

        config
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    log::debug!("Loaded config from {:?}: {:?}", path, config);
    Ok(config)
}
