//! Report generation pipeline
//!
//! Load the CSV, convert memory columns to kilobytes, check the schema,
//! prepare the output directory, then render every chart in order. Any
//! failure stops the run; files already written are left in place.

use crate::charts::{standard_charts, ChartSpec};
use crate::config::ReportConfig;
use crate::dataset::Dataset;
use crate::render::render_chart;
use crate::types::{required_columns, Result};
use std::fs;
use std::path::PathBuf;

/// A chart file written by the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    /// Position of the chart in the report, starting at 1
    pub index: usize,
    pub file_name: String,
    pub path: PathBuf,
}

/// Entry point for producing the benchmark charts
pub struct ReportGenerator {
    config: ReportConfig,
    charts: Vec<ChartSpec>,
}

impl ReportGenerator {
    /// Create a generator for the six standard charts
    pub fn new(config: ReportConfig) -> Self {
        Self::with_charts(config, standard_charts())
    }

    /// Create a generator for a custom chart table
    pub fn with_charts(config: ReportConfig, charts: Vec<ChartSpec>) -> Self {
        Self { config, charts }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    /// Columns that must be present before anything is drawn: the benchmark
    /// schema plus any column a chart in the table reads
    pub fn required_columns(&self) -> Vec<String> {
        let mut names = required_columns();
        for spec in &self.charts {
            for name in spec.columns() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Read the configured CSV and convert its memory columns to kilobytes
    pub fn load_dataset(&self) -> Result<Dataset> {
        let mut dataset = Dataset::from_path(&self.config.csv_file)?;
        dataset.normalize_memory_units();
        Ok(dataset)
    }

    /// Create the output directory and any missing parents
    pub fn prepare_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.config.output_dir)?;
        log::debug!("Output directory ready: {:?}", self.config.output_dir);
        Ok(())
    }

    /// Render every chart from an already loaded dataset
    ///
    /// The schema is checked before anything is drawn, so a dataset missing
    /// a required column produces no files at all. `on_saved` is called after
    /// each chart is written.
    pub fn generate<F>(&self, dataset: &Dataset, mut on_saved: F) -> Result<Vec<ChartArtifact>>
    where
        F: FnMut(&ChartArtifact),
    {
        dataset.require_columns(self.required_columns())?;
        self.prepare_output_dir()?;

        let mut artifacts = Vec::with_capacity(self.charts.len());
        for (i, spec) in self.charts.iter().enumerate() {
            log::debug!("Chart {} reads {}", spec.stem, spec.columns().join(", "));
            let path = self.config.chart_path(spec.stem);
            render_chart(spec, dataset, &path, self.config.format)?;

            let artifact = ChartArtifact {
                index: i + 1,
                file_name: self.config.chart_file_name(spec.stem),
                path,
            };
            log::info!("Saved chart {}: {:?}", artifact.index, artifact.path);
            on_saved(&artifact);
            artifacts.push(artifact);
        }

        Ok(artifacts)
    }

    /// Full pipeline: load, normalize, validate and render
    pub fn run<F>(&self, on_saved: F) -> Result<Vec<ChartArtifact>>
    where
        F: FnMut(&ChartArtifact),
    {
        let dataset = self.load_dataset()?;
        self.generate(&dataset, on_saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReportError;
    use tempfile::TempDir;

    #[test]
    fn test_generator_uses_standard_charts() {
        let generator = ReportGenerator::new(ReportConfig::new());

        assert_eq!(generator.charts().len(), 6);
        assert_eq!(generator.config().format, crate::ImageFormat::Png);
    }

    #[test]
    fn test_required_columns_cover_every_chart() {
        let generator = ReportGenerator::new(ReportConfig::new());
        let required = generator.required_columns();

        assert_eq!(required, required_columns());
        for spec in generator.charts() {
            assert!(spec.columns().iter().all(|c| required.contains(c)), "{}", spec.stem);
        }
    }

    #[test]
    fn test_chart_table_subset_still_needs_full_schema() {
        let charts: Vec<ChartSpec> = standard_charts().into_iter().take(1).collect();
        let generator = ReportGenerator::with_charts(ReportConfig::new(), charts);

        assert_eq!(generator.required_columns().len(), 19);
    }

    #[test]
    fn test_prepare_output_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        let generator = ReportGenerator::new(ReportConfig::new().with_output_dir(&dir));

        generator.prepare_output_dir().unwrap();
        generator.prepare_output_dir().unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_missing_input_file() {
        let tmp = TempDir::new().unwrap();
        let generator = ReportGenerator::new(
            ReportConfig::new()
                .with_csv_file(tmp.path().join("missing.csv"))
                .with_output_dir(tmp.path().join("out")),
        );

        let err = generator.run(|_| {}).unwrap_err();
        assert!(matches!(err, ReportError::DataLoad { .. }));
        assert!(!tmp.path().join("out").exists());
    }
}
