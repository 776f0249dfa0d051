//! Sort Benchmark Report Library
//!
//! Turns the CSV produced by the sorting benchmark (time and memory for merge
//! sort, quick sort and smart sort in best/average/worst scenarios) into a
//! fixed set of charts.
//!
//! # Pipeline
//!
//! - Load the CSV into a column-oriented [`Dataset`]
//! - Convert every memory column (`*_m`) from bytes to kilobytes
//! - Check that all required columns exist
//! - Render the six charts of [`standard_charts`] into the output directory
//!
//! The library does not print anything; progress is reported through the
//! `log` facade and the `on_saved` callback.
//!
//! # Example Usage
//!
//! ```no_run
//! use bench_report::{ImageFormat, ReportConfig, ReportGenerator};
//!
//! let config = ReportConfig::new()
//!     .with_csv_file("CSV/resultados_completo.csv")
//!     .with_output_dir("graficos_otimizados")
//!     .with_format(ImageFormat::Png);
//!
//! let generator = ReportGenerator::new(config);
//! let artifacts = generator
//!     .run(|artifact| println!("Salvo: {}", artifact.file_name))
//!     .unwrap();
//! assert_eq!(artifacts.len(), 6);
//! ```

// Public modules
pub mod charts;
pub mod config;
pub mod dataset;
pub mod generator;
pub mod render;
pub mod types;

// Re-export main types for convenience
pub use charts::{standard_charts, ChartSpec};
pub use config::{ImageFormat, ReportConfig, DEFAULT_CSV_FILE, DEFAULT_OUTPUT_DIR};
pub use dataset::{Dataset, DatasetStats};
pub use generator::{ChartArtifact, ReportGenerator};
pub use types::{
    required_columns, Algorithm, ColumnKey, Metric, ReportError, Result, Scenario, SIZE_COLUMN,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
