//! Core types for the benchmark report library
//!
//! This module defines the error type and the strongly typed column naming
//! scheme of the benchmark CSV. Columns follow the convention
//! `<scenario>_<algorithm>_<metric>`, e.g. `pior_quick_m`.

use std::fmt;

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Name of the input-size column
pub const SIZE_COLUMN: &str = "tamanho";

/// Suffix shared by every time column
pub const TIME_SUFFIX: &str = "_t";

/// Suffix shared by every memory column
pub const MEMORY_SUFFIX: &str = "_m";

/// Bytes per kilobyte, used when normalizing memory columns
pub const BYTES_PER_KILOBYTE: f64 = 1024.0;

/// Errors that can occur while generating a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to load data from {source_name}: {reason}")]
    DataLoad { source_name: String, reason: String },

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Dataset has no rows")]
    EmptyDataset,

    #[error("Failed to render chart {chart}: {reason}")]
    Render { chart: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub(crate) fn data_load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::DataLoad {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for ReportError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ReportError::Render {
            chart: String::from("<drawing area>"),
            reason: err.to_string(),
        }
    }
}

/// Input ordering a benchmark was run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    Best,
    Average,
    Worst,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Best, Scenario::Average, Scenario::Worst];

    /// Column prefix used in the CSV header
    pub fn prefix(self) -> &'static str {
        match self {
            Scenario::Best => "melhor",
            Scenario::Average => "medio",
            Scenario::Worst => "pior",
        }
    }
}

/// Sorting algorithm under measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Merge,
    Quick,
    Smart,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Merge, Algorithm::Quick, Algorithm::Smart];

    /// Column infix used in the CSV header
    pub fn infix(self) -> &'static str {
        match self {
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
            Algorithm::Smart => "smart",
        }
    }
}

/// Measured quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Elapsed time in milliseconds
    Time,
    /// Memory usage (bytes in the CSV, kilobytes after normalization)
    Memory,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Time, Metric::Memory];

    pub fn suffix(self) -> &'static str {
        match self {
            Metric::Time => TIME_SUFFIX,
            Metric::Memory => MEMORY_SUFFIX,
        }
    }
}

/// A typed reference to one metric column of the benchmark CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub scenario: Scenario,
    pub algorithm: Algorithm,
    pub metric: Metric,
}

impl ColumnKey {
    pub const fn new(scenario: Scenario, algorithm: Algorithm, metric: Metric) -> Self {
        Self {
            scenario,
            algorithm,
            metric,
        }
    }

    pub const fn time(scenario: Scenario, algorithm: Algorithm) -> Self {
        Self::new(scenario, algorithm, Metric::Time)
    }

    pub const fn memory(scenario: Scenario, algorithm: Algorithm) -> Self {
        Self::new(scenario, algorithm, Metric::Memory)
    }

    /// Header name of this column, e.g. `melhor_merge_t`
    pub fn column_name(&self) -> String {
        format!(
            "{}_{}{}",
            self.scenario.prefix(),
            self.algorithm.infix(),
            self.metric.suffix()
        )
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

/// Every column the report needs, in CSV header order
pub fn required_columns() -> Vec<String> {
    let mut columns = vec![SIZE_COLUMN.to_string()];
    for scenario in Scenario::ALL {
        for algorithm in Algorithm::ALL {
            for metric in Metric::ALL {
                columns.push(ColumnKey::new(scenario, algorithm, metric).column_name());
            }
        }
    }
    columns
}

/// True for columns that hold memory measurements
pub fn is_memory_column(name: &str) -> bool {
    name.ends_with(MEMORY_SUFFIX)
}
