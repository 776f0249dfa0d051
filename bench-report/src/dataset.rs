//! Benchmark dataset loading and unit normalization
//!
//! Reads the benchmark CSV into a column-oriented table of `f64` values.
//! The size column, the metric columns and every memory column must be
//! numeric; any other column that does not parse is ignored. Memory columns
//! arrive in bytes and are converted to kilobytes once, in place, before any
//! chart is drawn.

use crate::types::{
    is_memory_column, required_columns, ReportError, Result, BYTES_PER_KILOBYTE, SIZE_COLUMN,
};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// In-memory benchmark table: one row per input size, one column per metric
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    /// Aligned with `headers`; ignored columns stay empty
    columns: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
    ignored: Vec<String>,
    num_rows: usize,
    memory_normalized: bool,
}

/// Summary of a loaded dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub num_rows: usize,
    pub num_columns: usize,
    pub num_memory_columns: usize,
    /// Smallest and largest input size, if the size column is present
    pub size_range: Option<(f64, f64)>,
}

impl Dataset {
    /// Load a dataset from a CSV file with a header row
    pub fn from_path(path: &Path) -> Result<Self> {
        log::info!("Loading benchmark CSV: {:?}", path);

        let file = File::open(path).map_err(|e| {
            ReportError::data_load(path.display().to_string(), format!("cannot open file: {}", e))
        })?;

        Self::from_reader(file, &path.display().to_string())
    }

    /// Load a dataset from any reader; `source_name` is used in error messages
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| ReportError::data_load(source_name, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ReportError::data_load(source_name, "missing header row"));
        }

        let required = required_columns();
        let strict: Vec<bool> = headers
            .iter()
            .map(|name| {
                name == SIZE_COLUMN || is_memory_column(name) || required.contains(name)
            })
            .collect();

        // Later duplicates of a free-form column are ignored
        let mut numeric = vec![true; headers.len()];
        let mut seen = HashSet::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            if !seen.insert(name.as_str()) {
                if strict[i] {
                    return Err(ReportError::data_load(
                        source_name,
                        format!("duplicate column '{}'", name),
                    ));
                }
                numeric[i] = false;
            }
        }

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        let mut num_rows = 0;

        for result in rdr.records() {
            let record = result.map_err(|e| ReportError::data_load(source_name, e.to_string()))?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            for (col, field) in record.iter().enumerate() {
                if !numeric[col] {
                    continue;
                }
                match field.parse::<f64>() {
                    Ok(value) => columns[col].push(value),
                    Err(_) if strict[col] => {
                        return Err(ReportError::data_load(
                            source_name,
                            format!(
                                "line {}: column '{}' has non-numeric value '{}'",
                                line, headers[col], field
                            ),
                        ));
                    }
                    Err(_) => {
                        log::debug!(
                            "Column '{}' is not numeric (line {}), ignoring it",
                            headers[col],
                            line
                        );
                        numeric[col] = false;
                        columns[col].clear();
                    }
                }
            }
            num_rows += 1;
        }

        if num_rows == 0 {
            return Err(ReportError::data_load(source_name, "no data rows"));
        }

        let mut index = HashMap::with_capacity(headers.len());
        let mut ignored = Vec::new();
        for (i, name) in headers.iter().enumerate() {
            if numeric[i] {
                index.insert(name.clone(), i);
            } else {
                ignored.push(name.clone());
            }
        }
        if !ignored.is_empty() {
            log::info!("Ignoring non-numeric columns: {}", ignored.join(", "));
        }

        log::debug!(
            "Parsed {} rows x {} columns from {}",
            num_rows,
            headers.len(),
            source_name
        );

        Ok(Self {
            headers,
            columns,
            index,
            ignored,
            num_rows,
            memory_normalized: false,
        })
    }

    /// Column names in header order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Free-form columns that held non-numeric values and were not loaded
    pub fn ignored_columns(&self) -> &[String] {
        &self.ignored
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All values of a column
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.index
            .get(name)
            .map(|&i| self.columns[i].as_slice())
            .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
    }

    /// Value of a column in the last row
    pub fn last_value(&self, name: &str) -> Result<f64> {
        self.column(name)?
            .last()
            .copied()
            .ok_or(ReportError::EmptyDataset)
    }

    /// Input sizes (x axis of every chart)
    pub fn sizes(&self) -> Result<&[f64]> {
        self.column(SIZE_COLUMN)
    }

    /// Names of all memory columns, in header order
    pub fn memory_columns(&self) -> impl Iterator<Item = &str> {
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|name| is_memory_column(name))
    }

    /// Whether memory columns have already been converted to kilobytes
    pub fn memory_normalized(&self) -> bool {
        self.memory_normalized
    }

    /// Convert every memory column from bytes to kilobytes, in place
    ///
    /// Returns the number of converted columns. The conversion happens at
    /// most once; later calls leave the data untouched and return 0.
    pub fn normalize_memory_units(&mut self) -> usize {
        if self.memory_normalized {
            log::warn!("Memory columns already in kilobytes, skipping conversion");
            return 0;
        }

        let mut converted = 0;
        for (name, values) in self.headers.iter().zip(self.columns.iter_mut()) {
            if !is_memory_column(name) {
                continue;
            }
            for value in values.iter_mut() {
                *value /= BYTES_PER_KILOBYTE;
            }
            log::debug!("Converted column {} to KB", name);
            converted += 1;
        }

        self.memory_normalized = true;
        log::info!("Converted {} memory columns from bytes to KB", converted);
        converted
    }

    /// Check that every named column is present, reporting all missing ones
    pub fn require_columns<I, S>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let missing: Vec<String> = names
            .into_iter()
            .filter(|name| !self.has_column(name.as_ref()))
            .map(|name| name.as_ref().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ReportError::MissingColumns(missing))
        }
    }

    pub fn stats(&self) -> DatasetStats {
        let size_range = self.sizes().ok().and_then(|sizes| {
            let min = sizes.iter().copied().reduce(f64::min)?;
            let max = sizes.iter().copied().reduce(f64::max)?;
            Some((min, max))
        });

        DatasetStats {
            num_rows: self.num_rows(),
            num_columns: self.headers.len(),
            num_memory_columns: self.memory_columns().count(),
            size_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SMALL_CSV: &str = "\
tamanho,pior_quick_t,pior_quick_m,pior_smart_m
500,1.5,204800,102400
1500,4.25,2048,1024
";

    fn load(content: &str) -> Result<Dataset> {
        Dataset::from_reader(content.as_bytes(), "test.csv")
    }

    #[test]
    fn test_load_columns() {
        let dataset = load(SMALL_CSV).unwrap();

        assert_eq!(dataset.num_rows(), 2);
        assert_eq!(dataset.headers().len(), 4);
        assert_eq!(dataset.sizes().unwrap(), &[500.0, 1500.0]);
        assert_eq!(dataset.column("pior_quick_t").unwrap(), &[1.5, 4.25]);
        assert_eq!(dataset.last_value("pior_quick_t").unwrap(), 4.25);
    }

    #[test]
    fn test_memory_normalization() {
        let mut dataset = load(SMALL_CSV).unwrap();

        assert_eq!(dataset.normalize_memory_units(), 2);
        assert!(dataset.memory_normalized());
        assert_eq!(dataset.column("pior_quick_m").unwrap(), &[200.0, 2.0]);
        assert_eq!(dataset.column("pior_smart_m").unwrap(), &[100.0, 1.0]);
        // Time and size columns are untouched
        assert_eq!(dataset.column("pior_quick_t").unwrap(), &[1.5, 4.25]);
        assert_eq!(dataset.sizes().unwrap(), &[500.0, 1500.0]);
    }

    #[test]
    fn test_memory_normalization_runs_once() {
        let mut dataset = load(SMALL_CSV).unwrap();
        dataset.normalize_memory_units();

        assert_eq!(dataset.normalize_memory_units(), 0);
        assert_eq!(dataset.column("pior_quick_m").unwrap(), &[200.0, 2.0]);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let dataset = load("tamanho , pior_smart_t\n 1000 , 3.2 \n").unwrap();
        assert_eq!(dataset.column("pior_smart_t").unwrap(), &[3.2]);
    }

    #[test]
    fn test_missing_column() {
        let dataset = load(SMALL_CSV).unwrap();

        match dataset.column("melhor_merge_t") {
            Err(ReportError::MissingColumn(name)) => assert_eq!(name, "melhor_merge_t"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_require_columns_reports_all_missing() {
        let dataset = load(SMALL_CSV).unwrap();

        assert!(dataset.require_columns(["tamanho", "pior_quick_t"]).is_ok());
        match dataset.require_columns(["tamanho", "medio_merge_m", "pior_merge_t"]) {
            Err(ReportError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["medio_merge_m", "pior_merge_t"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_value() {
        let err = load("tamanho,pior_quick_t\n500,abc\n").unwrap_err();
        let message = err.to_string();

        assert!(matches!(err, ReportError::DataLoad { .. }));
        assert!(message.contains("pior_quick_t"), "{}", message);
        assert!(message.contains("abc"), "{}", message);
        assert!(message.contains("line 2"), "{}", message);
    }

    #[test]
    fn test_free_form_columns_are_ignored() {
        let dataset = load(
            "tamanho,maquina,pior_quick_t,obs,lote\n\
             500,ryzen,1.5,,1\n\
             1500,ryzen,4.25,,2\n",
        )
        .unwrap();

        assert_eq!(dataset.num_rows(), 2);
        assert_eq!(dataset.ignored_columns(), &["maquina", "obs"]);
        assert!(!dataset.has_column("maquina"));
        assert_eq!(dataset.column("lote").unwrap(), &[1.0, 2.0]);
        assert_eq!(dataset.column("pior_quick_t").unwrap(), &[1.5, 4.25]);
    }

    #[test]
    fn test_text_in_memory_column_rejected() {
        let err = load("tamanho,extra_m\n500,n/a\n").unwrap_err();
        assert!(err.to_string().contains("column 'extra_m'"));
    }

    #[test]
    fn test_duplicate_free_form_column_tolerated() {
        let dataset = load("tamanho,,\n500,,\n").unwrap();
        assert_eq!(dataset.sizes().unwrap(), &[500.0]);
        assert_eq!(dataset.ignored_columns().len(), 2);
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = load("tamanho,pior_quick_t\n500,1.0,7\n").unwrap_err();
        assert!(matches!(err, ReportError::DataLoad { .. }));
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = load("tamanho,tamanho\n1,2\n").unwrap_err();
        assert!(err.to_string().contains("duplicate column 'tamanho'"));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(load(""), Err(ReportError::DataLoad { .. })));
        assert!(matches!(
            load("tamanho,pior_quick_t\n"),
            Err(ReportError::DataLoad { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_path(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, ReportError::DataLoad { .. }));
    }

    #[test]
    fn test_from_path_and_stats() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SMALL_CSV.as_bytes()).unwrap();

        let dataset = Dataset::from_path(file.path()).unwrap();
        let stats = dataset.stats();

        assert_eq!(stats.num_rows, 2);
        assert_eq!(stats.num_columns, 4);
        assert_eq!(stats.num_memory_columns, 2);
        assert_eq!(stats.size_range, Some((500.0, 1500.0)));
    }
}
