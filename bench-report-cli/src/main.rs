//! Sort Benchmark Report CLI
//!
//! Reads the benchmark CSV and writes the six comparison charts. Paths and
//! the image format come from flags, an optional TOML config file, or the
//! built-in defaults, in that order of precedence.

use anyhow::Result;
use bench_report::{DatasetStats, ImageFormat, ReportGenerator};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

mod config;

use config::{AppConfig, Overrides};

/// Sort Benchmark Report - Render charts from sorting benchmark results
#[derive(Parser, Debug)]
#[command(name = "bench-report")]
#[command(about = "Render comparison charts from sorting benchmark CSV results", long_about = None)]
#[command(version)]
struct Args {
    /// Benchmark CSV to read (default: CSV/resultados_completo.csv)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Directory for the charts (default: graficos_otimizados)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Image format: png or svg
    #[arg(long, value_name = "FORMAT", value_parser = parse_format)]
    format: Option<ImageFormat>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Sort Benchmark Report CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using report library v{}", bench_report::VERSION);

    let stdout = io::stdout();
    report(&args, &mut stdout.lock())
}

/// Run the report; any failure ends it with a single `Erro:` line and the
/// exit status stays 0
fn report<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    if let Err(e) = run(args, out) {
        log::debug!("Report failed: {:?}", e);
        writeln!(out, "Erro: {:#}", e)?;
    }
    Ok(())
}

fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };

    let report_config = file_config.into_report_config(Overrides {
        csv_file: args.input.clone(),
        output_dir: args.output.clone(),
        format: args.format,
    });

    let generator = ReportGenerator::new(report_config);

    writeln!(out, "Lendo dados de: {}", generator.config().csv_file().display())?;
    let dataset = generator.load_dataset()?;
    print_summary(out, &dataset.stats())?;

    let mut written = Ok(());
    generator.generate(&dataset, |artifact| {
        if written.is_ok() {
            written = writeln!(out, "Salvo: {}", artifact.file_name);
        }
    })?;
    written?;

    Ok(())
}

fn print_summary<W: Write>(out: &mut W, stats: &DatasetStats) -> io::Result<()> {
    writeln!(
        out,
        "  {} linhas, {} colunas ({} de memória convertidas para KB)",
        stats.num_rows, stats.num_columns, stats.num_memory_columns
    )?;
    if let Some((min, max)) = stats.size_range {
        writeln!(out, "  Tamanhos de entrada: {} a {}", min, max)?;
    }
    Ok(())
}

fn parse_format(value: &str) -> std::result::Result<ImageFormat, String> {
    value.parse().map_err(|e: bench_report::ReportError| e.to_string())
}

/// Initialize logging based on verbosity
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_report::required_columns;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    fn console(args: &[&str]) -> Vec<String> {
        let args = Args::parse_from(std::iter::once("bench-report").chain(args.iter().copied()));
        let mut out = Vec::new();
        report(&args, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn write_benchmark_csv(dir: &std::path::Path) -> PathBuf {
        let header = required_columns().join(",");
        let row = |size: f64| {
            required_columns()
                .iter()
                .map(|name| {
                    if name == bench_report::SIZE_COLUMN {
                        size.to_string()
                    } else if name.ends_with("_m") {
                        "20480".to_string()
                    } else {
                        format!("{}", size / 1000.0)
                    }
                })
                .collect::<Vec<_>>()
                .join(",")
        };
        let path = dir.join("resultados.csv");
        fs::write(&path, format!("{}\n{}\n{}\n", header, row(500.0), row(4898.0))).unwrap();
        path
    }

    #[test]
    fn test_missing_csv_prints_single_error_line() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.csv");
        let out_dir = tmp.path().join("out");

        let lines = console(&["-i", missing.to_str().unwrap(), "-o", out_dir.to_str().unwrap()]);

        assert_eq!(lines.len(), 2, "{:?}", lines);
        assert_eq!(lines[0], format!("Lendo dados de: {}", missing.display()));
        assert!(lines[1].starts_with("Erro: "), "{:?}", lines);
        assert!(lines[1].contains("nope.csv"));
        assert_eq!(lines.iter().filter(|l| l.starts_with("Erro:")).count(), 1);
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_bad_config_prints_single_error_line() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("config.toml");
        fs::write(&config, "[output\nformat = ").unwrap();

        let lines = console(&["-c", config.to_str().unwrap()]);

        assert_eq!(lines.len(), 1, "{:?}", lines);
        assert!(lines[0].starts_with("Erro: Failed to parse config file"), "{:?}", lines);
    }

    #[test]
    fn test_successful_run_console_output() {
        let tmp = TempDir::new().unwrap();
        let csv = write_benchmark_csv(tmp.path());
        let out_dir = tmp.path().join("graficos");

        let lines = console(&["-i", csv.to_str().unwrap(), "-o", out_dir.to_str().unwrap()]);

        assert_eq!(lines[0], format!("Lendo dados de: {}", csv.display()));
        assert!(lines.iter().all(|l| !l.starts_with("Erro:")), "{:?}", lines);

        let saved: Vec<&str> = lines
            .iter()
            .filter_map(|l| l.strip_prefix("Salvo: "))
            .collect();
        assert_eq!(
            saved,
            [
                "01_tempo_melhor_caso.png",
                "02_tempo_caso_medio.png",
                "03_tempo_pior_caso_prova.png",
                "04_estabilidade_smart_sort.png",
                "05_analise_tempo_vs_espaco.png",
                "06_memoria_barras.png",
            ]
        );
        assert!(out_dir.join("06_memoria_barras.png").is_file());
    }

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "bench-report",
            "-i",
            "data.csv",
            "-o",
            "out",
            "--format",
            "SVG",
            "-vv",
        ]);

        assert_eq!(args.input, Some(PathBuf::from("data.csv")));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.format, Some(ImageFormat::Svg));
        assert_eq!(args.verbose, 2);
        assert!(!args.quiet);
    }

    #[test]
    fn test_no_flags_means_no_overrides() {
        let args = Args::parse_from(["bench-report"]);

        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(args.config.is_none());
        assert!(args.format.is_none());
    }

    #[test]
    fn test_parse_format_rejects_unknown() {
        assert!(parse_format("gif").unwrap_err().contains("gif"));
        assert_eq!(parse_format("png"), Ok(ImageFormat::Png));
    }
}
