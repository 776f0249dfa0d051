//! Declarative chart table
//!
//! Each chart of the report is described by a [`ChartSpec`]: the file stem,
//! figure size, titles, and one or two panels listing which columns to plot
//! and how. The generator iterates [`standard_charts`] and hands every spec
//! to the renderer.

use crate::dataset::Dataset;
use crate::types::{Algorithm, ColumnKey, Result, Scenario, SIZE_COLUMN};
use plotters::style::RGBColor;

/// Merge sort (green)
pub const COLOR_MERGE: RGBColor = RGBColor(0x28, 0xa7, 0x45);
/// Quick sort (red)
pub const COLOR_QUICK: RGBColor = RGBColor(0xdc, 0x35, 0x45);
/// Smart sort (blue)
pub const COLOR_SMART: RGBColor = RGBColor(0x00, 0x7b, 0xff);
/// Average case in the smart-sort stability chart (amber)
pub const COLOR_AVERAGE: RGBColor = RGBColor(0xff, 0xc1, 0x07);

/// Default figure size in pixels
pub const FIGURE_SIZE: (u32, u32) = (1000, 600);
/// Size of the two-panel figure
pub const WIDE_FIGURE_SIZE: (u32, u32) = (1400, 600);

const DEFAULT_LINE_WIDTH: u32 = 2;

/// Point marker drawn at every data point of a line series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Cross,
    Diamond,
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
}

/// One line series: a metric column plotted against the input size
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub column: ColumnKey,
    pub label: &'static str,
    pub color: RGBColor,
    pub marker: Marker,
    pub line: LineStyle,
    pub width: u32,
    pub alpha: f64,
}

impl SeriesSpec {
    pub fn new(column: ColumnKey, label: &'static str, color: RGBColor) -> Self {
        Self {
            column,
            label,
            color,
            marker: Marker::Circle,
            line: LineStyle::Solid,
            width: DEFAULT_LINE_WIDTH,
            alpha: 1.0,
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// One bar group member: bars for a column, shifted along the x axis
#[derive(Debug, Clone)]
pub struct BarSpec {
    pub column: ColumnKey,
    pub label: &'static str,
    pub color: RGBColor,
    pub alpha: f64,
    /// Horizontal shift of the bar center relative to the input size
    pub offset: f64,
}

/// Arrow-annotated difference between the last points of two series
#[derive(Debug, Clone)]
pub struct ReductionAnnotation {
    /// Series whose last value is subtracted from
    pub upper: ColumnKey,
    /// Series the arrow points at
    pub lower: ColumnKey,
    /// Label position relative to (last size, last upper value)
    pub text_offset: (f64, f64),
}

/// Resolved annotation for a concrete dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionMark {
    pub difference: f64,
    /// Arrow tip, the last point of the lower series
    pub tip: (f64, f64),
    /// Label anchor
    pub text_at: (f64, f64),
}

impl ReductionAnnotation {
    pub fn resolve(&self, dataset: &Dataset) -> Result<ReductionMark> {
        let last_size = dataset.last_value(SIZE_COLUMN)?;
        let upper = dataset.last_value(&self.upper.column_name())?;
        let lower = dataset.last_value(&self.lower.column_name())?;

        Ok(ReductionMark {
            difference: upper - lower,
            tip: (last_size, lower),
            text_at: (last_size + self.text_offset.0, upper + self.text_offset.1),
        })
    }
}

impl ReductionMark {
    pub fn label(&self) -> String {
        format!("Redução de ~{:.1}ms", self.difference)
    }
}

#[derive(Debug, Clone)]
pub struct LinePanel {
    pub caption: Option<&'static str>,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub legend_title: Option<&'static str>,
    pub series: Vec<SeriesSpec>,
    pub annotation: Option<ReductionAnnotation>,
}

#[derive(Debug, Clone)]
pub struct BarPanel {
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Width of every bar in x-axis units
    pub bar_width: f64,
    pub bars: Vec<BarSpec>,
}

#[derive(Debug, Clone)]
pub enum Panel {
    Lines(LinePanel),
    Bars(BarPanel),
}

impl Panel {
    /// Metric columns read by this panel
    pub fn columns(&self) -> Vec<ColumnKey> {
        match self {
            Panel::Lines(panel) => {
                let mut columns: Vec<ColumnKey> = panel.series.iter().map(|s| s.column).collect();
                if let Some(annotation) = &panel.annotation {
                    columns.push(annotation.upper);
                    columns.push(annotation.lower);
                }
                columns
            }
            Panel::Bars(panel) => panel.bars.iter().map(|b| b.column).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ChartLayout {
    Single(Panel),
    SideBySide(Panel, Panel),
}

/// Everything needed to render one chart file
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// File name without extension
    pub stem: &'static str,
    pub size: (u32, u32),
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub layout: ChartLayout,
}

impl ChartSpec {
    pub fn panels(&self) -> Vec<&Panel> {
        match &self.layout {
            ChartLayout::Single(panel) => vec![panel],
            ChartLayout::SideBySide(left, right) => vec![left, right],
        }
    }

    /// Column names this chart reads, size column first, without duplicates
    pub fn columns(&self) -> Vec<String> {
        let mut names = vec![SIZE_COLUMN.to_string()];
        for column in self.panels().into_iter().flat_map(Panel::columns) {
            let name = column.column_name();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

fn time(scenario: Scenario, algorithm: Algorithm) -> ColumnKey {
    ColumnKey::time(scenario, algorithm)
}

fn memory(scenario: Scenario, algorithm: Algorithm) -> ColumnKey {
    ColumnKey::memory(scenario, algorithm)
}

/// Merge/quick/smart time series for one scenario
fn algorithm_time_series(scenario: Scenario) -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new(time(scenario, Algorithm::Merge), "Merge Sort", COLOR_MERGE),
        SeriesSpec::new(time(scenario, Algorithm::Quick), "Quick Sort", COLOR_QUICK)
            .with_marker(Marker::Cross)
            .with_line(LineStyle::Dashed),
        SeriesSpec::new(time(scenario, Algorithm::Smart), "Smart Sort", COLOR_SMART)
            .with_marker(Marker::Diamond)
            .with_line(LineStyle::DashDot),
    ]
}

/// Short-labelled worst-case series used by the two-panel chart
fn worst_case_series(column: fn(Scenario, Algorithm) -> ColumnKey) -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new(column(Scenario::Worst, Algorithm::Merge), "Merge", COLOR_MERGE),
        SeriesSpec::new(column(Scenario::Worst, Algorithm::Quick), "Quick", COLOR_QUICK)
            .with_marker(Marker::Cross)
            .with_line(LineStyle::Dashed),
        SeriesSpec::new(column(Scenario::Worst, Algorithm::Smart), "Smart", COLOR_SMART)
            .with_marker(Marker::Diamond)
            .with_width(3),
    ]
}

fn time_panel(series: Vec<SeriesSpec>) -> LinePanel {
    LinePanel {
        caption: None,
        x_label: "Tamanho da Entrada (N)",
        y_label: "Tempo (ms)",
        legend_title: None,
        series,
        annotation: None,
    }
}

/// The six charts of the benchmark report, in output order
pub fn standard_charts() -> Vec<ChartSpec> {
    let best_case = ChartSpec {
        stem: "01_tempo_melhor_caso",
        size: FIGURE_SIZE,
        title: "1. MELHOR CASO (Tempo): Array Ordenado/Aleatório",
        subtitle: Some("Smart Sort acompanha o Quick Sort?"),
        layout: ChartLayout::Single(Panel::Lines(time_panel(algorithm_time_series(
            Scenario::Best,
        )))),
    };

    let average_case = ChartSpec {
        stem: "02_tempo_caso_medio",
        size: FIGURE_SIZE,
        title: "2. CASO MÉDIO (Tempo): Input Aleatório",
        subtitle: Some("Eficiência geral dos algoritmos"),
        layout: ChartLayout::Single(Panel::Lines(time_panel(algorithm_time_series(
            Scenario::Average,
        )))),
    };

    let worst_case = ChartSpec {
        stem: "03_tempo_pior_caso_prova",
        size: FIGURE_SIZE,
        title: "3. PIOR CASO (Tempo): A Prova da Otimização",
        subtitle: Some("Note como o Smart Sort evita o pico exponencial"),
        layout: ChartLayout::Single(Panel::Lines(LinePanel {
            annotation: Some(ReductionAnnotation {
                upper: time(Scenario::Worst, Algorithm::Quick),
                lower: time(Scenario::Worst, Algorithm::Smart),
                text_offset: (-1500.0, -0.5),
            }),
            ..time_panel(vec![
                SeriesSpec::new(time(Scenario::Worst, Algorithm::Merge), "Merge Sort", COLOR_MERGE)
                    .with_alpha(0.6),
                SeriesSpec::new(
                    time(Scenario::Worst, Algorithm::Quick),
                    "Quick Sort (O(n²))",
                    COLOR_QUICK,
                )
                .with_marker(Marker::Cross)
                .with_line(LineStyle::Dashed),
                SeriesSpec::new(
                    time(Scenario::Worst, Algorithm::Smart),
                    "Smart Sort (Otimizado)",
                    COLOR_SMART,
                )
                .with_marker(Marker::Diamond)
                .with_width(4),
            ])
        })),
    };

    let smart_stability = ChartSpec {
        stem: "04_estabilidade_smart_sort",
        size: FIGURE_SIZE,
        title: "4. SMART SORT (Interno): Consistência",
        subtitle: Some("Ele mantém performance alta em todos os cenários?"),
        layout: ChartLayout::Single(Panel::Lines(LinePanel {
            legend_title: Some("Cenário"),
            ..time_panel(vec![
                SeriesSpec::new(time(Scenario::Best, Algorithm::Smart), "Melhor Caso", COLOR_MERGE),
                SeriesSpec::new(time(Scenario::Average, Algorithm::Smart), "Caso Médio", COLOR_AVERAGE)
                    .with_marker(Marker::Square),
                SeriesSpec::new(time(Scenario::Worst, Algorithm::Smart), "Pior Caso", COLOR_QUICK)
                    .with_marker(Marker::Triangle),
            ])
        })),
    };

    let time_vs_space = ChartSpec {
        stem: "05_analise_tempo_vs_espaco",
        size: WIDE_FIGURE_SIZE,
        title: "5. ANÁLISE DE OTIMIZAÇÃO: Custo de Tempo vs Custo de Memória",
        subtitle: None,
        layout: ChartLayout::SideBySide(
            Panel::Lines(LinePanel {
                caption: Some("5A. Tempo no Pior Caso (ms)"),
                x_label: "Tamanho (N)",
                y_label: "Tempo (ms)",
                legend_title: None,
                series: worst_case_series(time),
                annotation: None,
            }),
            Panel::Lines(LinePanel {
                caption: Some("5B. Memória no Pior Caso (KB)"),
                x_label: "Tamanho (N)",
                y_label: "Memória (KB)",
                legend_title: None,
                series: worst_case_series(memory),
                annotation: None,
            }),
        ),
    };

    let memory_bars = ChartSpec {
        stem: "06_memoria_barras",
        size: FIGURE_SIZE,
        title: "6. EFICIÊNCIA DE MEMÓRIA (Caso Médio)",
        subtitle: Some("Smart Sort economiza tanto quanto o Quick?"),
        layout: ChartLayout::Single(Panel::Bars(BarPanel {
            x_label: "Tamanho (N)",
            y_label: "Memória Alocada (KB)",
            bar_width: 100.0,
            bars: vec![
                BarSpec {
                    column: memory(Scenario::Average, Algorithm::Merge),
                    label: "Merge",
                    color: COLOR_MERGE,
                    alpha: 0.7,
                    offset: -100.0,
                },
                BarSpec {
                    column: memory(Scenario::Average, Algorithm::Quick),
                    label: "Quick",
                    color: COLOR_QUICK,
                    alpha: 0.7,
                    offset: 0.0,
                },
                BarSpec {
                    column: memory(Scenario::Average, Algorithm::Smart),
                    label: "Smart",
                    color: COLOR_SMART,
                    alpha: 0.9,
                    offset: 100.0,
                },
            ],
        })),
    };

    vec![
        best_case,
        average_case,
        worst_case,
        smart_stability,
        time_vs_space,
        memory_bars,
    ]
}
