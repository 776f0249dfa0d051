//! Chart rendering
//!
//! Turns a [`ChartSpec`] plus the dataset into an image. Drawing code is
//! generic over the plotters backend so PNG and SVG share one code path.

mod backend;
mod glyphs;

pub use backend::FontSafeBackend;

use crate::charts::{
    BarPanel, ChartLayout, ChartSpec, LinePanel, LineStyle, Marker, Panel, ReductionMark,
    SeriesSpec,
};
use crate::config::ImageFormat;
use crate::dataset::Dataset;
use crate::types::{ReportError, Result};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::ops::Range;
use std::path::Path;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const FONT_FAMILY: &str = "sans-serif";
const TITLE_FONT_SIZE: i32 = 26;
const SUBTITLE_FONT_SIZE: i32 = 18;
const CAPTION_FONT_SIZE: i32 = 20;
const AXIS_FONT_SIZE: i32 = 16;
const LABEL_FONT_SIZE: i32 = 13;
const LEGEND_FONT_SIZE: i32 = 14;
const ANNOTATION_FONT_SIZE: i32 = 15;

const GRID_COLOR: RGBColor = RGBColor(0xb0, 0xb0, 0xb0);
const MARKER_SIZE: i32 = 5;

/// Render one chart to `path` in the given format
pub fn render_chart(
    spec: &ChartSpec,
    dataset: &Dataset,
    path: &Path,
    format: ImageFormat,
) -> Result<()> {
    log::debug!("Rendering {} ({}x{}) to {:?}", spec.stem, spec.size.0, spec.size.1, path);

    let result = match format {
        ImageFormat::Png => {
            let backend = FontSafeBackend::new(BitMapBackend::new(path, spec.size));
            draw_chart(backend.into_drawing_area(), spec, dataset)
        }
        ImageFormat::Svg => {
            draw_chart(SVGBackend::new(path, spec.size).into_drawing_area(), spec, dataset)
        }
    };

    result.map_err(|e| match e {
        ReportError::Render { reason, .. } => ReportError::Render {
            chart: spec.stem.to_string(),
            reason,
        },
        other => other,
    })
}

fn draw_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    dataset: &Dataset,
) -> Result<()> {
    root.fill(&WHITE)?;

    let mut area = root.titled(spec.title, (FONT_FAMILY, TITLE_FONT_SIZE))?;
    if let Some(subtitle) = spec.subtitle {
        area = area.titled(subtitle, (FONT_FAMILY, SUBTITLE_FONT_SIZE))?;
    }

    match &spec.layout {
        ChartLayout::Single(panel) => draw_panel(&area, panel, dataset)?,
        ChartLayout::SideBySide(left, right) => {
            let halves = area.split_evenly((1, 2));
            draw_panel(&halves[0], left, dataset)?;
            draw_panel(&halves[1], right, dataset)?;
        }
    }

    root.present()?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    dataset: &Dataset,
) -> Result<()> {
    match panel {
        Panel::Lines(panel) => draw_line_panel(area, panel, dataset),
        Panel::Bars(panel) => draw_bar_panel(area, panel, dataset),
    }
}

fn draw_line_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &LinePanel,
    dataset: &Dataset,
) -> Result<()> {
    let sizes = dataset.sizes()?;

    let mut series = Vec::with_capacity(panel.series.len());
    for spec in &panel.series {
        let values = dataset.column(&spec.column.column_name())?;
        let points: Vec<(f64, f64)> = sizes.iter().copied().zip(values.iter().copied()).collect();
        series.push((spec, points));
    }

    let mark = match &panel.annotation {
        Some(annotation) => Some(annotation.resolve(dataset)?),
        None => None,
    };

    let x_range = padded_range(sizes.iter().copied());
    let y_range = value_range(series.iter().flat_map(|(_, points)| points.iter().map(|p| p.1)));

    let mut chart = build_chart(area, panel.caption, x_range.clone(), y_range.clone())?;
    draw_mesh(&mut chart, panel.x_label, panel.y_label)?;

    if let Some(title) = panel.legend_title {
        // Label-only entry heading the legend
        chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
            .label(title);
    }

    for (spec, points) in &series {
        draw_line_series(&mut chart, spec, points)?;
    }

    if let Some(mark) = &mark {
        draw_reduction(&mut chart, mark, &x_range, &y_range)?;
    }

    draw_legend(&mut chart)
}

fn draw_bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &BarPanel,
    dataset: &Dataset,
) -> Result<()> {
    let sizes = dataset.sizes()?;
    let half_width = panel.bar_width / 2.0;

    let mut groups = Vec::with_capacity(panel.bars.len());
    for bar in &panel.bars {
        groups.push((bar, dataset.column(&bar.column.column_name())?));
    }

    let x_range = padded_range(sizes.iter().flat_map(|&x| {
        panel
            .bars
            .iter()
            .flat_map(move |b| [x + b.offset - half_width, x + b.offset + half_width])
    }));
    let y_range = value_range(groups.iter().flat_map(|(_, values)| values.iter().copied()));

    let mut chart = build_chart(area, None, x_range, y_range)?;
    draw_mesh(&mut chart, panel.x_label, panel.y_label)?;

    for (bar, values) in &groups {
        let color = bar.color.mix(bar.alpha);
        chart
            .draw_series(sizes.iter().zip(values.iter()).map(|(&x, &y)| {
                let center = x + bar.offset;
                Rectangle::new(
                    [(center - half_width, 0.0), (center + half_width, y)],
                    color.filled(),
                )
            }))?
            .label(bar.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 16, y + 5)], color.filled()));
    }

    draw_legend(&mut chart)
}

fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    caption: Option<&str>,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> Result<Chart<'a, DB>> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70);
    if let Some(caption) = caption {
        builder.caption(caption, (FONT_FAMILY, CAPTION_FONT_SIZE));
    }
    Ok(builder.build_cartesian_2d(x_range, y_range)?)
}

fn draw_mesh<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    x_label: &str,
    y_label: &str,
) -> Result<()> {
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .bold_line_style(GRID_COLOR.mix(0.7).stroke_width(1))
        .light_line_style(WHITE)
        .axis_desc_style((FONT_FAMILY, AXIS_FONT_SIZE))
        .label_style((FONT_FAMILY, LABEL_FONT_SIZE))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format_tick(*y))
        .draw()?;
    Ok(())
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(chart: &mut Chart<'a, DB>) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font((FONT_FAMILY, LEGEND_FONT_SIZE))
        .draw()?;
    Ok(())
}

fn draw_line_series<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart<'a, DB>,
    spec: &SeriesSpec,
    points: &[(f64, f64)],
) -> Result<()> {
    let color = spec.color.mix(spec.alpha);
    let style = color.stroke_width(spec.width);

    match spec.line {
        LineStyle::Solid => {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), style))?
                .label(spec.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], style));
        }
        LineStyle::Dashed => {
            chart
                .draw_series(DashedLineSeries::new(points.iter().copied(), 10, 6, style))?
                .label(spec.label)
                .legend(move |(x, y)| {
                    EmptyElement::at((x, y))
                        + PathElement::new(vec![(0, 0), (10, 0)], style)
                        + PathElement::new(vec![(16, 0), (25, 0)], style)
                });
        }
        LineStyle::DashDot => draw_dash_dot(chart, spec.label, points, style)?,
    }

    draw_markers(chart, points, spec.marker, color)
}

/// Dash, gap, dot, gap; lengths in pixels
const DASH_DOT_PATTERN: [f64; 4] = [12.0, 4.0, 2.0, 4.0];

fn draw_dash_dot<'a, DB: DrawingBackend + 'a>(
    chart: &mut Chart<'a, DB>,
    label: &str,
    points: &[(f64, f64)],
    style: ShapeStyle,
) -> Result<()> {
    if let Some(&anchor) = points.first() {
        // Pattern is laid out in pixels, pieces are drawn relative to the first point
        let (origin, pixels) = {
            let area = chart.plotting_area();
            let pixels: Vec<(f64, f64)> = points
                .iter()
                .map(|p| {
                    let (x, y) = area.map_coordinate(p);
                    (f64::from(x), f64::from(y))
                })
                .collect();
            (area.map_coordinate(&anchor), pixels)
        };

        let relative = |(x, y): (f64, f64)| {
            (x.round() as i32 - origin.0, y.round() as i32 - origin.1)
        };
        chart.draw_series(dash_pattern(&pixels, &DASH_DOT_PATTERN).into_iter().map(
            |[from, to]| {
                EmptyElement::at(anchor) + PathElement::new(vec![relative(from), relative(to)], style)
            },
        ))?;
    }

    // Label-only series so the legend entry follows the other series
    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
        .label(label)
        .legend(move |(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (12, 0)], style)
                + PathElement::new(vec![(17, 0), (19, 0)], style)
        });
    Ok(())
}

/// The "on" pieces of a polyline under a repeating on/off length pattern
///
/// The pattern phase carries over from one segment to the next.
fn dash_pattern(points: &[(f64, f64)], pattern: &[f64]) -> Vec<[(f64, f64); 2]> {
    let mut pieces = Vec::new();
    if pattern.is_empty() || pattern.iter().any(|len| *len <= 0.0) {
        return pieces;
    }

    let mut index = 0;
    let mut left = pattern[0];
    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let length = (dx * dx + dy * dy).sqrt();

        let mut pos = 0.0;
        while pos < length {
            let step = left.min(length - pos);
            if index % 2 == 0 {
                let (a, b) = (pos / length, (pos + step) / length);
                pieces.push([
                    (start.0 + dx * a, start.1 + dy * a),
                    (start.0 + dx * b, start.1 + dy * b),
                ]);
            }
            pos += step;
            left -= step;
            if left <= 0.0 {
                index = (index + 1) % pattern.len();
                left = pattern[index];
            }
        }
    }
    pieces
}

fn draw_markers<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    points: &[(f64, f64)],
    marker: Marker,
    color: RGBAColor,
) -> Result<()> {
    let s = MARKER_SIZE;
    let points = points.iter().copied();

    match marker {
        Marker::Circle => {
            chart.draw_series(points.map(|p| Circle::new(p, s, color.filled())))?;
        }
        Marker::Cross => {
            chart.draw_series(points.map(|p| Cross::new(p, s, color.stroke_width(2))))?;
        }
        Marker::Triangle => {
            chart.draw_series(points.map(|p| TriangleMarker::new(p, s + 1, color.filled())))?;
        }
        Marker::Square => {
            chart.draw_series(points.map(|p| {
                EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], color.filled())
            }))?;
        }
        Marker::Diamond => {
            chart.draw_series(points.map(|p| {
                EmptyElement::at(p)
                    + Polygon::new(vec![(0, -s - 1), (s, 0), (0, s + 1), (-s, 0)], color.filled())
            }))?;
        }
    }
    Ok(())
}

/// Label plus arrow from the label to the annotated point
fn draw_reduction<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    mark: &ReductionMark,
    x_range: &Range<f64>,
    y_range: &Range<f64>,
) -> Result<()> {
    let text_at = (
        mark.text_at.0.clamp(x_range.start, x_range.end),
        mark.text_at.1.clamp(y_range.start, y_range.end),
    );

    chart.draw_series(std::iter::once(PathElement::new(
        vec![text_at, mark.tip],
        BLACK.stroke_width(1),
    )))?;

    let from = chart.plotting_area().map_coordinate(&text_at);
    let to = chart.plotting_area().map_coordinate(&mark.tip);
    let head = arrow_head(from, to, 12.0, 5.0);
    chart.draw_series(std::iter::once(
        EmptyElement::at(mark.tip) + Polygon::new(head.to_vec(), BLACK.filled()),
    ))?;

    chart.draw_series(std::iter::once(Text::new(
        mark.label(),
        text_at,
        (FONT_FAMILY, ANNOTATION_FONT_SIZE).into_font().color(&BLACK),
    )))?;
    Ok(())
}

/// Arrow head triangle pointing from `from` to `to`, relative to `to`
fn arrow_head(
    from: (i32, i32),
    to: (i32, i32),
    length: f64,
    half_width: f64,
) -> [(i32, i32); 3] {
    let dx = f64::from(to.0 - from.0);
    let dy = f64::from(to.1 - from.1);
    let norm = (dx * dx + dy * dy).sqrt();
    if norm < 1.0 {
        return [(0, 0); 3];
    }

    let (ux, uy) = (dx / norm, dy / norm);
    let (bx, by) = (-ux * length, -uy * length);
    let (px, py) = (-uy * half_width, ux * half_width);

    [
        (0, 0),
        ((bx + px).round() as i32, (by + py).round() as i32),
        ((bx - px).round() as i32, (by - py).round() as i32),
    ]
}

fn finite_bounds<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// X axis range: data extent plus 5% on both sides
fn padded_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = finite_bounds(values).unwrap_or((0.0, 1.0));
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        min.abs().max(1.0) * 0.05
    };
    (min - pad)..(max + pad)
}

/// Y axis range: includes zero, 10% headroom above the largest value
fn value_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = finite_bounds(values).unwrap_or((0.0, 0.0));
    let lower = min.min(0.0);
    let upper = if max > 0.0 { max * 1.1 } else { 0.0 };
    if upper - lower <= 0.0 {
        lower..(lower + 1.0)
    } else {
        lower..upper
    }
}

fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 100.0 || magnitude == 0.0 {
        format!("{:.0}", value)
    } else if magnitude >= 1.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}
