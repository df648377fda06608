// src/chart/render.rs

use super::{
    annotate::{annotate, Annotation, Extremum},
    style::{parse_hex_color, ChartStyle, YAxis},
};
use crate::{report::ChartReport, series::TimeSeries};
use anyhow::{bail, Result};
use plotters::{coord::Shift, prelude::*, style::TextStyle};
use plotters_backend::BackendCoord;
use std::ops::Range;
use tracing::{debug, info};

/// Output size of every chart, in pixels.
pub const CHART_SIZE: (u32, u32) = (1024, 768);

/// Tick years drawn between the first and last year of a series.
const LITERAL_TICKS: [i32; 5] = [1975, 1990, 2005, 2020, 2035];

const FONT: &str = "sans-serif";
const PAD: i32 = 8;
const LINE_GAP: i32 = 4;

/// Tick marks for the x axis: both ends of the series plus the literal years
/// that fall strictly inside it.
pub fn x_ticks(first: i32, last: i32) -> Vec<i32> {
    let mut ticks = vec![first];
    ticks.extend(LITERAL_TICKS.iter().copied().filter(|&y| y > first && y < last));
    if last > first {
        ticks.push(last);
    }
    ticks
}

/// Vertical bounds for `series` under `axis`.
pub fn y_bounds(series: &TimeSeries, axis: YAxis) -> Result<(f64, f64)> {
    match axis {
        YAxis::Fixed { min, max } => {
            if !(min < max) {
                bail!("fixed y axis needs min < max, got [{}, {}]", min, max);
            }
            Ok((min, max))
        }
        YAxis::Auto => {
            // area charts fill down to zero, so zero is always in view
            let lo = series.min_point().value.min(0.0);
            let hi = series.max_point().value.max(0.0) * 1.05;
            Ok(if hi > lo { (lo, hi) } else { (lo, lo + 1.0) })
        }
    }
}

/// Map `(x, y)` plotting-area fractions (origin bottom-left) to pixels.
fn anchor_pixels(anchor: (f64, f64), px: &Range<i32>, py: &Range<i32>) -> BackendCoord {
    let width = (px.end - px.start) as f64;
    let height = (py.end - py.start) as f64;
    (
        px.start + (anchor.0 * width).round() as i32,
        py.end - (anchor.1 * height).round() as i32,
    )
}

#[derive(Debug, Clone, Copy)]
enum Corner {
    TopRight,
    BottomLeft,
}

/// Pixel layout of a multi-line label.
struct TextBox {
    top_left: BackendCoord,
    size: (i32, i32),
    line_height: i32,
}

impl TextBox {
    fn bottom_right(&self) -> BackendCoord {
        (self.top_left.0 + self.size.0, self.top_left.1 + self.size.1)
    }

    fn center(&self) -> BackendCoord {
        (
            self.top_left.0 + self.size.0 / 2,
            self.top_left.1 + self.size.1 / 2,
        )
    }
}

fn layout_text_box<DB>(
    root: &DrawingArea<DB, Shift>,
    lines: &[&str],
    at: BackendCoord,
    corner: Corner,
    text: &TextStyle,
) -> Result<TextBox>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut width = 0;
    let mut height = 0;
    for line in lines {
        let (w, h) = root.estimate_text_size(line, text)?;
        width = width.max(w as i32);
        height = height.max(h as i32);
    }
    let line_height = height + LINE_GAP;
    let n = lines.len() as i32;
    let size = (width + 2 * PAD, line_height * n - LINE_GAP + 2 * PAD);
    let top_left = match corner {
        Corner::TopRight => (at.0 - size.0, at.1),
        Corner::BottomLeft => (at.0, at.1 - size.1),
    };
    Ok(TextBox {
        top_left,
        size,
        line_height,
    })
}

fn draw_text_box<DB>(
    root: &DrawingArea<DB, Shift>,
    layout: &TextBox,
    lines: &[&str],
    text: &TextStyle,
    background: ShapeStyle,
    border: Option<ShapeStyle>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let corners = [layout.top_left, layout.bottom_right()];
    root.draw(&Rectangle::new(corners, background))?;
    if let Some(border) = border {
        root.draw(&Rectangle::new(corners, border))?;
    }
    for (i, line) in lines.iter().enumerate() {
        let pos = (
            layout.top_left.0 + PAD,
            layout.top_left.1 + PAD + i as i32 * layout.line_height,
        );
        root.draw(&Text::new(line.to_string(), pos, text.clone()))?;
    }
    Ok(())
}

/// Render one dependency-ratio chart of `series` onto `root`.
///
/// Draws the filled area, both axes, the decorative legend and, when
/// `style.annotations` is set, the max/min labels tied to their points.
/// The caller owns the drawing area and is responsible for `present()`.
#[tracing::instrument(level = "info", skip_all, fields(indicator = %style.indicator))]
pub fn render_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &TimeSeries,
    style: &ChartStyle,
) -> Result<ChartReport>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let fill = parse_hex_color(&style.fill)?;
    let (first, last) = series.year_range();
    // a single year still needs a non-empty axis
    let x_end = if last > first { last } else { first + 1 };
    let (y_lo, y_hi) = y_bounds(series, style.y_axis)?;
    let ticks = x_ticks(first, last);
    debug!(first, last, y_lo, y_hi, ?ticks, "axis bounds");

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(root)
        .caption(&style.title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((first..x_end).with_key_points(ticks), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|year: &i32| year.to_string())
        .draw()?;

    chart.draw_series(
        AreaSeries::new(
            series.points().iter().copied(),
            0.0,
            &fill.mix(0.9),
        )
        .border_style(&fill),
    )?;

    let (px, py) = chart.plotting_area().get_pixel_range();

    // ─── legend: two text lines, no swatch ───────────────────────────
    let legend_text = (FONT, 14.0).into_font().color(&BLACK);
    let legend_lines: Vec<&str> = style.legend.iter().map(String::as_str).collect();
    let legend = layout_text_box(
        root,
        &legend_lines,
        (px.start + 10, py.end - 10),
        Corner::BottomLeft,
        &legend_text,
    )?;
    draw_text_box(
        root,
        &legend,
        &legend_lines,
        &legend_text,
        WHITE.mix(0.8).filled(),
        Some(RGBColor(204, 204, 204).stroke_width(1)),
    )?;

    // ─── extremum annotations ────────────────────────────────────────
    let mut annotations: Vec<Annotation> = Vec::new();
    if let Some(colors) = &style.annotations {
        let text_color = parse_hex_color(&colors.text)?;
        let label_text = (FONT, 14.0).into_font().color(&text_color);

        for (kind, box_color) in [(Extremum::Max, &colors.max), (Extremum::Min, &colors.min)] {
            let box_color = parse_hex_color(box_color)?;
            let annotation = annotate(series, kind);

            let anchor = anchor_pixels(annotation.anchor, &px, &py);
            let target = chart.backend_coord(&(annotation.point.year, annotation.point.value));

            let lines: Vec<&str> = annotation.label.lines().collect();
            let layout = layout_text_box(root, &lines, anchor, Corner::TopRight, &label_text)?;

            root.draw(&PathElement::new(
                vec![layout.center(), target],
                box_color.stroke_width(2),
            ))?;
            root.draw(&Circle::new(target, 4, box_color.filled()))?;
            draw_text_box(root, &layout, &lines, &label_text, box_color.filled(), None)?;

            debug!(?kind, year = annotation.point.year, ?anchor, ?target, "annotated");
            annotations.push(annotation);
        }
    }

    info!(first, last, annotated = !annotations.is_empty(), "rendered chart");
    Ok(ChartReport {
        indicator: style.indicator.clone(),
        title: style.title.clone(),
        output: None,
        year_range: (first, last),
        max: series.max_point(),
        min: series.min_point(),
        annotations,
    })
}
