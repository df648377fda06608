// src/pipeline.rs

use crate::{
    chart::{render_chart, ChartStyle, CHART_SIZE},
    process::{load_indicator_csv, prepare::prepare_country},
    report::{write_summary, ChartReport, RunSummary},
    series::TimeSeries,
};
use anyhow::{Context, Result};
use chrono::Utc;
use plotters::prelude::*;
use std::{fs, path::PathBuf, time::Instant};
use tracing::info;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// World Bank population-estimates CSV.
    pub input: PathBuf,
    /// Exact `Country Code` to keep, e.g. `CZE`.
    pub country: String,
    /// Directory receiving one SVG per chart plus `summary.json`.
    pub out_dir: PathBuf,
    /// One chart per style, rendered in order.
    pub styles: Vec<ChartStyle>,
}

/// Load, prepare once, then render every chart in turn.
///
/// The first failure aborts the run; charts already written stay on disk.
pub fn run(config: &RunConfig) -> Result<Vec<ChartReport>> {
    let start = Instant::now();
    for style in &config.styles {
        style.validate()?;
    }

    // ─── 1) load & prepare ───────────────────────────────────────────
    let table = load_indicator_csv(&config.input)?;
    let prepared = prepare_country(&table, &config.country)?;
    info!(
        country = %config.country,
        columns = prepared.num_columns(),
        "prepared table"
    );

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating output dir {}", config.out_dir.display()))?;

    // ─── 2) render each chart ────────────────────────────────────────
    let mut reports = Vec::with_capacity(config.styles.len());
    for style in &config.styles {
        let series = TimeSeries::from_batch(&prepared, &style.indicator)
            .with_context(|| format!("chart `{}` for {}", style.title, config.country))?;

        let output = config.out_dir.join(format!("{}.svg", style.indicator));
        let mut report = {
            let root = SVGBackend::new(&output, CHART_SIZE).into_drawing_area();
            let report = render_chart(&root, &series, style)?;
            root.present()
                .with_context(|| format!("writing {}", output.display()))?;
            report
        };

        info!(path = %output.display(), "wrote chart");
        report.output = Some(output);
        reports.push(report);
    }

    // ─── 3) summary ──────────────────────────────────────────────────
    let summary = RunSummary {
        generated_at: Utc::now(),
        input: config.input.clone(),
        country: config.country.clone(),
        charts: reports,
    };
    let summary_path = write_summary(&config.out_dir, &summary)?;
    info!(
        path = %summary_path.display(),
        charts = summary.charts.len(),
        elapsed = ?start.elapsed(),
        "all done"
    );
    Ok(summary.charts)
}
