// src/report.rs

use crate::{chart::Annotation, series::ExtremumPoint};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

pub const SUMMARY_FILE: &str = "summary.json";

/// What one renderer invocation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    pub indicator: String,
    pub title: String,
    /// Where the chart was written; `None` until the pipeline saves it.
    pub output: Option<PathBuf>,
    pub year_range: (i32, i32),
    pub max: ExtremumPoint,
    pub min: ExtremumPoint,
    /// Empty when the chart was rendered without annotations.
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub input: PathBuf,
    pub country: String,
    pub charts: Vec<ChartReport>,
}

/// Write `summary` as pretty JSON to `<dir>/summary.json`.
///
/// Goes through a dot-prefixed tmp file and a rename, so readers never see
/// a half-written summary.
pub fn write_summary<P: AsRef<Path>>(dir: P, summary: &RunSummary) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let path = dir.join(SUMMARY_FILE);
    let tmp_path = dir.join(format!(".{}.tmp", SUMMARY_FILE));

    let mut tmp = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    serde_json::to_writer_pretty(&mut tmp, summary).context("serializing run summary")?;
    tmp.write_all(b"\n")?;
    drop(tmp);

    fs::rename(&tmp_path, &path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(path)
}
