// src/series.rs

use crate::process::prepare::YEAR_COLUMN;
use anyhow::{bail, Context, Result};
use arrow::{
    array::{Array, Float64Array, Int32Array},
    record_batch::RecordBatch,
};
use serde::Serialize;
use std::fmt;

/// The prepared table has no column for the requested indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn(pub String);

impl fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing column `{}` in prepared table", self.0)
    }
}

impl std::error::Error for MissingColumn {}

/// The indicator column exists but holds no values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptySeries(pub String);

impl fmt::Display for EmptySeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "series `{}` has no values", self.0)
    }
}

impl std::error::Error for EmptySeries {}

/// A point where a series reaches its minimum or maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtremumPoint {
    pub year: i32,
    pub value: f64,
}

/// `(year, ratio)` pairs with strictly increasing years and at least one point.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    points: Vec<(i32, f64)>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>, points: Vec<(i32, f64)>) -> Result<Self> {
        let name = name.into();
        if points.is_empty() {
            return Err(EmptySeries(name).into());
        }
        if let Some(w) = points.windows(2).find(|w| w[0].0 >= w[1].0) {
            bail!(
                "series `{}` years must be strictly increasing ({} then {})",
                name,
                w[0].0,
                w[1].0
            );
        }
        Ok(Self { name, points })
    }

    /// Pull `indicator` out of a prepared table. Years with no value are dropped.
    pub fn from_batch(batch: &RecordBatch, indicator: &str) -> Result<Self> {
        let years = batch
            .column_by_name(YEAR_COLUMN)
            .and_then(|c| c.as_any().downcast_ref::<Int32Array>())
            .with_context(|| format!("prepared table has no Int32 `{}` column", YEAR_COLUMN))?;
        let values = batch
            .column_by_name(indicator)
            .ok_or_else(|| MissingColumn(indicator.to_string()))?;
        let values = values
            .as_any()
            .downcast_ref::<Float64Array>()
            .with_context(|| format!("column `{}` is not Float64", indicator))?;

        let points: Vec<(i32, f64)> = years
            .iter()
            .zip(values.iter())
            .filter_map(|(year, value)| Some((year?, value?)))
            .collect();
        Self::new(indicator, points)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[(i32, f64)] {
        &self.points
    }

    /// First and last year.
    pub fn year_range(&self) -> (i32, i32) {
        // non-empty by construction
        let first = self.points[0].0;
        let last = self.points[self.points.len() - 1].0;
        (first, last)
    }

    /// Largest value; ties go to the earliest year.
    pub fn max_point(&self) -> ExtremumPoint {
        self.first_extremum(|candidate, best| candidate > best)
    }

    /// Smallest value; ties go to the earliest year.
    pub fn min_point(&self) -> ExtremumPoint {
        self.first_extremum(|candidate, best| candidate < best)
    }

    fn first_extremum(&self, better: impl Fn(f64, f64) -> bool) -> ExtremumPoint {
        let (mut year, mut value) = self.points[0];
        for &(y, v) in &self.points[1..] {
            if better(v, value) {
                year = y;
                value = v;
            }
        }
        ExtremumPoint { year, value }
    }
}
