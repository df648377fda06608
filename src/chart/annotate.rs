// src/chart/annotate.rs

use crate::series::{ExtremumPoint, TimeSeries};
use serde::Serialize;

/// Label offsets above the point, in plotting-area fractions.
const MAX_Y_OFFSET: f64 = 0.25;
const MIN_Y_OFFSET: f64 = 0.30;

/// Labels for extrema after these years move to the right edge.
const MAX_RIGHT_AFTER: i32 = 1990;
const MIN_RIGHT_AFTER: i32 = 2005;

const RIGHT_X: f64 = 0.9;
const CENTER_X: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extremum {
    Max,
    Min,
}

impl Extremum {
    fn heading(self) -> &'static str {
        match self {
            Extremum::Max => "MAXIMUM",
            Extremum::Min => "MINIMUM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub kind: Extremum,
    pub point: ExtremumPoint,
    /// Two lines: the year, then the value to three decimals.
    pub label: String,
    /// Top-right corner of the label as `(x, y)` fractions of the plotting
    /// area, origin bottom-left. Not clamped; `y` may exceed 1.
    pub anchor: (f64, f64),
}

/// Locate the extremum of `series` and work out where its label goes.
///
/// The anchor ignores the real y-axis scale: `y = value / 100 + offset`.
pub fn annotate(series: &TimeSeries, kind: Extremum) -> Annotation {
    let (point, y_offset, right_after) = match kind {
        Extremum::Max => (series.max_point(), MAX_Y_OFFSET, MAX_RIGHT_AFTER),
        Extremum::Min => (series.min_point(), MIN_Y_OFFSET, MIN_RIGHT_AFTER),
    };
    let x = if point.year > right_after {
        RIGHT_X
    } else {
        CENTER_X
    };
    let y = point.value / 100.0 + y_offset;

    Annotation {
        kind,
        point,
        label: format!(
            "{} IN YEAR {}\nAge Dependency Ratio {:.3}",
            kind.heading(),
            point.year,
            point.value
        ),
        anchor: (x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn literal() -> TimeSeries {
        TimeSeries::new("SP.POP.DPND", vec![(1960, 40.0), (1961, 55.2), (1962, 30.1)])
            .expect("valid series")
    }

    #[test]
    fn max_annotation_of_literal_series() {
        let a = annotate(&literal(), Extremum::Max);
        assert_eq!(a.point.year, 1961);
        assert_eq!(a.label, "MAXIMUM IN YEAR 1961\nAge Dependency Ratio 55.200");
        assert!(close(a.anchor.1, 0.802), "{:?}", a.anchor);
        assert!(close(a.anchor.0, 0.5));
    }

    #[test]
    fn min_annotation_of_literal_series() {
        let a = annotate(&literal(), Extremum::Min);
        assert_eq!(a.point.year, 1962);
        assert_eq!(a.label, "MINIMUM IN YEAR 1962\nAge Dependency Ratio 30.100");
        assert!(close(a.anchor.1, 0.301 + 0.30));
        assert!(close(a.anchor.0, 0.5));
    }

    #[test]
    fn horizontal_anchor_thresholds() -> Result<()> {
        // max after 1990 goes right, 1990 itself stays centred
        let s = TimeSeries::new("s", vec![(1990, 50.0), (1991, 10.0)])?;
        assert!(close(annotate(&s, Extremum::Max).anchor.0, 0.5));
        let s = TimeSeries::new("s", vec![(1990, 10.0), (1991, 50.0)])?;
        assert!(close(annotate(&s, Extremum::Max).anchor.0, 0.9));

        // min threshold is 2005
        let s = TimeSeries::new("s", vec![(1995, 20.0), (2005, 5.0), (2010, 8.0)])?;
        assert!(close(annotate(&s, Extremum::Min).anchor.0, 0.5));
        let s = TimeSeries::new("s", vec![(1995, 20.0), (2005, 6.0), (2006, 5.0)])?;
        assert!(close(annotate(&s, Extremum::Min).anchor.0, 0.9));
        Ok(())
    }

    #[test]
    fn vertical_anchor_is_not_clamped() -> Result<()> {
        let s = TimeSeries::new("s", vec![(2000, 90.0)])?;
        let a = annotate(&s, Extremum::Max);
        assert!(close(a.anchor.1, 1.15));
        Ok(())
    }
}
