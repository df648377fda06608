pub mod chart;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod series;

pub use pipeline::{run, RunConfig};
pub use series::{EmptySeries, ExtremumPoint, MissingColumn, TimeSeries};
