pub mod annotate;
pub mod render;
pub mod style;

pub use annotate::{annotate, Annotation, Extremum};
pub use render::{render_chart, x_ticks, y_bounds, CHART_SIZE};
pub use style::{builtin_styles, load_styles, parse_hex_color, AnnotationColors, ChartStyle, YAxis};
