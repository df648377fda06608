// src/chart/style.rs

use anyhow::{bail, Context, Result};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

/// Vertical axis bounds of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum YAxis {
    Fixed { min: f64, max: f64 },
    /// From zero up to a little above the series maximum.
    Auto,
}

impl Default for YAxis {
    fn default() -> Self {
        YAxis::Fixed {
            min: 0.0,
            max: 100.0,
        }
    }
}

/// Box and text colours of the max/min annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationColors {
    pub max: String,
    pub min: String,
    #[serde(default = "default_text_color")]
    pub text: String,
}

fn default_text_color() -> String {
    "white".to_string()
}

/// Everything that differs between the dependency-ratio charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    /// Indicator code of the column to plot, e.g. `SP.POP.DPND`.
    pub indicator: String,
    pub title: String,
    /// Area fill, `#RRGGBB`.
    pub fill: String,
    /// Two decorative legend lines.
    pub legend: [String; 2],
    #[serde(default)]
    pub y_axis: YAxis,
    /// `None` renders the chart without extremum annotations.
    #[serde(default)]
    pub annotations: Option<AnnotationColors>,
}

impl ChartStyle {
    /// Fail early on colours that won't parse and empty fixed axes.
    pub fn validate(&self) -> Result<()> {
        if let YAxis::Fixed { min, max } = self.y_axis {
            if !(min < max) {
                bail!(
                    "style `{}`: fixed y axis needs min < max, got [{}, {}]",
                    self.indicator,
                    min,
                    max
                );
            }
        }
        parse_hex_color(&self.fill)
            .with_context(|| format!("style `{}`: fill colour", self.indicator))?;
        if let Some(colors) = &self.annotations {
            for c in [&colors.max, &colors.min, &colors.text] {
                parse_hex_color(c)
                    .with_context(|| format!("style `{}`: annotation colour", self.indicator))?;
            }
        }
        Ok(())
    }
}

/// Overall, old-age and young dependency-ratio charts, annotated, y fixed to [0, 100].
pub fn builtin_styles() -> Vec<ChartStyle> {
    vec![
        ChartStyle {
            indicator: "SP.POP.DPND".into(),
            title: "Age Dependency Ratio (% Of Working-Age Population)".into(),
            fill: "#E85F5C".into(),
            legend: [
                "The Age Dependency Ratio compares dependents".into(),
                "(<15 and >64) to the working-age population (15-64).".into(),
            ],
            y_axis: YAxis::default(),
            annotations: Some(AnnotationColors {
                max: "#1D0200".into(),
                min: "#5A1807".into(),
                text: default_text_color(),
            }),
        },
        ChartStyle {
            indicator: "SP.POP.DPND.OL".into(),
            title: "Age dependency ratio, old".into(),
            fill: "#932F6D".into(),
            legend: [
                "Old-age dependency ratio shows how many people > 64".into(),
                "rely on every 100 working-age adults (15-64).".into(),
            ],
            y_axis: YAxis::default(),
            annotations: Some(AnnotationColors {
                max: "#420039".into(),
                min: "#25171A".into(),
                text: default_text_color(),
            }),
        },
        ChartStyle {
            indicator: "SP.POP.DPND.YG".into(),
            title: "Age dependency ratio, young".into(),
            fill: "#7B904B".into(),
            legend: [
                "Young dependency ratio shows how many < 15".into(),
                "rely on every 100 working-age adults (15-64).".into(),
            ],
            y_axis: YAxis::default(),
            annotations: Some(AnnotationColors {
                max: "#273B09".into(),
                min: "#393E41".into(),
                text: default_text_color(),
            }),
        },
    ]
}

/// Read a YAML list of `ChartStyle`s.
pub fn load_styles<P: AsRef<Path>>(path: P) -> Result<Vec<ChartStyle>> {
    let f = File::open(&path)
        .with_context(|| format!("opening styles file {:?}", path.as_ref()))?;
    let styles: Vec<ChartStyle> = serde_yaml::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing styles file {:?}", path.as_ref()))?;
    if styles.is_empty() {
        bail!("styles file {:?} defines no charts", path.as_ref());
    }
    for style in &styles {
        style.validate()?;
    }
    Ok(styles)
}

/// `#RRGGBB`, `white` or `black`.
pub fn parse_hex_color(s: &str) -> Result<RGBColor> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "white" => return Ok(RGBColor(255, 255, 255)),
        "black" => return Ok(RGBColor(0, 0, 0)),
        _ => {}
    }
    let hex = match s.strip_prefix('#') {
        Some(h) if h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()) => h,
        _ => bail!("invalid colour `{}`, expected #RRGGBB", s),
    };
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
