use anyhow::Result;
use clap::{Parser, ValueEnum};
use depratio::{
    chart::{builtin_styles, load_styles, YAxis},
    run, RunConfig,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum YAxisMode {
    /// Always 0 to 100
    Fixed,
    /// Scaled to the series
    Auto,
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Dependency-ratio area charts from World Bank population estimates"
)]
struct Args {
    /// Population-estimates CSV, relative to the current directory
    #[arg(long, default_value = "Population-EstimatesEXCEL.csv")]
    input: PathBuf,
    #[arg(long, default_value = "CZE")]
    country: String,
    #[arg(long, default_value = "charts")]
    out_dir: PathBuf,
    /// Overrides the y axis of every chart (built-in charts are fixed)
    #[arg(long, value_enum)]
    y_axis: Option<YAxisMode>,
    /// Skip the max/min labels
    #[arg(long)]
    no_annotations: bool,
    /// YAML list of chart styles replacing the built-in three
    #[arg(long)]
    styles: Option<PathBuf>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let args = Args::parse();
    let mut styles = match &args.styles {
        Some(path) => load_styles(path)?,
        None => builtin_styles(),
    };
    for style in &mut styles {
        match args.y_axis {
            Some(YAxisMode::Fixed) => style.y_axis = YAxis::default(),
            Some(YAxisMode::Auto) => style.y_axis = YAxis::Auto,
            None => {}
        }
        if args.no_annotations {
            style.annotations = None;
        }
    }

    let input = std::env::current_dir()?.join(&args.input);
    info!(input = %input.display(), country = %args.country, charts = styles.len(), "startup");

    // ─── 3) run ──────────────────────────────────────────────────────
    run(&RunConfig {
        input,
        country: args.country,
        out_dir: args.out_dir,
        styles,
    })?;
    Ok(())
}
