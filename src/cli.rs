//! CLI argument parsing for pplstat

use crate::color::PlotColor;
use crate::config::{PlotConfig, SignificanceConfig};
use crate::theme::Theme;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the comparison report
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "pplstat")]
#[command(version)]
#[command(
    about = "Compare perplexity differences between sentence groups and plot them",
    long_about = None
)]
pub struct Cli {
    /// JSON document mapping condition keys to perplexities or per-token losses
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Significance level for the Welch t-test
    #[arg(long = "alpha", value_name = "ALPHA", default_value = "0.05")]
    pub alpha: f32,

    /// Save a split violin plot to PATH (.svg, .png, .jpg, .jpeg or .bmp)
    #[arg(long = "plot", value_name = "PATH")]
    pub plot: Option<PathBuf>,

    /// Outlier cutoff for the plot in standard deviations (default: 3.0)
    #[arg(long = "max-z", value_name = "SIGMA", default_value = "3.0")]
    pub max_z: f32,

    /// Plot every row, without z-score outlier trimming
    #[arg(long = "no-outlier-filter")]
    pub no_outlier_filter: bool,

    /// Plot style preset (darkgrid, whitegrid, dark, white, ticks)
    #[arg(long = "theme", value_name = "NAME", default_value = "dark")]
    pub theme: Theme,

    /// Draw filled violins instead of outlines
    #[arg(long = "fill")]
    pub fill: bool,

    /// Colors for the "with attribute" and "no attribute" halves
    #[arg(
        long = "colors",
        value_name = "WITH,NO",
        default_value = "b,.35",
        value_parser = parse_color_pair
    )]
    pub colors: (PlotColor, PlotColor),

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    pub fn significance_config(&self) -> SignificanceConfig {
        SignificanceConfig {
            significance_level: self.alpha,
            ..Default::default()
        }
    }

    pub fn plot_config(&self) -> PlotConfig {
        PlotConfig {
            max_z: (!self.no_outlier_filter).then_some(self.max_z),
            savepath: self.plot.clone(),
            theme: self.theme,
            filling: self.fill,
            colors: self.colors,
            ..Default::default()
        }
    }
}

fn parse_color_pair(s: &str) -> Result<(PlotColor, PlotColor), String> {
    let (with, no) = s
        .split_once(',')
        .ok_or_else(|| format!("expected two comma-separated colors, got {:?}", s))?;
    let with = PlotColor::parse(with).map_err(|e| e.to_string())?;
    let no = PlotColor::parse(no).map_err(|e| e.to_string())?;
    Ok((with, no))
}
