//! pplstat - Perplexity statistics for language-model probes
//!
//! This library reduces per-token losses to sentence perplexities, tests
//! whether an attribute word shifts perplexity differently in a test group
//! than in a norm group (Shapiro-Wilk diagnostic + Welch's t-test on paired
//! differences), reshapes results into tidy tables, and renders split violin
//! plots.

pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod groups;
pub mod input;
pub mod normality;
pub mod outliers;
pub mod perplexity;
pub mod plot;
pub mod report;
pub mod significance;
pub mod theme;
pub mod tidy;
pub mod violin;

pub use config::{PlotConfig, SignificanceConfig};
pub use error::{AnalysisError, Result};
pub use groups::{PerplexityDict, PerplexityGroups};
pub use perplexity::perplexity;
pub use plot::{plot_groups, ViolinFigure};
pub use significance::{compare_dict, compare_groups, GroupComparison, WelchTest};
pub use tidy::{tidy_table, TidyRow, TidyTable};
