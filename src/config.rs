// Configuration for group comparison and plot rendering
//
// Both structs are plain data: nothing here touches process-wide state, so
// repeated calls with different settings never interfere.

use crate::color::PlotColor;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the paired-difference significance test
///
/// # Example
/// ```
/// use pplstat::config::SignificanceConfig;
///
/// let config = SignificanceConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// assert_eq!(config.normality_statistic_threshold, 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificanceConfig {
    /// Alpha for the Welch t-test; sets `GroupComparison::significant`
    pub significance_level: f32,

    /// A Shapiro-Wilk W below this value (together with a p-value below
    /// `normality_pvalue_threshold`) marks the t-test as unreliable
    ///
    /// Default: 0.5
    pub normality_statistic_threshold: f32,

    /// A Shapiro-Wilk p-value below this value (together with a W below
    /// `normality_statistic_threshold`) marks the t-test as unreliable
    ///
    /// Default: 0.05
    pub normality_pvalue_threshold: f32,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            normality_statistic_threshold: 0.5,
            normality_pvalue_threshold: 0.05,
        }
    }
}

impl SignificanceConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.significance_level) {
            return Err(format!(
                "significance_level must be in [0, 1], got {}",
                self.significance_level
            ));
        }

        if !(0.0..=1.0).contains(&self.normality_statistic_threshold) {
            return Err(format!(
                "normality_statistic_threshold must be in [0, 1], got {}",
                self.normality_statistic_threshold
            ));
        }

        if !(0.0..=1.0).contains(&self.normality_pvalue_threshold) {
            return Err(format!(
                "normality_pvalue_threshold must be in [0, 1], got {}",
                self.normality_pvalue_threshold
            ));
        }

        Ok(())
    }
}

/// Configuration for the split violin plot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Outlier cutoff in standard deviations
    ///
    /// Rows whose perplexity z-score magnitude reaches this value are left
    /// out of the plot. `None` or `0.0` keeps every row; negative values
    /// are rejected by [`PlotConfig::validate`].
    ///
    /// Default: 3.0
    pub max_z: Option<f32>,

    /// Where to save the rendered figure; format follows the extension
    pub savepath: Option<PathBuf>,

    /// Visual style preset
    pub theme: Theme,

    /// Filled violins when true, outlines only when false
    pub filling: bool,

    /// Colors for the "With attribute word" and "No attribute word" halves
    pub colors: (PlotColor, PlotColor),

    /// Figure width in pixels
    pub width: u32,

    /// Figure height in pixels
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            max_z: Some(3.0),
            savepath: None,
            theme: Theme::default(),
            filling: false,
            colors: (PlotColor::SEABORN_BLUE, PlotColor::grey(0.35)),
            width: 800,
            height: 600,
        }
    }
}

impl PlotConfig {
    /// The outlier cutoff, if filtering is enabled
    pub fn outlier_cutoff(&self) -> Option<f32> {
        self.max_z.filter(|z| *z != 0.0)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(z) = self.max_z {
            if z.is_nan() {
                return Err("max_z must be a number".to_string());
            }
            if z < 0.0 {
                return Err(format!("max_z must not be negative, got {}", z));
            }
        }

        if self.width < 100 || self.height < 100 {
            return Err(format!(
                "figure must be at least 100x100 pixels, got {}x{}",
                self.width, self.height
            ));
        }

        Ok(())
    }
}
