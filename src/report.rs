//! Text and JSON reports for a group comparison

use crate::significance::GroupComparison;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// JSON report of a comparison, plus plot bookkeeping when a plot was drawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub comparison: GroupComparison,
    pub significance_level: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<JsonPlotSummary>,
}

/// What ended up in the saved plot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPlotSummary {
    pub path: String,
    pub plotted_rows: usize,
    pub excluded_outliers: usize,
}

impl JsonReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Human-readable summary of a comparison
pub fn format_text(comparison: &GroupComparison, significance_level: f32) -> String {
    let mut out = String::new();
    let t = &comparison.ttest;

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Perplexity Group Comparison ===");
    let _ = writeln!(out, "Test group pairs: {}", comparison.test_pairs);
    let _ = writeln!(out, "Norm group pairs: {}", comparison.norm_pairs);
    let _ = writeln!(
        out,
        "Shapiro-Wilk (test differences): W = {:.4}, p = {:.4e}",
        comparison.test_normality.statistic, comparison.test_normality.pvalue
    );
    let _ = writeln!(
        out,
        "Shapiro-Wilk (norm differences): W = {:.4}, p = {:.4e}",
        comparison.norm_normality.statistic, comparison.norm_normality.pvalue
    );
    let _ = writeln!(
        out,
        "Welch t-test (norm vs test):     t = {:.4}, p = {:.4e}, df = {:.2}",
        t.statistic, t.pvalue, t.df
    );

    if !comparison.reliable {
        let _ = writeln!(
            out,
            "⚠️  Differences do not look normally distributed; t-test result may be unreliable."
        );
    }

    let verdict = if comparison.significant {
        "significant"
    } else {
        "not significant"
    };
    let _ = writeln!(out, "Result: {} at alpha = {}", verdict, significance_level);
    out
}
