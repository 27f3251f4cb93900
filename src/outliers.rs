//! Z-score outlier trimming for the perplexity column
//!
//! Z-scores use the population standard deviation (divide by n), computed
//! over the whole column before any row is dropped.

use crate::tidy::TidyTable;
use trueno::Vector;

/// Standardize `values` to z-scores
///
/// Returns all zeros when the values have no spread (or fewer than two
/// values), so a constant column never produces outliers.
pub fn zscores(values: &[f32]) -> Vec<f32> {
    if values.len() < 2 {
        return vec![0.0; values.len()];
    }

    let vec = Vector::from_slice(values);
    let (Ok(mean), Ok(std)) = (vec.mean(), vec.stddev()) else {
        return vec![0.0; values.len()];
    };

    if std <= f32::EPSILON * mean.abs().max(1.0) {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - mean) / std).collect()
}

impl TidyTable {
    /// Drop rows whose perplexity z-score magnitude is at least `max_z`
    ///
    /// `None` or a zero cutoff keeps every row. A negative cutoff keeps
    /// nothing, since no magnitude falls below it.
    pub fn without_outliers(&self, max_z: Option<f32>) -> TidyTable {
        let Some(max_z) = max_z.filter(|z| *z != 0.0) else {
            return self.clone();
        };

        let z = zscores(&self.perplexities());
        let kept: TidyTable = self
            .iter()
            .zip(&z)
            .filter(|(_, z)| z.abs() < max_z)
            .map(|(row, _)| row.clone())
            .collect();

        let dropped = self.len() - kept.len();
        if dropped > 0 {
            tracing::debug!(dropped, max_z, "excluded perplexity outliers from plot");
        }
        kept
    }
}
