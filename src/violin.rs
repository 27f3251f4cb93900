//! Split violin geometry: Gaussian KDE and quartiles per half
//!
//! Each group gets one violin. Its left half shows the
//! "With attribute word" perplexities and its right half the
//! "No attribute word" perplexities.
//!
//! ## References
//! - Hintze & Nelson (1998): Violin Plots: A Box Plot-Density Trace Synergism
//! - Scott (1992): Multivariate Density Estimation (bandwidth rule)

use crate::error::{AnalysisError, Result};
use crate::tidy::{TidyTable, NO_ATTRIBUTE_WORD, WITH_ATTRIBUTE_WORD};
use aprender::stats::DescriptiveStats;
use trueno::Vector;

/// Number of KDE evaluation points per half
pub const GRID_SIZE: usize = 100;

/// How many bandwidths the density extends past the extreme observations
pub const CUT: f64 = 2.0;

/// Horizontal space a violin occupies, in category units
pub const VIOLIN_WIDTH: f64 = 0.8;

/// Which side of the split a half is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// "With attribute word", drawn to the left of the center line
    Left,
    /// "No attribute word", drawn to the right of the center line
    Right,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Left => WITH_ATTRIBUTE_WORD,
            Side::Right => NO_ATTRIBUTE_WORD,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Quartiles drawn inside each half
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f32,
    pub median: f32,
    pub q3: f32,
}

/// Density trace for one half of a violin
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinHalf {
    pub side: Side,
    /// Number of observations
    pub count: usize,
    /// KDE evaluation points (perplexity values), ascending
    pub support: Vec<f64>,
    /// Density at each support point
    pub density: Vec<f64>,
    /// KDE bandwidth; zero for a degenerate (single-valued) half
    pub bandwidth: f64,
    pub quartiles: Quartiles,
}

impl ViolinHalf {
    /// Estimate the density of `values` for one side of the split
    ///
    /// # Errors
    /// `InvalidInput` if `values` is empty.
    pub fn estimate(side: Side, values: &[f32]) -> Result<Self> {
        if values.is_empty() {
            return Err(AnalysisError::InvalidInput(format!(
                "no observations for the {:?} half",
                side.label()
            )));
        }

        let quartiles = quartiles(values)?;
        let data: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        let bandwidth = scott_bandwidth(&data);

        if bandwidth <= 0.0 {
            // Every observation shares one value: a flat line at that value
            return Ok(Self {
                side,
                count: values.len(),
                support: vec![data[0]],
                density: vec![1.0],
                bandwidth: 0.0,
                quartiles,
            });
        }

        let (lo, hi) = data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let lo = lo - CUT * bandwidth;
        let hi = hi + CUT * bandwidth;

        let support: Vec<f64> = (0..GRID_SIZE)
            .map(|i| lo + (hi - lo) * i as f64 / (GRID_SIZE - 1) as f64)
            .collect();
        let density = support
            .iter()
            .map(|&x| gaussian_kde(&data, x, bandwidth))
            .collect();

        Ok(Self {
            side,
            count: values.len(),
            support,
            density,
            bandwidth,
            quartiles,
        })
    }

    pub fn peak_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }

    /// Density at `y`, linearly interpolated between support points
    pub fn density_at(&self, y: f64) -> f64 {
        if self.support.len() == 1 {
            return if (y - self.support[0]).abs() < f64::EPSILON {
                self.density[0]
            } else {
                0.0
            };
        }

        let first = self.support[0];
        let last = self.support[self.support.len() - 1];
        if y < first || y > last {
            return 0.0;
        }

        let step = (last - first) / (self.support.len() - 1) as f64;
        let pos = (y - first) / step;
        let i = (pos.floor() as usize).min(self.support.len() - 2);
        let frac = pos - i as f64;
        self.density[i] * (1.0 - frac) + self.density[i + 1] * frac
    }

    /// Outline of this half as (x, y) points, for a violin centered at `center`
    ///
    /// `scale` converts density to half-width in category units.
    pub fn outline(&self, center: f64, scale: f64) -> Vec<(f64, f64)> {
        let sign = self.side.sign();
        let mut points = Vec::with_capacity(self.support.len() + 2);
        points.push((center, self.support[0]));
        points.extend(
            self.support
                .iter()
                .zip(&self.density)
                .map(|(&y, &d)| (center + sign * d * scale, y)),
        );
        points.push((center, self.support[self.support.len() - 1]));
        points
    }

    /// Quartile line endpoints `(x0, x1, y)` for the `inner="quart"` style
    pub fn quartile_lines(&self, center: f64, scale: f64) -> [(f64, f64, f64); 3] {
        let sign = self.side.sign();
        let q = self.quartiles;
        [q.q1, q.median, q.q3].map(|y| {
            let y = y as f64;
            (center, center + sign * self.density_at(y) * scale, y)
        })
    }
}

/// One split violin
#[derive(Debug, Clone, PartialEq)]
pub struct SplitViolin {
    pub group: String,
    /// Category position along the x axis (0, 1, 2, ...)
    pub position: usize,
    pub with_attribute: Option<ViolinHalf>,
    pub no_attribute: Option<ViolinHalf>,
}

impl SplitViolin {
    pub fn halves(&self) -> impl Iterator<Item = &ViolinHalf> {
        self.with_attribute.iter().chain(self.no_attribute.iter())
    }
}

/// Build one split violin per group, in order of first appearance
///
/// Rows whose sentence version is neither split label are ignored. Groups
/// with no rows for either label are skipped.
pub fn split_violins(table: &TidyTable) -> Result<Vec<SplitViolin>> {
    let mut violins = Vec::new();

    for group in table.groups() {
        let half = |side: Side| -> Result<Option<ViolinHalf>> {
            let values = table.values_for(group, side.label());
            if values.is_empty() {
                Ok(None)
            } else {
                ViolinHalf::estimate(side, &values).map(Some)
            }
        };

        let with_attribute = half(Side::Left)?;
        let no_attribute = half(Side::Right)?;
        if with_attribute.is_none() && no_attribute.is_none() {
            tracing::debug!(group, "group has no split-labelled rows; skipping");
            continue;
        }

        violins.push(SplitViolin {
            group: group.to_string(),
            position: violins.len(),
            with_attribute,
            no_attribute,
        });
    }

    Ok(violins)
}

/// Largest density across every half; widths are scaled against it so all
/// violins share one area scale
pub fn global_peak_density(violins: &[SplitViolin]) -> f64 {
    violins
        .iter()
        .flat_map(SplitViolin::halves)
        .map(ViolinHalf::peak_density)
        .fold(0.0, f64::max)
}

/// Scott's rule: sample standard deviation times n^(-1/5)
fn scott_bandwidth(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    let var = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt() * (n as f64).powf(-0.2)
}

fn gaussian_kde(data: &[f64], x: f64, bandwidth: f64) -> f64 {
    let inv_bw = 1.0 / bandwidth;
    let sum: f64 = data
        .iter()
        .map(|&v| {
            let u = (x - v) * inv_bw;
            (-0.5 * u * u).exp()
        })
        .sum();
    sum * inv_bw / (data.len() as f64 * std::f64::consts::TAU.sqrt())
}

fn quartiles(values: &[f32]) -> Result<Quartiles> {
    let vector = Vector::from_slice(values);
    let stats = DescriptiveStats::new(&vector);
    let q = |p| {
        stats
            .quantile(p)
            .map_err(|e| AnalysisError::Statistics(format!("Failed to compute quantile: {}", e)))
    };

    Ok(Quartiles {
        q1: q(0.25)?,
        median: q(0.5)?,
        q3: q(0.75)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tidy::tidy_rows;

    fn sample_table() -> TidyTable {
        TidyTable::from_rows(
            [
                tidy_rows("test_group_with_attribute", &[10.0, 12.0, 11.0, 14.0, 13.0]),
                tidy_rows("test_group_no_attribute", &[8.0, 9.0, 9.5, 10.0, 8.5]),
                tidy_rows("norm_group_with_attribute", &[20.0, 22.0, 21.0]),
                tidy_rows("norm_group_no_attribute", &[19.0, 21.5, 20.0]),
            ]
            .concat(),
        )
    }

    #[test]
    fn test_scott_bandwidth() {
        // sample std of [1, 2, 3, 4, 5] = sqrt(2.5)
        let bw = scott_bandwidth(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let expected = 2.5f64.sqrt() * 5f64.powf(-0.2);
        assert!((bw - expected).abs() < 1e-12);
        assert_eq!(scott_bandwidth(&[4.0]), 0.0);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let half = ViolinHalf::estimate(Side::Left, &[1.0, 2.0, 2.5, 3.0, 7.0]).unwrap();
        let step = half.support[1] - half.support[0];
        let area: f64 = half.density.iter().sum::<f64>() * step;
        // the grid stops two bandwidths out, so a little mass is cut off
        assert!(area > 0.9 && area < 1.01, "area = {}", area);
    }

    #[test]
    fn test_support_extends_past_data() {
        let half = ViolinHalf::estimate(Side::Right, &[5.0, 6.0, 7.0]).unwrap();
        assert_eq!(half.support.len(), GRID_SIZE);
        assert!(half.support[0] < 5.0);
        assert!(*half.support.last().unwrap() > 7.0);
        assert!((half.support[0] - (5.0 - CUT * half.bandwidth)).abs() < 1e-9);
    }

    #[test]
    fn test_quartiles() {
        let half = ViolinHalf::estimate(Side::Left, &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(half.quartiles.median, 3.0);
        assert_eq!(half.quartiles.q1, 2.0);
        assert_eq!(half.quartiles.q3, 4.0);
    }

    #[test]
    fn test_degenerate_half() {
        let half = ViolinHalf::estimate(Side::Left, &[4.0, 4.0]).unwrap();
        assert_eq!(half.bandwidth, 0.0);
        assert_eq!(half.support, vec![4.0]);
        assert_eq!(half.outline(1.0, 0.4).len(), 3);
    }

    #[test]
    fn test_empty_half_rejected() {
        assert!(ViolinHalf::estimate(Side::Right, &[]).is_err());
    }

    #[test]
    fn test_outline_sides() {
        let left = ViolinHalf::estimate(Side::Left, &[1.0, 2.0, 3.0]).unwrap();
        let right = ViolinHalf::estimate(Side::Right, &[1.0, 2.0, 3.0]).unwrap();

        assert!(left.outline(2.0, 0.4).iter().all(|(x, _)| *x <= 2.0));
        assert!(right.outline(2.0, 0.4).iter().all(|(x, _)| *x >= 2.0));
    }

    #[test]
    fn test_density_interpolation_bounds() {
        let half = ViolinHalf::estimate(Side::Left, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(half.density_at(-100.0), 0.0);
        assert_eq!(half.density_at(100.0), 0.0);
        assert!(half.density_at(2.0) > 0.0);
        assert!((half.density_at(half.support[0]) - half.density[0]).abs() < 1e-12);
    }

    #[test]
    fn test_split_violins_per_group() {
        let violins = split_violins(&sample_table()).unwrap();
        assert_eq!(violins.len(), 2);
        assert_eq!(violins[0].group, "Test group");
        assert_eq!(violins[0].position, 0);
        assert_eq!(violins[1].group, "Norm group");
        assert_eq!(violins[1].position, 1);
        assert_eq!(violins[0].with_attribute.as_ref().unwrap().count, 5);
        assert_eq!(violins[1].no_attribute.as_ref().unwrap().count, 3);
    }

    #[test]
    fn test_unlabelled_rows_ignored() {
        let table = TidyTable::from_rows(tidy_rows("control_group", &[1.0, 2.0, 3.0]));
        assert!(split_violins(&table).unwrap().is_empty());
    }

    #[test]
    fn test_global_peak_density() {
        let violins = split_violins(&sample_table()).unwrap();
        let peak = global_peak_density(&violins);
        assert!(violins
            .iter()
            .flat_map(SplitViolin::halves)
            .all(|h| h.peak_density() <= peak));
        assert!(peak > 0.0);
    }
}
