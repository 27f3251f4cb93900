// Shapiro-Wilk normality diagnostic
//
// Scientific Foundation:
// [1] Shapiro, S. S. & Wilk, M. B. (1965). An analysis of variance test for
//     normality (complete samples). Biometrika 52, 591-611.
// [2] Royston, P. (1995). Remark AS R94: A remark on algorithm AS 181, the
//     W-test for normality. Applied Statistics 44, 547-551.
//
// Royston's approximation gives the coefficients from Blom scores with
// polynomial corrections for the two most extreme order statistics, and
// p-values from a normalizing transformation of W. Valid for 3 <= n <= 5000.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Smallest sample the W test is defined for
pub const MIN_SAMPLES: usize = 3;

/// Largest sample Royston's approximation is valid for
pub const MAX_SAMPLES: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Result of a Shapiro-Wilk test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalityTest {
    /// W statistic in (0, 1]; values near 1 are consistent with normality
    pub statistic: f32,

    /// p-value for the null hypothesis that the sample is normal
    pub pvalue: f32,
}

impl std::fmt::Display for NormalityTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ShapiroResult(statistic={:.4}, pvalue={:.4e})",
            self.statistic, self.pvalue
        )
    }
}

/// Test whether a sample departs from a normal distribution
///
/// # Errors
/// * `InsufficientSamples` for fewer than 3 values
/// * `InvalidInput` for more than 5000 values or non-finite values
///
/// # Example
/// ```
/// use pplstat::normality::shapiro_wilk;
///
/// let result = shapiro_wilk(&[1.0, 2.0, 4.0]).unwrap();
/// assert!((result.statistic - 0.9643).abs() < 1e-3);
/// ```
pub fn shapiro_wilk(sample: &[f32]) -> Result<NormalityTest> {
    let n = sample.len();
    if n < MIN_SAMPLES {
        return Err(AnalysisError::InsufficientSamples {
            required: MIN_SAMPLES,
            actual: n,
        });
    }
    if n > MAX_SAMPLES {
        return Err(AnalysisError::InvalidInput(format!(
            "Shapiro-Wilk approximation is valid for at most {} values, got {}",
            MAX_SAMPLES, n
        )));
    }
    if sample.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::InvalidInput(
            "Shapiro-Wilk sample contains non-finite values".to_string(),
        ));
    }

    let mut x: Vec<f64> = sample.iter().map(|&v| v as f64).collect();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let range = x[n - 1] - x[0];
    if range < f64::EPSILON * x[n - 1].abs().max(1.0) {
        // Constant sample: every order statistic sits on the line
        return Ok(NormalityTest {
            statistic: 1.0,
            pvalue: 1.0,
        });
    }

    let std_normal = standard_normal()?;
    let a = coefficients(n, &std_normal);

    let mean = x.iter().sum::<f64>() / n as f64;
    let ssq: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();

    let w = (numerator * numerator / ssq).min(1.0);
    let pvalue = pvalue(w, n, &std_normal).clamp(0.0, 1.0);

    Ok(NormalityTest {
        statistic: w as f32,
        pvalue: pvalue as f32,
    })
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| AnalysisError::Statistics(e.to_string()))
}

/// Antisymmetric coefficients `a_1..a_{n/2}` (the remaining half is `-a`)
fn coefficients(n: usize, std_normal: &Normal) -> Vec<f64> {
    let half = n / 2;

    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }

    let an = n as f64;
    let an25 = an + 0.25;

    // Blom scores for the lower half; these are negative
    let m: Vec<f64> = (1..=half)
        .map(|i| std_normal.inverse_cdf((i as f64 - 0.375) / an25))
        .collect();

    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;

    let mut a: Vec<f64> = vec![0.0; half];
    let (first_scaled, fac) = if n > 5 {
        let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a1.powi(2) - 2.0 * a2.powi(2)))
        .sqrt();
        a[1] = a2;
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a1.powi(2))).sqrt();
        (1, fac)
    };
    a[0] = a1;

    for i in first_scaled..half {
        a[i] = -m[i] / fac;
    }

    a
}

/// Upper-tail p-value for W via Royston's normalizing transformation
fn pvalue(w: f64, n: usize, std_normal: &Normal) -> f64 {
    if n == 3 {
        let pi6 = 6.0 / std::f64::consts::PI;
        let stqr = std::f64::consts::FRAC_PI_3;
        return (pi6 * (w.sqrt().asin() - stqr)).max(0.0);
    }

    let an = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let mut y = w1.ln();

    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };

    1.0 - std_normal.cdf((y - m) / s)
}

/// Evaluate `cc[0] + cc[1] x + cc[2] x^2 + ...`
fn poly(cc: &[f64], x: f64) -> f64 {
    cc.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
