// Paired-difference significance test between the test and norm groups
//
// Scientific Foundation:
// - Each sentence pair contributes one difference: ppl(with) - ppl(no)
// - Shapiro-Wilk checks that both sets of differences look normal before
//   trusting a parametric test
// - Welch's t-test compares the mean difference of the norm group against
//   the test group without assuming equal variances
//
// Implementation:
// - Uses aprender's `ttest_ind()` with `equal_var = false` (Welch's variant)
//   for the statistic and degrees of freedom
// - Two-tailed p-value from statrs' Student's t distribution
// - Uses the in-crate Shapiro-Wilk diagnostic (`crate::normality`)

use crate::config::SignificanceConfig;
use crate::error::{AnalysisError, Result};
use crate::groups::{PerplexityDict, PerplexityGroups};
use crate::normality::{shapiro_wilk, NormalityTest};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Result of Welch's independent two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    /// t-statistic (norm minus test)
    pub statistic: f32,

    /// Two-tailed p-value
    pub pvalue: f32,

    /// Welch-Satterthwaite degrees of freedom
    pub df: f32,
}

/// Full outcome of comparing the test and norm groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupComparison {
    /// Welch's t-test of norm differences against test differences
    pub ttest: WelchTest,

    /// Shapiro-Wilk result for the test-group differences
    pub test_normality: NormalityTest,

    /// Shapiro-Wilk result for the norm-group differences
    pub norm_normality: NormalityTest,

    /// Number of sentence pairs in the test group
    pub test_pairs: usize,

    /// Number of sentence pairs in the norm group
    pub norm_pairs: usize,

    /// False when a normality diagnostic tripped the reliability warning
    pub reliable: bool,

    /// True when `ttest.pvalue` is below the configured significance level
    pub significant: bool,
}

/// Compare paired perplexity differences between the test and norm groups
///
/// Steps:
/// 1. `with_attribute - no_attribute` per sentence pair, per group
/// 2. Shapiro-Wilk on each set of differences
/// 3. If either diagnostic has W below `normality_statistic_threshold` and p
///    below `normality_pvalue_threshold`, log a warning (advisory only)
/// 4. Welch's t-test of norm differences against test differences
///
/// # Errors
/// * `LengthMismatch` if a group's two lists differ in length
/// * `InsufficientSamples` if a group has fewer than 3 pairs
/// * `Statistics` if the t-test itself fails
///
/// Zero variance in both sets of differences is not an error: the statistic
/// is infinite (or NaN for equal means) and `pvalue`/`df` are NaN, so
/// `significant` is false. The JSON report writes these values as `null`.
///
/// # Example
/// ```ignore
/// use pplstat::groups::PerplexityGroups;
/// use pplstat::significance::compare_groups;
///
/// let groups = PerplexityGroups::new(twa, tna, nwa, nna);
/// let result = compare_groups(&groups, &Default::default()).unwrap();
/// println!("t = {}, p = {}", result.ttest.statistic, result.ttest.pvalue);
/// ```
pub fn compare_groups(
    groups: &PerplexityGroups,
    config: &SignificanceConfig,
) -> Result<GroupComparison> {
    config.validate().map_err(AnalysisError::InvalidConfig)?;

    let diffs = groups.paired_differences()?;
    tracing::debug!(
        test_pairs = diffs.test.len(),
        norm_pairs = diffs.norm.len(),
        "computed paired perplexity differences"
    );

    let test_normality = shapiro_wilk(&diffs.test)?;
    let norm_normality = shapiro_wilk(&diffs.norm)?;

    let reliable = !(fails_normality(&test_normality, config)
        || fails_normality(&norm_normality, config));
    if !reliable {
        tracing::warn!(
            "Data do not seem to be normally distributed; \
             Shapiro test result for norm group differences: {}; \
             Shapiro test result for test group differences: {}; \
             t-test result may be unreliable.",
            norm_normality,
            test_normality
        );
    }

    let ttest = welch_ttest(&diffs.norm, &diffs.test)?;
    tracing::debug!(
        statistic = ttest.statistic,
        pvalue = ttest.pvalue,
        df = ttest.df,
        "welch t-test complete"
    );

    Ok(GroupComparison {
        ttest,
        test_normality,
        norm_normality,
        test_pairs: diffs.test.len(),
        norm_pairs: diffs.norm.len(),
        reliable,
        significant: ttest.pvalue < config.significance_level,
    })
}

/// Dictionary entry point for [`compare_groups`]
///
/// # Errors
/// `MissingGroup` if any of the four condition keys is absent, plus every
/// error of [`compare_groups`].
pub fn compare_dict(dict: &PerplexityDict, config: &SignificanceConfig) -> Result<GroupComparison> {
    let groups = PerplexityGroups::from_dict(dict)?;
    compare_groups(&groups, config)
}

/// Welch's independent t-test (unequal variances)
///
/// Returns a NaN `pvalue` and `df` when both samples have zero variance.
pub fn welch_ttest(a: &[f32], b: &[f32]) -> Result<WelchTest> {
    if a.len() < 2 || b.len() < 2 {
        return Err(AnalysisError::InsufficientSamples {
            required: 2,
            actual: a.len().min(b.len()),
        });
    }

    let result = aprender::stats::hypothesis::ttest_ind(a, b, false)
        .map_err(|e| AnalysisError::Statistics(format!("Failed to compute t-test: {}", e)))?;
    let pvalue = two_tailed_pvalue(result.statistic as f64, result.df as f64)?;

    Ok(WelchTest {
        statistic: result.statistic,
        pvalue,
        df: result.df,
    })
}

/// P(|T| >= |t|) for Student's t with `df` degrees of freedom
fn two_tailed_pvalue(t: f64, df: f64) -> Result<f32> {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return Ok(f32::NAN);
    }

    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
        AnalysisError::Statistics(format!("Invalid t distribution (df = {}): {}", df, e))
    })?;
    // Lower tail of -|t| keeps precision for tiny p-values
    Ok((2.0 * dist.cdf(-t.abs())) as f32)
}

fn fails_normality(result: &NormalityTest, config: &SignificanceConfig) -> bool {
    result.statistic < config.normality_statistic_threshold
        && result.pvalue < config.normality_pvalue_threshold
}
