//! Perplexity groups keyed by experimental condition
//!
//! A probe evaluates two groups of sentence pairs. Each pair has a version
//! containing the attribute word and a version without it:
//!
//! - the *test* group pairs sentences whose attribute word is under study
//! - the *norm* group pairs sentences that serve as a baseline
//!
//! Index `i` of a `with_attribute` list and index `i` of the matching
//! `no_attribute` list refer to the same sentence pair.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Perplexity lists keyed by condition name (e.g. `test_group_with_attribute`)
pub type PerplexityDict = BTreeMap<String, Vec<f32>>;

pub const TEST_WITH_ATTRIBUTE: &str = "test_group_with_attribute";
pub const TEST_NO_ATTRIBUTE: &str = "test_group_no_attribute";
pub const NORM_WITH_ATTRIBUTE: &str = "norm_group_with_attribute";
pub const NORM_NO_ATTRIBUTE: &str = "norm_group_no_attribute";

/// The four condition keys a group comparison requires
pub const REQUIRED_KEYS: [&str; 4] = [
    TEST_WITH_ATTRIBUTE,
    TEST_NO_ATTRIBUTE,
    NORM_WITH_ATTRIBUTE,
    NORM_NO_ATTRIBUTE,
];

/// Perplexities for the four conditions of a probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerplexityGroups {
    #[serde(rename = "test_group_with_attribute")]
    pub test_with_attribute: Vec<f32>,
    #[serde(rename = "test_group_no_attribute")]
    pub test_no_attribute: Vec<f32>,
    #[serde(rename = "norm_group_with_attribute")]
    pub norm_with_attribute: Vec<f32>,
    #[serde(rename = "norm_group_no_attribute")]
    pub norm_no_attribute: Vec<f32>,
}

/// Paired differences (`with_attribute - no_attribute`) for both groups
#[derive(Debug, Clone, PartialEq)]
pub struct PairedDifferences {
    pub test: Vec<f32>,
    pub norm: Vec<f32>,
}

impl PerplexityGroups {
    pub fn new(
        test_with_attribute: Vec<f32>,
        test_no_attribute: Vec<f32>,
        norm_with_attribute: Vec<f32>,
        norm_no_attribute: Vec<f32>,
    ) -> Self {
        Self {
            test_with_attribute,
            test_no_attribute,
            norm_with_attribute,
            norm_no_attribute,
        }
    }

    /// Extract the four required conditions from a dictionary
    ///
    /// Extra keys are ignored.
    ///
    /// # Errors
    /// `AnalysisError::MissingGroup` naming the first absent key.
    pub fn from_dict(dict: &PerplexityDict) -> Result<Self> {
        let take = |key: &str| {
            dict.get(key)
                .cloned()
                .ok_or_else(|| AnalysisError::MissingGroup {
                    key: key.to_string(),
                })
        };

        Ok(Self {
            test_with_attribute: take(TEST_WITH_ATTRIBUTE)?,
            test_no_attribute: take(TEST_NO_ATTRIBUTE)?,
            norm_with_attribute: take(NORM_WITH_ATTRIBUTE)?,
            norm_no_attribute: take(NORM_NO_ATTRIBUTE)?,
        })
    }

    /// Convert back into dictionary form (for tidying and plotting)
    pub fn to_dict(&self) -> PerplexityDict {
        let mut dict = PerplexityDict::new();
        dict.insert(
            TEST_WITH_ATTRIBUTE.to_string(),
            self.test_with_attribute.clone(),
        );
        dict.insert(TEST_NO_ATTRIBUTE.to_string(), self.test_no_attribute.clone());
        dict.insert(
            NORM_WITH_ATTRIBUTE.to_string(),
            self.norm_with_attribute.clone(),
        );
        dict.insert(NORM_NO_ATTRIBUTE.to_string(), self.norm_no_attribute.clone());
        dict
    }

    /// The same probe with the test and norm roles exchanged
    pub fn swapped(&self) -> Self {
        Self {
            test_with_attribute: self.norm_with_attribute.clone(),
            test_no_attribute: self.norm_no_attribute.clone(),
            norm_with_attribute: self.test_with_attribute.clone(),
            norm_no_attribute: self.test_no_attribute.clone(),
        }
    }

    /// Compute `with_attribute[i] - no_attribute[i]` for both groups
    ///
    /// # Errors
    /// `AnalysisError::LengthMismatch` if a group's two lists differ in length.
    pub fn paired_differences(&self) -> Result<PairedDifferences> {
        Ok(PairedDifferences {
            test: paired_diff(
                "test_group",
                &self.test_with_attribute,
                &self.test_no_attribute,
            )?,
            norm: paired_diff(
                "norm_group",
                &self.norm_with_attribute,
                &self.norm_no_attribute,
            )?,
        })
    }
}

fn paired_diff(group: &str, with_attribute: &[f32], no_attribute: &[f32]) -> Result<Vec<f32>> {
    if with_attribute.len() != no_attribute.len() {
        return Err(AnalysisError::LengthMismatch {
            group: group.to_string(),
            with_attribute: with_attribute.len(),
            no_attribute: no_attribute.len(),
        });
    }

    Ok(with_attribute
        .iter()
        .zip(no_attribute)
        .map(|(w, n)| w - n)
        .collect())
}
