//! Input documents for the command-line front end
//!
//! A document is a JSON object mapping condition keys to either a list of
//! sentence perplexities or a list of per-sentence token-loss lists:
//!
//! ```json
//! {
//!   "test_group_with_attribute": [31.2, 28.7, 40.1],
//!   "test_group_no_attribute": [[3.1, 2.9, 3.6], [3.0, 3.3], [3.8, 3.5, 3.4]]
//! }
//! ```
//!
//! Loss lists are reduced with [`crate::perplexity::perplexity`].

use crate::error::{AnalysisError, Result};
use crate::groups::PerplexityDict;
use crate::perplexity::perplexities;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Values recorded for one condition
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConditionValues {
    Perplexities(Vec<f32>),
    Losses(Vec<Vec<f32>>),
}

impl ConditionValues {
    pub fn into_perplexities(self) -> Result<Vec<f32>> {
        match self {
            ConditionValues::Perplexities(values) => Ok(values),
            ConditionValues::Losses(sequences) => perplexities(&sequences),
        }
    }
}

/// Parse a JSON document into a perplexity dictionary
pub fn parse_document(json: &str) -> Result<PerplexityDict> {
    let raw: BTreeMap<String, ConditionValues> = serde_json::from_str(json)
        .map_err(|e| AnalysisError::InvalidInput(format!("malformed input document: {}", e)))?;

    raw.into_iter()
        .map(|(key, values)| {
            let ppl = values.into_perplexities().map_err(|e| match e {
                AnalysisError::InvalidInput(msg) => {
                    AnalysisError::InvalidInput(format!("{}: {}", key, msg))
                }
                other => other,
            })?;
            Ok((key, ppl))
        })
        .collect()
}
