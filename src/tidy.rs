//! Tidy (long-format) perplexity tables
//!
//! One row per perplexity value, labelled with the `Group` and
//! `Sentence version` it came from. Labels are derived from the condition
//! key: `test_group_with_attribute` becomes group `"Test group"` and
//! sentence version `"With attribute word"`.
//!
//! Keys with fewer than three underscore-separated tokens are not rejected.
//! They yield a short or empty group label and a bare `" word"` sentence
//! version, which silently mislabels the rows. Callers that build keys by hand
//! should stick to the `<group>_<group>_<version...>` shape.

use crate::groups::PerplexityDict;
use serde::{Deserialize, Serialize};

/// Column header for the perplexity values
pub const PERPLEXITY_COLUMN: &str = "Model perplexity";
/// Column header for the group label
pub const GROUP_COLUMN: &str = "Group";
/// Column header for the sentence version label
pub const VERSION_COLUMN: &str = "Sentence version";

/// Sentence version label of the `*_with_attribute` conditions
pub const WITH_ATTRIBUTE_WORD: &str = "With attribute word";
/// Sentence version label of the `*_no_attribute` conditions
pub const NO_ATTRIBUTE_WORD: &str = "No attribute word";

/// A single observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyRow {
    #[serde(rename = "Model perplexity")]
    pub perplexity: f32,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "Sentence version")]
    pub sentence_version: String,
}

/// Ordered collection of tidy rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TidyTable {
    rows: Vec<TidyRow>,
}

impl TidyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<TidyRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TidyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TidyRow> {
        self.rows.iter()
    }

    /// The perplexity column
    pub fn perplexities(&self) -> Vec<f32> {
        self.rows.iter().map(|r| r.perplexity).collect()
    }

    /// Distinct group labels in order of first appearance
    pub fn groups(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.group.as_str()) {
                seen.push(&row.group);
            }
        }
        seen
    }

    /// Perplexities for one (group, sentence version) cell
    pub fn values_for(&self, group: &str, sentence_version: &str) -> Vec<f32> {
        self.rows
            .iter()
            .filter(|r| r.group == group && r.sentence_version == sentence_version)
            .map(|r| r.perplexity)
            .collect()
    }

    /// Append another table's rows after this one's
    pub fn concat(mut self, other: TidyTable) -> Self {
        self.rows.extend(other.rows);
        self
    }

    /// Keep only rows matching `predicate`
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: FnMut(&&TidyRow) -> bool,
    {
        Self {
            rows: self.rows.iter().filter(predicate).cloned().collect(),
        }
    }
}

impl IntoIterator for TidyTable {
    type Item = TidyRow;
    type IntoIter = std::vec::IntoIter<TidyRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl FromIterator<TidyRow> for TidyTable {
    fn from_iter<I: IntoIterator<Item = TidyRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Derive `(group, sentence_version)` labels from a condition key
///
/// # Example
/// ```
/// use pplstat::tidy::labels_for_key;
///
/// let (group, version) = labels_for_key("norm_group_no_attribute");
/// assert_eq!(group, "Norm group");
/// assert_eq!(version, "No attribute word");
/// ```
pub fn labels_for_key(key: &str) -> (String, String) {
    let words: Vec<&str> = key.split('_').collect();
    let split = words.len().min(2);

    let group = capitalize(&words[..split].join(" "));
    let version = format!("{} word", capitalize(&words[split..].join(" ")));
    (group, version)
}

/// Rows for one condition key
pub fn tidy_rows(key: &str, values: &[f32]) -> Vec<TidyRow> {
    let (group, sentence_version) = labels_for_key(key);
    values
        .iter()
        .map(|&perplexity| TidyRow {
            perplexity,
            group: group.clone(),
            sentence_version: sentence_version.clone(),
        })
        .collect()
}

/// Reshape a perplexity dictionary into a tidy table, in key order
pub fn tidy_table(dict: &PerplexityDict) -> TidyTable {
    dict.iter()
        .flat_map(|(key, values)| tidy_rows(key, values))
        .collect()
}

/// Uppercase the first character and lowercase the rest
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
