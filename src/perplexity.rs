//! Sentence perplexity from per-token losses
//!
//! Perplexity is the exponential of the mean cross-entropy loss over the
//! tokens of one sentence. Lower is better: a model that assigns probability
//! 1 to every token has loss 0 everywhere and perplexity exactly 1.

use crate::error::{AnalysisError, Result};
use trueno::Vector;

/// Reduce a sentence's per-token losses to its perplexity, `exp(mean(losses))`
///
/// # Arguments
/// * `losses` - One loss per token position, as produced by an unreduced
///   cross-entropy loss
///
/// # Errors
/// `AnalysisError::InvalidInput` if `losses` is empty.
///
/// # Example
/// ```
/// use pplstat::perplexity::perplexity;
///
/// assert_eq!(perplexity(&[0.0, 0.0, 0.0]).unwrap(), 1.0);
/// assert!((perplexity(&[1.0, 1.0]).unwrap() - std::f32::consts::E).abs() < 1e-5);
/// ```
pub fn perplexity(losses: &[f32]) -> Result<f32> {
    if losses.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "cannot compute perplexity of an empty loss sequence".to_string(),
        ));
    }

    let mean = Vector::from_slice(losses)
        .mean()
        .map_err(|e| AnalysisError::Statistics(format!("mean loss: {}", e)))?;

    Ok(mean.exp())
}

/// Reduce a batch of loss sequences, one perplexity per sentence
///
/// Fails on the first empty sequence; the error names its index.
pub fn perplexities<S: AsRef<[f32]>>(sequences: &[S]) -> Result<Vec<f32>> {
    sequences
        .iter()
        .enumerate()
        .map(|(i, seq)| {
            perplexity(seq.as_ref()).map_err(|e| match e {
                AnalysisError::InvalidInput(msg) => {
                    AnalysisError::InvalidInput(format!("sentence {}: {}", i, msg))
                }
                other => other,
            })
        })
        .collect()
}
