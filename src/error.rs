//! Error taxonomy for perplexity analysis
//!
//! Every failure surfaces immediately to the caller. The only non-fatal
//! condition in the crate (the normality advisory) is logged, not raised.

use thiserror::Error;

/// Errors produced by perplexity computation, group comparison, and plotting
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing perplexity group: {key}")]
    MissingGroup { key: String },

    #[error(
        "Length mismatch in {group}: with_attribute has {with_attribute} values, \
         no_attribute has {no_attribute}"
    )]
    LengthMismatch {
        group: String,
        with_attribute: usize,
        no_attribute: usize,
    },

    #[error("Insufficient samples: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("Statistical test failed: {0}")]
    Statistics(String),

    #[error("Invalid color specification: {0}")]
    InvalidColor(String),

    #[error("Unknown theme: {0} (expected darkgrid, whitegrid, dark, white or ticks)")]
    UnknownTheme(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported image format: {0} (expected svg, png, jpg, jpeg or bmp)")]
    UnsupportedFormat(String),

    #[error("Plot rendering failed: {0}")]
    Plot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message_names_group_and_sizes() {
        let err = AnalysisError::LengthMismatch {
            group: "test_group".to_string(),
            with_attribute: 5,
            no_attribute: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("test_group"));
        assert!(msg.contains('5'));
        assert!(msg.contains('4'));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: AnalysisError = io.into();
        assert!(matches!(err, AnalysisError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }
}
