//! Error types for benchlens
//!
//! The comparison engine itself never fails: missing data is substituted or
//! filtered out. Errors only come from the edges of the crate, i.e. reading
//! report files, parsing selection strings and validating configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for benchlens operations
pub type Result<T> = std::result::Result<T, BenchlensError>;

/// Error type for all benchlens operations
#[derive(Debug, Error)]
pub enum BenchlensError {
    /// Failed to read a file
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File content could not be decoded
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// Path (or `<inline>`) being parsed
        path: String,
        /// Decoder message
        reason: String,
    },

    /// Axis key not recognized
    #[error("Unknown axis '{0}' (expected one of: throughputPerGpu, ttftP50Ms, tpotP50Ms, p99LatencyMs, powerPerGpuKw, tcoPerGpuHr, gpuCount)")]
    UnknownAxis(String),

    /// Leaderboard sort key not recognized
    #[error("Unknown sort key '{0}' (expected one of: score, throughputPerGpu, ttftP50Ms, tpotP50Ms, p99LatencyMs, llmdAdvantage)")]
    UnknownSortKey(String),

    /// Sort direction not recognized
    #[error("Unknown sort direction '{0}' (expected asc or desc)")]
    UnknownSortDirection(String),

    /// Configuration kind not recognized
    #[error("Unknown configuration kind '{0}' (expected standalone, llm-d or disaggregated)")]
    UnknownConfigKind(String),

    /// Engine configuration rejected by validation
    #[error("Invalid engine configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with it
        reason: String,
    },
}

impl BenchlensError {
    /// Build a parse error for an inline (non-file) source
    pub(crate) fn inline_parse(reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: "<inline>".to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_axis() {
        let err = BenchlensError::UnknownAxis("latency".to_string());
        let msg = err.to_string();
        assert!(msg.contains("'latency'"));
        assert!(msg.contains("throughputPerGpu"));
    }

    #[test]
    fn test_error_display_io_includes_path() {
        let err = BenchlensError::Io {
            path: PathBuf::from("/tmp/missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_inline_parse_error() {
        let err = BenchlensError::inline_parse("expected value at line 1");
        match err {
            BenchlensError::Parse { path, reason } => {
                assert_eq!(path, "<inline>");
                assert!(reason.contains("line 1"));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
