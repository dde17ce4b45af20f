// Error taxonomy for the divergence pipeline.
//
// Library code returns `AnalysisError` so the cohort aggregator can tell a
// per-user data problem (skip the user, warn) from a broken input file
// (abort with the filename). Application code wraps these in anyhow.

use std::path::PathBuf;

use thiserror::Error;

use crate::corpus::record::ContentClass;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// One side of the ad / organic split has no tokens after filtering.
    #[error("no {class} tokens to analyze (the table has no usable {class} rows)")]
    EmptyClass { class: ContentClass },

    #[error("cannot estimate a frequency distribution from zero tokens")]
    EmptySequence,

    #[error("probability vectors differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("malformed input file {}: {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("no user id (run of digits) in file name {}", .path.display())]
    MissingUserId { path: PathBuf },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl AnalysisError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should stop a whole cohort run.
    ///
    /// Only insufficient data for a single user is recoverable; anything
    /// wrong with the input files themselves is reported immediately.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::EmptyClass { .. } | Self::EmptySequence)
    }
}
