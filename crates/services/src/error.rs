//! Shared error types for the services crate.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use storage::repository::StorageError;
use training_core::model::{IdentityError, SectionId};
use training_core::quiz::QuizError;

/// Errors emitted by the training session and its orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("section {0} is not unlocked yet")]
    SectionLocked(SectionId),
    #[error("the quiz section completes when the quiz is finished")]
    QuizNotFinished,
    #[error("no finalized result to persist")]
    NothingToPersist,
    #[error("persisting the result timed out after {0:?}")]
    PersistTimeout(Duration),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True when the result was finalized but could not be stored.
    #[must_use]
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::PersistTimeout(_))
    }
}

/// Errors emitted while exporting stored results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("Aucun résultat à exporter")]
    NothingToExport,
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by `AdminService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error("clearing results requires explicit confirmation")]
    NotConfirmed,
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while building or writing a training report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("result has {actual} answers but the question set has {expected} questions")]
    ResultMismatch { expected: usize, actual: usize },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("report task failed: {0}")]
    Join(String),
}
