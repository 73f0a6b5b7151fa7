use thiserror::Error;

use crate::model::{IdentityError, QuestionError, QuizResultError};
use crate::quiz::QuizError;

/// Umbrella error for callers that do not care which domain rule failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Result(#[from] QuizResultError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
