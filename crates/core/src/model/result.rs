use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Identity, OptionIndex, QuestionSet};

/// Minimum share of correct answers, in percent, framed as a pass.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("result must cover at least one question")]
    NoQuestions,

    #[error("score {score} exceeds total questions {total}")]
    ScoreOutOfRange { score: u32, total: u32 },

    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("too many questions for a single result: {len}")]
    TooManyQuestions { len: usize },
}

/// Finalized outcome of one quiz attempt.
///
/// `answers` has exactly one slot per question, in question order; `None` is
/// the "unanswered" sentinel and never counts as correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    identity: Identity,
    score: u32,
    total_questions: u32,
    answers: Vec<Option<OptionIndex>>,
    completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// Score an answer sheet against the question set.
    ///
    /// Missing trailing slots are padded with "unanswered"; extra slots are an error.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::AnswerCountMismatch` if more answers than
    /// questions are supplied.
    pub fn grade(
        identity: Identity,
        questions: &QuestionSet,
        mut answers: Vec<Option<OptionIndex>>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        let total = questions.total();
        if answers.len() > total {
            return Err(QuizResultError::AnswerCountMismatch {
                expected: total,
                actual: answers.len(),
            });
        }
        answers.resize(total, None);

        let correct = questions
            .iter()
            .zip(&answers)
            .filter(|(q, a)| q.is_correct(**a))
            .count();

        let total_questions =
            u32::try_from(total).map_err(|_| QuizResultError::TooManyQuestions { len: total })?;
        let score =
            u32::try_from(correct).map_err(|_| QuizResultError::TooManyQuestions { len: total })?;

        Self::from_persisted(identity, score, total_questions, answers, completed_at)
    }

    /// Rehydrate a result from storage, re-checking the record invariants.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError` if the score or answer count is inconsistent.
    pub fn from_persisted(
        identity: Identity,
        score: u32,
        total_questions: u32,
        answers: Vec<Option<OptionIndex>>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        if total_questions == 0 {
            return Err(QuizResultError::NoQuestions);
        }
        if score > total_questions {
            return Err(QuizResultError::ScoreOutOfRange {
                score,
                total: total_questions,
            });
        }
        let expected = usize::try_from(total_questions).unwrap_or(usize::MAX);
        if answers.len() != expected {
            return Err(QuizResultError::AnswerCountMismatch {
                expected,
                actual: answers.len(),
            });
        }

        Ok(Self {
            identity,
            score,
            total_questions,
            answers,
            completed_at,
        })
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<OptionIndex>] {
        &self.answers
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// `round(score / total * 100)`, rounding halves up.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.total_questions)
    }

    #[must_use]
    pub fn is_passed(&self) -> bool {
        is_passing(self.score, self.total_questions)
    }

    /// Number of questions not answered correctly (wrong or unanswered).
    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.total_questions - self.score
    }
}

/// Rounded percentage with halves rounded up, computed without floats.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score);
    let total = u64::from(total);
    let rounded = (score * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// `score / total >= 0.70`, exact.
#[must_use]
pub fn is_passing(score: u32, total: u32) -> bool {
    total > 0 && u64::from(score) * 100 >= u64::from(total) * u64::from(PASS_THRESHOLD_PERCENT)
}
