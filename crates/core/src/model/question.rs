use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;

/// Index into a question's option list (0-based).
pub type OptionIndex = u32;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id}: prompt cannot be empty")]
    EmptyPrompt { id: u32 },

    #[error("question {id}: needs at least 2 options, got {len}")]
    TooFewOptions { id: u32, len: usize },

    #[error("question {id}: correct option {index} is out of range (0..{len})")]
    CorrectOptionOutOfRange { id: u32, index: OptionIndex, len: usize },

    #[error("duplicate question id: {0}")]
    DuplicateId(u32),

    #[error("question set cannot be empty")]
    EmptySet,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: u32,
    prompt: String,
    options: Vec<String>,
    correct_option: OptionIndex,
    explanation: String,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, fewer than two options
    /// are given, or the correct index does not address an option.
    pub fn new(
        id: u32,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: OptionIndex,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id,
                len: options.len(),
            });
        }
        if usize::try_from(correct_option).map_or(true, |i| i >= options.len()) {
            return Err(QuestionError::CorrectOptionOutOfRange {
                id,
                index: correct_option,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_option,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }

    #[must_use]
    pub fn correct_option(&self) -> OptionIndex {
        self.correct_option
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Strict equality with the designated correct option.
    #[must_use]
    pub fn is_correct(&self, answer: Option<OptionIndex>) -> bool {
        answer == Some(self.correct_option)
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Ordered, validated, read-only question sequence.
///
/// Cloning is cheap; every clone shares the same questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet(Arc<[Question]>);

impl QuestionSet {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptySet` for an empty list and
    /// `QuestionError::DuplicateId` when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::EmptySet);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id()) {
                return Err(QuestionError::DuplicateId(q.id()));
            }
        }
        Ok(Self(questions.into()))
    }

    /// Number of questions; always at least 1.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.len()
    }
}

impl Deref for QuestionSet {
    type Target = [Question];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
