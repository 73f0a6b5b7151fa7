use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Identity, OptionIndex, Question, QuestionSet, QuizResult, QuizResultError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// A transition was attempted from a state that does not allow it.
///
/// The engine state is left unchanged whenever one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("the answer to this question is locked")]
    AnswerLocked,
    #[error("select an answer before revealing")]
    NoAnswerSelected,
    #[error("reveal the answer before advancing")]
    NotRevealed,
    #[error("the quiz attempt is already finished")]
    Finished,
    #[error("the quiz attempt is still in progress")]
    NotFinished,
    #[error(transparent)]
    Result(#[from] QuizResultError),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// An attempt that has not been finalized yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    question_index: usize,
    answers: Vec<Option<OptionIndex>>,
    revealed: bool,
}

impl Attempt {
    fn fresh(total: usize) -> Self {
        Self {
            question_index: 0,
            answers: vec![None; total],
            revealed: false,
        }
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// One slot per question; `None` until answered.
    #[must_use]
    pub fn answers(&self) -> &[Option<OptionIndex>] {
        &self.answers
    }

    #[must_use]
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<OptionIndex> {
        self.answers.get(self.question_index).copied().flatten()
    }

    /// True for a brand-new attempt: first question, nothing answered, nothing revealed.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.question_index == 0 && !self.revealed && self.answers.iter().all(Option::is_none)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    InProgress(Attempt),
    Finished(QuizResult),
}

/// Correctness feedback exposed by `reveal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub question_index: usize,
    pub selected: OptionIndex,
    pub correct_option: OptionIndex,
    pub is_correct: bool,
    pub explanation: String,
}

/// Outcome of `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this index.
    Next(usize),
    /// The last question was left; the attempt is finalized.
    Finished(QuizResult),
}

/// Position within the attempt for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based number of the current question.
    pub position: usize,
    pub total: usize,
}

/// Correct answers among the questions whose answer has been revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningScore {
    pub correct: u32,
    pub revealed: u32,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Drives one learner through a fixed, ordered question set.
///
/// Option indices passed to `select_answer` are a caller precondition: the
/// surface only offers indices within the current question's options, and the
/// engine does not re-validate them. An out-of-range index simply never
/// matches the correct option.
///
/// # Examples
///
/// ```
/// # use training_core::model::{Identity, Organization, Question, QuestionSet};
/// # use training_core::quiz::{Advance, QuizEngine};
/// # use training_core::time::fixed_now;
/// let questions = QuestionSet::new(vec![
///     Question::new(1, "2 + 2 ?", vec!["3".into(), "4".into()], 1, "Arithmetic.")?,
/// ])?;
/// let identity = Identity::new("Ana", "Lee", Organization::C2s)?;
/// let mut quiz = QuizEngine::new(identity, questions);
///
/// quiz.select_answer(1)?;
/// assert!(quiz.reveal()?.is_correct);
/// let Advance::Finished(result) = quiz.advance(fixed_now())? else {
///     unreachable!("single question quiz finishes on first advance");
/// };
/// assert_eq!(result.score(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct QuizEngine {
    identity: Identity,
    questions: QuestionSet,
    state: QuizState,
}

impl QuizEngine {
    #[must_use]
    pub fn new(identity: Identity, questions: QuestionSet) -> Self {
        let state = QuizState::InProgress(Attempt::fresh(questions.total()));
        Self {
            identity,
            questions,
            state,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, QuizState::Finished(_))
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            QuizState::Finished(result) => Some(result),
            QuizState::InProgress(_) => None,
        }
    }

    #[must_use]
    pub fn attempt(&self) -> Option<&Attempt> {
        match &self.state {
            QuizState::InProgress(attempt) => Some(attempt),
            QuizState::Finished(_) => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.attempt()
            .and_then(|a| self.questions.get(a.question_index))
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.questions.total();
        let position = self.attempt().map_or(total, |a| a.question_index + 1);
        QuizProgress { position, total }
    }

    /// Score over questions whose answer has been revealed so far.
    #[must_use]
    pub fn running_score(&self) -> RunningScore {
        let (answers, revealed_upto) = match &self.state {
            QuizState::InProgress(a) => {
                let upto = a.question_index + usize::from(a.revealed);
                (a.answers.as_slice(), upto)
            }
            QuizState::Finished(r) => (r.answers(), r.answers().len()),
        };

        let correct = self
            .questions
            .iter()
            .zip(answers)
            .take(revealed_upto)
            .filter(|(q, a)| q.is_correct(**a))
            .count();

        RunningScore {
            correct: u32::try_from(correct).unwrap_or(u32::MAX),
            revealed: u32::try_from(revealed_upto).unwrap_or(u32::MAX),
        }
    }

    fn attempt_mut(&mut self) -> Result<&mut Attempt, QuizError> {
        match &mut self.state {
            QuizState::InProgress(attempt) => Ok(attempt),
            QuizState::Finished(_) => Err(QuizError::Finished),
        }
    }

    /// Record (or replace) the selection for the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AnswerLocked` once the current answer is revealed,
    /// `QuizError::Finished` after finalization.
    pub fn select_answer(&mut self, option: OptionIndex) -> Result<(), QuizError> {
        let attempt = self.attempt_mut()?;
        if attempt.revealed {
            return Err(QuizError::AnswerLocked);
        }
        let index = attempt.question_index;
        attempt.answers[index] = Some(option);
        Ok(())
    }

    /// Lock the current answer and expose correctness and the explanation.
    ///
    /// Revealing an already revealed question returns the same feedback again.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoAnswerSelected` if the current question has no
    /// selection, `QuizError::Finished` after finalization.
    pub fn reveal(&mut self) -> Result<Feedback, QuizError> {
        let attempt = self.attempt_mut()?;
        let Some(selected) = attempt.current_answer() else {
            return Err(QuizError::NoAnswerSelected);
        };
        attempt.revealed = true;
        let index = attempt.question_index;

        let question = &self.questions[index];
        Ok(Feedback {
            question_index: index,
            selected,
            correct_option: question.correct_option(),
            is_correct: question.is_correct(Some(selected)),
            explanation: question.explanation().to_owned(),
        })
    }

    /// Move past the revealed question; leaving the last one finalizes the attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotRevealed` if the current answer is not revealed,
    /// `QuizError::Finished` after finalization.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<Advance, QuizError> {
        let last = self.questions.total() - 1;
        let attempt = self.attempt_mut()?;
        if !attempt.revealed {
            return Err(QuizError::NotRevealed);
        }
        if attempt.question_index < last {
            attempt.question_index += 1;
            attempt.revealed = false;
            return Ok(Advance::Next(attempt.question_index));
        }

        self.finish(at).map(|r| Advance::Finished(r.clone()))
    }

    /// Finalize the attempt now. Questions without an answer stay unanswered
    /// and count as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Finished` if the attempt was already finalized.
    pub fn finish(&mut self, at: DateTime<Utc>) -> Result<&QuizResult, QuizError> {
        let answers = self.attempt_mut()?.answers.clone();
        let result = QuizResult::grade(self.identity.clone(), &self.questions, answers, at)?;
        self.state = QuizState::Finished(result);
        match &self.state {
            QuizState::Finished(result) => Ok(result),
            QuizState::InProgress(_) => Err(QuizError::NotFinished),
        }
    }

    /// Start a new attempt from the first question.
    ///
    /// Results already handed out are owned copies and are not affected.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFinished` while the current attempt is running.
    pub fn restart(&mut self) -> Result<(), QuizError> {
        if !self.is_finished() {
            return Err(QuizError::NotFinished);
        }
        self.state = QuizState::InProgress(Attempt::fresh(self.questions.total()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::reference_questions;
    use crate::model::Organization;
    use crate::time::fixed_now;

    fn ana() -> Identity {
        Identity::new("Ana", "Lee", Organization::C2s).unwrap()
    }

    fn engine() -> QuizEngine {
        QuizEngine::new(ana(), reference_questions())
    }

    fn answer_all(quiz: &mut QuizEngine, pick: impl Fn(usize, &Question) -> OptionIndex) {
        loop {
            let attempt = quiz.attempt().unwrap();
            let i = attempt.question_index();
            let q = quiz.questions()[i].clone();
            quiz.select_answer(pick(i, &q)).unwrap();
            quiz.reveal().unwrap();
            if let Advance::Finished(_) = quiz.advance(fixed_now()).unwrap() {
                break;
            }
        }
    }

    fn wrong(q: &Question) -> OptionIndex {
        (q.correct_option() + 1) % u32::try_from(q.options().len()).unwrap()
    }

    #[test]
    fn all_correct_scores_full_marks() {
        let mut quiz = engine();
        answer_all(&mut quiz, |_, q| q.correct_option());
        let result = quiz.result().unwrap();
        assert_eq!(result.score(), 15);
        assert_eq!(result.total_questions(), 15);
        assert!(result.is_passed());
        assert_eq!(result.percentage(), 100);
        assert_eq!(result.completed_at(), fixed_now());
    }

    #[test]
    fn one_wrong_answer_still_passes() {
        let mut quiz = engine();
        answer_all(&mut quiz, |i, q| if i == 0 { wrong(q) } else { q.correct_option() });
        let result = quiz.result().unwrap();
        assert_eq!(result.score(), 14);
        assert_eq!(result.percentage(), 93);
        assert!(result.is_passed());
    }

    #[test]
    fn unanswered_last_question_counts_as_incorrect() {
        let mut quiz = engine();
        let last = quiz.questions().total() - 1;
        for i in 0..last {
            let q = quiz.questions()[i].clone();
            quiz.select_answer(q.correct_option()).unwrap();
            quiz.reveal().unwrap();
            assert_eq!(quiz.advance(fixed_now()).unwrap(), Advance::Next(i + 1));
        }
        let result = quiz.finish(fixed_now()).unwrap().clone();
        assert_eq!(result.answers().len(), 15);
        assert_eq!(result.answers()[last], None);
        assert_eq!(result.score(), 14);
    }

    #[test]
    fn reselection_allowed_until_reveal() {
        let mut quiz = engine();
        quiz.select_answer(0).unwrap();
        quiz.select_answer(1).unwrap();
        let fb = quiz.reveal().unwrap();
        assert_eq!(fb.selected, 1);
        assert!(fb.is_correct);
        assert_eq!(quiz.select_answer(2).unwrap_err(), QuizError::AnswerLocked);
        assert_eq!(quiz.attempt().unwrap().current_answer(), Some(1));
    }

    #[test]
    fn reveal_requires_a_selection() {
        let mut quiz = engine();
        assert_eq!(quiz.reveal().unwrap_err(), QuizError::NoAnswerSelected);
        assert!(!quiz.attempt().unwrap().revealed());
    }

    #[test]
    fn advance_requires_reveal() {
        let mut quiz = engine();
        quiz.select_answer(1).unwrap();
        assert_eq!(quiz.advance(fixed_now()).unwrap_err(), QuizError::NotRevealed);
        assert_eq!(quiz.progress(), QuizProgress { position: 1, total: 15 });
    }

    #[test]
    fn running_score_counts_revealed_only() {
        let mut quiz = engine();
        quiz.select_answer(1).unwrap();
        assert_eq!(quiz.running_score(), RunningScore { correct: 0, revealed: 0 });
        quiz.reveal().unwrap();
        assert_eq!(quiz.running_score(), RunningScore { correct: 1, revealed: 1 });
        quiz.advance(fixed_now()).unwrap();
        quiz.select_answer(0).unwrap();
        quiz.reveal().unwrap();
        assert_eq!(quiz.running_score(), RunningScore { correct: 1, revealed: 2 });
    }

    #[test]
    fn restart_only_from_finished_and_keeps_prior_result() {
        let mut quiz = engine();
        assert_eq!(quiz.restart().unwrap_err(), QuizError::NotFinished);

        answer_all(&mut quiz, |_, q| q.correct_option());
        let first = quiz.result().unwrap().clone();

        quiz.restart().unwrap();
        let attempt = quiz.attempt().unwrap();
        assert!(attempt.is_untouched());
        assert_eq!(attempt.answers().len(), 15);
        assert_eq!(first.score(), 15);

        answer_all(&mut quiz, |_, q| wrong(q));
        assert_eq!(quiz.result().unwrap().score(), 0);
        assert_eq!(first.score(), 15);
    }

    #[test]
    fn transitions_after_finish_are_rejected() {
        let mut quiz = engine();
        quiz.finish(fixed_now()).unwrap();
        assert_eq!(quiz.select_answer(0).unwrap_err(), QuizError::Finished);
        assert_eq!(quiz.reveal().unwrap_err(), QuizError::Finished);
        assert_eq!(quiz.advance(fixed_now()).unwrap_err(), QuizError::Finished);
        assert_eq!(quiz.finish(fixed_now()).unwrap_err(), QuizError::Finished);
        assert_eq!(quiz.result().unwrap().score(), 0);
    }

    #[test]
    fn score_bounds_hold_for_mixed_answer_patterns() {
        for seed in 0..32_usize {
            let mut quiz = engine();
            answer_all(&mut quiz, |i, q| {
                if (seed >> (i % 5)) & 1 == 1 {
                    q.correct_option()
                } else {
                    wrong(q)
                }
            });
            let r = quiz.result().unwrap();
            let expected = quiz
                .questions()
                .iter()
                .zip(r.answers())
                .filter(|(q, a)| q.is_correct(**a))
                .count();
            assert_eq!(r.score() as usize, expected);
            assert!(r.score() <= r.total_questions());
        }
    }
}
