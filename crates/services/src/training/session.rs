use chrono::{DateTime, Utc};

use storage::repository::ResultId;
use training_core::catalog::Curriculum;
use training_core::model::{Identity, OptionIndex, QuestionSet, QuizResult, SectionId};
use training_core::progress::{Completion, SectionTracker};
use training_core::quiz::{Advance, Feedback, QuizEngine};

use crate::error::SessionError;

//
// ─── QUIZ STEPS ────────────────────────────────────────────────────────────────
//

/// How a finalized attempt relates to the session's recorded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempted {
    /// First finalized attempt of the session; it becomes the recorded result.
    First,
    /// A later attempt after `restart_quiz`; the recorded result is kept.
    Retake,
}

/// Outcome of a quiz transition driven through the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    Next(usize),
    Finished {
        result: QuizResult,
        attempt: Attempted,
    },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One learner's pass through the curriculum.
///
/// Owns the identity, the section gate, the quiz engine and the first
/// finalized result. Transitions take the time as input and never do I/O;
/// persistence belongs to `TrainingLoopService`.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    identity: Identity,
    curriculum: Curriculum,
    tracker: SectionTracker,
    quiz: QuizEngine,
    result: Option<QuizResult>,
    stored_id: Option<ResultId>,
}

impl TrainingSession {
    #[must_use]
    pub fn new(identity: Identity, questions: QuestionSet, curriculum: Curriculum) -> Self {
        let quiz = QuizEngine::new(identity.clone(), questions);
        Self {
            identity,
            curriculum,
            tracker: SectionTracker::new(),
            quiz,
            result: None,
            stored_id: None,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    #[must_use]
    pub fn tracker(&self) -> &SectionTracker {
        &self.tracker
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizEngine {
        &self.quiz
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        self.quiz.questions()
    }

    /// The first finalized result, kept for the whole session.
    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Store id of the recorded result once persisted.
    #[must_use]
    pub fn stored_id(&self) -> Option<ResultId> {
        self.stored_id
    }

    /// True when a recorded result exists that no store has accepted yet.
    #[must_use]
    pub fn needs_persist(&self) -> bool {
        self.result.is_some() && self.stored_id.is_none()
    }

    pub(crate) fn mark_stored(&mut self, id: ResultId) {
        self.stored_id = Some(id);
    }

    /// Acknowledge a content section.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuizNotFinished` for the quiz section before a
    /// result exists; the quiz section is completed by finishing the quiz.
    pub fn complete_section(&mut self, section: SectionId) -> Result<Completion, SessionError> {
        if section == SectionId::Quiz && self.result.is_none() {
            return Err(SessionError::QuizNotFinished);
        }
        Ok(self.tracker.complete(section))
    }

    fn ensure_quiz_unlocked(&self) -> Result<(), SessionError> {
        if self.tracker.is_visible(SectionId::Quiz) {
            Ok(())
        } else {
            Err(SessionError::SectionLocked(SectionId::Quiz))
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::SectionLocked` before sections 1-4 are done,
    /// or the underlying `QuizError`.
    pub fn select_answer(&mut self, option: OptionIndex) -> Result<(), SessionError> {
        self.ensure_quiz_unlocked()?;
        Ok(self.quiz.select_answer(option)?)
    }

    /// # Errors
    ///
    /// Returns `SessionError::SectionLocked` or the underlying `QuizError`.
    pub fn reveal(&mut self) -> Result<Feedback, SessionError> {
        self.ensure_quiz_unlocked()?;
        Ok(self.quiz.reveal()?)
    }

    /// Move past the revealed question. Leaving the last one finalizes the attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SectionLocked` or the underlying `QuizError`.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<QuizStep, SessionError> {
        self.ensure_quiz_unlocked()?;
        match self.quiz.advance(at)? {
            Advance::Next(index) => Ok(QuizStep::Next(index)),
            Advance::Finished(result) => Ok(self.record(result)),
        }
    }

    /// Finalize the attempt now; unanswered questions count as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SectionLocked` or the underlying `QuizError`.
    pub fn finish_quiz(&mut self, at: DateTime<Utc>) -> Result<QuizStep, SessionError> {
        self.ensure_quiz_unlocked()?;
        let result = self.quiz.finish(at)?.clone();
        Ok(self.record(result))
    }

    /// Start another attempt. The recorded result is not affected.
    ///
    /// # Errors
    ///
    /// Returns the underlying `QuizError` while an attempt is running.
    pub fn restart_quiz(&mut self) -> Result<(), SessionError> {
        Ok(self.quiz.restart()?)
    }

    fn record(&mut self, result: QuizResult) -> QuizStep {
        self.tracker.complete(SectionId::Quiz);
        let attempt = if self.result.is_none() {
            self.result = Some(result.clone());
            Attempted::First
        } else {
            Attempted::Retake
        };
        QuizStep::Finished { result, attempt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use training_core::catalog::reference_questions;
    use training_core::model::Organization;
    use training_core::time::fixed_now;

    fn session() -> TrainingSession {
        let identity = Identity::new("Ana", "Lee", Organization::C2s).unwrap();
        TrainingSession::new(identity, reference_questions(), Curriculum::reference())
    }

    fn unlock_quiz(s: &mut TrainingSession) {
        for section in &SectionId::ALL[..4] {
            assert_eq!(s.complete_section(*section).unwrap(), Completion::Recorded);
        }
    }

    #[test]
    fn quiz_is_locked_until_content_sections_are_done() {
        let mut s = session();
        assert!(matches!(
            s.select_answer(0),
            Err(SessionError::SectionLocked(SectionId::Quiz))
        ));
        s.complete_section(SectionId::Introduction).unwrap();
        s.complete_section(SectionId::Recognition).unwrap();
        s.complete_section(SectionId::Examples).unwrap();
        assert!(s.reveal().is_err());

        s.complete_section(SectionId::Response).unwrap();
        s.select_answer(1).unwrap();
        assert!(s.reveal().unwrap().is_correct);
    }

    #[test]
    fn quiz_section_cannot_be_acknowledged_by_hand() {
        let mut s = session();
        unlock_quiz(&mut s);
        assert!(matches!(
            s.complete_section(SectionId::Quiz),
            Err(SessionError::QuizNotFinished)
        ));
    }

    #[test]
    fn finishing_records_first_result_and_completes_quiz_section() {
        let mut s = session();
        unlock_quiz(&mut s);

        let QuizStep::Finished { result, attempt } = s.finish_quiz(fixed_now()).unwrap() else {
            panic!("finish should finalize");
        };
        assert_eq!(attempt, Attempted::First);
        assert_eq!(result.score(), 0);
        assert!(s.tracker().is_completed(SectionId::Quiz));
        assert!(s.tracker().is_finished());
        assert!(s.needs_persist());
        assert_eq!(s.result(), Some(&result));
    }

    #[test]
    fn retake_keeps_the_recorded_result() {
        let mut s = session();
        unlock_quiz(&mut s);
        s.finish_quiz(fixed_now()).unwrap();
        let first = s.result().cloned().unwrap();

        s.restart_quiz().unwrap();
        s.select_answer(1).unwrap();
        let step = s.finish_quiz(fixed_now()).unwrap();
        let QuizStep::Finished { result, attempt } = step else {
            panic!("finish should finalize");
        };
        assert_eq!(attempt, Attempted::Retake);
        assert_eq!(result.score(), 1);
        assert_eq!(s.result(), Some(&first));
    }
}
