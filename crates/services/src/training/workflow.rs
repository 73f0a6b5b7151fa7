use std::sync::Arc;
use std::time::Duration;

use storage::repository::{ResultId, ResultRepository};
use training_core::catalog::{Curriculum, reference_questions};
use training_core::model::{Identity, QuestionSet, QuizResult};

use super::session::{Attempted, QuizStep, TrainingSession};
use crate::Clock;
use crate::error::SessionError;

/// Default bound on a single persistence call.
pub const DEFAULT_PERSIST_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrates session start and persisted quiz finalization.
#[derive(Clone)]
pub struct TrainingLoopService {
    clock: Clock,
    results: Arc<dyn ResultRepository>,
    questions: QuestionSet,
    curriculum: Curriculum,
    persist_timeout: Duration,
}

impl TrainingLoopService {
    #[must_use]
    pub fn new(clock: Clock, results: Arc<dyn ResultRepository>) -> Self {
        Self {
            clock,
            results,
            questions: reference_questions(),
            curriculum: Curriculum::reference(),
            persist_timeout: DEFAULT_PERSIST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_questions(mut self, questions: QuestionSet) -> Self {
        self.questions = questions;
        self
    }

    #[must_use]
    pub fn with_persist_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout = timeout;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    /// Validate raw identity fields and open a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Identity` for empty names or an unknown
    /// organization. No session exists in that case.
    pub fn start(
        &self,
        first_name: &str,
        last_name: &str,
        organization: &str,
    ) -> Result<TrainingSession, SessionError> {
        let identity = Identity::parse(first_name, last_name, organization)?;
        Ok(self.start_with(identity))
    }

    #[must_use]
    pub fn start_with(&self, identity: Identity) -> TrainingSession {
        tracing::info!(
            learner = %identity.full_name(),
            organization = %identity.organization(),
            "training session started"
        );
        TrainingSession::new(identity, self.questions.clone(), self.curriculum)
    }

    /// Advance past the revealed question; persist the result when this
    /// finalizes the session's first attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for invalid transitions. A persistence failure
    /// is returned after the result has been recorded in the session, so the
    /// caller may retry with `persist_pending`.
    pub async fn advance(&self, session: &mut TrainingSession) -> Result<QuizStep, SessionError> {
        let step = session.advance(self.clock.now())?;
        self.persist_if_first(session, &step).await?;
        Ok(step)
    }

    /// Finalize the running attempt now and persist it if it is the first.
    ///
    /// # Errors
    ///
    /// Same contract as `advance`.
    pub async fn finish(&self, session: &mut TrainingSession) -> Result<QuizStep, SessionError> {
        let step = session.finish_quiz(self.clock.now())?;
        self.persist_if_first(session, &step).await?;
        Ok(step)
    }

    /// Retry persisting the recorded result. Returns the existing id if it
    /// was already stored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToPersist` without a recorded result, or
    /// the storage failure.
    pub async fn persist_pending(
        &self,
        session: &mut TrainingSession,
    ) -> Result<ResultId, SessionError> {
        if let Some(id) = session.stored_id() {
            return Ok(id);
        }
        let result = session.result().cloned().ok_or(SessionError::NothingToPersist)?;
        let id = self.persist(&result).await?;
        session.mark_stored(id);
        Ok(id)
    }

    async fn persist_if_first(
        &self,
        session: &mut TrainingSession,
        step: &QuizStep,
    ) -> Result<(), SessionError> {
        match step {
            QuizStep::Finished {
                attempt: Attempted::First,
                ..
            } => self.persist_pending(session).await.map(|_| ()),
            QuizStep::Finished {
                attempt: Attempted::Retake,
                result,
            } => {
                tracing::debug!(score = result.score(), "retake finalized, not stored");
                Ok(())
            }
            QuizStep::Next(_) => Ok(()),
        }
    }

    async fn persist(&self, result: &QuizResult) -> Result<ResultId, SessionError> {
        let outcome = tokio::time::timeout(self.persist_timeout, self.results.append_result(result))
            .await;
        match outcome {
            Ok(Ok(id)) => {
                tracing::info!(
                    id,
                    score = result.score(),
                    total = result.total_questions(),
                    passed = result.is_passed(),
                    "quiz result stored"
                );
                Ok(id)
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "failed to store quiz result");
                Err(err.into())
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.persist_timeout, "storing quiz result timed out");
                Err(SessionError::PersistTimeout(self.persist_timeout))
            }
        }
    }
}
