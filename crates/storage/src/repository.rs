use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use training_core::model::{Identity, OptionIndex, QuizResult};
use training_core::time::Clock;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Storage identifier for a persisted result.
pub type ResultId = i64;

/// Flat persisted shape of a quiz result, one per completed attempt.
///
/// Field names match the exported JSON (`firstName`, `completedAt`, ...).
/// `None` in `answers` is an unanswered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultRecord {
    pub id: ResultId,
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<Option<OptionIndex>>,
    pub completed_at: DateTime<Utc>,
    pub stored_at: DateTime<Utc>,
}

impl QuizResultRecord {
    #[must_use]
    pub fn from_result(id: ResultId, result: &QuizResult, stored_at: DateTime<Utc>) -> Self {
        let identity = result.identity();
        Self {
            id,
            first_name: identity.first_name().to_owned(),
            last_name: identity.last_name().to_owned(),
            organization: identity.organization().code().to_owned(),
            score: result.score(),
            total_questions: result.total_questions(),
            answers: result.answers().to_vec(),
            completed_at: result.completed_at(),
            stored_at,
        }
    }

    /// Convert the record back into a domain row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if identity or score invariants fail.
    pub fn into_stored(self) -> Result<StoredResult, StorageError> {
        let identity = Identity::parse(&self.first_name, &self.last_name, &self.organization)
            .map_err(ser)?;
        let result = QuizResult::from_persisted(
            identity,
            self.score,
            self.total_questions,
            self.answers,
            self.completed_at,
        )
        .map_err(ser)?;
        Ok(StoredResult {
            id: self.id,
            stored_at: self.stored_at,
            result,
        })
    }
}

/// A result as held by a store: the domain value plus store metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResult {
    pub id: ResultId,
    pub stored_at: DateTime<Utc>,
    pub result: QuizResult,
}

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Repository contract for finalized quiz results.
///
/// Stores keep their own copy; later changes to the caller's value never reach them.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a finalized result and return its store id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, result: &QuizResult) -> Result<ResultId, StorageError>;

    /// All stored results in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn list_results(&self) -> Result<Vec<StoredResult>, StorageError>;

    /// Remove every stored result and return how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be cleared.
    async fn clear_results(&self) -> Result<u64, StorageError>;
}

#[derive(Default)]
struct MemoryState {
    next_id: ResultId,
    rows: Vec<StoredResult>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
    clock: Clock,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source of `stored_at` for appended rows.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &QuizResult) -> Result<ResultId, StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.next_id += 1;
        let id = guard.next_id;
        guard.rows.push(StoredResult {
            id,
            stored_at: self.clock.now(),
            result: result.clone(),
        });
        Ok(id)
    }

    async fn list_results(&self) -> Result<Vec<StoredResult>, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.rows.clone())
    }

    async fn clear_results(&self) -> Result<u64, StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let removed = guard.rows.len() as u64;
        guard.rows.clear();
        Ok(removed)
    }
}

/// Holds the active result repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let results: Arc<dyn ResultRepository> = Arc::new(InMemoryRepository::new());
        Self { results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use training_core::catalog::reference_questions;
    use training_core::model::Organization;
    use training_core::time::fixed_now;

    fn result(first: &str, correct: bool) -> QuizResult {
        let questions = reference_questions();
        let answers = questions
            .iter()
            .map(|q| Some(if correct { q.correct_option() } else { 99 }))
            .collect();
        let identity = Identity::new(first, "Lee", Organization::Jcc).unwrap();
        QuizResult::grade(identity, &questions, answers, fixed_now()).unwrap()
    }

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let repo = InMemoryRepository::new();
        let a = repo.append_result(&result("Ana", true)).await.unwrap();
        let b = repo.append_result(&result("Bob", false)).await.unwrap();
        assert!(a < b);

        let rows = repo.list_results().await.unwrap();
        let names: Vec<_> = rows
            .iter()
            .map(|r| r.result.identity().first_name().to_owned())
            .collect();
        assert_eq!(names, vec!["Ana", "Bob"]);
        assert_eq!(rows[0].result.score(), 15);
        assert_eq!(rows[1].result.score(), 0);
    }

    #[tokio::test]
    async fn stored_at_comes_from_the_clock() {
        let repo = InMemoryRepository::new().with_clock(Clock::fixed(fixed_now()));
        repo.append_result(&result("Ana", true)).await.unwrap();
        assert_eq!(repo.list_results().await.unwrap()[0].stored_at, fixed_now());
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let repo = InMemoryRepository::new();
        repo.append_result(&result("Ana", true)).await.unwrap();
        repo.append_result(&result("Bob", true)).await.unwrap();
        assert_eq!(repo.clear_results().await.unwrap(), 2);
        assert!(repo.list_results().await.unwrap().is_empty());
    }

    #[test]
    fn record_round_trips_through_domain() {
        let original = result("Ana", true);
        let record = QuizResultRecord::from_result(7, &original, fixed_now());
        assert_eq!(record.organization, "JCC");
        let stored = record.into_stored().unwrap();
        assert_eq!(stored.id, 7);
        assert_eq!(stored.result, original);
    }

    #[test]
    fn record_with_inconsistent_score_is_rejected() {
        let mut record = QuizResultRecord::from_result(1, &result("Ana", true), fixed_now());
        record.score = 16;
        assert!(matches!(
            record.into_stored().unwrap_err(),
            StorageError::Serialization(_)
        ));
    }
}
