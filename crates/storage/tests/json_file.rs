use storage::json_file::JsonFileRepository;
use storage::repository::{ResultRepository, StorageError};
use training_core::catalog::reference_questions;
use training_core::model::{Identity, Organization, QuizResult};
use training_core::time::{Clock, fixed_now};

fn perfect(first: &str) -> QuizResult {
    let questions = reference_questions();
    let answers = questions.iter().map(|q| Some(q.correct_option())).collect();
    let identity = Identity::new(first, "Lee", Organization::C2s).unwrap();
    QuizResult::grade(identity, &questions, answers, fixed_now()).unwrap()
}

#[tokio::test]
async fn missing_file_is_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("quiz-results.json"));
    assert!(repo.list_results().await.unwrap().is_empty());
    assert_eq!(repo.clear_results().await.unwrap(), 0);
}

#[tokio::test]
async fn appends_survive_a_new_handle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("quiz-results.json");

    let repo = JsonFileRepository::new(&path).with_clock(Clock::fixed(fixed_now()));
    assert_eq!(repo.append_result(&perfect("Ana")).await.unwrap(), 1);
    assert_eq!(repo.append_result(&perfect("Bob")).await.unwrap(), 2);

    let reopened = JsonFileRepository::new(&path);
    let rows = reopened.list_results().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].result.identity().first_name(), "Ana");
    assert_eq!(rows[1].id, 2);
    assert_eq!(rows[1].stored_at, fixed_now());

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"firstName\": \"Ana\""));
    assert!(raw.contains("\"totalQuestions\": 15"));
}

#[tokio::test]
async fn clear_then_list_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("r.json"));
    repo.append_result(&perfect("Ana")).await.unwrap();
    repo.append_result(&perfect("Bob")).await.unwrap();

    assert_eq!(repo.clear_results().await.unwrap(), 2);
    assert!(repo.list_results().await.unwrap().is_empty());
    assert!(!repo.path().exists());
}

#[tokio::test]
async fn corrupt_file_is_reported_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.json");
    std::fs::write(&path, "{not json").unwrap();

    let repo = JsonFileRepository::new(&path);
    let err = repo.append_result(&perfect("Ana")).await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
}

#[tokio::test]
async fn clear_removes_a_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.json");
    std::fs::write(&path, "{not json").unwrap();

    let repo = JsonFileRepository::new(&path);
    assert_eq!(repo.clear_results().await.unwrap(), 0);
    assert!(!path.exists());
    assert!(repo.list_results().await.unwrap().is_empty());
    assert_eq!(repo.append_result(&perfect("Ana")).await.unwrap(), 1);
}
