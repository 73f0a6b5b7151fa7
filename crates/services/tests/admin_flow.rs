use std::sync::Arc;

use services::{AdminError, AdminService, Clock, ExportError};
use storage::json_file::JsonFileRepository;
use storage::repository::{InMemoryRepository, ResultRepository};
use training_core::catalog::reference_questions;
use training_core::model::{Identity, Organization, QuizResult};
use training_core::time::fixed_now;

fn graded(first: &str, correct: usize) -> QuizResult {
    graded_as(first, "Lee", correct)
}

fn graded_as(first: &str, last: &str, correct: usize) -> QuizResult {
    let questions = reference_questions();
    let answers = questions
        .iter()
        .enumerate()
        .map(|(i, q)| (i < correct).then(|| q.correct_option()))
        .collect();
    let identity = Identity::new(first, last, Organization::C2s).unwrap();
    QuizResult::grade(identity, &questions, answers, fixed_now()).unwrap()
}

/// Split one CSV record on commas outside double quotes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = vec![String::new()];
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                fields.last_mut().unwrap().push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(String::new()),
            c => fields.last_mut().unwrap().push(c),
        }
    }
    fields
}

#[tokio::test]
async fn clearing_two_results_leaves_an_empty_list() {
    let repo = Arc::new(InMemoryRepository::new());
    repo.append_result(&graded("Ana", 15)).await.unwrap();
    repo.append_result(&graded("Bob", 9)).await.unwrap();
    let admin = AdminService::new(Clock::fixed(fixed_now()), repo);

    assert_eq!(admin.stats().await.unwrap().total, 2);
    assert_eq!(admin.clear(true).await.unwrap(), 2);
    assert!(admin.list().await.unwrap().is_empty());
    assert_eq!(admin.stats().await.unwrap().total, 0);
}

#[tokio::test]
async fn export_with_no_results_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let admin = AdminService::new(
        Clock::fixed(fixed_now()),
        Arc::new(InMemoryRepository::new()),
    );

    let err = admin.export_to_dir(dir.path()).await.unwrap_err();
    assert!(matches!(err, AdminError::Export(ExportError::NothingToExport)));
    assert_eq!(err.to_string(), "Aucun résultat à exporter");
    assert!(admin.export_csv().await.unwrap().is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn exported_percentages_parse_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("quiz-results.json");
    let repo = Arc::new(JsonFileRepository::new(&store));
    let scores = [15_usize, 14, 10, 1, 8];
    let names = [
        ("Ana", "Lee, Jr."),
        ("Bob \"B\"", "Ray"),
        ("L2", "Lee"),
        ("L3", "Lee"),
        ("L4", "Lee"),
    ];
    for ((first, last), score) in names.iter().zip(scores) {
        repo.append_result(&graded_as(first, last, score)).await.unwrap();
    }
    let admin = AdminService::new(Clock::fixed(fixed_now()), repo);

    let export = admin.export_to_dir(&dir.path().join("out")).await.unwrap();
    assert_eq!(export.rows, scores.len());
    assert!(
        export
            .path
            .ends_with("out/resultats-quiz-phishing-2023-11-14.csv")
    );

    let body = std::fs::read_to_string(&export.path).unwrap();
    let body = body.strip_prefix('\u{feff}').unwrap();
    let mut lines = body.split('\n');
    assert_eq!(
        lines.next().unwrap(),
        "Prénom,Nom,Score,Total Questions,Pourcentage,Date de completion,Détail des réponses"
    );

    let records: Vec<Vec<String>> = lines.map(split_record).collect();
    assert!(records.iter().all(|r| r.len() == 7));
    assert_eq!(records[0][1], "Lee, Jr.");
    assert_eq!(records[1][0], "Bob \"B\"");

    let percents: Vec<u32> = records
        .iter()
        .map(|r| r[4].trim_end_matches('%').parse().unwrap())
        .collect();
    assert_eq!(percents, vec![100, 93, 67, 7, 53]);
}
