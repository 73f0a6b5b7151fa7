use std::sync::Arc;

use services::report::{IMAGE_PLACEHOLDER, PAGE_BREAK, PASSED_STATUS};
use services::{Clock, ReportError, ReportService, TrainingLoopService};
use storage::repository::InMemoryRepository;
use training_core::model::SectionId;
use training_core::time::fixed_now;

fn service() -> TrainingLoopService {
    TrainingLoopService::new(Clock::fixed(fixed_now()), Arc::new(InMemoryRepository::new()))
}

#[tokio::test]
async fn report_without_quiz_has_no_charts() {
    let dir = tempfile::tempdir().unwrap();
    let session = service().start("Ana", "Lee", "C2S").unwrap();

    let report = ReportService::new(Clock::fixed(fixed_now()))
        .generate(&session, dir.path())
        .await
        .unwrap();

    assert!(report.charts.is_empty());
    assert_eq!(
        report.document.file_name().unwrap(),
        "support-formation-anti-phishing-Ana-Lee-2023-11-14.txt"
    );
    let text = std::fs::read_to_string(&report.document).unwrap();
    assert_eq!(text.matches(PAGE_BREAK).count() + 1, report.pages);
    assert!(text.contains(IMAGE_PLACEHOLDER));
    assert!(text.contains(&format!("Ana Lee - Page {0}/{0}", report.pages)));
}

#[tokio::test]
async fn report_after_quiz_writes_both_charts() {
    let dir = tempfile::tempdir().unwrap();
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("exemple 2.JPG"), b"jpeg").unwrap();

    let svc = service();
    let mut session = svc.start("Ana", "Lee", "JCC").unwrap();
    for section in &SectionId::ALL[..4] {
        session.complete_section(*section).unwrap();
    }
    for i in 0..session.questions().total() {
        let correct = session.questions()[i].correct_option();
        session.select_answer(correct).unwrap();
        session.reveal().unwrap();
        svc.advance(&mut session).await.unwrap();
    }
    let before = session.result().cloned();

    let report = ReportService::new(Clock::fixed(fixed_now()))
        .with_assets_dir(assets.path())
        .generate(&session, dir.path())
        .await
        .unwrap();

    assert_eq!(report.charts.len(), 2);
    for chart in &report.charts {
        let svg = std::fs::read_to_string(chart).unwrap();
        assert!(svg.starts_with("<svg"));
    }
    let text = std::fs::read_to_string(&report.document).unwrap();
    assert!(text.contains(PASSED_STATUS));
    assert!(text.contains("Formation Anti-Phishing - JCC"));
    assert!(text.contains("exemple 2.JPG"));
    // four of the five screenshots are missing
    assert_eq!(text.matches(IMAGE_PLACEHOLDER).count(), 4);
    assert_eq!(session.result().cloned(), before);
}

#[tokio::test]
async fn unwritable_target_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();
    let session = service().start("Ana", "Lee", "C2S").unwrap();

    let err = ReportService::new(Clock::fixed(fixed_now()))
        .generate(&session, &blocker)
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
    assert!(session.result().is_none());
}

#[tokio::test]
async fn names_with_path_separators_stay_inside_the_target() {
    let dir = tempfile::tempdir().unwrap();
    let session = service().start("Ana/Maria", "../../escaped", "C2S").unwrap();

    let report = ReportService::new(Clock::fixed(fixed_now()))
        .generate(&session, dir.path())
        .await
        .unwrap();

    assert_eq!(report.document.parent(), Some(dir.path()));
    assert_eq!(
        report.document.file_name().unwrap(),
        "support-formation-anti-phishing-Ana_Maria-______escaped-2023-11-14.txt"
    );
    assert!(report.document.is_file());
}
