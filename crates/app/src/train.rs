//! Terminal rendition of the learner flow.

use std::error::Error;
use std::path::Path;

use services::{ReportService, SessionError, TrainingLoopService, TrainingSession};
use tokio::io::{AsyncBufRead, AsyncWrite};
use training_core::catalog::{Block, Curriculum};
use training_core::model::SectionId;

use crate::terminal::Terminal;

fn block_lines(blocks: &[Block]) -> Vec<String> {
    let mut out = Vec::new();
    for block in blocks {
        match block {
            Block::Heading(text) => out.push(format!("\n## {text}")),
            Block::Paragraph(text) => out.push((*text).to_owned()),
            Block::Bullets(items) => out.extend(items.iter().map(|i| format!("  • {i}"))),
            Block::Steps(steps) => out.extend(
                steps
                    .iter()
                    .enumerate()
                    .map(|(n, s)| format!("  {}. {} : {}", n + 1, s.title, s.description)),
            ),
            Block::Callout { title, body } => out.push(format!("  [{title}] {body}")),
            Block::SenderComparison { legitimate, forged } => {
                out.push(format!("  Email légitime   : {legitimate}"));
                out.push(format!("  Email frauduleux : {forged}"));
            }
        }
    }
    out
}

async fn show_section<R, W>(
    term: &mut Terminal<R, W>,
    curriculum: &Curriculum,
    section: SectionId,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    term.say(&format!(
        "\n=== {section} ({} min) ===",
        section.duration_minutes()
    ))
    .await?;
    if let Some(content) = curriculum.section(section) {
        for line in block_lines(content.blocks) {
            term.say(&line).await?;
        }
    }

    if section == SectionId::Examples {
        for (n, example) in curriculum.examples().iter().enumerate() {
            term.say(&format!("\n-- Exemple {} : {} --", n + 1, example.title))
                .await?;
            term.say(&format!("  Expéditeur : {}", example.sender)).await?;
            term.say(&format!("  Lien       : {}", example.link)).await?;
            term.say(&format!("  {}", example.explanation)).await?;
        }
        for email in curriculum.sample_emails() {
            term.say(&format!(
                "\nDe : {}\nObjet : {}\n\n{}\n",
                email.from, email.subject, email.body
            ))
            .await?;
            let verdict = term.confirm("Cet email est-il du phishing ?").await?;
            let label = if verdict == email.is_phishing {
                "Bonne analyse !"
            } else {
                "Attention !"
            };
            term.say(&format!("{label} {}", email.explanation)).await?;
        }
    }
    Ok(())
}

async fn retry_persist<R, W>(
    term: &mut Terminal<R, W>,
    svc: &TrainingLoopService,
    session: &mut TrainingSession,
    err: &SessionError,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    term.say(&format!("Sauvegarde du résultat impossible : {err}"))
        .await?;
    while session.needs_persist() && term.confirm("Réessayer la sauvegarde ?").await? {
        match svc.persist_pending(session).await {
            Ok(_) => term.say("Résultat sauvegardé.").await?,
            Err(err) => term.say(&format!("Échec : {err}")).await?,
        }
    }
    Ok(())
}

/// Route a failed quiz transition: storage failures offer a retry, invalid
/// transitions are shown, anything else is returned.
async fn settle<R, W>(
    term: &mut Terminal<R, W>,
    svc: &TrainingLoopService,
    session: &mut TrainingSession,
    outcome: Result<(), SessionError>,
) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match outcome {
        Ok(()) => Ok(()),
        Err(err) if err.is_persistence_failure() => {
            retry_persist(term, svc, session, &err).await?;
            Ok(())
        }
        Err(SessionError::Quiz(err)) => {
            term.say(&err.to_string()).await?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn run_quiz<R, W>(
    term: &mut Terminal<R, W>,
    svc: &TrainingLoopService,
    session: &mut TrainingSession,
) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    term.say(&format!("\n=== {} ===", SectionId::Quiz)).await?;
    while let Some(question) = session.quiz().current_question().cloned() {
        let progress = session.quiz().progress();
        term.say(&format!(
            "\nQuestion {}/{} : {}",
            progress.position,
            progress.total,
            question.prompt()
        ))
        .await?;
        for (n, option) in question.options().iter().enumerate() {
            term.say(&format!("  {}. {option}", n + 1)).await?;
        }

        let count = question.options().len();
        let choice = loop {
            let raw = term
                .ask(&format!("Votre réponse (1-{count}, f pour terminer) :"))
                .await?;
            if raw.eq_ignore_ascii_case("f") {
                break None;
            }
            match raw.parse::<u32>() {
                Ok(n) if (1..=count).contains(&(n as usize)) => break Some(n - 1),
                _ => term.say("Choix invalide.").await?,
            }
        };

        let Some(choice) = choice else {
            let outcome = svc.finish(session).await.map(|_| ());
            settle(term, svc, session, outcome).await?;
            break;
        };

        session.select_answer(choice)?;
        let feedback = session.reveal()?;
        let verdict = if feedback.is_correct {
            "Correct !"
        } else {
            "Incorrect."
        };
        term.say(&format!("{verdict} {}", feedback.explanation)).await?;
        let score = session.quiz().running_score();
        term.say(&format!("Score : {}/{}", score.correct, score.revealed))
            .await?;
        term.ask("Entrée pour continuer").await?;

        let outcome = svc.advance(session).await.map(|_| ());
        settle(term, svc, session, outcome).await?;
    }

    if let Some(result) = session.quiz().result() {
        term.say(&format!(
            "\nQuiz terminé ! {}/{} ({}%)",
            result.score(),
            result.total_questions(),
            result.percentage()
        ))
        .await?;
        let message = if result.is_passed() {
            services::report::PASSED_MESSAGE
        } else {
            services::report::FAILED_MESSAGE
        };
        term.say(message).await?;
    }
    Ok(())
}

/// Full learner flow: identity, sections 1-4, quiz, optional retakes and report.
pub async fn run_training<R, W>(
    term: &mut Terminal<R, W>,
    svc: &TrainingLoopService,
    reports: &ReportService,
    report_dir: &Path,
) -> Result<TrainingSession, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    term.say("Formation Anti-Phishing").await?;
    let mut session = loop {
        let first = term.ask("Prénom :").await?;
        let last = term.ask("Nom :").await?;
        let organization = term.ask("Entreprise (C2S/JCC) :").await?;
        match svc.start(&first, &last, &organization) {
            Ok(session) => break session,
            Err(err) => term.say(&format!("Erreur : {err}")).await?,
        }
    };

    let curriculum = *session.curriculum();
    for section in &SectionId::ALL[..4] {
        show_section(term, &curriculum, *section).await?;
        term.ask("Entrée pour terminer la section").await?;
        session.complete_section(*section)?;
        term.say(&format!(
            "Progression : {}/{} sections",
            session.tracker().completed_count(),
            SectionId::ALL.len()
        ))
        .await?;
    }

    loop {
        run_quiz(term, svc, &mut session).await?;
        if !term.confirm("Recommencer le quiz ?").await? {
            break;
        }
        term.say("Seul le premier résultat est conservé.").await?;
        session.restart_quiz()?;
    }

    if term.confirm("Générer le support de formation ?").await? {
        match reports.generate(&session, report_dir).await {
            Ok(report) => {
                term.say(&format!("Support écrit : {}", report.document.display()))
                    .await?;
            }
            Err(err) => {
                term.say(&format!(
                    "Erreur lors de la génération du support : {err}. Veuillez réessayer."
                ))
                .await?;
            }
        }
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use services::Clock;
    use storage::repository::{InMemoryRepository, ResultRepository};
    use training_core::catalog::reference_questions;
    use training_core::time::fixed_now;

    fn script(answers: impl Fn(usize, u32) -> String, tail: &str) -> String {
        // identity, sections 1-2, two sample emails in section 3, section 3, section 4
        let mut input = String::from("Ana\nLee\nc2s\n\n\nn\no\n\n\n");
        for (i, q) in reference_questions().iter().enumerate() {
            input.push_str(&answers(i, q.correct_option()));
        }
        input.push_str(tail);
        input
    }

    async fn play(input: &str) -> (TrainingSession, Arc<InMemoryRepository>, String) {
        let repo = Arc::new(InMemoryRepository::new());
        let svc = TrainingLoopService::new(Clock::fixed(fixed_now()), repo.clone());
        let reports = ReportService::new(Clock::fixed(fixed_now()));
        let mut term = Terminal::new(input.as_bytes(), Vec::new());
        let session = run_training(&mut term, &svc, &reports, Path::new("unused"))
            .await
            .unwrap();
        let out = String::from_utf8(term.into_output()).unwrap();
        (session, repo, out)
    }

    #[tokio::test]
    async fn scripted_perfect_run_is_stored() {
        let input = script(|_, c| format!("{}\n\n", c + 1), "n\nn\n");
        let (session, repo, out) = play(&input).await;

        assert_eq!(session.result().map(|r| r.score()), Some(15));
        assert!(session.tracker().is_finished());
        assert_eq!(repo.list_results().await.unwrap().len(), 1);
        assert!(out.contains("Quiz terminé ! 15/15 (100%)"));
        assert!(out.contains(services::report::PASSED_MESSAGE));
    }

    #[tokio::test]
    async fn invalid_identity_is_asked_again() {
        let input = format!(
            " \nLee\nC2S\n{}",
            script(|_, c| format!("{}\n\n", c + 1), "n\nn\n")
        );
        let (session, _, out) = play(&input).await;
        assert!(out.contains("Erreur"));
        assert_eq!(session.identity().first_name(), "Ana");
    }

    #[tokio::test]
    async fn finishing_early_counts_the_rest_wrong() {
        let mut input = String::from("Ana\nLee\nJCC\n\n\nn\no\n\n\n");
        input.push_str("9\n2\n\n");
        input.push_str("f\nn\nn\n");
        let (session, repo, out) = play(&input).await;

        assert!(out.contains("Choix invalide."));
        let result = session.result().unwrap();
        assert_eq!(result.score(), 1);
        assert_eq!(result.answers()[1], None);
        assert!(!result.is_passed());
        assert_eq!(repo.list_results().await.unwrap()[0].result.score(), 1);
    }
}
