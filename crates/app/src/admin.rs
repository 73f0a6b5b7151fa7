use std::error::Error;
use std::path::PathBuf;

use clap::Subcommand;
use services::{AdminError, AdminService, ExportError};

/// Administration of stored results. Routing here is not access control.
#[derive(Debug, Clone, Subcommand)]
pub enum AdminCommand {
    /// Participants, average score and pass rate
    Stats,
    /// Every stored result in insertion order
    List,
    /// Write all results as CSV
    Export {
        /// Target directory, defaults to the report directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete every stored result
    Clear {
        /// Confirm the irreversible deletion
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run_admin(
    admin: &AdminService,
    command: AdminCommand,
    report_dir: PathBuf,
) -> Result<(), Box<dyn Error>> {
    match command {
        AdminCommand::Stats => {
            let stats = admin.stats().await?;
            println!("Participants      : {}", stats.total);
            println!("Score moyen       : {}", stats.average_score);
            println!("Taux de réussite  : {}%", stats.pass_rate);
        }
        AdminCommand::List => {
            let items = admin.list().await?;
            if items.is_empty() {
                println!("Aucun résultat de quiz disponible");
            }
            for item in items {
                println!(
                    "{:>4}  {:<30} {:<4} {:>2}/{:<2} {:>3}%  {}  {}",
                    item.id,
                    item.full_name,
                    item.organization,
                    item.score,
                    item.total_questions,
                    item.percentage,
                    item.completed_at.format("%d/%m/%Y %H:%M"),
                    if item.passed { "Réussi" } else { "Échec" }
                );
            }
        }
        AdminCommand::Export { out } => {
            let dir = out.unwrap_or(report_dir);
            match admin.export_to_dir(&dir).await {
                Ok(export) => println!(
                    "{} résultat(s) exporté(s) vers {}",
                    export.rows,
                    export.path.display()
                ),
                Err(AdminError::Export(ExportError::NothingToExport)) => {
                    println!("{}", ExportError::NothingToExport);
                }
                Err(err) => return Err(err.into()),
            }
        }
        AdminCommand::Clear { yes } => {
            if !yes {
                eprintln!(
                    "Cette action est irréversible. Relancez avec --yes pour supprimer tous les résultats."
                );
                return Ok(());
            }
            let removed = admin.clear(yes).await?;
            println!("{removed} résultat(s) supprimé(s)");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use services::Clock;
    use storage::repository::{InMemoryRepository, ResultRepository};
    use training_core::catalog::reference_questions;
    use training_core::model::{Identity, Organization, QuizResult};
    use training_core::time::fixed_now;

    async fn admin_with_one_result() -> (AdminService, Arc<InMemoryRepository>) {
        let questions = reference_questions();
        let answers = questions.iter().map(|q| Some(q.correct_option())).collect();
        let identity = Identity::new("Ana", "Lee", Organization::C2s).unwrap();
        let result = QuizResult::grade(identity, &questions, answers, fixed_now()).unwrap();
        let repo = Arc::new(InMemoryRepository::new());
        repo.append_result(&result).await.unwrap();
        (AdminService::new(Clock::fixed(fixed_now()), repo.clone()), repo)
    }

    #[tokio::test]
    async fn clear_without_yes_succeeds_and_keeps_results() {
        let (admin, repo) = admin_with_one_result().await;
        run_admin(&admin, AdminCommand::Clear { yes: false }, PathBuf::from("."))
            .await
            .unwrap();
        assert_eq!(repo.list_results().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_with_yes_empties_the_store() {
        let (admin, repo) = admin_with_one_result().await;
        run_admin(&admin, AdminCommand::Clear { yes: true }, PathBuf::from("."))
            .await
            .unwrap();
        assert!(repo.list_results().await.unwrap().is_empty());
    }
}
