use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use storage::repository::{ResultId, ResultRepository, StoredResult};
use training_core::model::{Organization, percentage};

use super::export::{export_file_name, render_csv};
use crate::Clock;
use crate::error::{AdminError, ExportError};

/// Aggregates over every stored result.
///
/// `average_score` is the mean raw score rounded to two decimals;
/// `pass_rate` is the rounded share of passing results in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdminStats {
    pub total: usize,
    pub average_score: f64,
    pub pass_rate: u32,
}

impl AdminStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_results(results: &[StoredResult]) -> Self {
        if results.is_empty() {
            return Self {
                total: 0,
                average_score: 0.0,
                pass_rate: 0,
            };
        }
        let total = results.len();
        let score_sum: u64 = results.iter().map(|r| u64::from(r.result.score())).sum();
        let passed = results.iter().filter(|r| r.result.is_passed()).count();

        let average_score = (score_sum as f64 / total as f64 * 100.0).round() / 100.0;
        let pass_rate = percentage(
            u32::try_from(passed).unwrap_or(u32::MAX),
            u32::try_from(total).unwrap_or(u32::MAX),
        );
        Self {
            total,
            average_score,
            pass_rate,
        }
    }
}

/// Presentation-agnostic row of the admin result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultListItem {
    pub id: ResultId,
    pub full_name: String,
    pub organization: Organization,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
}

impl ResultListItem {
    #[must_use]
    pub fn from_stored(stored: &StoredResult) -> Self {
        let result = &stored.result;
        Self {
            id: stored.id,
            full_name: result.identity().full_name(),
            organization: result.identity().organization(),
            score: result.score(),
            total_questions: result.total_questions(),
            percentage: result.percentage(),
            passed: result.is_passed(),
            completed_at: result.completed_at(),
        }
    }
}

/// A written export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub path: PathBuf,
    pub rows: usize,
}

/// Read-only views over stored results plus the destructive clear.
///
/// Routing to this service is not an access-control boundary.
#[derive(Clone)]
pub struct AdminService {
    clock: Clock,
    results: Arc<dyn ResultRepository>,
}

impl AdminService {
    #[must_use]
    pub fn new(clock: Clock, results: Arc<dyn ResultRepository>) -> Self {
        Self { clock, results }
    }

    /// # Errors
    ///
    /// Returns `AdminError::Storage` if results cannot be loaded.
    pub async fn list(&self) -> Result<Vec<ResultListItem>, AdminError> {
        let rows = self.results.list_results().await?;
        Ok(rows.iter().map(ResultListItem::from_stored).collect())
    }

    /// # Errors
    ///
    /// Returns `AdminError::Storage` if results cannot be loaded.
    pub async fn stats(&self) -> Result<AdminStats, AdminError> {
        let rows = self.results.list_results().await?;
        Ok(AdminStats::from_results(&rows))
    }

    /// Delete every stored result. `confirmed` must be true.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotConfirmed` without confirmation, or the storage failure.
    pub async fn clear(&self, confirmed: bool) -> Result<u64, AdminError> {
        if !confirmed {
            return Err(AdminError::NotConfirmed);
        }
        let removed = self.results.clear_results().await?;
        tracing::info!(removed, "stored results cleared");
        Ok(removed)
    }

    /// Build the export body. `None` when there is nothing to export.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` if results cannot be loaded.
    pub async fn export_csv(&self) -> Result<Option<String>, AdminError> {
        let rows = self.results.list_results().await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(render_csv(&rows)))
    }

    /// Write the export into `dir` under the dated file name.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::NothingToExport` (wrapped) when the store is
    /// empty, in which case no file is created, or the storage/I/O failure.
    pub async fn export_to_dir(&self, dir: &Path) -> Result<CsvExport, AdminError> {
        let rows = self.results.list_results().await?;
        if rows.is_empty() {
            tracing::info!("export skipped, no stored results");
            return Err(ExportError::NothingToExport.into());
        }

        let path = dir.join(export_file_name(self.clock.now()));
        let body = render_csv(&rows);
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| ExportError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), rows = rows.len(), "results exported");
        Ok(CsvExport {
            path,
            rows: rows.len(),
        })
    }
}
