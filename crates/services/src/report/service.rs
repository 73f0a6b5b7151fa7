use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use training_core::catalog::Curriculum;
use training_core::model::{Identity, QuestionSet, QuizResult};
use training_core::time::date_stamp;

use super::chart::{chart_suffix, svg_chart};
use super::model::{ReportInput, build_report};
use super::render::render_text;
use crate::Clock;
use crate::error::ReportError;
use crate::training::TrainingSession;

/// Files written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub document: PathBuf,
    pub charts: Vec<PathBuf>,
    pub pages: usize,
}

/// Keep letters, digits, `-` and `_`; anything else becomes `_`.
fn file_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `support-formation-anti-phishing-{first}-{last}-{YYYY-MM-DD}`, with the
/// names reduced to characters that are safe in a single path component.
#[must_use]
pub fn report_file_stem(identity: &Identity, at: DateTime<Utc>) -> String {
    format!(
        "support-formation-anti-phishing-{}-{}-{}",
        file_component(identity.first_name()),
        file_component(identity.last_name()),
        date_stamp(at)
    )
}

struct Job {
    identity: Identity,
    result: Option<QuizResult>,
    questions: QuestionSet,
    curriculum: Curriculum,
    assets_dir: Option<PathBuf>,
    out_dir: PathBuf,
    generated_on: DateTime<Utc>,
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Job {
    fn example_images(&self) -> Vec<Option<PathBuf>> {
        self.curriculum
            .examples()
            .iter()
            .map(|example| {
                let dir = self.assets_dir.as_ref()?;
                let path = dir.join(example.image);
                if path.is_file() {
                    Some(path)
                } else {
                    tracing::debug!(path = %path.display(), "example image missing");
                    None
                }
            })
            .collect()
    }

    fn run(self) -> Result<GeneratedReport, ReportError> {
        let images = self.example_images();
        let report = build_report(&ReportInput {
            identity: &self.identity,
            result: self.result.as_ref(),
            questions: &self.questions,
            curriculum: &self.curriculum,
            example_images: &images,
            generated_on: self.generated_on,
        })?;

        std::fs::create_dir_all(&self.out_dir).map_err(io_err(&self.out_dir))?;
        let stem = report_file_stem(&self.identity, self.generated_on);

        let document = self.out_dir.join(format!("{stem}.txt"));
        std::fs::write(&document, render_text(&report)).map_err(io_err(&document))?;

        let mut charts = Vec::new();
        for chart in report.charts() {
            let path = self
                .out_dir
                .join(format!("{stem}-{}.svg", chart_suffix(chart)));
            std::fs::write(&path, svg_chart(chart)).map_err(io_err(&path))?;
            charts.push(path);
        }

        Ok(GeneratedReport {
            document,
            charts,
            pages: report.page_count(),
        })
    }
}

/// Writes training reports. Never touches the session it reads from.
#[derive(Debug, Clone, Default)]
pub struct ReportService {
    clock: Clock,
    assets_dir: Option<PathBuf>,
}

impl ReportService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            assets_dir: None,
        }
    }

    /// Directory holding the example screenshots.
    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    /// Generate the report for the session's learner and recorded result.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if the result does not match the questions or a
    /// file cannot be written. The session is unaffected either way.
    pub async fn generate(
        &self,
        session: &TrainingSession,
        out_dir: &Path,
    ) -> Result<GeneratedReport, ReportError> {
        self.generate_for(
            session.identity(),
            session.result(),
            session.questions(),
            session.curriculum(),
            out_dir,
        )
        .await
    }

    /// Generate a report from explicit inputs.
    ///
    /// # Errors
    ///
    /// Same contract as `generate`.
    pub async fn generate_for(
        &self,
        identity: &Identity,
        result: Option<&QuizResult>,
        questions: &QuestionSet,
        curriculum: &Curriculum,
        out_dir: &Path,
    ) -> Result<GeneratedReport, ReportError> {
        let job = Job {
            identity: identity.clone(),
            result: result.cloned(),
            questions: questions.clone(),
            curriculum: *curriculum,
            assets_dir: self.assets_dir.clone(),
            out_dir: out_dir.to_path_buf(),
            generated_on: self.clock.now(),
        };

        let outcome = tokio::task::spawn_blocking(move || job.run())
            .await
            .map_err(|e| ReportError::Join(e.to_string()))?;

        match &outcome {
            Ok(report) => tracing::info!(
                path = %report.document.display(),
                pages = report.pages,
                "training report written"
            ),
            Err(err) => tracing::warn!(error = %err, "training report failed"),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use training_core::model::Organization;
    use training_core::time::fixed_now;

    #[test]
    fn stem_keeps_accents_and_drops_separators() {
        let identity = Identity::new("Anaïs", "../../Lee Ray", Organization::C2s).unwrap();
        assert_eq!(
            report_file_stem(&identity, fixed_now()),
            "support-formation-anti-phishing-Anaïs-______Lee_Ray-2023-11-14"
        );
    }
}
