use std::path::PathBuf;

use chrono::{DateTime, Utc};

use training_core::catalog::{Block, Curriculum, PhishingExample};
use training_core::model::{Identity, QuestionSet, QuizResult, SectionId};

use crate::error::ReportError;

/// Placeholder printed where an example screenshot cannot be found.
pub const IMAGE_PLACEHOLDER: &str = "[Image de l'exemple de phishing]";

pub const PASSED_STATUS: &str = "FORMATION REUSSIE";
pub const FAILED_STATUS: &str = "A AMELIORER";

pub const PASSED_MESSAGE: &str = "Félicitations ! Vous maîtrisez bien les concepts de sécurité anti-phishing. Continuez à appliquer ces bonnes pratiques au quotidien.";
pub const FAILED_MESSAGE: &str = "Nous recommandons de revoir la formation pour améliorer vos connaissances. La sécurité informatique est l'affaire de tous.";

//
// ─── DOCUMENT MODEL ────────────────────────────────────────────────────────────
//

/// Which chart a page embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chart {
    /// Correct vs incorrect share of the whole quiz.
    Proportion { correct: u32, incorrect: u32 },
    /// One bar per question, in question order.
    PerQuestion(Vec<bool>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Heading(String),
    Text(String),
    Bullet(String),
    Numbered(usize, String),
    /// Title and body of a highlighted box.
    Callout(String, String),
    /// Entry of the table of contents with its page number.
    Contents(String, usize),
    Image(PathBuf),
    ImagePlaceholder,
    Chart(Chart),
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub lines: Vec<Line>,
}

impl Page {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    fn push(&mut self, line: Line) -> &mut Self {
        self.lines.push(line);
        self
    }
}

/// A paginated training report. Page 1 is the cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub identity: Identity,
    pub generated_on: DateTime<Utc>,
    pub pages: Vec<Page>,
}

impl Report {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Footer of the 1-based page `number`; the cover has none.
    #[must_use]
    pub fn footer(&self, number: usize) -> Option<(String, String)> {
        if number <= 1 || number > self.pages.len() {
            return None;
        }
        Some((
            format!(
                "Formation Anti-Phishing - {}",
                self.identity.organization()
            ),
            format!(
                "{} - Page {}/{}",
                self.identity.full_name(),
                number,
                self.pages.len()
            ),
        ))
    }

    /// Every chart in page order.
    #[must_use]
    pub fn charts(&self) -> Vec<&Chart> {
        self.pages
            .iter()
            .flat_map(|p| &p.lines)
            .filter_map(|l| match l {
                Line::Chart(c) => Some(c),
                _ => None,
            })
            .collect()
    }
}

/// Everything the report is built from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub identity: &'a Identity,
    pub result: Option<&'a QuizResult>,
    pub questions: &'a QuestionSet,
    pub curriculum: &'a Curriculum,
    /// Resolved screenshot per example, `None` when unavailable.
    pub example_images: &'a [Option<PathBuf>],
    pub generated_on: DateTime<Utc>,
}

//
// ─── BUILDER ───────────────────────────────────────────────────────────────────
//

fn push_blocks(page: &mut Page, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading(text) => {
                page.push(Line::Heading((*text).to_owned()));
            }
            Block::Paragraph(text) => {
                page.push(Line::Text((*text).to_owned()));
            }
            Block::Bullets(items) => {
                for item in *items {
                    page.push(Line::Bullet((*item).to_owned()));
                }
            }
            Block::Steps(steps) => {
                for (n, step) in steps.iter().enumerate() {
                    page.push(Line::Numbered(
                        n + 1,
                        format!("{} : {}", step.title, step.description),
                    ));
                }
            }
            Block::Callout { title, body } => {
                page.push(Line::Callout((*title).to_owned(), (*body).to_owned()));
            }
            Block::SenderComparison { legitimate, forged } => {
                page.push(Line::Bullet(format!("Email légitime : {legitimate}")))
                    .push(Line::Bullet(format!("Email frauduleux : {forged}")));
            }
        }
        page.push(Line::Blank);
    }
}

fn section_page(curriculum: &Curriculum, section: SectionId) -> Page {
    let mut page = Page::new(section.to_string().to_uppercase());
    if let Some(content) = curriculum.section(section) {
        push_blocks(&mut page, content.blocks);
    }
    page
}

fn example_page(number: usize, example: &PhishingExample, image: Option<&PathBuf>) -> Page {
    let mut page = Page::new(format!("EXEMPLE {number} : {}", example.title));
    match image {
        Some(path) => page.push(Line::Image(path.clone())),
        None => page.push(Line::ImagePlaceholder),
    };
    page.push(Line::Blank)
        .push(Line::Bullet(format!("Expéditeur : {}", example.sender)))
        .push(Line::Bullet(format!("Lien : {}", example.link)))
        .push(Line::Blank)
        .push(Line::Heading("Analyse".to_owned()))
        .push(Line::Text(example.explanation.to_owned()));
    page
}

fn results_pages(result: &QuizResult, questions: &QuestionSet) -> [Page; 2] {
    let passed = result.is_passed();
    let mut summary = Page::new("5. RÉSULTATS DU QUIZ");
    summary
        .push(Line::Heading(format!("{}%", result.percentage())))
        .push(Line::Text(format!(
            "Score : {}/{}",
            result.score(),
            result.total_questions()
        )))
        .push(Line::Text(format!(
            "Statut : {}",
            if passed { PASSED_STATUS } else { FAILED_STATUS }
        )))
        .push(Line::Blank)
        .push(Line::Text(
            if passed { PASSED_MESSAGE } else { FAILED_MESSAGE }.to_owned(),
        ))
        .push(Line::Blank)
        .push(Line::Chart(Chart::Proportion {
            correct: result.score(),
            incorrect: result.incorrect(),
        }));

    let outcomes: Vec<bool> = questions
        .iter()
        .zip(result.answers())
        .map(|(q, a)| q.is_correct(*a))
        .collect();

    let mut detail = Page::new("ANALYSE DÉTAILLÉE DES RÉPONSES");
    detail.push(Line::Chart(Chart::PerQuestion(outcomes))).push(Line::Blank);
    for (n, (question, answer)) in questions.iter().zip(result.answers()).enumerate() {
        let correct = question.is_correct(*answer);
        let given = answer
            .and_then(|a| question.option(a))
            .unwrap_or("Sans réponse");
        detail.push(Line::Numbered(n + 1, question.prompt().to_owned()));
        detail.push(Line::Text(format!(
            "{} - Votre réponse : {given}",
            if correct { "CORRECT" } else { "INCORRECT" }
        )));
        if !correct {
            let right = question
                .option(question.correct_option())
                .unwrap_or_default();
            detail.push(Line::Text(format!("Bonne réponse : {right}")));
        }
    }
    [summary, detail]
}

fn recommendations_page(curriculum: &Curriculum) -> Page {
    let mut page = Page::new("6. RECOMMANDATIONS FINALES");
    for item in curriculum.recommendations() {
        page.push(Line::Bullet((*item).to_owned()));
    }
    page.push(Line::Blank).push(Line::Callout(
        "MESSAGE FINAL".to_owned(),
        curriculum.final_message().to_owned(),
    ));
    page
}

fn cover_page(input: &ReportInput<'_>) -> Page {
    let mut page = Page::new("FORMATION ANTI-PHISHING");
    page.push(Line::Text(
        "Reconnaître et éviter les pièges du phishing".to_owned(),
    ))
    .push(Line::Blank)
    .push(Line::Heading("PARTICIPANT".to_owned()))
    .push(Line::Text(input.identity.full_name()))
    .push(Line::Text(format!(
        "Entreprise : {}",
        input.identity.organization()
    )))
    .push(Line::Text(format!(
        "Date : {}",
        input.generated_on.format("%d/%m/%Y")
    )))
    .push(Line::Blank)
    .push(Line::Text("Support de formation professionnel".to_owned()));
    page
}

/// Build the report. Pure: no I/O, same input gives the same document.
///
/// # Errors
///
/// Returns `ReportError::ResultMismatch` if the result does not belong to
/// the question set.
pub fn build_report(input: &ReportInput<'_>) -> Result<Report, ReportError> {
    if let Some(result) = input.result {
        let expected = input.questions.total();
        let actual = result.answers().len();
        if expected != actual {
            return Err(ReportError::ResultMismatch { expected, actual });
        }
    }

    // Chapters are laid out first; the contents page is inserted after the
    // cover once every chapter's start page is known.
    let mut chapters: Vec<(String, Vec<Page>)> = vec![
        (
            SectionId::Introduction.to_string(),
            vec![section_page(input.curriculum, SectionId::Introduction)],
        ),
        (
            SectionId::Recognition.to_string(),
            vec![section_page(input.curriculum, SectionId::Recognition)],
        ),
    ];

    let mut examples = vec![section_page(input.curriculum, SectionId::Examples)];
    for (n, example) in input.curriculum.examples().iter().enumerate() {
        let image = input.example_images.get(n).and_then(Option::as_ref);
        examples.push(example_page(n + 1, example, image));
    }
    chapters.push((SectionId::Examples.to_string(), examples));
    chapters.push((
        SectionId::Response.to_string(),
        vec![section_page(input.curriculum, SectionId::Response)],
    ));
    if let Some(result) = input.result {
        chapters.push((
            "5. Résultats du quiz".to_owned(),
            results_pages(result, input.questions).into(),
        ));
    }
    chapters.push((
        "6. Recommandations finales".to_owned(),
        vec![recommendations_page(input.curriculum)],
    ));

    let mut contents = Page::new("TABLE DES MATIÈRES");
    // Cover is page 1, contents page 2.
    let mut next_page = 3;
    for (title, pages) in &chapters {
        contents.push(Line::Contents(title.clone(), next_page));
        next_page += pages.len();
    }

    let mut pages = vec![cover_page(input), contents];
    pages.extend(chapters.into_iter().flat_map(|(_, p)| p));

    Ok(Report {
        identity: input.identity.clone(),
        generated_on: input.generated_on,
        pages,
    })
}
