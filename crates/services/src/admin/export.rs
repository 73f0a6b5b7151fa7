//! Delimited-text export of stored results.

use chrono::{DateTime, Utc};

use storage::repository::StoredResult;
use training_core::model::{OptionIndex, QuizResult};
use training_core::time::date_stamp;

/// Column header, in column order.
pub const CSV_HEADER: [&str; 7] = [
    "Prénom",
    "Nom",
    "Score",
    "Total Questions",
    "Pourcentage",
    "Date de completion",
    "Détail des réponses",
];

/// Prepended to the file so spreadsheet tools pick up UTF-8.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// `resultats-quiz-phishing-YYYY-MM-DD.csv`
#[must_use]
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("resultats-quiz-phishing-{}.csv", date_stamp(at))
}

/// Completion time as `dd/mm/YYYY HH:MM:SS`.
#[must_use]
pub fn format_completed_at(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y %H:%M:%S").to_string()
}

fn quoted(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

/// Quote a free-text field when it holds a delimiter, a quote or a line break.
fn text_field(raw: &str) -> String {
    if raw.contains([',', '"', '\r', '\n']) {
        quoted(raw)
    } else {
        raw.to_owned()
    }
}

fn answers_field(answers: &[Option<OptionIndex>]) -> String {
    let joined = answers
        .iter()
        .map(|a| a.map(|i| i.to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(";");
    quoted(&joined)
}

fn row(result: &QuizResult) -> String {
    let identity = result.identity();
    [
        text_field(identity.first_name()),
        text_field(identity.last_name()),
        result.score().to_string(),
        result.total_questions().to_string(),
        format!("{}%", result.percentage()),
        format_completed_at(result.completed_at()),
        answers_field(result.answers()),
    ]
    .join(",")
}

/// Render the export body: header plus one row per result, joined with `\n`,
/// prefixed with the byte-order mark.
///
/// The answers column is always quoted. Names are quoted only when they hold
/// `,`, `"` or a line break, with inner quotes doubled.
#[must_use]
pub fn render_csv(results: &[StoredResult]) -> String {
    let mut out = String::new();
    out.push(BYTE_ORDER_MARK);
    out.push_str(&CSV_HEADER.join(","));
    for stored in results {
        out.push('\n');
        out.push_str(&row(&stored.result));
    }
    out
}
