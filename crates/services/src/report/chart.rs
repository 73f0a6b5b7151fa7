//! Chart drawing for reports: SVG files and inline text bars.

use std::f64::consts::PI;
use std::fmt::Write as _;

use super::model::Chart;

const CORRECT_COLOR: &str = "#10B981";
const INCORRECT_COLOR: &str = "#EF4444";
const TEXT_BAR_WIDTH: usize = 40;

/// Suffix appended to the report file stem for the chart's SVG file.
#[must_use]
pub fn chart_suffix(chart: &Chart) -> &'static str {
    match chart {
        Chart::Proportion { .. } => "resultats",
        Chart::PerQuestion(_) => "detail-reponses",
    }
}

/// Text rendition embedded in the paginated document.
#[must_use]
pub fn text_chart(chart: &Chart) -> Vec<String> {
    match chart {
        Chart::Proportion { correct, incorrect } => {
            let total = (correct + incorrect).max(1) as usize;
            let filled = *correct as usize * TEXT_BAR_WIDTH / total;
            vec![
                "Résultats du Quiz".to_owned(),
                format!(
                    "[{}{}]",
                    "#".repeat(filled),
                    ".".repeat(TEXT_BAR_WIDTH - filled)
                ),
                format!("Bonnes réponses: {correct}"),
                format!("Mauvaises réponses: {incorrect}"),
            ]
        }
        Chart::PerQuestion(outcomes) => {
            let mut lines = vec!["Détail des réponses par question".to_owned()];
            lines.extend(outcomes.iter().enumerate().map(|(n, ok)| {
                format!("Q{:<3} {}", n + 1, if *ok { "OK" } else { "KO" })
            }));
            lines
        }
    }
}

/// Standalone SVG document for the chart.
#[must_use]
pub fn svg_chart(chart: &Chart) -> String {
    match chart {
        Chart::Proportion { correct, incorrect } => proportion_svg(*correct, *incorrect),
        Chart::PerQuestion(outcomes) => per_question_svg(outcomes),
    }
}

fn color(ok: bool) -> &'static str {
    if ok { CORRECT_COLOR } else { INCORRECT_COLOR }
}

#[allow(clippy::cast_precision_loss)]
fn proportion_svg(correct: u32, incorrect: u32) -> String {
    let (cx, cy, r) = (200.0_f64, 150.0_f64, 80.0_f64);
    let total = correct + incorrect;
    let percent = training_core::model::percentage(correct, total);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300">"#
    );
    svg.push_str(r##"<rect width="400" height="300" fill="#FFFFFF"/>"##);
    svg.push('\n');

    if total == 0 || incorrect == 0 || correct == 0 {
        let fill = color(incorrect == 0 && total > 0);
        let _ = writeln!(svg, r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}"/>"#);
    } else {
        let angle = f64::from(correct) / f64::from(total) * 2.0 * PI;
        let (x, y) = (cx + r * angle.cos(), cy + r * angle.sin());
        let large = u8::from(angle > PI);
        let _ = writeln!(
            svg,
            r#"<path d="M{cx},{cy} L{},{cy} A{r},{r} 0 {large} 1 {x:.2},{y:.2} Z" fill="{CORRECT_COLOR}"/>"#,
            cx + r
        );
        let _ = writeln!(
            svg,
            r#"<path d="M{cx},{cy} L{x:.2},{y:.2} A{r},{r} 0 {} 1 {},{cy} Z" fill="{INCORRECT_COLOR}"/>"#,
            1 - large,
            cx + r
        );
    }

    let _ = writeln!(
        svg,
        r#"<text x="{cx}" y="30" text-anchor="middle" font-family="Arial" font-weight="bold" font-size="16">Résultats du Quiz</text>"#
    );
    let _ = writeln!(
        svg,
        r#"<text x="{cx}" y="{}" text-anchor="middle" font-family="Arial" font-weight="bold" font-size="24">{percent}%</text>"#,
        cy + 8.0
    );
    let _ = writeln!(
        svg,
        r#"<rect x="120" y="240" width="15" height="15" fill="{CORRECT_COLOR}"/><text x="140" y="252" font-family="Arial" font-size="14">Bonnes réponses: {correct}</text>"#
    );
    let _ = writeln!(
        svg,
        r#"<rect x="120" y="265" width="15" height="15" fill="{INCORRECT_COLOR}"/><text x="140" y="277" font-family="Arial" font-size="14">Mauvaises réponses: {incorrect}</text>"#
    );
    svg.push_str("</svg>\n");
    svg
}

#[allow(clippy::cast_precision_loss)]
fn per_question_svg(outcomes: &[bool]) -> String {
    let (width, height, margin) = (600.0_f64, 400.0_f64, 60.0_f64);
    let chart_width = width - 2.0 * margin;
    let chart_height = height - 2.0 * margin;
    let bar_width = chart_width / outcomes.len().max(1) as f64;
    let bar_height = chart_height * 0.8;
    let top = margin + chart_height - bar_height;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(
        svg,
        r##"<rect width="{width}" height="{height}" fill="#FFFFFF"/>"##
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="30" text-anchor="middle" font-family="Arial" font-weight="bold" font-size="18">Détail des réponses par question</text>"#,
        width / 2.0
    );

    for (n, ok) in outcomes.iter().enumerate() {
        let x = margin + n as f64 * bar_width;
        let mid = x + bar_width / 2.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{:.2}" y="{top}" width="{:.2}" height="{bar_height}" fill="{}"/>"#,
            x + bar_width * 0.1,
            bar_width * 0.8,
            color(*ok)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{mid:.2}" y="{}" text-anchor="middle" font-family="Arial" font-size="12">Q{}</text>"#,
            height - 20.0,
            n + 1
        );
        let _ = writeln!(
            svg,
            r##"<text x="{mid:.2}" y="{:.2}" text-anchor="middle" font-family="Arial" font-size="16" fill="#FFFFFF">{}</text>"##,
            top + bar_height / 2.0,
            if *ok { "OK" } else { "KO" }
        );
    }

    let axis_y = margin + chart_height;
    let _ = writeln!(
        svg,
        r#"<line x1="{margin}" y1="{axis_y}" x2="{}" y2="{axis_y}" stroke="black"/>"#,
        margin + chart_width
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{margin}" y1="{margin}" x2="{margin}" y2="{axis_y}" stroke="black"/>"#
    );
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportion_text_bar_scales_with_score() {
        let lines = text_chart(&Chart::Proportion {
            correct: 15,
            incorrect: 0,
        });
        assert_eq!(lines[1], format!("[{}]", "#".repeat(TEXT_BAR_WIDTH)));

        let lines = text_chart(&Chart::Proportion {
            correct: 0,
            incorrect: 15,
        });
        assert_eq!(lines[1], format!("[{}]", ".".repeat(TEXT_BAR_WIDTH)));
    }

    #[test]
    fn per_question_svg_has_one_bar_per_question() {
        let outcomes = vec![true, false, true];
        let svg = svg_chart(&Chart::PerQuestion(outcomes));
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches(CORRECT_COLOR).count(), 2);
        assert_eq!(svg.matches(INCORRECT_COLOR).count(), 1);
        assert!(svg.contains(">Q3<"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn proportion_svg_shows_percentage() {
        let svg = svg_chart(&Chart::Proportion {
            correct: 14,
            incorrect: 1,
        });
        assert!(svg.contains(">93%<"));
        assert!(svg.contains("Mauvaises réponses: 1"));
        assert_eq!(svg.matches("<path").count(), 2);
    }
}
