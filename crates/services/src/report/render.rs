use super::chart::text_chart;
use super::model::{IMAGE_PLACEHOLDER, Line, Report};

/// Separates pages in the rendered document.
pub const PAGE_BREAK: char = '\u{000c}';

const WIDTH: usize = 78;

fn wrap(text: &str, indent: &str, out: &mut Vec<String>) {
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && indent.len() + line.chars().count() + 1 + word.chars().count() > WIDTH
        {
            out.push(format!("{indent}{line}"));
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        out.push(format!("{indent}{line}"));
    }
}

fn render_line(line: &Line, out: &mut Vec<String>) {
    match line {
        Line::Heading(text) => out.push(text.clone()),
        Line::Text(text) => wrap(text, "", out),
        Line::Bullet(text) => {
            let mut wrapped = Vec::new();
            wrap(text, "  ", &mut wrapped);
            if let Some(first) = wrapped.first_mut() {
                first.replace_range(..1, "•");
            }
            out.extend(wrapped);
        }
        Line::Numbered(n, text) => wrap(&format!("{n}. {text}"), "", out),
        Line::Callout(title, body) => {
            out.push(format!("┌ {title}"));
            wrap(body, "│ ", out);
            out.push("└".to_owned());
        }
        Line::Contents(title, page) => {
            let dots = WIDTH.saturating_sub(title.chars().count() + page.to_string().len() + 2);
            out.push(format!("{title} {} {page}", ".".repeat(dots)));
        }
        Line::Image(path) => out.push(format!("[Image : {}]", path.display())),
        Line::ImagePlaceholder => out.push(IMAGE_PLACEHOLDER.to_owned()),
        Line::Chart(chart) => out.extend(text_chart(chart)),
        Line::Blank => out.push(String::new()),
    }
}

/// Render the report as plain text, one form-feed separated block per page.
#[must_use]
pub fn render_text(report: &Report) -> String {
    let pages: Vec<String> = report
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let mut out = vec![page.title.clone(), "=".repeat(page.title.chars().count())];
            out.push(String::new());
            for line in &page.lines {
                render_line(line, &mut out);
            }
            if let Some((left, right)) = report.footer(i + 1) {
                out.push(String::new());
                out.push("-".repeat(WIDTH));
                let pad = WIDTH.saturating_sub(left.chars().count() + right.chars().count());
                out.push(format!("{left}{}{right}", " ".repeat(pad.max(1))));
            }
            out.join("\n")
        })
        .collect();

    let mut doc = pages.join(&format!("\n{PAGE_BREAK}\n"));
    doc.push('\n');
    doc
}
