//! Built-in training material: section content, phishing examples and the quiz.

mod curriculum;
mod questions;

pub use curriculum::{
    Block, Curriculum, FRAUDULENT_DOMAIN, PhishingExample, SampleEmail, SectionContent, Step,
};
pub use questions::reference_questions;
