#![forbid(unsafe_code)]

pub mod admin;
pub mod error;
pub mod report;
pub mod training;

pub use training_core::Clock;

pub use error::{AdminError, ExportError, ReportError, SessionError};

pub use admin::{AdminService, AdminStats, CsvExport, ResultListItem};
pub use report::{GeneratedReport, ReportService};
pub use training::{Attempted, QuizStep, TrainingLoopService, TrainingSession};
