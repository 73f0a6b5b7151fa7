mod chart;
mod model;
mod render;
mod service;

pub use chart::{chart_suffix, svg_chart, text_chart};
pub use model::{
    Chart, FAILED_MESSAGE, FAILED_STATUS, IMAGE_PLACEHOLDER, Line, PASSED_MESSAGE, PASSED_STATUS,
    Page, Report, ReportInput, build_report,
};
pub use render::{PAGE_BREAK, render_text};
pub use service::{GeneratedReport, ReportService, report_file_stem};
