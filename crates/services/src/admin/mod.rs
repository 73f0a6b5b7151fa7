mod export;
mod service;

pub use export::{
    BYTE_ORDER_MARK, CSV_HEADER, export_file_name, format_completed_at, render_csv,
};
pub use service::{AdminService, AdminStats, CsvExport, ResultListItem};
