//! Plain-text sales report.

mod renderer;

pub use renderer::{render_report, write_report, ReportData};
