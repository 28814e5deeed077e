//! CLI command implementations

mod report;

pub use report::{report_command, ReportOptions};
