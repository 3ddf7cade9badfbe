mod write_report;

pub use write_report::ReportWriter;
