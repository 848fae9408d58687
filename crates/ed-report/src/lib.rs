//! Rendering and export of visit log analysis results.
//!
//! [`tables`] flattens an [`ed_model::EmergencyReport`] into named text
//! tables; [`export`] writes them as CSV files next to a JSON dump of the
//! full report.

pub mod error;
pub mod export;
pub mod tables;

pub use error::{ReportError, Result};
pub use export::{
    ExportFormat, REPORT_JSON, export_report, table_to_csv_string, write_csv_tables,
    write_json_report,
};
pub use tables::{
    DURATION_OF_LEAVE, NamedTable, cumulative_table, feature_tables, four_hour_table,
    frequency_table, records_table, reply_table, report_tables, statistics_table, visit_tables,
};
