//! CSV and JSON export of an analysis report.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use ed_model::EmergencyReport;

use crate::error::{ReportError, Result};
use crate::tables::{NamedTable, report_tables};

/// File name of the JSON export.
pub const REPORT_JSON: &str = "report.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Both,
}

impl ExportFormat {
    fn csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    fn json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_table<W: Write>(writer: &mut csv::Writer<W>, table: &NamedTable) -> csv::Result<()> {
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Renders one table as CSV text, without a trailing newline.
pub fn table_to_csv_string(table: &NamedTable) -> Result<String> {
    let csv_error = |source| ReportError::Csv {
        path: PathBuf::from(&table.name),
        source,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_table(&mut writer, table).map_err(csv_error)?;
    let bytes = writer
        .into_inner()
        .map_err(|error| csv_error(csv::Error::from(error.into_error())))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.trim_end_matches('\n').to_string())
}

/// Writes every summary table to `<dir>/<name>.csv`.
pub fn write_csv_tables(report: &EmergencyReport, dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;
    let mut outputs = Vec::new();
    for table in report_tables(report) {
        let path = dir.join(format!("{}.csv", table.name));
        let mut writer = csv::Writer::from_path(&path).map_err(|source| ReportError::Csv {
            path: path.clone(),
            source,
        })?;
        write_table(&mut writer, &table).map_err(|source| ReportError::Csv {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), rows = table.rows.len(), "Wrote table");
        outputs.push(path);
    }
    Ok(outputs)
}

/// Writes the full report, durations included, to `<dir>/report.json`.
pub fn write_json_report(report: &EmergencyReport, dir: &Path) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(REPORT_JSON);
    let io_error = |source| ReportError::Io {
        path: path.clone(),
        source,
    };
    let file = fs::File::create(&path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush().map_err(io_error)?;
    Ok(path)
}

/// Exports in the requested format and returns the written paths.
pub fn export_report(
    report: &EmergencyReport,
    dir: &Path,
    format: ExportFormat,
) -> Result<Vec<PathBuf>> {
    let mut outputs = Vec::new();
    if format.csv() {
        outputs.extend(write_csv_tables(report, dir)?);
    }
    if format.json() {
        outputs.push(write_json_report(report, dir)?);
    }
    info!(
        dir = %dir.display(),
        files = outputs.len(),
        "Exported analysis report"
    );
    Ok(outputs)
}
