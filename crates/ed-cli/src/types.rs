use std::path::PathBuf;

use ed_model::EmergencyReport;

#[derive(Debug)]
pub struct AnalyzeResult {
    pub source: PathBuf,
    pub report: EmergencyReport,
    /// Files written by the export step, empty without `--export-dir`.
    pub exported: Vec<PathBuf>,
    pub show_records: bool,
}
