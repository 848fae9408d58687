use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{debug, info, info_span, trace};

use ed_analysis::analyze;
use ed_ingest::read_visit_log;
use ed_model::{AnalysisOptions, ColumnNames, EmergencyReport, Feature};
use ed_report::export_report;

use crate::cli::AnalyzeArgs;
use crate::logging::redact_value;
use crate::summary::apply_table_style;
use crate::types::AnalyzeResult;

pub fn run_features() -> Result<()> {
    println!("{}", features_table());
    Ok(())
}

/// Order features with their default column, reply length, and timestamp spans.
pub fn features_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Feature",
        "Slug",
        "Column",
        "Reply length",
        "Request",
        "Reply",
    ]);
    apply_table_style(&mut table);
    for feature in Feature::ALL {
        let rule = feature.rule();
        table.add_row(vec![
            feature.label().to_string(),
            feature.slug().to_string(),
            feature.default_column().to_string(),
            rule.reply_threshold.to_string(),
            rule.request.to_string(),
            rule.reply.to_string(),
        ]);
    }
    table
}

/// Builds the run options from command-line flags.
pub fn analysis_options(args: &AnalyzeArgs) -> Result<AnalysisOptions> {
    let mut columns = ColumnNames {
        visit: args.visit_column.clone(),
        discharge: args.discharge_column.clone(),
        ..ColumnNames::default()
    };
    for assignment in &args.feature_columns {
        columns
            .apply_override(assignment)
            .with_context(|| format!("parse --feature-column {assignment}"))?;
    }

    let mut options = AnalysisOptions::new()
        .with_columns(columns)
        .with_date_policy(args.date_policy.into());
    if !args.features.is_empty() {
        options = options.with_features(args.features.iter().map(|arg| Feature::from(*arg)));
    }
    Ok(options)
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeResult> {
    let span = info_span!("analyze_file", path = %args.file.display());
    let _guard = span.enter();
    let options = analysis_options(args)?;
    debug!(
        features = options.features.len(),
        date_policy = ?options.date_policy,
        "analysis options"
    );

    let load_start = Instant::now();
    let df = read_visit_log(&args.file)
        .with_context(|| format!("load {}", args.file.display()))?;
    info!(
        records = df.height(),
        duration_ms = load_start.elapsed().as_millis(),
        "load complete"
    );

    let analysis_start = Instant::now();
    let report = analyze(&df, &options)
        .with_context(|| format!("analyze {}", args.file.display()))?;
    info!(
        features = report.features.len(),
        duration_ms = analysis_start.elapsed().as_millis(),
        "analysis complete"
    );
    log_unparsed_records(&report);

    let exported = match &args.export_dir {
        Some(dir) => export_report(&report, dir, args.export_format.into())
            .with_context(|| format!("export to {}", dir.display()))?,
        None => Vec::new(),
    };

    Ok(AnalyzeResult {
        source: args.file.clone(),
        report,
        exported,
        show_records: args.show_records,
    })
}

fn log_unparsed_records(report: &EmergencyReport) {
    for analysis in &report.features {
        for record in analysis.durations.iter().filter(|record| record.unparsed > 0) {
            let text = analysis
                .present
                .iter()
                .find(|cell| cell.row == record.row)
                .map_or("", |cell| cell.text.as_str());
            trace!(
                feature = %analysis.feature,
                row = record.row,
                unparsed = record.unparsed,
                text = redact_value(text),
                "record with unreadable order timestamps"
            );
        }
    }
}
