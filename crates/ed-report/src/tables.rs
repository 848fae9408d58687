//! Flattens an [`EmergencyReport`] into named text tables.
//!
//! The same tables back the console output and the CSV export. Undefined
//! values are empty cells.

use ed_model::{
    DurationStats, EmergencyReport, FeatureAnalysis, OrderFrequency, Percentage, ReplyBreakdown,
    VisitDurationReport, format_seconds,
};

/// Column label of the visit duration series.
pub const DURATION_OF_LEAVE: &str = "DURATION_OF_LEAVE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTable {
    /// File stem and console heading, e.g. `lab_tests_reply`.
    pub name: String,
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl NamedTable {
    fn new(name: impl Into<String>, title: impl Into<String>, header: &[&str]) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            header: header.iter().map(|label| label.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

fn seconds_cell(value: Option<f64>) -> String {
    value.map(format_seconds).unwrap_or_default()
}

fn percentage_cell(value: Option<Percentage>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn statistics_table(
    name: impl Into<String>,
    title: impl Into<String>,
    label: &str,
    stats: &DurationStats,
) -> NamedTable {
    let mut table = NamedTable::new(name, title, &["statistic", label]);
    table.push_row(vec!["count".to_string(), stats.count.to_string()]);
    for (statistic, value) in stats.rows() {
        table.push_row(vec![statistic.to_string(), seconds_cell(value)]);
    }
    table
}

pub fn four_hour_table(visit: &VisitDurationReport) -> NamedTable {
    let mut table = NamedTable::new(
        "visit_four_hour",
        "Discharged within four hours",
        &["measure", "Less than four hours", "Four hours or more"],
    );
    table.push_row(vec![
        "Percentage".to_string(),
        visit.four_hour.under_four_hours.to_string(),
        visit.four_hour.four_hours_or_more.to_string(),
    ]);
    table
}

pub fn cumulative_table(visit: &VisitDurationReport) -> NamedTable {
    let mut table = NamedTable::new(
        "visit_cumulative",
        "Discharged within 10/20/30 minutes",
        &[
            "measure",
            "within_10_minutes",
            "within_20_minutes",
            "within_30_minutes",
        ],
    );
    table.push_row(vec![
        "Percentage".to_string(),
        visit.cumulative.within_10_minutes.to_string(),
        visit.cumulative.within_20_minutes.to_string(),
        visit.cumulative.within_30_minutes.to_string(),
    ]);
    table
}

pub fn frequency_table(slug: &str, frequency: &OrderFrequency) -> NamedTable {
    let mut table = NamedTable::new(
        format!("{slug}_frequency"),
        format!("Orders per record ({})", frequency.column),
        &["orders", frequency.column.as_str()],
    );
    for bucket in &frequency.buckets {
        table.push_row(vec![bucket.orders.to_string(), bucket.records.to_string()]);
    }
    table
}

pub fn reply_table(slug: &str, reply: &ReplyBreakdown) -> NamedTable {
    let mut table = NamedTable::new(
        format!("{slug}_reply"),
        format!("Orders with and without reply (threshold {})", reply.threshold),
        &["measure", "Without reply", "With reply"],
    );
    let lengths = |values: &[usize]| {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ")
    };
    table.push_row(vec![
        "Length of text (characters)".to_string(),
        lengths(&reply.without_reply.lengths),
        lengths(&reply.with_reply.lengths),
    ]);
    table.push_row(vec![
        "Count of orders".to_string(),
        reply.without_reply.count.to_string(),
        reply.with_reply.count.to_string(),
    ]);
    table.push_row(vec![
        "Percentage of orders".to_string(),
        percentage_cell(reply.without_reply.percentage),
        percentage_cell(reply.with_reply.percentage),
    ]);
    table
}

/// Per-record detail: entry count, entry lengths, and order durations.
pub fn records_table(analysis: &FeatureAnalysis) -> NamedTable {
    let slug = analysis.feature.slug();
    let mut table = NamedTable::new(
        format!("{slug}_records"),
        format!("{} per record", analysis.feature),
        &["row", "orders", "lengths", "durations", "unparsed"],
    );
    for ((order, lengths), record) in analysis
        .orders
        .iter()
        .zip(&analysis.lengths)
        .zip(&analysis.durations)
    {
        let lengths = lengths
            .values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ");
        let durations = record
            .durations
            .iter()
            .map(|value| {
                value
                    .map(|delta| format_seconds(delta.num_seconds() as f64))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(" / ");
        table.push_row(vec![
            order.row.to_string(),
            order.order_count().to_string(),
            lengths,
            durations,
            record.unparsed.to_string(),
        ]);
    }
    table
}

pub fn visit_tables(visit: &VisitDurationReport) -> Vec<NamedTable> {
    vec![
        statistics_table(
            "visit_statistics",
            "Duration of leave",
            DURATION_OF_LEAVE,
            &visit.statistics,
        ),
        four_hour_table(visit),
        cumulative_table(visit),
    ]
}

pub fn feature_tables(analysis: &FeatureAnalysis) -> Vec<NamedTable> {
    let slug = analysis.feature.slug();
    vec![
        frequency_table(slug, &analysis.frequency),
        reply_table(slug, &analysis.reply),
        statistics_table(
            format!("{slug}_duration_statistics"),
            format!("{} durations", analysis.feature),
            "Statistics",
            &analysis.duration_stats,
        ),
    ]
}

/// Every summary table of the report, visit tables first.
pub fn report_tables(report: &EmergencyReport) -> Vec<NamedTable> {
    let mut tables = visit_tables(&report.visit);
    for analysis in &report.features {
        tables.extend(feature_tables(analysis));
    }
    tables
}
