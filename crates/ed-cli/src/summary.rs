use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ed_model::{EmergencyReport, FeatureAnalysis};
use ed_report::{NamedTable, records_table, report_tables};

use crate::types::AnalyzeResult;

pub fn print_summary(result: &AnalyzeResult) {
    let report = &result.report;
    println!("Visit log: {}", result.source.display());
    println!("Records: {}", report.records);
    println!();
    println!("{}", overview_table(report));

    for table in report_tables(report) {
        print_named_table(&table);
    }
    if result.show_records {
        for analysis in &report.features {
            print_named_table(&records_table(analysis));
        }
    }

    if !result.exported.is_empty() {
        println!();
        println!("Exported:");
        for path in &result.exported {
            println!("- {}", path.display());
        }
    }
}

/// One row per feature with the counts worth a glance before the detail tables.
pub fn overview_table(report: &EmergencyReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Feature"),
        header_cell("Column"),
        header_cell("Records"),
        header_cell("Missing"),
        header_cell("Orders"),
        header_cell("Unclassified"),
        header_cell("Unparsed"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new("Visit duration")
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} / {}", report.options.columns.visit, report.options.columns.discharge)),
        Cell::new(report.records),
        count_cell(report.visit.undefined(), Color::Yellow),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    for analysis in &report.features {
        table.add_row(feature_row(analysis));
    }
    table
}

fn feature_row(analysis: &FeatureAnalysis) -> Vec<Cell> {
    vec![
        Cell::new(analysis.feature.label())
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(&analysis.column),
        Cell::new(analysis.present.len()),
        dim_cell(analysis.missing_cells()),
        Cell::new(analysis.reply.total),
        count_cell(analysis.reply.unclassified, Color::Yellow),
        count_cell(analysis.unparsed_timestamps(), Color::Red),
    ]
}

fn print_named_table(named: &NamedTable) {
    let mut table = Table::new();
    table.set_header(named.header.iter().map(|label| header_cell(label)));
    apply_table_style(&mut table);
    for index in 1..named.header.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in &named.rows {
        table.add_row(row.iter().map(|value| {
            if value.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(value)
            }
        }));
    }
    println!();
    println!("{}:", named.title);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
