//! Order field parsing: splits a feature column into order entries, cuts out
//! their timestamps, and summarizes entry lengths and durations.
//!
//! Each step is a free function over the previous step's output, so any
//! intermediate table can be inspected or tested on its own.
//! [`analyze_feature`] chains them for one feature column.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use polars::prelude::DataFrame;
use tracing::{debug, info_span, warn};

use ed_model::{
    AnalysisOptions, ExtractionRule, Feature, FeatureAnalysis, FrequencyBucket, IndexedCell,
    OrderFrequency, OrderRecord, Percentage, PooledSummary, PooledValues, RecordDurations,
    RecordValues, ReplyBreakdown, ReplyClass, ReplyPartition,
};

use crate::datetime::parse_day_first;
use crate::error::{AnalysisError, Result};
use crate::frame::text_column;
use crate::stats::describe_durations;

/// Delimiter between order entries in one cell.
pub const ORDER_DELIMITER: char = ';';

/// The raw feature column, missing cells included.
pub fn feature_cells(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    text_column(df, column)
}

/// Drops missing cells, keeping each remaining cell's source row.
pub fn drop_missing(cells: &[Option<String>]) -> Vec<IndexedCell> {
    cells
        .iter()
        .enumerate()
        .filter_map(|(row, cell)| {
            cell.as_ref().map(|text| IndexedCell {
                row,
                text: text.clone(),
            })
        })
        .collect()
}

/// Splits every cell into its `;`-delimited order entries.
pub fn split_orders(cells: &[IndexedCell]) -> Vec<OrderRecord> {
    cells
        .iter()
        .map(|cell| OrderRecord {
            row: cell.row,
            entries: cell
                .text
                .split(ORDER_DELIMITER)
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// How many records carry each number of orders.
///
/// Buckets are ordered by record count, most frequent first; ties go to the
/// smaller order count.
pub fn order_frequency(records: &[OrderRecord], column: &str) -> OrderFrequency {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.order_count()).or_default() += 1;
    }
    let mut buckets: Vec<FrequencyBucket> = counts
        .into_iter()
        .map(|(orders, records)| FrequencyBucket { orders, records })
        .collect();
    buckets.sort_by(|a, b| b.records.cmp(&a.records).then(a.orders.cmp(&b.orders)));
    OrderFrequency {
        column: column.to_string(),
        buckets,
    }
}

/// Character length of every order entry.
pub fn entry_lengths(records: &[OrderRecord]) -> Vec<RecordValues<usize>> {
    records
        .iter()
        .map(|record| RecordValues {
            row: record.row,
            values: record
                .entries
                .iter()
                .map(|entry| entry.chars().count())
                .collect(),
        })
        .collect()
}

/// Request/reply timestamp segments of every record.
pub fn extract_timestamps(
    records: &[OrderRecord],
    rule: &ExtractionRule,
) -> Vec<RecordValues<String>> {
    records
        .iter()
        .map(|record| RecordValues {
            row: record.row,
            values: rule.extract_segments(&record.entries),
        })
        .collect()
}

/// Reply minus request for every timestamp segment.
///
/// When `coerce` is set an unreadable timestamp yields an undefined duration
/// and is counted in [`RecordDurations::unparsed`]; otherwise it is an error.
pub fn order_durations(
    feature: Feature,
    timestamps: &[RecordValues<String>],
    rule: &ExtractionRule,
    coerce: bool,
) -> Result<Vec<RecordDurations>> {
    let mut records = Vec::with_capacity(timestamps.len());
    for record in timestamps {
        let mut durations = Vec::with_capacity(record.values.len());
        let mut unparsed = 0;
        for segment in &record.values {
            let request = rule.request_text(segment);
            let reply = rule.reply_text(segment);
            match (parse_day_first(request), parse_day_first(reply)) {
                (Some(start), Some(end)) => durations.push(Some(end - start)),
                (start, _) if coerce => {
                    unparsed += 1;
                    debug!(
                        %feature,
                        row = record.row,
                        request_parsed = start.is_some(),
                        "Order timestamp coerced to undefined duration"
                    );
                    durations.push(None);
                }
                (start, _) => {
                    let text = if start.is_none() { request } else { reply };
                    return Err(AnalysisError::TimestampParse {
                        feature,
                        row: record.row,
                        text: text.to_string(),
                    });
                }
            }
        }
        records.push(RecordDurations {
            row: record.row,
            durations,
            unparsed,
        });
    }
    Ok(records)
}

/// Every entry length of every record, in record order.
pub fn pooled_lengths(lengths: &[RecordValues<usize>]) -> Vec<usize> {
    lengths
        .iter()
        .flat_map(|record| record.values.iter().copied())
        .collect()
}

/// Every order duration of every record, in record order.
pub fn pooled_durations(durations: &[RecordDurations]) -> Vec<Option<TimeDelta>> {
    durations
        .iter()
        .flat_map(|record| record.durations.iter().copied())
        .collect()
}

pub fn pool_lengths(lengths: &[RecordValues<usize>]) -> PooledValues {
    PooledValues::Lengths(pooled_lengths(lengths))
}

pub fn pool_durations(durations: &[RecordDurations]) -> PooledValues {
    PooledValues::Durations(pooled_durations(durations))
}

/// Splits pooled entry lengths into without/with reply.
///
/// An empty pool yields zero counts and undefined percentages.
pub fn reply_breakdown(lengths: &[usize], rule: &ExtractionRule) -> ReplyBreakdown {
    let total = lengths.len();
    let mut without = Vec::new();
    let mut with = Vec::new();
    let mut unclassified = 0;
    for &length in lengths {
        match rule.classify(length) {
            ReplyClass::WithoutReply => without.push(length),
            ReplyClass::WithReply => with.push(length),
            ReplyClass::Unclassified => unclassified += 1,
        }
    }
    let partition = |members: Vec<usize>| ReplyPartition {
        lengths: distinct(&members),
        count: members.len(),
        percentage: Percentage::of(members.len(), total),
    };
    ReplyBreakdown {
        threshold: rule.reply_threshold,
        without_reply: partition(without),
        with_reply: partition(with),
        unclassified,
        total,
    }
}

fn distinct(values: &[usize]) -> Vec<usize> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(value) {
            seen.push(*value);
        }
    }
    seen
}

/// Summarizes pooled values: a reply breakdown for lengths, describe
/// statistics for durations.
pub fn summarize_pooled(values: &PooledValues, rule: &ExtractionRule) -> PooledSummary {
    debug!(kind = ?values.kind(), values = values.len(), "Summarizing pooled values");
    match values {
        PooledValues::Lengths(lengths) => PooledSummary::Reply(reply_breakdown(lengths, rule)),
        PooledValues::Durations(durations) => {
            PooledSummary::Durations(describe_durations(durations))
        }
    }
}

fn mismatch(pooled: &PooledValues, summary: &PooledSummary) -> AnalysisError {
    AnalysisError::SummaryMismatch {
        expected: pooled.kind(),
        found: summary.kind(),
    }
}

/// Runs every order-field step for one feature.
pub fn analyze_feature(
    df: &DataFrame,
    feature: Feature,
    options: &AnalysisOptions,
) -> Result<FeatureAnalysis> {
    let column = options.columns.feature(feature).to_string();
    let rule = feature.rule();
    let span = info_span!("feature", %feature, column = %column);
    let _guard = span.enter();

    let raw = feature_cells(df, &column)?;
    let present = drop_missing(&raw);
    let orders = split_orders(&present);
    let frequency = order_frequency(&orders, &column);
    let lengths = entry_lengths(&orders);
    let timestamps = extract_timestamps(&orders, &rule);
    let durations = order_durations(
        feature,
        &timestamps,
        &rule,
        options.date_policy.coerces(feature),
    )?;

    let pooled = pool_lengths(&lengths);
    if pooled.is_empty() {
        warn!("No order entries; reply percentages are undefined");
    }
    let reply = match summarize_pooled(&pooled, &rule) {
        PooledSummary::Reply(reply) => reply,
        other => return Err(mismatch(&pooled, &other)),
    };
    let pooled = pool_durations(&durations);
    let duration_stats = match summarize_pooled(&pooled, &rule) {
        PooledSummary::Durations(stats) => stats,
        other => return Err(mismatch(&pooled, &other)),
    };

    let analysis = FeatureAnalysis {
        feature,
        column,
        raw,
        present,
        orders,
        frequency,
        lengths,
        timestamps,
        durations,
        reply,
        duration_stats,
    };
    let unparsed = analysis.unparsed_timestamps();
    if unparsed > 0 {
        warn!(unparsed, "Order timestamps could not be parsed");
    }
    debug!(
        records = analysis.present.len(),
        missing = analysis.missing_cells(),
        with_reply = analysis.reply.with_reply.count,
        without_reply = analysis.reply.without_reply.count,
        "Feature analyzed"
    );
    Ok(analysis)
}
