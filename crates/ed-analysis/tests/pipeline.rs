//! Integration tests for a full analysis run.

use chrono::TimeDelta;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use ed_analysis::{
    AnalysisError, analyze, analyze_feature, pool_durations, pool_lengths, summarize_pooled,
};
use ed_model::{
    AnalysisOptions, ColumnNames, DatePolicy, Feature, FrequencyBucket, Percentage, PooledSummary,
};

fn test_df(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).unwrap()
}

fn visit_log() -> DataFrame {
    test_df(vec![
        (
            "VISIT_DATE",
            vec![
                Some("01/02/2023 10:00"),
                Some("01/02/2023 11:00"),
                Some("02/02/2023 08:00"),
                Some("02/02/2023 09:00"),
            ],
        ),
        (
            "DISCHARGE_DATE",
            vec![
                Some("01/02/2023 10:05"),
                Some("01/02/2023 16:00"),
                Some("02/02/2023 08:25"),
                None,
            ],
        ),
        (
            "CONSULTATIONS",
            vec![
                Some(
                    "REQUEST:01/02/2023 10:15 REPLY:01/02/2023 11:00;\
                     REQUEST:01/02/2023 10:20 REPLY:",
                ),
                None,
                Some("REQUEST:02/02/2023 08:05 REPLY:02/02/2023 08:35"),
                None,
            ],
        ),
        (
            "LAB_TEST",
            vec![
                Some("CBC TEST, START: ,01/02/2023 10:15, END: ,01/02/2023 11:00"),
                Some(
                    "CBC TEST, START: ,01/02/2023 11:10, END: ,01/02/2023 12:10;\
                     UREA, START: ,01/02/2023 11:10, END: ,",
                ),
                None,
                None,
            ],
        ),
        (
            "RADIOLOGY",
            vec![
                None,
                None,
                Some("CHEST XRAY, START: ,02/02/2023 08:10, END: ,02/02/2023 08:40"),
                None,
            ],
        ),
        (
            "PHARMECY",
            vec![
                None,
                None,
                None,
                Some("IV FLUID, START: ,02/02/2023 09:05, END: ,02/02/2023 09:06"),
            ],
        ),
        ("CONSULTATIONS_NIGHT", vec![None; 4]),
    ])
}

#[test]
fn visit_durations_and_breakdowns() {
    let report = analyze(&visit_log(), &AnalysisOptions::default()).unwrap();
    let visit = &report.visit;

    assert_eq!(report.records, 4);
    assert_eq!(
        visit.durations,
        vec![
            Some(TimeDelta::minutes(5)),
            Some(TimeDelta::hours(5)),
            Some(TimeDelta::minutes(25)),
            None,
        ]
    );
    assert_eq!(visit.undefined(), 1);
    assert_eq!(visit.statistics.count, 3);
    assert_eq!(visit.four_hour.under_four_hours, Percentage(50));
    assert_eq!(visit.four_hour.four_hours_or_more, Percentage(25));
    assert_eq!(visit.cumulative.within_10_minutes, Percentage(25));
    assert_eq!(visit.cumulative.within_20_minutes, Percentage(25));
    assert_eq!(visit.cumulative.within_30_minutes, Percentage(50));
}

#[test]
fn consultations_are_parsed_and_classified() {
    let analysis = analyze_feature(
        &visit_log(),
        Feature::Consultations,
        &AnalysisOptions::default(),
    )
    .unwrap();

    assert_eq!(analysis.column, "CONSULTATIONS");
    assert_eq!(analysis.raw.len(), 4);
    assert_eq!(analysis.missing_cells(), 2);
    assert_eq!(
        analysis.present.iter().map(|cell| cell.row).collect::<Vec<_>>(),
        vec![0, 2]
    );
    assert_eq!(analysis.orders[0].order_count(), 2);
    assert_eq!(
        analysis.frequency.buckets,
        vec![
            FrequencyBucket {
                orders: 1,
                records: 1
            },
            FrequencyBucket {
                orders: 2,
                records: 1
            },
        ]
    );
    assert_eq!(analysis.lengths[0].values, vec![47, 31]);
    assert_eq!(
        analysis.timestamps[0].values,
        vec![
            "01/02/2023 10:15   01/02/2023 11:00".to_string(),
            "01/02/2023 10:20   ".to_string(),
        ]
    );
    assert_eq!(
        analysis.durations[0].durations,
        vec![Some(TimeDelta::minutes(45)), None]
    );
    assert_eq!(analysis.durations[0].unparsed, 1);
    assert_eq!(analysis.durations[1].row, 2);
    assert_eq!(
        analysis.durations[1].durations,
        vec![Some(TimeDelta::minutes(30))]
    );

    assert_eq!(analysis.reply.with_reply.count, 2);
    assert_eq!(analysis.reply.with_reply.percentage, Some(Percentage(67)));
    assert_eq!(analysis.reply.without_reply.count, 1);
    assert_eq!(analysis.reply.without_reply.percentage, Some(Percentage(33)));
    assert_eq!(analysis.reply.without_reply.lengths, vec![31]);

    assert_eq!(analysis.duration_stats.count, 2);
    assert_eq!(analysis.duration_stats.mean, Some(2250.0));
}

#[test]
fn lab_tests_use_start_end_markers() {
    let analysis =
        analyze_feature(&visit_log(), Feature::LabTests, &AnalysisOptions::default()).unwrap();

    assert_eq!(analysis.lengths[0].values, vec![58]);
    assert_eq!(analysis.lengths[1].values, vec![58, 38]);
    assert_eq!(
        analysis.durations[1].durations,
        vec![Some(TimeDelta::hours(1)), None]
    );
    assert_eq!(analysis.unparsed_timestamps(), 1);
    assert_eq!(analysis.reply.with_reply.count, 2);
    assert_eq!(analysis.reply.without_reply.count, 1);
}

#[test]
fn longer_entries_fall_outside_both_partitions() {
    let analysis =
        analyze_feature(&visit_log(), Feature::Radiology, &AnalysisOptions::default()).unwrap();
    assert_eq!(analysis.lengths[0].values, vec![60]);
    assert_eq!(analysis.reply.unclassified, 1);
    assert_eq!(analysis.reply.with_reply.percentage, Some(Percentage(0)));
    assert_eq!(analysis.reply.without_reply.percentage, Some(Percentage(0)));
    assert_eq!(analysis.duration_stats.mean, Some(1800.0));
}

#[test]
fn feature_summaries_come_from_pooled_values() {
    let analysis =
        analyze_feature(&visit_log(), Feature::LabTests, &AnalysisOptions::default()).unwrap();
    let rule = Feature::LabTests.rule();
    assert_eq!(
        summarize_pooled(&pool_lengths(&analysis.lengths), &rule),
        PooledSummary::Reply(analysis.reply.clone())
    );
    assert_eq!(
        summarize_pooled(&pool_durations(&analysis.durations), &rule),
        PooledSummary::Durations(analysis.duration_stats)
    );
}

#[test]
fn all_missing_feature_column_keeps_the_run() {
    let columns =
        ColumnNames::default().with_feature_column(Feature::Consultations, "CONSULTATIONS_NIGHT");
    let options = AnalysisOptions::default().with_columns(columns);
    let report = analyze(&visit_log(), &options).unwrap();

    assert_eq!(report.visit.statistics.count, 3);
    assert_eq!(report.features.len(), 4);
    let consultations = &report.features[0];
    assert_eq!(consultations.column, "CONSULTATIONS_NIGHT");
    assert_eq!(consultations.missing_cells(), 4);
    assert!(consultations.frequency.buckets.is_empty());
    assert_eq!(consultations.reply.total, 0);
    assert_eq!(consultations.reply.with_reply.count, 0);
    assert_eq!(consultations.reply.with_reply.percentage, None);
    assert_eq!(consultations.reply.without_reply.percentage, None);
    assert_eq!(consultations.duration_stats.count, 0);
    assert_eq!(report.features[1].reply.with_reply.count, 2);
}

#[test]
fn strict_policy_rejects_missing_reply() {
    let options = AnalysisOptions::default().with_date_policy(DatePolicy::Strict);
    let err = analyze_feature(&visit_log(), Feature::LabTests, &options).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::TimestampParse {
            feature: Feature::LabTests,
            row: 1,
            ..
        }
    ));
}

#[test]
fn legacy_policy_coerces_only_consultations() {
    let options = AnalysisOptions::default().with_date_policy(DatePolicy::Legacy);
    let consultations = analyze_feature(&visit_log(), Feature::Consultations, &options).unwrap();
    assert_eq!(consultations.unparsed_timestamps(), 1);

    let err = analyze(&visit_log(), &options).unwrap_err();
    assert!(matches!(err, AnalysisError::TimestampParse { .. }));
}

#[test]
fn selected_features_only() {
    let options = AnalysisOptions::default().with_features([Feature::Pharmacy]);
    let report = analyze(&visit_log(), &options).unwrap();
    assert_eq!(report.features.len(), 1);
    let pharmacy = &report.features[0];
    assert_eq!(pharmacy.feature, Feature::Pharmacy);
    assert_eq!(pharmacy.reply.with_reply.percentage, Some(Percentage(100)));
    assert_eq!(pharmacy.duration_stats.max, Some(60.0));
}

#[test]
fn missing_feature_column_is_fatal() {
    let df = test_df(vec![
        ("VISIT_DATE", vec![Some("01/02/2023 10:00")]),
        ("DISCHARGE_DATE", vec![Some("01/02/2023 10:30")]),
    ]);
    let err = analyze(&df, &AnalysisOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::MissingColumn { ref column } if column == "CONSULTATIONS"
    ));
}

#[test]
fn empty_visit_log_is_division_by_zero() {
    let df = test_df(vec![
        ("VISIT_DATE", Vec::new()),
        ("DISCHARGE_DATE", Vec::new()),
    ]);
    let err = analyze(&df, &AnalysisOptions::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::DivisionByZero { .. }));
}
