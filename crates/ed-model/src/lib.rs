//! Data model for emergency-department visit log analysis.

pub mod duration;
pub mod error;
pub mod extraction;
pub mod feature;
pub mod options;
pub mod tables;

pub use duration::{format_duration, format_seconds};
pub use error::{ModelError, Result};
pub use extraction::{
    CONSULTATION_RULE, CharSpan, EntryLayout, ExtractionRule, ReplyClass, START_END_RULE,
};
pub use feature::Feature;
pub use options::{
    AnalysisOptions, ColumnNames, DISCHARGE_DATE_COLUMN, DatePolicy, VISIT_DATE_COLUMN,
};
pub use tables::{
    CumulativeBreakdown, DurationStats, EmergencyReport, FeatureAnalysis, FourHourBreakdown,
    FrequencyBucket, IndexedCell, OrderFrequency, OrderRecord, Percentage, PooledKind,
    PooledSummary, PooledValues, RecordDurations, RecordValues, ReplyBreakdown, ReplyPartition,
    VisitDurationReport,
};
