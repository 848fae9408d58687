//! Result tables produced by the analysis.

use std::fmt;

use chrono::TimeDelta;
use serde::Serialize;

use crate::duration::serialize_seconds;
use crate::feature::Feature;
use crate::options::AnalysisOptions;

/// Whole-number percentage, rounded half to even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Percentage(pub u32);

impl Percentage {
    /// `count / total * 100`, or `None` when `total` is zero.
    ///
    /// ```
    /// use ed_model::Percentage;
    ///
    /// assert_eq!(Percentage::of(3, 5), Some(Percentage(60)));
    /// assert_eq!(Percentage::of(1, 8), Some(Percentage(12)));
    /// assert_eq!(Percentage::of(1, 0), None);
    /// ```
    pub fn of(count: usize, total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let ratio = count as f64 / total as f64 * 100.0;
        Some(Self(ratio.round_ties_even() as u32))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Describe-style summary of a duration series, in seconds.
///
/// Undefined durations are excluded. Every statistic except `count` is `None`
/// for an empty series; `std` also needs at least two values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DurationStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q1: Option<f64>,
    #[serde(rename = "50%")]
    pub median: Option<f64>,
    #[serde(rename = "75%")]
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl DurationStats {
    /// Statistic rows after `count`, labeled as in the rendered table.
    pub fn rows(&self) -> [(&'static str, Option<f64>); 7] {
        [
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q1),
            ("50%", self.median),
            ("75%", self.q3),
            ("max", self.max),
        ]
    }
}

/// Share of visits discharged in under four hours vs. four hours or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FourHourBreakdown {
    pub under_four_hours: Percentage,
    pub four_hours_or_more: Percentage,
}

/// Share of visits discharged within 10, 20, and 30 minutes.
///
/// The thresholds are cumulative: a 5-minute visit counts in all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CumulativeBreakdown {
    pub within_10_minutes: Percentage,
    pub within_20_minutes: Percentage,
    pub within_30_minutes: Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitDurationReport {
    /// Discharge minus visit, one value per record.
    #[serde(rename = "duration_seconds", serialize_with = "serialize_seconds")]
    pub durations: Vec<Option<TimeDelta>>,
    pub statistics: DurationStats,
    pub four_hour: FourHourBreakdown,
    pub cumulative: CumulativeBreakdown,
}

impl VisitDurationReport {
    pub fn undefined(&self) -> usize {
        self.durations.iter().filter(|value| value.is_none()).count()
    }
}

/// A non-missing feature cell with its source row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedCell {
    pub row: usize,
    pub text: String,
}

/// A feature cell split into its order entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    pub row: usize,
    pub entries: Vec<String>,
}

impl OrderRecord {
    pub fn order_count(&self) -> usize {
        self.entries.len()
    }
}

/// Per-record sequence of derived values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordValues<T> {
    pub row: usize,
    pub values: Vec<T>,
}

/// Per-record order durations (reply minus request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDurations {
    pub row: usize,
    #[serde(rename = "duration_seconds", serialize_with = "serialize_seconds")]
    pub durations: Vec<Option<TimeDelta>>,
    /// Segments whose request or reply timestamp could not be parsed.
    pub unparsed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrequencyBucket {
    /// Orders per record.
    pub orders: usize,
    /// Records with exactly that many orders.
    pub records: usize,
}

/// Histogram of orders per record, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderFrequency {
    pub column: String,
    pub buckets: Vec<FrequencyBucket>,
}

impl OrderFrequency {
    pub fn total_records(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.records).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyPartition {
    /// Distinct entry lengths in this partition, in first-seen order.
    pub lengths: Vec<usize>,
    pub count: usize,
    /// Share of the pooled total; `None` when the pool is empty.
    pub percentage: Option<Percentage>,
}

/// Order entries split into with/without reply by text length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyBreakdown {
    pub threshold: usize,
    pub without_reply: ReplyPartition,
    pub with_reply: ReplyPartition,
    /// Entries longer than the threshold.
    pub unclassified: usize,
    pub total: usize,
}

/// Pooled per-record values, tagged with what they measure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PooledValues {
    Lengths(Vec<usize>),
    Durations(Vec<Option<TimeDelta>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PooledKind {
    Lengths,
    Durations,
}

impl PooledValues {
    pub fn kind(&self) -> PooledKind {
        match self {
            PooledValues::Lengths(_) => PooledKind::Lengths,
            PooledValues::Durations(_) => PooledKind::Durations,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PooledValues::Lengths(values) => values.len(),
            PooledValues::Durations(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PooledSummary {
    Reply(ReplyBreakdown),
    Durations(DurationStats),
}

impl PooledSummary {
    /// Kind of pooled values this summary was computed from.
    pub fn kind(&self) -> PooledKind {
        match self {
            PooledSummary::Reply(_) => PooledKind::Lengths,
            PooledSummary::Durations(_) => PooledKind::Durations,
        }
    }
}

/// Every table derived from one feature column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureAnalysis {
    pub feature: Feature,
    pub column: String,
    pub raw: Vec<Option<String>>,
    pub present: Vec<IndexedCell>,
    pub orders: Vec<OrderRecord>,
    pub frequency: OrderFrequency,
    pub lengths: Vec<RecordValues<usize>>,
    pub timestamps: Vec<RecordValues<String>>,
    pub durations: Vec<RecordDurations>,
    pub reply: ReplyBreakdown,
    pub duration_stats: DurationStats,
}

impl FeatureAnalysis {
    pub fn missing_cells(&self) -> usize {
        self.raw.len() - self.present.len()
    }

    pub fn unparsed_timestamps(&self) -> usize {
        self.durations.iter().map(|record| record.unparsed).sum()
    }
}

/// Full result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyReport {
    pub options: AnalysisOptions,
    pub records: usize,
    pub visit: VisitDurationReport,
    pub features: Vec<FeatureAnalysis>,
}
