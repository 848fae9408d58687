//! Emergency-department visit log analysis.
//!
//! - [`visit`]: time from visit to discharge, describe statistics and
//!   percentage breakdowns.
//! - [`orders`]: parsing of the free-text order columns (consultations, lab
//!   tests, radiology, pharmacy) into entries, timestamps, durations, and
//!   with/without reply counts.
//! - [`pipeline::analyze`] runs both over a loaded table.

pub mod datetime;
pub mod error;
pub mod frame;
pub mod orders;
pub mod pipeline;
pub mod stats;
pub mod visit;

pub use datetime::{elapsed, parse_day_first};
pub use error::{AnalysisError, Result};
pub use frame::text_column;
pub use orders::{
    ORDER_DELIMITER, analyze_feature, drop_missing, entry_lengths, extract_timestamps,
    feature_cells, order_durations, order_frequency, pool_durations, pool_lengths,
    pooled_durations, pooled_lengths, reply_breakdown, split_orders, summarize_pooled,
};
pub use pipeline::analyze;
pub use stats::{describe, describe_durations};
pub use visit::{analyze_visits, cumulative_breakdown, duration_of_leave, four_hour_breakdown};
