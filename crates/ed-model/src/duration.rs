//! Duration display and serialization helpers.

use chrono::TimeDelta;
use serde::Serializer;

const SECONDS_PER_DAY: i64 = 86_400;

/// Formats a duration as `D days HH:MM:SS`, whole seconds.
///
/// Negative durations keep a positive clock part: `-1 days +23:00:00`.
///
/// ```
/// use chrono::TimeDelta;
/// use ed_model::format_duration;
///
/// assert_eq!(format_duration(TimeDelta::minutes(195)), "0 days 03:15:00");
/// assert_eq!(format_duration(TimeDelta::hours(-1)), "-1 days +23:00:00");
/// ```
pub fn format_duration(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    let days = total.div_euclid(SECONDS_PER_DAY);
    let rest = total.rem_euclid(SECONDS_PER_DAY);
    let (hours, minutes, seconds) = (rest / 3600, rest % 3600 / 60, rest % 60);
    if days < 0 {
        format!("{days} days +{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{days} days {hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Formats a duration given in (fractional) seconds, rounded to the second.
pub fn format_seconds(seconds: f64) -> String {
    format_duration(TimeDelta::seconds(seconds.round() as i64))
}

/// Serializes a duration series as whole seconds, `null` when undefined.
#[allow(clippy::ptr_arg)]
pub fn serialize_seconds<S: Serializer>(
    values: &Vec<Option<TimeDelta>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|value| value.map(|delta| delta.num_seconds())))
}
