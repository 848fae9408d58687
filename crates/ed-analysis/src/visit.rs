//! Visit duration analysis: how long patients stay before discharge.

use chrono::TimeDelta;
use polars::prelude::DataFrame;
use tracing::{debug, info_span, warn};

use ed_model::{ColumnNames, CumulativeBreakdown, FourHourBreakdown, Percentage, VisitDurationReport};

use crate::datetime::elapsed;
use crate::error::{AnalysisError, Result};
use crate::frame::text_column;
use crate::stats::describe_durations;

/// Discharge minus visit, one value per record.
///
/// A record whose visit or discharge timestamp is missing or unreadable gets
/// an undefined duration.
pub fn duration_of_leave(
    df: &DataFrame,
    visit_column: &str,
    discharge_column: &str,
) -> Result<Vec<Option<TimeDelta>>> {
    let visits = text_column(df, visit_column)?;
    let discharges = text_column(df, discharge_column)?;

    let durations: Vec<Option<TimeDelta>> = visits
        .iter()
        .zip(&discharges)
        .map(|(visit, discharge)| match (visit, discharge) {
            (Some(visit), Some(discharge)) => elapsed(visit, discharge),
            _ => None,
        })
        .collect();

    let undefined = durations.iter().filter(|value| value.is_none()).count();
    if undefined > 0 {
        warn!(
            undefined,
            records = durations.len(),
            "Visit records without a usable duration"
        );
    }
    Ok(durations)
}

fn share<F>(durations: &[Option<TimeDelta>], what: &'static str, keep: F) -> Result<Percentage>
where
    F: Fn(TimeDelta) -> bool,
{
    let count = durations
        .iter()
        .flatten()
        .filter(|delta| keep(**delta))
        .count();
    Percentage::of(count, durations.len()).ok_or(AnalysisError::DivisionByZero { what })
}

/// Percent of records under four hours and at four hours or more.
///
/// Each side is rounded on its own, so the pair may sum to 99 or 101.
pub fn four_hour_breakdown(durations: &[Option<TimeDelta>]) -> Result<FourHourBreakdown> {
    let limit = TimeDelta::hours(4);
    Ok(FourHourBreakdown {
        under_four_hours: share(durations, "four-hour breakdown", |delta| delta < limit)?,
        four_hours_or_more: share(durations, "four-hour breakdown", |delta| delta >= limit)?,
    })
}

/// Percent of records discharged within 10, 20, and 30 minutes.
pub fn cumulative_breakdown(durations: &[Option<TimeDelta>]) -> Result<CumulativeBreakdown> {
    let within = |minutes: i64| {
        let limit = TimeDelta::minutes(minutes);
        share(durations, "quick-discharge breakdown", move |delta| {
            delta <= limit
        })
    };
    Ok(CumulativeBreakdown {
        within_10_minutes: within(10)?,
        within_20_minutes: within(20)?,
        within_30_minutes: within(30)?,
    })
}

/// Runs the full visit duration analysis.
pub fn analyze_visits(df: &DataFrame, columns: &ColumnNames) -> Result<VisitDurationReport> {
    let span = info_span!(
        "visit_durations",
        visit = %columns.visit,
        discharge = %columns.discharge
    );
    let _guard = span.enter();

    let durations = duration_of_leave(df, &columns.visit, &columns.discharge)?;
    let statistics = describe_durations(&durations);
    let four_hour = four_hour_breakdown(&durations)?;
    let cumulative = cumulative_breakdown(&durations)?;
    debug!(
        records = durations.len(),
        under_four_hours = %four_hour.under_four_hours,
        "Visit durations computed"
    );

    Ok(VisitDurationReport {
        durations,
        statistics,
        four_hour,
        cumulative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(values: &[i64]) -> Vec<Option<TimeDelta>> {
        values
            .iter()
            .map(|value| Some(TimeDelta::minutes(*value)))
            .collect()
    }

    #[test]
    fn four_hour_boundary_counts_as_four_or_more() {
        let breakdown = four_hour_breakdown(&minutes(&[239, 240, 241, 30])).unwrap();
        assert_eq!(breakdown.under_four_hours, Percentage(50));
        assert_eq!(breakdown.four_hours_or_more, Percentage(50));
    }

    #[test]
    fn undefined_durations_stay_in_denominator() {
        let mut durations = minutes(&[30, 300, 60]);
        durations.push(None);
        let breakdown = four_hour_breakdown(&durations).unwrap();
        assert_eq!(breakdown.under_four_hours, Percentage(50));
        assert_eq!(breakdown.four_hours_or_more, Percentage(25));
    }

    #[test]
    fn cumulative_thresholds_are_inclusive() {
        let breakdown = cumulative_breakdown(&minutes(&[10, 20, 30, 31])).unwrap();
        assert_eq!(breakdown.within_10_minutes, Percentage(25));
        assert_eq!(breakdown.within_20_minutes, Percentage(50));
        assert_eq!(breakdown.within_30_minutes, Percentage(75));
    }

    #[test]
    fn empty_series_is_division_by_zero() {
        assert!(matches!(
            four_hour_breakdown(&[]),
            Err(AnalysisError::DivisionByZero { .. })
        ));
        assert!(matches!(
            cumulative_breakdown(&[]),
            Err(AnalysisError::DivisionByZero { .. })
        ));
    }
}
