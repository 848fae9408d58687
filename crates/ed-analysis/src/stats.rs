//! Describe-style statistics over duration series.

use chrono::TimeDelta;
use ed_model::DurationStats;

/// Summarizes the defined values of a duration series, in seconds.
pub fn describe_durations(values: &[Option<TimeDelta>]) -> DurationStats {
    let mut seconds: Vec<f64> = values
        .iter()
        .flatten()
        .map(|delta| delta.num_milliseconds() as f64 / 1000.0)
        .collect();
    describe(&mut seconds)
}

/// count, mean, sample std, min, quartiles (linear interpolation), max.
pub fn describe(values: &mut [f64]) -> DurationStats {
    let count = values.len();
    if count == 0 {
        return DurationStats::default();
    }
    values.sort_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let squares: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
        (squares / (count - 1) as f64).sqrt()
    });

    DurationStats {
        count,
        mean: Some(mean),
        std,
        min: values.first().copied(),
        q1: Some(quantile(values, 0.25)),
        median: Some(quantile(values, 0.5)),
        q3: Some(quantile(values, 0.75)),
        max: values.last().copied(),
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
