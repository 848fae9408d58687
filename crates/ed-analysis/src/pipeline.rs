//! Full analysis run over one loaded visit log.

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use ed_model::{AnalysisOptions, EmergencyReport};

use crate::error::Result;
use crate::orders::analyze_feature;
use crate::visit::analyze_visits;

/// Visit durations first, then each selected feature in order.
///
/// Stops at the first error.
pub fn analyze(df: &DataFrame, options: &AnalysisOptions) -> Result<EmergencyReport> {
    let span = info_span!("analyze", records = df.height());
    let _guard = span.enter();

    let visit = analyze_visits(df, &options.columns)?;
    info!(
        records = df.height(),
        undefined = visit.undefined(),
        "Visit duration analysis complete"
    );

    let mut features = Vec::with_capacity(options.features.len());
    for feature in &options.features {
        let analysis = analyze_feature(df, *feature, options)?;
        info!(
            %feature,
            records = analysis.present.len(),
            orders = analysis.reply.total,
            "Order field analysis complete"
        );
        features.push(analysis);
    }

    Ok(EmergencyReport {
        options: options.clone(),
        records: df.height(),
        visit,
        features,
    })
}
