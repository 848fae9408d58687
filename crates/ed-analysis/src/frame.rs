//! DataFrame access helpers.

use polars::prelude::{DataFrame, DataType};

use crate::error::{AnalysisError, Result};

/// Reads a column as optional text, one value per row.
///
/// Non-text columns are cast to text first, so a table with native datetime
/// columns reads the same as one loaded from CSV.
pub fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| AnalysisError::MissingColumn {
            column: name.to_string(),
        })?;
    let column = column.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn reads_nulls_as_none() {
        let series = Series::new("CONSULTATIONS".into(), vec![Some("a;b"), None]);
        let df = DataFrame::new(vec![series.into_column()]).unwrap();
        let values = text_column(&df, "CONSULTATIONS").unwrap();
        assert_eq!(values, vec![Some("a;b".to_string()), None]);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let series = Series::new("VISIT_DATE".into(), vec!["01/02/2023 10:00"]);
        let df = DataFrame::new(vec![series.into_column()]).unwrap();
        let err = text_column(&df, "RADIOLOGY").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingColumn { ref column } if column == "RADIOLOGY"
        ));
    }
}
