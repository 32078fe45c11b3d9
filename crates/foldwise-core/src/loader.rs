//! CSV dataset loader.

use crate::config::DatasetSpec;
use crate::dataset::{Dataset, Instance};
use crate::errors::{EvalError, EvalResult};
use foldwise_metrics::Label;

/// Load a headed CSV file.
///
/// The class column (default: last) is compared verbatim against
/// `positive_label`; every other column must be numeric and becomes a feature.
/// A named effort column stays a feature and also supplies each row's effort.
pub fn load_csv(spec: &DatasetSpec) -> EvalResult<Dataset> {
    let file = spec.path.display().to_string();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&spec.path)
        .map_err(|e| EvalError::dataset(format!("{file}: {e}")))?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| EvalError::dataset(format!("{file}: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.len() < 2 {
        return Err(EvalError::dataset(format!(
            "{file}: need at least one feature column and a class column"
        )));
    }

    let class_idx = match &spec.class_column {
        Some(name) => column_index(&headers, name, &file)?,
        None => headers.len() - 1,
    };
    let effort_idx = match &spec.effort_column {
        Some(name) => {
            let idx = column_index(&headers, name, &file)?;
            if idx == class_idx {
                return Err(EvalError::dataset(format!(
                    "{file}: effort column '{name}' is the class column"
                )));
            }
            Some(idx)
        }
        None => None,
    };

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != class_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut instances = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| EvalError::dataset(format!("{file}: {e}")))?;
        let line = record.position().map_or(0, |p| p.line());

        let mut features = Vec::with_capacity(feature_names.len());
        let mut label = Label::Negative;
        let mut effort = None;
        for (i, raw) in record.iter().enumerate() {
            if i == class_idx {
                if raw == spec.positive_label {
                    label = Label::Positive;
                }
                continue;
            }
            let v: f64 = raw.parse().map_err(|_| {
                EvalError::dataset(format!(
                    "{file}: line {line}, column '{}': '{raw}' is not a number",
                    headers[i]
                ))
            })?;
            if Some(i) == effort_idx {
                effort = Some(v);
            }
            features.push(v);
        }
        instances.push(Instance {
            features,
            label,
            effort,
        });
    }

    if instances.is_empty() {
        return Err(EvalError::dataset(format!("{file}: no data rows")));
    }

    let dataset = Dataset::new(
        spec.display_name(),
        feature_names,
        spec.effort_column.clone(),
        instances,
    )?;
    let counts = dataset.class_counts();
    tracing::info!(
        dataset = dataset.name(),
        instances = dataset.len(),
        features = dataset.num_features(),
        positives = counts.positive,
        "dataset loaded"
    );
    Ok(dataset)
}

fn column_index(headers: &[String], name: &str, file: &str) -> EvalResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| EvalError::dataset(format!("{file}: no column named '{name}'")))
}
