//! In-memory dataset shared read-only by every fold task.

use crate::errors::{EvalError, EvalResult};
use foldwise_metrics::Label;
use serde::Serialize;

/// One labelled row.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub features: Vec<f64>,
    pub label: Label,
    /// Inspection effort (e.g. LOC); present iff the dataset names an effort attribute.
    pub effort: Option<f64>,
}

impl Instance {
    pub fn new(features: Vec<f64>, label: Label) -> Self {
        Self {
            features,
            label,
            effort: None,
        }
    }

    pub fn with_effort(mut self, effort: f64) -> Self {
        self.effort = Some(effort);
        self
    }
}

/// Per-class instance counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub positive: usize,
    pub negative: usize,
}

impl ClassCounts {
    pub fn minority(&self) -> usize {
        self.positive.min(self.negative)
    }
}

/// Ordered instances with a uniform schema.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    feature_names: Vec<String>,
    effort_attribute: Option<String>,
    instances: Vec<Instance>,
}

impl Dataset {
    /// Build a dataset, checking that every instance matches the schema.
    pub fn new(
        name: impl Into<String>,
        feature_names: Vec<String>,
        effort_attribute: Option<String>,
        instances: Vec<Instance>,
    ) -> EvalResult<Self> {
        let name = name.into();
        let width = feature_names.len();
        for (row, inst) in instances.iter().enumerate() {
            if inst.features.len() != width {
                return Err(EvalError::dataset(format!(
                    "{name}: instance {row} has {} features, schema has {width}",
                    inst.features.len()
                )));
            }
            if let Some(v) = inst.features.iter().find(|v| !v.is_finite()) {
                return Err(EvalError::dataset(format!(
                    "{name}: instance {row} has non-finite feature value {v}"
                )));
            }
            match (&effort_attribute, inst.effort) {
                (Some(attr), None) => {
                    return Err(EvalError::dataset(format!(
                        "{name}: instance {row} is missing effort attribute '{attr}'"
                    )))
                }
                (None, Some(_)) => {
                    return Err(EvalError::dataset(format!(
                        "{name}: instance {row} carries effort but the dataset names no effort attribute"
                    )))
                }
                (Some(attr), Some(e)) if !e.is_finite() || e < 0.0 => {
                    return Err(EvalError::dataset(format!(
                        "{name}: instance {row} has invalid {attr} value {e}"
                    )))
                }
                _ => {}
            }
        }
        Ok(Self {
            name,
            feature_names,
            effort_attribute,
            instances,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn effort_attribute(&self) -> Option<&str> {
        self.effort_attribute.as_deref()
    }

    pub fn has_effort(&self) -> bool {
        self.effort_attribute.is_some()
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn instance(&self, index: usize) -> &Instance {
        &self.instances[index]
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn class_counts(&self) -> ClassCounts {
        count_classes(self.instances.iter())
    }

    /// Borrow the rows at `indices` without copying them.
    pub fn view<'a>(&'a self, indices: &'a [usize]) -> TrainingSet<'a> {
        TrainingSet {
            dataset: self,
            indices,
        }
    }
}

/// Borrowed subset of a dataset handed to `Classifier::train`.
#[derive(Debug, Clone, Copy)]
pub struct TrainingSet<'a> {
    dataset: &'a Dataset,
    indices: &'a [usize],
}

impl<'a> TrainingSet<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn num_features(&self) -> usize {
        self.dataset.num_features()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Instance> + 'a {
        let (dataset, indices) = (self.dataset, self.indices);
        indices.iter().map(move |&i| dataset.instance(i))
    }

    pub fn class_counts(&self) -> ClassCounts {
        count_classes(self.iter())
    }
}

fn count_classes<'a>(it: impl Iterator<Item = &'a Instance>) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for inst in it {
        match inst.label {
            Label::Positive => counts.positive += 1,
            Label::Negative => counts.negative += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Dataset::new(
            "ragged",
            names(2),
            None,
            vec![
                Instance::new(vec![1.0, 2.0], Label::Positive),
                Instance::new(vec![1.0], Label::Negative),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("instance 1 has 1 features"));
    }

    #[test]
    fn effort_must_be_all_or_nothing() {
        let missing = Dataset::new(
            "d",
            names(1),
            Some("LOC".into()),
            vec![
                Instance::new(vec![1.0], Label::Positive).with_effort(3.0),
                Instance::new(vec![2.0], Label::Negative),
            ],
        );
        assert!(matches!(missing, Err(EvalError::Dataset { .. })));

        let stray = Dataset::new(
            "d",
            names(1),
            None,
            vec![Instance::new(vec![1.0], Label::Positive).with_effort(3.0)],
        );
        assert!(matches!(stray, Err(EvalError::Dataset { .. })));

        let negative = Dataset::new(
            "d",
            names(1),
            Some("LOC".into()),
            vec![Instance::new(vec![1.0], Label::Positive).with_effort(-1.0)],
        );
        assert!(matches!(negative, Err(EvalError::Dataset { .. })));
    }

    #[test]
    fn view_reads_selected_rows() {
        let ds = Dataset::new(
            "d",
            names(1),
            None,
            vec![
                Instance::new(vec![0.0], Label::Negative),
                Instance::new(vec![1.0], Label::Positive),
                Instance::new(vec![2.0], Label::Positive),
            ],
        )
        .unwrap();
        let idx = [2, 0];
        let view = ds.view(&idx);
        let firsts: Vec<f64> = view.iter().map(|i| i.features[0]).collect();
        assert_eq!(firsts, vec![2.0, 0.0]);
        assert_eq!(
            view.class_counts(),
            ClassCounts {
                positive: 1,
                negative: 1
            }
        );
        assert_eq!(ds.class_counts().minority(), 1);
    }
}
