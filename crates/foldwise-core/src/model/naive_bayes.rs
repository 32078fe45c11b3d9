//! Gaussian naive Bayes.

use super::{ClassDistribution, Classifier, ModelParams, ModelProvider};
use crate::dataset::TrainingSet;
use anyhow::{bail, ensure};

/// Added to every variance, scaled by the largest feature variance.
const VAR_SMOOTHING: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
struct ClassStats {
    count: usize,
    mean: Vec<f64>,
    var: Vec<f64>,
}

impl ClassStats {
    fn log_likelihood(&self, x: &[f64]) -> f64 {
        self.mean
            .iter()
            .zip(&self.var)
            .zip(x)
            .map(|((m, v), xi)| {
                let d = xi - m;
                -0.5 * ((2.0 * std::f64::consts::PI * v).ln() + d * d / v)
            })
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NaiveBayes {
    // [negative, positive]
    classes: Option<[ClassStats; 2]>,
}

impl NaiveBayes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Classifier for NaiveBayes {
    fn train(&mut self, data: &TrainingSet<'_>) -> anyhow::Result<()> {
        ensure!(!data.is_empty(), "naive bayes: empty training set");
        let width = data.num_features();

        let mut stats = [ClassStats::default(), ClassStats::default()];
        for s in stats.iter_mut() {
            s.mean = vec![0.0; width];
            s.var = vec![0.0; width];
        }

        for inst in data.iter() {
            let s = &mut stats[usize::from(inst.label.is_positive())];
            s.count += 1;
            for (m, x) in s.mean.iter_mut().zip(&inst.features) {
                *m += x;
            }
        }
        for s in stats.iter_mut().filter(|s| s.count > 0) {
            let n = s.count as f64;
            s.mean.iter_mut().for_each(|m| *m /= n);
        }
        for inst in data.iter() {
            let s = &mut stats[usize::from(inst.label.is_positive())];
            for ((v, m), x) in s.var.iter_mut().zip(&s.mean).zip(&inst.features) {
                *v += (x - m) * (x - m);
            }
        }

        let mut max_var: f64 = 0.0;
        for s in stats.iter_mut().filter(|s| s.count > 0) {
            let n = s.count as f64;
            for v in s.var.iter_mut() {
                *v /= n;
                max_var = max_var.max(*v);
            }
        }
        let epsilon = VAR_SMOOTHING * max_var.max(1.0);
        for s in stats.iter_mut() {
            s.var.iter_mut().for_each(|v| *v += epsilon);
        }

        self.classes = Some(stats);
        Ok(())
    }

    fn distribution(&self, features: &[f64]) -> anyhow::Result<ClassDistribution> {
        let Some(classes) = &self.classes else {
            bail!("naive bayes: distribution requested before training");
        };
        ensure!(
            features.len() == classes[0].mean.len(),
            "naive bayes: expected {} features, got {}",
            classes[0].mean.len(),
            features.len()
        );

        let total = (classes[0].count + classes[1].count) as f64;
        let log_post: Vec<Option<f64>> = classes
            .iter()
            .map(|s| {
                (s.count > 0).then(|| (s.count as f64 / total).ln() + s.log_likelihood(features))
            })
            .collect();

        Ok(match (log_post[0], log_post[1]) {
            (Some(neg), Some(pos)) => {
                // Shift by the max before exponentiating.
                let top = neg.max(pos);
                ClassDistribution::from_weights((neg - top).exp(), (pos - top).exp())
            }
            (Some(_), None) => ClassDistribution::from_weights(1.0, 0.0),
            (None, Some(_)) => ClassDistribution::from_weights(0.0, 1.0),
            (None, None) => ClassDistribution::from_weights(0.0, 0.0),
        })
    }

    fn boxed_clone(&self) -> Box<dyn Classifier> {
        Box::new(self.clone())
    }
}

pub struct NaiveBayesProvider;

impl ModelProvider for NaiveBayesProvider {
    fn id(&self) -> &'static str {
        "naive_bayes"
    }

    fn create(&self, params: &ModelParams) -> anyhow::Result<Box<dyn Classifier>> {
        params.ensure_only(&[])?;
        Ok(Box::new(NaiveBayes::new()))
    }
}
