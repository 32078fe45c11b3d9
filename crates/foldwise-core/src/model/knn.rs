//! k nearest neighbours over min-max normalised features.

use super::{ClassDistribution, Classifier, ModelParams, ModelProvider};
use crate::dataset::TrainingSet;
use anyhow::{bail, ensure};

pub const DEFAULT_K: usize = 5;

#[derive(Debug, Clone)]
struct Fitted {
    rows: Vec<Vec<f64>>,
    positive: Vec<bool>,
    min: Vec<f64>,
    range: Vec<f64>,
}

impl Fitted {
    fn scale(&self, i: usize, x: f64) -> f64 {
        if self.range[i] > 0.0 {
            (x - self.min[i]) / self.range[i]
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct Knn {
    k: usize,
    fitted: Option<Fitted>,
}

impl Knn {
    pub fn new(k: usize) -> anyhow::Result<Self> {
        ensure!(k >= 1, "knn: k must be >= 1");
        Ok(Self { k, fitted: None })
    }
}

impl Classifier for Knn {
    fn train(&mut self, data: &TrainingSet<'_>) -> anyhow::Result<()> {
        ensure!(!data.is_empty(), "knn: empty training set");
        let width = data.num_features();
        let mut min = vec![f64::INFINITY; width];
        let mut max = vec![f64::NEG_INFINITY; width];
        for inst in data.iter() {
            for (i, &x) in inst.features.iter().enumerate() {
                min[i] = min[i].min(x);
                max[i] = max[i].max(x);
            }
        }
        let range: Vec<f64> = max.iter().zip(&min).map(|(hi, lo)| hi - lo).collect();

        let mut fitted = Fitted {
            rows: Vec::with_capacity(data.len()),
            positive: Vec::with_capacity(data.len()),
            min,
            range,
        };
        for inst in data.iter() {
            let row = inst
                .features
                .iter()
                .enumerate()
                .map(|(i, &x)| fitted.scale(i, x))
                .collect();
            fitted.rows.push(row);
            fitted.positive.push(inst.label.is_positive());
        }
        self.fitted = Some(fitted);
        Ok(())
    }

    fn distribution(&self, features: &[f64]) -> anyhow::Result<ClassDistribution> {
        let Some(fitted) = &self.fitted else {
            bail!("knn: distribution requested before training");
        };
        ensure!(
            features.len() == fitted.min.len(),
            "knn: expected {} features, got {}",
            fitted.min.len(),
            features.len()
        );

        let query: Vec<f64> = features
            .iter()
            .enumerate()
            .map(|(i, &x)| fitted.scale(i, x))
            .collect();
        let mut dist: Vec<(f64, usize)> = fitted
            .rows
            .iter()
            .enumerate()
            .map(|(j, row)| {
                let d2: f64 = row.iter().zip(&query).map(|(a, b)| (a - b) * (a - b)).sum();
                (d2, j)
            })
            .collect();
        // Equal distances resolve to the earlier training row.
        dist.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let k = self.k.min(dist.len());
        let pos = dist[..k].iter().filter(|(_, j)| fitted.positive[*j]).count();
        Ok(ClassDistribution::from_weights(
            (k - pos) as f64,
            pos as f64,
        ))
    }

    fn boxed_clone(&self) -> Box<dyn Classifier> {
        Box::new(self.clone())
    }
}

pub struct KnnProvider;

impl ModelProvider for KnnProvider {
    fn id(&self) -> &'static str {
        "knn"
    }

    fn create(&self, params: &ModelParams) -> anyhow::Result<Box<dyn Classifier>> {
        params.ensure_only(&["k"])?;
        let k = params.get_usize("k", DEFAULT_K)?;
        Ok(Box::new(Knn::new(k)?))
    }
}
