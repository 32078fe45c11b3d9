//! Deterministic repeated (stratified) k-fold split generation.

use crate::dataset::Dataset;
use crate::errors::{EvalError, EvalResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::ops::Range;

/// One train/test partition of the dataset for a given `(run, fold)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub run: usize,
    pub fold: usize,
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Seed used for the shuffle of `run`.
pub fn run_seed(seed_base: u64, run: usize) -> u64 {
    seed_base.wrapping_add(run as u64)
}

/// Contiguous fold blocks over `n` positions: `n / k` each, plus one for the
/// first `n % k` folds.
pub fn fold_ranges(n: usize, k: usize) -> Vec<Range<usize>> {
    let base = n / k;
    let extra = n % k;
    let mut start = 0;
    (0..k)
        .map(|f| {
            let len = base + usize::from(f < extra);
            let r = start..start + len;
            start += len;
            r
        })
        .collect()
}

/// Generate `runs * folds` splits ordered by `(run, fold)`.
pub fn generate(
    dataset: &Dataset,
    runs: usize,
    folds: usize,
    seed_base: u64,
    stratify: bool,
) -> EvalResult<Vec<Split>> {
    check_shape(dataset, runs, folds, stratify)?;

    let n = dataset.len();
    let ranges = fold_ranges(n, folds);
    let mut splits = Vec::with_capacity(runs * folds);

    for run in 0..runs {
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(run_seed(seed_base, run));
        order.shuffle(&mut rng);
        if stratify {
            order = stratified_order(dataset, &order, folds);
        }

        for (fold, range) in ranges.iter().enumerate() {
            let test = order[range.clone()].to_vec();
            let train = order[..range.start]
                .iter()
                .chain(&order[range.end..])
                .copied()
                .collect();
            splits.push(Split {
                run,
                fold,
                train,
                test,
            });
        }
    }

    Ok(splits)
}

fn check_shape(dataset: &Dataset, runs: usize, folds: usize, stratify: bool) -> EvalResult<()> {
    if folds < 2 {
        return Err(EvalError::config(format!("folds must be >= 2, got {folds}")));
    }
    if runs < 1 {
        return Err(EvalError::config("runs must be >= 1, got 0"));
    }
    let n = dataset.len();
    if n < folds {
        return Err(EvalError::config(format!(
            "{}: {n} instances cannot fill {folds} folds",
            dataset.name()
        )));
    }
    if stratify {
        let minority = dataset.class_counts().minority();
        if minority < folds {
            return Err(EvalError::config(format!(
                "{}: minority class has {minority} instances, stratified {folds}-fold needs at least {folds}",
                dataset.name()
            )));
        }
    }
    Ok(())
}

/// Positives first, then negatives (shuffled order kept within a class), dealt
/// round-robin into `folds` buckets; buckets concatenated in fold order.
fn stratified_order(dataset: &Dataset, shuffled: &[usize], folds: usize) -> Vec<usize> {
    let (pos, neg): (Vec<usize>, Vec<usize>) = shuffled
        .iter()
        .partition(|&&i| dataset.instance(i).label.is_positive());

    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); folds];
    for (slot, idx) in pos.into_iter().chain(neg).enumerate() {
        buckets[slot % folds].push(idx);
    }
    buckets.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Instance;
    use foldwise_metrics::Label;

    fn dataset(pos: usize, neg: usize) -> Dataset {
        let mut rows = Vec::new();
        for i in 0..pos {
            rows.push(Instance::new(vec![i as f64], Label::Positive));
        }
        for i in 0..neg {
            rows.push(Instance::new(vec![i as f64], Label::Negative));
        }
        Dataset::new("toy", vec!["x".into()], None, rows).unwrap()
    }

    #[test]
    fn fold_ranges_give_extra_to_leading_folds() {
        let sizes: Vec<usize> = fold_ranges(23, 5).iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![5, 5, 5, 4, 4]);
        assert_eq!(fold_ranges(10, 5).last(), Some(&(8..10)));
    }

    #[test]
    fn stratified_folds_balance_classes() {
        let ds = dataset(10, 40);
        let splits = generate(&ds, 1, 5, 7, true).unwrap();
        for s in &splits {
            let positives = s
                .test
                .iter()
                .filter(|&&i| ds.instance(i).label.is_positive())
                .count();
            assert_eq!(positives, 2, "fold {} has {positives} positives", s.fold);
            assert_eq!(s.test.len(), 10);
            assert_eq!(s.train.len(), 40);
        }
    }

    #[test]
    fn runs_use_distinct_seeds() {
        let ds = dataset(20, 20);
        let splits = generate(&ds, 2, 4, 0, false).unwrap();
        assert_eq!(splits.len(), 8);
        assert_ne!(splits[0].test, splits[4].test);
        assert_eq!(run_seed(u64::MAX, 1), 0);
    }

    #[test]
    fn rejects_bad_shapes() {
        let ds = dataset(3, 10);
        assert!(matches!(
            generate(&ds, 1, 1, 0, false),
            Err(EvalError::Configuration { .. })
        ));
        assert!(matches!(
            generate(&ds, 0, 2, 0, false),
            Err(EvalError::Configuration { .. })
        ));
        assert!(matches!(
            generate(&dataset(1, 2), 1, 5, 0, false),
            Err(EvalError::Configuration { .. })
        ));
        let err = generate(&ds, 1, 5, 0, true).unwrap_err();
        assert!(err.to_string().contains("minority class has 3"));
        // Unstratified does not care about the minority count.
        assert!(generate(&ds, 1, 5, 0, false).is_ok());
    }
}
