use crate::engine::ModelReport;
use crate::errors::EvalResult;
use foldwise_metrics::Metrics;
use std::fs::{File, OpenOptions};
use std::path::Path;

pub const RESULTS_FILE: &str = "results.csv";
pub const FOLD_METRICS_FILE: &str = "fold_metrics.csv";

/// Writes aggregate rows to `results.csv` and per-fold rows to
/// `fold_metrics.csv` inside one output directory.
///
/// In append mode existing files keep their content and the header is only
/// written to files that are new or empty.
pub struct CsvReportWriter {
    results: csv::Writer<File>,
    folds: csv::Writer<File>,
}

impl CsvReportWriter {
    pub fn create(dir: &Path, append: bool) -> EvalResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut results = open(&dir.join(RESULTS_FILE), append, &results_header())?;
        let mut folds = open(&dir.join(FOLD_METRICS_FILE), append, &fold_header())?;
        results.flush()?;
        folds.flush()?;

        Ok(Self { results, folds })
    }

    pub fn write_report(&mut self, report: &ModelReport) -> EvalResult<()> {
        let mut row = vec![report.dataset.clone(), report.model.clone()];
        row.extend(metric_cells(&report.aggregate.mean));
        self.results.write_record(&row)?;

        for r in &report.per_fold {
            let mut row = vec![
                report.dataset.clone(),
                r.model.clone(),
                r.run.to_string(),
                r.fold.to_string(),
            ];
            row.extend(metric_cells(&r.metrics));
            self.folds.write_record(&row)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> EvalResult<()> {
        self.results.flush()?;
        self.folds.flush()?;
        Ok(())
    }
}

fn results_header() -> Vec<&'static str> {
    let mut h = vec!["Dataset", "Classifier"];
    h.extend(Metrics::NAMES);
    h
}

fn fold_header() -> Vec<&'static str> {
    let mut h = vec!["Dataset", "Classifier", "Run", "Fold"];
    h.extend(Metrics::NAMES);
    h
}

fn metric_cells(m: &Metrics) -> impl Iterator<Item = String> {
    m.values().into_iter().map(|v| v.to_string())
}

fn open(path: &Path, append: bool, header: &[&str]) -> EvalResult<csv::Writer<File>> {
    let file = if append {
        OpenOptions::new().create(true).append(true).open(path)?
    } else {
        File::create(path)?
    };
    let needs_header = file.metadata()?.len() == 0;
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if needs_header {
        w.write_record(header)?;
    }
    Ok(w)
}
