use crate::cli::args::RunArgs;
use crate::exit_codes;
use foldwise_core::config::{load_config, RunConfig};
use foldwise_core::fingerprint::dataset_fingerprint;
use foldwise_core::loader::load_csv;
use foldwise_core::report::{write_json_summary, CsvReportWriter};
use foldwise_core::{EvalResult, Evaluator, ModelRegistry, ModelReport, ProgressEvent, ProgressSink};
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

pub async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let mut cfg = match load_config(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => return Ok(super::report_error(&e)),
    };
    args.cv.apply(&mut cfg.cv);

    match execute(&cfg, args.quiet).await {
        Ok(reports) => {
            println!(
                "{} evaluations written to {}",
                reports.len(),
                cfg.output.dir.display()
            );
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => Ok(super::report_error(&e)),
    }
}

async fn execute(cfg: &RunConfig, quiet: bool) -> EvalResult<Vec<ModelReport>> {
    let registry = ModelRegistry::with_builtins();
    cfg.validate(&registry)?;

    let mut evaluator = Evaluator::new(cfg.cv.clone())?;
    if !quiet {
        evaluator = evaluator.with_progress(progress_sink());
    }
    let mut writer = CsvReportWriter::create(&cfg.output.dir, cfg.output.append)?;

    let mut fingerprints = BTreeMap::new();
    let mut reports = Vec::new();
    for spec in &cfg.datasets {
        let dataset = Arc::new(load_csv(spec)?);
        fingerprints.insert(dataset.name().to_string(), dataset_fingerprint(&dataset));

        for model in &cfg.models {
            let name = model.display_name();
            let prototype = registry.create(&model.provider, &model.params)?;
            let report = evaluator
                .evaluate(Arc::clone(&dataset), name, Arc::from(prototype))
                .await?;
            writer.write_report(&report)?;
            print_row(&report);
            reports.push(report);
        }
    }

    write_json_summary(&cfg.output.dir, &cfg.cv, &fingerprints, &reports)?;
    Ok(reports)
}

fn progress_sink() -> ProgressSink {
    Arc::new(|e: ProgressEvent| {
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\r  folds {}/{}", e.done, e.total);
        if e.done == e.total {
            let _ = writeln!(err);
        }
        let _ = err.flush();
    })
}

fn print_row(r: &ModelReport) {
    let m = &r.aggregate.mean;
    println!(
        "{:<20} {:<16} acc={:>6.2} prec={:.3} rec={:.3} f1={:.3} kappa={:.3} auc={:.3} npofb20={:.3}",
        r.dataset, r.model, m.accuracy, m.precision, m.recall, m.f1, m.kappa, m.auc, m.npofb20
    );
}
