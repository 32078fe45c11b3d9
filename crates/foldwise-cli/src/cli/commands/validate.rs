use crate::cli::args::ValidateArgs;
use crate::exit_codes;
use foldwise_core::config::{load_config, RunConfig};
use foldwise_core::loader::load_csv;
use foldwise_core::{split, EvalError, EvalResult, ModelRegistry};

pub fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let result = load_config(&args.config).and_then(|mut cfg| {
        args.cv.apply(&mut cfg.cv);
        check(&cfg)
    });
    match result {
        Ok(()) => {
            println!("{}: ok", args.config.display());
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => Ok(super::report_error(&e)),
    }
}

/// Everything `run` would reject before the first fold starts.
pub(crate) fn check(cfg: &RunConfig) -> EvalResult<()> {
    cfg.validate(&ModelRegistry::with_builtins())?;
    for spec in &cfg.datasets {
        let ds = load_csv(spec)?;
        if cfg.cv.ranking_mode.requires_effort() && !ds.has_effort() {
            return Err(EvalError::config(format!(
                "ranking mode '{}' needs effort_column for dataset '{}'",
                cfg.cv.ranking_mode,
                ds.name()
            )));
        }
        // One run is enough to prove the fold shape is feasible.
        split::generate(&ds, 1, cfg.cv.folds, cfg.cv.seed, cfg.cv.stratify)?;
    }
    Ok(())
}
