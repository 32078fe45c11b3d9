use clap::{Args, Parser, Subcommand};
use foldwise_metrics::RankingMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "foldwise",
    version,
    about = "Repeated stratified k-fold evaluation of software defect classifiers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate every configured model on every configured dataset
    Run(RunArgs),
    /// Check the config, datasets and models without evaluating
    Validate(ValidateArgs),
    /// Write a sample foldwise.yaml
    Init(InitArgs),
}

#[derive(Args, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = "foldwise.yaml")]
    pub config: PathBuf,

    #[command(flatten)]
    pub cv: CvOverrides,

    /// Do not print fold progress
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    #[arg(long, default_value = "foldwise.yaml")]
    pub config: PathBuf,

    #[command(flatten)]
    pub cv: CvOverrides,
}

#[derive(Args, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "foldwise.yaml")]
    pub config: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Command-line overrides of the `cv` section.
#[derive(Args, Clone, Default)]
pub struct CvOverrides {
    #[arg(long)]
    pub runs: Option<usize>,

    #[arg(long)]
    pub folds: Option<usize>,

    #[arg(long, env = "FOLDWISE_SEED")]
    pub seed: Option<u64>,

    /// effort | count
    #[arg(long)]
    pub ranking_mode: Option<RankingMode>,

    #[arg(long)]
    pub workers: Option<usize>,
}

impl CvOverrides {
    pub fn apply(&self, cv: &mut foldwise_core::CvConfig) {
        if let Some(v) = self.runs {
            cv.runs = v;
        }
        if let Some(v) = self.folds {
            cv.folds = v;
        }
        if let Some(v) = self.seed {
            cv.seed = v;
        }
        if let Some(v) = self.ranking_mode {
            cv.ranking_mode = v;
        }
        if let Some(v) = self.workers {
            cv.workers = Some(v);
        }
    }
}
