//! Fold completion progress. The scheduler emits done/total in completion
//! order; the CLI renders it.

use std::sync::Arc;

/// How many folds of the current model are done, out of how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub done: usize,
    pub total: usize,
}

/// Called once per completed fold, from the collecting task.
pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;
