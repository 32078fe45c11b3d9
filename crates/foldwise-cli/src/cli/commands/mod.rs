pub mod dispatch;
pub mod init;
pub mod run;
pub mod validate;

pub use dispatch::dispatch;

use crate::exit_codes;
use foldwise_core::EvalError;

/// Print an engine error and map it to the process exit code.
pub(crate) fn report_error(e: &EvalError) -> i32 {
    eprintln!("error[{}]: {e}", e.kind());
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    match e.exit_code() {
        2 => exit_codes::CONFIG_ERROR,
        3 => exit_codes::EVALUATION_FAILED,
        _ => exit_codes::RUNTIME_ERROR,
    }
}
