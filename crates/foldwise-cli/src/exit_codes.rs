//! Process exit codes. Part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const RUNTIME_ERROR: i32 = 1; // I/O while reading inputs or writing reports
pub const CONFIG_ERROR: i32 = 2; // Bad config, dataset, or CLI usage
pub const EVALUATION_FAILED: i32 = 3; // A fold failed or results could not be collected
