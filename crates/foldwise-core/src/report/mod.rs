pub mod csv;
pub mod json;

pub use self::csv::{CsvReportWriter, FOLD_METRICS_FILE, RESULTS_FILE};
pub use self::json::{write_json_summary, SUMMARY_FILE};
